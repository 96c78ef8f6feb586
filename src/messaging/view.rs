// View - Consumer of sequencer events
// Rendering belongs to the host; the sequencer only pushes events

use crate::messaging::channels::EventProducer;
use crate::messaging::event::SequencerEvent;

/// Receives every event the sequencer emits, in order
pub trait View: Send {
    fn on_event(&mut self, event: &SequencerEvent);
}

/// View that discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullView;

impl View for NullView {
    fn on_event(&mut self, _event: &SequencerEvent) {}
}

/// View that forwards events into a lock-free channel
///
/// The consumer side is drained by the rendering loop. When the channel is
/// full the event is dropped and counted.
pub struct ChannelView {
    tx: EventProducer,
    dropped: u64,
}

impl ChannelView {
    pub fn new(tx: EventProducer) -> Self {
        Self { tx, dropped: 0 }
    }

    /// Number of events dropped because the channel was full
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl View for ChannelView {
    fn on_event(&mut self, event: &SequencerEvent) {
        if ringbuf::traits::Producer::try_push(&mut self.tx, event.clone()).is_err() {
            self.dropped += 1;
            tracing::warn!(
                kind = event.kind(),
                dropped = self.dropped,
                "Event channel full, dropping event"
            );
        }
    }
}
