// Communication channels lock-free

use crate::messaging::command::Command;
use crate::messaging::event::SequencerEvent;
use ringbuf::{HeapRb, traits::Split};

pub type CommandProducer = ringbuf::HeapProd<Command>;
pub type CommandConsumer = ringbuf::HeapCons<Command>;

pub fn create_command_channel(capacity: usize) -> (CommandProducer, CommandConsumer) {
    let rb = HeapRb::<Command>::new(capacity);
    rb.split()
}

pub type EventProducer = ringbuf::HeapProd<SequencerEvent>;
pub type EventConsumer = ringbuf::HeapCons<SequencerEvent>;

pub fn create_event_channel(capacity: usize) -> (EventProducer, EventConsumer) {
    let rb = HeapRb::<SequencerEvent>::new(capacity);
    rb.split()
}

/// Pop every pending event
pub fn drain_events(rx: &mut EventConsumer) -> Vec<SequencerEvent> {
    let mut events = Vec::new();
    while let Some(event) = ringbuf::traits::Consumer::try_pop(rx) {
        events.push(event);
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_channel_roundtrip() {
        let (mut tx, mut rx) = create_event_channel(4);

        assert!(ringbuf::traits::Producer::try_push(&mut tx, SequencerEvent::Reset).is_ok());
        assert!(
            ringbuf::traits::Producer::try_push(
                &mut tx,
                SequencerEvent::Completed { session_elapsed: 12 }
            )
            .is_ok()
        );

        let events = drain_events(&mut rx);
        assert_eq!(
            events,
            vec![
                SequencerEvent::Reset,
                SequencerEvent::Completed { session_elapsed: 12 }
            ]
        );
        assert!(drain_events(&mut rx).is_empty());
    }

    #[test]
    fn test_command_channel_capacity() {
        let (mut tx, _rx) = create_command_channel(2);

        assert!(ringbuf::traits::Producer::try_push(&mut tx, Command::Start).is_ok());
        assert!(ringbuf::traits::Producer::try_push(&mut tx, Command::Pause).is_ok());
        // Full: push is rejected, never blocks
        assert!(ringbuf::traits::Producer::try_push(&mut tx, Command::Stop).is_err());
    }
}
