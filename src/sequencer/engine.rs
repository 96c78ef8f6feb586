// Step sequencer - Drives one sequence through time
// Finite-state stepper: load → start → tick/advance/retreat → completed/stop

use super::error::{SequencerError, SequencerResult};
use super::sequence::Sequence;
use super::step::Step;
use super::timeline::StepCounter;
use super::transport::SequencerStatus;
use crate::cue::{CueDispatcher, CuePolicy};
use crate::messaging::{NullView, SequencerEvent, StepDisplay, View};

/// Live state of one session
///
/// Only one step is current at a time: `cursor < sequence.len()` whenever a
/// sequence is loaded.
#[derive(Debug, Clone, Default)]
pub struct SequencerState {
    sequence: Option<Sequence>,
    cursor: usize,
    status: SequencerStatus,
    counter: StepCounter,
    sub_iteration: u32,
    session_elapsed: u64,
}

impl SequencerState {
    /// Loaded sequence, if any
    pub fn sequence(&self) -> Option<&Sequence> {
        self.sequence.as_ref()
    }

    /// Index of the current step
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn status(&self) -> SequencerStatus {
        self.status
    }

    /// Remaining (countdown) or elapsed (count-up) seconds of the current step
    pub fn counter(&self) -> StepCounter {
        self.counter
    }

    /// Current set of the current step (1-based)
    pub fn sub_iteration(&self) -> u32 {
        self.sub_iteration
    }

    /// Seconds spent Running since the session started
    pub fn session_elapsed(&self) -> u64 {
        self.session_elapsed
    }

    /// Current step, if a sequence is loaded
    pub fn current_step(&self) -> Option<&Step> {
        self.sequence.as_ref().and_then(|seq| seq.get(self.cursor))
    }

    /// Steps strictly after the cursor
    pub fn upcoming(&self) -> &[Step] {
        match &self.sequence {
            Some(seq) => seq.upcoming(self.cursor),
            None => &[],
        }
    }

    /// Display values for the current step
    pub fn display(&self) -> Option<StepDisplay> {
        let sequence = self.sequence.as_ref()?;
        let step = sequence.get(self.cursor)?;

        Some(StepDisplay {
            step: step.clone(),
            displayed_step: self.cursor + 1,
            total_steps: sequence.len(),
            sub_iteration: self.sub_iteration,
            sub_iterations: step.sub_iterations(),
            counter: self.counter,
            upcoming: sequence
                .upcoming(self.cursor)
                .iter()
                .map(|s| s.label.clone())
                .collect(),
        })
    }
}

/// Step sequencer
///
/// Owns the session state, the view that renders it and the cue dispatcher.
/// The host calls `tick()` once per logical second while running; every
/// transition is reported to the view as a `SequencerEvent`.
pub struct StepSequencer {
    state: SequencerState,
    view: Box<dyn View>,
    cues: CueDispatcher,
}

impl StepSequencer {
    /// Create an empty (Idle, unloaded) sequencer
    pub fn new(view: Box<dyn View>, cues: CueDispatcher) -> Self {
        Self {
            state: SequencerState::default(),
            view,
            cues,
        }
    }

    /// Sequencer with no view and silent cues
    pub fn headless() -> Self {
        Self::new(Box::new(NullView), CueDispatcher::silent())
    }

    /// Load a sequence, replacing any previous session
    ///
    /// Resets cursor, status and session clock and arms the first step
    /// without playing its cue.
    pub fn load(&mut self, sequence: Sequence) -> SequencerResult<()> {
        sequence.check()?;

        if self.state.status.is_active() {
            self.cues.silence();
        }

        tracing::info!(
            name = %sequence.name,
            steps = sequence.len(),
            looping = sequence.is_looping(),
            "Sequence loaded"
        );

        self.state = SequencerState {
            sequence: Some(sequence),
            ..SequencerState::default()
        };
        self.enter_step(false);
        Ok(())
    }

    /// Start the session clock
    ///
    /// From Idle: performs step entry on the current step (cue included).
    /// From Paused: same as `resume`. From Completed: rewinds to the first
    /// step and starts a new run. No-op when already running.
    pub fn start(&mut self) -> SequencerResult<()> {
        if self.state.sequence.is_none() {
            return Err(SequencerError::NotLoaded);
        }

        match self.state.status {
            SequencerStatus::Running => Ok(()),
            SequencerStatus::Paused => self.resume(),
            SequencerStatus::Idle | SequencerStatus::Completed => {
                if self.state.status.is_completed() {
                    self.state.cursor = 0;
                }
                self.state.session_elapsed = 0;
                self.state.status = SequencerStatus::Running;
                tracing::info!(cursor = self.state.cursor, "Session started");
                self.enter_step(true);
                Ok(())
            }
        }
    }

    /// Freeze both clocks; no-op unless running
    pub fn pause(&mut self) -> SequencerResult<()> {
        if self.state.status.is_running() {
            self.state.status = SequencerStatus::Paused;
            tracing::debug!(
                cursor = self.state.cursor,
                counter = self.state.counter.value(),
                "Paused"
            );
        }
        Ok(())
    }

    /// Resume both clocks from their frozen values; no-op unless paused
    pub fn resume(&mut self) -> SequencerResult<()> {
        if self.state.status.is_paused() {
            self.state.status = SequencerStatus::Running;
            tracing::debug!(cursor = self.state.cursor, "Resumed");
        }
        Ok(())
    }

    /// Process exactly one logical second
    ///
    /// Countdown steps auto-advance when they reach zero; the `Tick` event is
    /// emitted before the resulting `StepChanged`/`Completed`.
    pub fn tick(&mut self) -> SequencerResult<()> {
        self.require_running("tick")?;

        self.state.session_elapsed += 1;
        let expired = self.state.counter.tick();

        self.emit(SequencerEvent::Tick {
            counter: self.state.counter,
            session_elapsed: self.state.session_elapsed,
        });

        if expired {
            self.step_forward();
        }
        Ok(())
    }

    /// Move forward: next sub-iteration, next step, wrap or complete
    pub fn advance(&mut self) -> SequencerResult<()> {
        self.require_running("advance")?;
        self.step_forward();
        Ok(())
    }

    /// Move back one step (clamped at the first step, never wraps)
    ///
    /// The new current step is re-entered from its first sub-iteration.
    pub fn retreat(&mut self) -> SequencerResult<()> {
        self.require_running("retreat")?;
        self.state.cursor = self.state.cursor.saturating_sub(1);
        tracing::debug!(cursor = self.state.cursor, "Retreated");
        self.enter_step(true);
        Ok(())
    }

    /// Mark the current set as done (reps/sets steps)
    ///
    /// Same transition as `advance`; this is the way to progress a count-up
    /// step with a repeat unit.
    pub fn complete_sub_iteration(&mut self) -> SequencerResult<()> {
        self.require_running("complete sub-iteration")?;
        tracing::debug!(
            set = self.state.sub_iteration,
            elapsed = self.state.counter.value(),
            "Set completed"
        );
        self.step_forward();
        Ok(())
    }

    /// Stop the session and return to Idle at the first step
    ///
    /// Always legal and idempotent. Silences in-flight cues and emits `Reset`.
    pub fn stop(&mut self) {
        self.cues.silence();

        if self.state.status != SequencerStatus::Idle {
            tracing::info!(
                cursor = self.state.cursor,
                session_elapsed = self.state.session_elapsed,
                "Session stopped"
            );
        }

        self.state.status = SequencerStatus::Idle;
        self.state.cursor = 0;
        self.state.sub_iteration = 1;
        if let Some(counter) = self.state.current_step().map(StepCounter::armed_for) {
            self.state.counter = counter;
        }

        self.emit(SequencerEvent::Reset);
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    pub fn status(&self) -> SequencerStatus {
        self.state.status
    }

    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    pub fn counter(&self) -> StepCounter {
        self.state.counter
    }

    pub fn sub_iteration(&self) -> u32 {
        self.state.sub_iteration
    }

    pub fn session_elapsed(&self) -> u64 {
        self.state.session_elapsed
    }

    pub fn current_step(&self) -> Option<&Step> {
        self.state.current_step()
    }

    pub fn upcoming(&self) -> &[Step] {
        self.state.upcoming()
    }

    pub fn sequence(&self) -> Option<&Sequence> {
        self.state.sequence()
    }

    pub fn is_loaded(&self) -> bool {
        self.state.sequence.is_some()
    }

    /// Cue dispatcher (volume, enable/disable at runtime)
    pub fn cues_mut(&mut self) -> &mut CueDispatcher {
        &mut self.cues
    }

    fn require_running(&self, operation: &'static str) -> SequencerResult<()> {
        if self.state.sequence.is_none() {
            return Err(SequencerError::NotLoaded);
        }
        if !self.state.status.is_running() {
            return Err(SequencerError::InvalidState {
                operation,
                status: self.state.status,
            });
        }
        Ok(())
    }

    /// Advance policy shared by tick expiry, advance and set completion
    fn step_forward(&mut self) {
        let Some(sequence) = self.state.sequence.as_ref() else {
            return;
        };
        let Some(step) = sequence.get(self.state.cursor) else {
            return;
        };

        if self.state.sub_iteration < step.sub_iterations() {
            self.state.sub_iteration += 1;
            self.state.counter = StepCounter::armed_for(step);
            let replay = self.cues.policy() == CuePolicy::EverySubIteration;
            tracing::debug!(
                cursor = self.state.cursor,
                sub_iteration = self.state.sub_iteration,
                "Next sub-iteration"
            );
            self.announce_step(replay);
            return;
        }

        let next = self.state.cursor + 1;
        if next < sequence.len() {
            self.state.cursor = next;
            self.enter_step(true);
        } else if sequence.is_looping() {
            self.state.cursor = 0;
            tracing::debug!("Sequence wrapped");
            self.enter_step(true);
        } else {
            self.state.status = SequencerStatus::Completed;
            tracing::info!(
                session_elapsed = self.state.session_elapsed,
                "Sequence completed"
            );
            self.emit(SequencerEvent::Completed {
                session_elapsed: self.state.session_elapsed,
            });
        }
    }

    /// Step entry: reset counters and sub-iteration, optionally play the cue,
    /// emit `StepChanged`
    fn enter_step(&mut self, play_cue: bool) {
        let Some(step) = self.state.current_step() else {
            return;
        };
        tracing::debug!(
            cursor = self.state.cursor,
            label = %step.label,
            "Entered step"
        );
        let counter = StepCounter::armed_for(step);
        self.state.counter = counter;
        self.state.sub_iteration = 1;
        self.announce_step(play_cue);
    }

    fn announce_step(&mut self, play_cue: bool) {
        if play_cue
            && let Some(cue) = self.state.current_step().and_then(|s| s.cue.as_deref())
        {
            self.cues.play(cue);
        }

        if let Some(display) = self.state.display() {
            self.emit(SequencerEvent::StepChanged(display));
        }
    }

    fn emit(&mut self, event: SequencerEvent) {
        tracing::trace!(kind = event.kind(), "Emitting event");
        self.view.on_event(&event);
    }
}

impl Default for StepSequencer {
    fn default() -> Self {
        Self::headless()
    }
}
