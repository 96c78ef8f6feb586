// Sequencer events - Communication sequencer → view

use crate::sequencer::{Step, StepCounter};

/// Display values for the current step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepDisplay {
    pub step: Step,
    /// 1-based position in the sequence
    pub displayed_step: usize,
    pub total_steps: usize,
    /// Current set (1-based)
    pub sub_iteration: u32,
    /// Sets required by the step (1 without repeat unit)
    pub sub_iterations: u32,
    pub counter: StepCounter,
    /// Labels of the steps strictly after the current one
    pub upcoming: Vec<String>,
}

/// Event emitted by the sequencer on every tick and transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerEvent {
    /// A step was entered (or a new sub-iteration of it started)
    StepChanged(StepDisplay),
    /// One logical second elapsed
    Tick { counter: StepCounter, session_elapsed: u64 },
    /// A terminating sequence finished
    Completed { session_elapsed: u64 },
    /// Session stopped, view should restore its idle display
    Reset,
}

impl SequencerEvent {
    /// Short name used in logs
    pub fn kind(&self) -> &'static str {
        match self {
            SequencerEvent::StepChanged(_) => "step_changed",
            SequencerEvent::Tick { .. } => "tick",
            SequencerEvent::Completed { .. } => "completed",
            SequencerEvent::Reset => "reset",
        }
    }
}
