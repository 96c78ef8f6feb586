// Transport - Sequencer status
// Idle / Running / Paused / Completed and the predicates the engine relies on

use std::fmt;

/// Sequencer status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub enum SequencerStatus {
    /// Loaded (or empty) and waiting for start
    #[default]
    Idle,
    /// Clock running, ticks accepted
    Running,
    /// Clock frozen, cursor and counters preserved
    Paused,
    /// Terminating sequence ran past its last step
    Completed,
}

impl SequencerStatus {
    /// Check if the clock is running
    pub fn is_running(&self) -> bool {
        matches!(self, SequencerStatus::Running)
    }

    /// Check if the session is paused
    pub fn is_paused(&self) -> bool {
        matches!(self, SequencerStatus::Paused)
    }

    /// Check if a session is in progress (Running or Paused)
    pub fn is_active(&self) -> bool {
        matches!(self, SequencerStatus::Running | SequencerStatus::Paused)
    }

    /// Check if the sequence has finished
    pub fn is_completed(&self) -> bool {
        matches!(self, SequencerStatus::Completed)
    }
}

impl fmt::Display for SequencerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SequencerStatus::Idle => "idle",
            SequencerStatus::Running => "running",
            SequencerStatus::Paused => "paused",
            SequencerStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}
