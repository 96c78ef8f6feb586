// Timeline - Per-step counters and session time display
// Handles countdown/count-up arithmetic and MM:SS formatting

use super::step::{Step, StepMode};
use std::fmt;

/// Format a number of seconds as MM:SS (minutes grow past 99 if needed)
pub fn format_clock(total_seconds: u64) -> String {
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

/// Per-step counter
///
/// Holds `remaining` for countdown steps and `elapsed` for count-up steps.
/// Re-armed whenever the cursor changes or a sub-iteration starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepCounter {
    Remaining(u32),
    Elapsed(u32),
}

impl StepCounter {
    /// Initial counter value for a step
    pub fn armed_for(step: &Step) -> Self {
        match step.mode {
            StepMode::CountDown { duration_seconds } => StepCounter::Remaining(duration_seconds),
            StepMode::CountUp => StepCounter::Elapsed(0),
        }
    }

    /// Advance the counter by one logical second
    ///
    /// Returns true when a countdown has just reached zero.
    pub fn tick(&mut self) -> bool {
        match self {
            StepCounter::Remaining(remaining) => {
                *remaining = remaining.saturating_sub(1);
                *remaining == 0
            }
            StepCounter::Elapsed(elapsed) => {
                *elapsed = elapsed.saturating_add(1);
                false
            }
        }
    }

    /// Raw value (remaining or elapsed seconds)
    pub fn value(&self) -> u32 {
        match self {
            StepCounter::Remaining(v) | StepCounter::Elapsed(v) => *v,
        }
    }

    /// Check if the countdown has expired
    pub fn is_expired(&self) -> bool {
        matches!(self, StepCounter::Remaining(0))
    }
}

impl Default for StepCounter {
    fn default() -> Self {
        StepCounter::Elapsed(0)
    }
}

impl fmt::Display for StepCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_clock(self.value() as u64))
    }
}
