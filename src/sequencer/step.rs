// Step - One timed or manually advanced unit of a sequence
// A breathing phase, a meditation line or a workout exercise

use serde::{Deserialize, Serialize};

/// Timing mode of a step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepMode {
    /// Fixed duration, auto-advances when the countdown reaches zero
    CountDown { duration_seconds: u32 },
    /// Open-ended, advances only on explicit user action
    CountUp,
}

impl StepMode {
    /// Check if this is a countdown step
    pub fn is_countdown(&self) -> bool {
        matches!(self, StepMode::CountDown { .. })
    }

    /// Duration in seconds (None for CountUp)
    pub fn duration_seconds(&self) -> Option<u32> {
        match self {
            StepMode::CountDown { duration_seconds } => Some(*duration_seconds),
            StepMode::CountUp => None,
        }
    }
}

/// A single step of a sequence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    /// Display text ("Inhale", exercise name, meditation line)
    pub label: String,

    /// Timing mode
    pub mode: StepMode,

    /// Cue identifier played when the step becomes current
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cue: Option<String>,

    /// Number of sub-iterations (sets) to complete before the step is done
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repeat_unit: Option<u32>,

    /// Presentation hint for the view (e.g. "expand", "hold", "contract")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,

    /// Reps per set, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_reps: Option<u32>,
}

impl Step {
    /// Create a countdown step
    pub fn countdown(label: impl Into<String>, duration_seconds: u32) -> Self {
        Self {
            label: label.into(),
            mode: StepMode::CountDown { duration_seconds },
            cue: None,
            repeat_unit: None,
            style: None,
            target_reps: None,
        }
    }

    /// Create an open-ended count-up step
    pub fn count_up(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            mode: StepMode::CountUp,
            cue: None,
            repeat_unit: None,
            style: None,
            target_reps: None,
        }
    }

    /// Builder: attach a cue identifier
    pub fn with_cue(mut self, cue: impl Into<String>) -> Self {
        self.cue = Some(cue.into());
        self
    }

    /// Builder: require `sets` manual completions before the step is done
    pub fn with_repeat(mut self, sets: u32) -> Self {
        self.repeat_unit = Some(sets);
        self
    }

    /// Builder: attach a presentation hint
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    /// Builder: attach a reps-per-set target
    pub fn with_target_reps(mut self, reps: u32) -> Self {
        self.target_reps = Some(reps);
        self
    }

    /// Number of sub-iterations this step requires (1 when no repeat unit)
    pub fn sub_iterations(&self) -> u32 {
        self.repeat_unit.unwrap_or(1)
    }

    /// Check the step for structural problems
    ///
    /// Returns a human-readable reason on failure.
    pub fn check(&self) -> Result<(), String> {
        if self.label.trim().is_empty() {
            return Err("label cannot be empty".to_string());
        }

        if let StepMode::CountDown { duration_seconds: 0 } = self.mode {
            return Err(format!("countdown step '{}' has zero duration", self.label));
        }

        if self.repeat_unit == Some(0) {
            return Err(format!("step '{}' has a repeat unit of zero", self.label));
        }

        Ok(())
    }

    /// Short human-readable detail ("4s", "3 sets x 10 reps", "open")
    pub fn detail(&self) -> String {
        match (self.mode, self.repeat_unit, self.target_reps) {
            (StepMode::CountUp, Some(sets), Some(reps)) => format!("{} sets x {} reps", sets, reps),
            (StepMode::CountUp, Some(sets), None) => format!("{} sets", sets),
            (StepMode::CountUp, None, _) => "open".to_string(),
            (StepMode::CountDown { duration_seconds }, Some(sets), _) => {
                format!("{} x {}", sets, super::timeline::format_clock(duration_seconds as u64))
            }
            (StepMode::CountDown { duration_seconds }, None, _) => {
                format!("{}s", duration_seconds)
            }
        }
    }
}
