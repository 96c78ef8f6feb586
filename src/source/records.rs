// Wire records - Step lists as the web application sends them
// Breathing phases, workout builder exercises and meditation script lines

use crate::cue::Cue;
use crate::sequencer::Step;
use crate::source::SourceError;
use serde::{Deserialize, Serialize};

/// One phase of a breathing pattern (`{text, duration, className}`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreathingPhase {
    pub text: String,
    /// Seconds
    pub duration: u32,
    /// Animation class for the breathing circle
    #[serde(rename = "className", default)]
    pub class_name: String,
}

impl BreathingPhase {
    /// Sound cue played at the start of the phase ("inhale-sound")
    pub fn cue_id(&self) -> String {
        format!("{}-sound", self.text.trim().to_lowercase())
    }

    pub fn to_step(&self) -> Step {
        let step = Step::countdown(self.text.clone(), self.duration).with_cue(self.cue_id());
        if self.class_name.is_empty() {
            step
        } else {
            step.with_style(self.class_name.clone())
        }
    }
}

/// Kind of a workout exercise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    /// Timed exercise, duration in minutes
    Duration,
    /// Sets of reps, completed manually
    RepsSets,
}

/// One exercise of a custom workout (`{name, type, duration | sets, reps}`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExerciseEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ExerciseKind,
    /// Minutes, fractional values allowed (0.5 step in the builder)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
}

impl ExerciseEntry {
    /// Convert to a step; `index` is only used for error reporting
    pub fn to_step(&self, index: usize) -> Result<Step, SourceError> {
        let invalid = |reason: String| SourceError::InvalidRecord { index, reason };

        match self.kind {
            ExerciseKind::Duration => {
                let minutes = self
                    .duration
                    .ok_or_else(|| invalid(format!("'{}' has no duration", self.name)))?;
                if !minutes.is_finite() || minutes <= 0.0 {
                    return Err(invalid(format!(
                        "'{}' duration must be positive, got {}",
                        self.name, minutes
                    )));
                }

                let seconds = (minutes * 60.0).round();
                if seconds < 1.0 || seconds > u32::MAX as f64 {
                    return Err(invalid(format!("'{}' duration out of range", self.name)));
                }
                Ok(Step::countdown(self.name.clone(), seconds as u32))
            }
            ExerciseKind::RepsSets => {
                let sets = self
                    .sets
                    .filter(|&s| s > 0)
                    .ok_or_else(|| invalid(format!("'{}' needs at least one set", self.name)))?;

                let step = Step::count_up(self.name.clone()).with_repeat(sets);
                Ok(match self.reps {
                    Some(reps) => step.with_target_reps(reps),
                    None => step,
                })
            }
        }
    }
}

/// One line of a guided meditation script
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptLine {
    pub text: String,
    /// Estimated seconds to read the line
    pub duration: u32,
}

impl ScriptLine {
    pub fn to_step(&self) -> Step {
        Step::countdown(self.text.clone(), self.duration).with_cue(Cue::speak_id(&self.text))
    }
}
