// Sequence - Ordered list of steps forming one session
// Insertion order is playback order; may loop or run once

use super::error::{SequencerError, SequencerResult};
use super::step::Step;
use serde::{Deserialize, Serialize};

/// What happens after the last step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackMode {
    /// Wrap to the first step and keep running (breathing patterns)
    Loop,
    /// Complete after the last step (workouts, meditation scripts)
    #[default]
    Once,
}

/// An ordered, non-empty list of steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Display name ("box", "focus", "Custom workout")
    pub name: String,

    /// Loop or run once
    #[serde(default)]
    pub playback: PlaybackMode,

    steps: Vec<Step>,
}

impl Sequence {
    /// Create a new sequence
    ///
    /// Fails with `EmptySequence` if `steps` is empty and `InvalidStep` if a
    /// step is malformed.
    pub fn new(
        name: impl Into<String>,
        playback: PlaybackMode,
        steps: Vec<Step>,
    ) -> SequencerResult<Self> {
        let sequence = Self {
            name: name.into(),
            playback,
            steps,
        };
        sequence.check()?;
        Ok(sequence)
    }

    /// Create a looping sequence
    pub fn looping(name: impl Into<String>, steps: Vec<Step>) -> SequencerResult<Self> {
        Self::new(name, PlaybackMode::Loop, steps)
    }

    /// Create a sequence that runs exactly once
    pub fn once(name: impl Into<String>, steps: Vec<Step>) -> SequencerResult<Self> {
        Self::new(name, PlaybackMode::Once, steps)
    }

    /// Validate emptiness and every step
    ///
    /// Deserialized sequences bypass `new`, so the engine calls this on load.
    pub fn check(&self) -> SequencerResult<()> {
        if self.steps.is_empty() {
            return Err(SequencerError::EmptySequence);
        }

        for (index, step) in self.steps.iter().enumerate() {
            step.check()
                .map_err(|reason| SequencerError::InvalidStep { index, reason })?;
        }

        Ok(())
    }

    /// Get all steps
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Get a step by index
    pub fn get(&self, index: usize) -> Option<&Step> {
        self.steps.get(index)
    }

    /// Number of steps
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Check if the sequence has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check if the sequence wraps around
    pub fn is_looping(&self) -> bool {
        self.playback == PlaybackMode::Loop
    }

    /// Steps strictly after `cursor` (the "upcoming" preview)
    pub fn upcoming(&self, cursor: usize) -> &[Step] {
        let start = cursor.saturating_add(1).min(self.steps.len());
        &self.steps[start..]
    }

    /// Total countdown time of one pass, ignoring count-up steps
    pub fn timed_duration_seconds(&self) -> u64 {
        self.steps
            .iter()
            .filter_map(|step| {
                step.mode
                    .duration_seconds()
                    .map(|d| d as u64 * step.sub_iterations() as u64)
            })
            .sum()
    }
}
