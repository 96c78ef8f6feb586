// Built-in presets - Breathing patterns and meditation scripts
// Embedded RON asset, parsed once at startup

use crate::sequencer::Sequence;
use crate::source::records::{BreathingPhase, ScriptLine};
use crate::source::{SourceError, validate_sequence};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const BUILTIN_PRESETS: &str = include_str!("../../assets/presets.ron");

/// Name of the sequence built from the default breathing pattern
pub const DEFAULT_PATTERN_NAME: &str = "default";

/// Library of built-in step lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presets {
    /// Used when a requested pattern cannot be fetched
    default_breathing: Vec<BreathingPhase>,
    breathing: BTreeMap<String, Vec<BreathingPhase>>,
    meditation: BTreeMap<String, Vec<ScriptLine>>,
}

impl Presets {
    /// Parse the embedded preset library
    pub fn builtin() -> Result<Self, SourceError> {
        Self::from_ron(BUILTIN_PRESETS)
    }

    /// Parse a preset library from RON text
    pub fn from_ron(text: &str) -> Result<Self, SourceError> {
        Ok(ron::from_str(text)?)
    }

    /// Looping sequence for a breathing pattern
    pub fn breathing(&self, name: &str) -> Result<Sequence, SourceError> {
        let phases = self.breathing.get(name).ok_or_else(|| SourceError::NotFound {
            kind: "breathing pattern",
            name: name.to_string(),
        })?;
        breathing_sequence(name, phases)
    }

    /// The built-in fallback breathing pattern
    pub fn default_breathing(&self) -> Result<Sequence, SourceError> {
        breathing_sequence(DEFAULT_PATTERN_NAME, &self.default_breathing)
    }

    /// Terminating sequence for a meditation script
    pub fn meditation(&self, name: &str) -> Result<Sequence, SourceError> {
        let lines = self.meditation.get(name).ok_or_else(|| SourceError::NotFound {
            kind: "meditation script",
            name: name.to_string(),
        })?;
        meditation_sequence(name, lines)
    }

    /// Available breathing pattern names, sorted
    pub fn breathing_names(&self) -> Vec<&str> {
        self.breathing.keys().map(String::as_str).collect()
    }

    /// Available meditation script names, sorted
    pub fn meditation_names(&self) -> Vec<&str> {
        self.meditation.keys().map(String::as_str).collect()
    }
}

/// Build a looping sequence from breathing phases
pub fn breathing_sequence(name: &str, phases: &[BreathingPhase]) -> Result<Sequence, SourceError> {
    let steps = phases.iter().map(BreathingPhase::to_step).collect();
    let sequence = Sequence::looping(name, steps)?;
    validate_sequence(&sequence)?;
    Ok(sequence)
}

/// Build a terminating sequence from script lines
pub fn meditation_sequence(name: &str, lines: &[ScriptLine]) -> Result<Sequence, SourceError> {
    let steps = lines.iter().map(ScriptLine::to_step).collect();
    let sequence = Sequence::once(name, steps)?;
    validate_sequence(&sequence)?;
    Ok(sequence)
}
