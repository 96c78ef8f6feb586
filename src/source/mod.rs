// Step sources - Where sequences come from before a session starts
// Presets, JSON files from the workout builder, fallback to a default pattern

pub mod presets;
pub mod records;

pub use presets::{DEFAULT_PATTERN_NAME, Presets, breathing_sequence, meditation_sequence};
pub use records::{BreathingPhase, ExerciseEntry, ExerciseKind, ScriptLine};

use crate::sequencer::{Sequence, SequencerError, StepMode};
use std::path::{Path, PathBuf};

/// Longest label accepted from a source
pub const MAX_LABEL_LEN: usize = 255;

/// Longest countdown accepted from a source (24 hours)
pub const MAX_STEP_SECONDS: u32 = 24 * 60 * 60;

/// Largest repeat unit accepted from a source
pub const MAX_REPEAT_UNIT: u32 = 99;

/// Step source error types
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Unknown {kind}: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("Invalid record {index}: {reason}")]
    InvalidRecord { index: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("Invalid sequence: {0}")]
    Sequence(#[from] SequencerError),
}

/// Supplies an ordered step list before a session starts
pub trait StepSource {
    /// Name used in logs
    fn name(&self) -> &str;

    /// Produce the sequence
    fn fetch(&self) -> Result<Sequence, SourceError>;
}

/// Record format of a step file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    /// Array of `{text, duration, className}`, loops
    Breathing,
    /// Array of `{name, type, duration | sets, reps}`, runs once
    Workout,
    /// Array of `{text, duration}`, runs once
    Meditation,
    /// A serialized `Sequence`
    Native,
}

/// Check source-level limits on top of the engine's structural checks
pub fn validate_sequence(sequence: &Sequence) -> Result<(), SourceError> {
    sequence.check()?;

    for (index, step) in sequence.steps().iter().enumerate() {
        if step.label.chars().count() > MAX_LABEL_LEN {
            return Err(SourceError::InvalidRecord {
                index,
                reason: format!("label exceeds {} characters", MAX_LABEL_LEN),
            });
        }

        if let StepMode::CountDown { duration_seconds } = step.mode
            && duration_seconds > MAX_STEP_SECONDS
        {
            return Err(SourceError::InvalidRecord {
                index,
                reason: format!(
                    "duration {}s exceeds {}s",
                    duration_seconds, MAX_STEP_SECONDS
                ),
            });
        }

        if step.repeat_unit.is_some_and(|sets| sets > MAX_REPEAT_UNIT) {
            return Err(SourceError::InvalidRecord {
                index,
                reason: format!("repeat unit must be between 1 and {}", MAX_REPEAT_UNIT),
            });
        }
    }

    Ok(())
}

/// Parse JSON step records into a sequence
pub fn parse_records(name: &str, kind: RecordKind, json: &str) -> Result<Sequence, SourceError> {
    let sequence = match kind {
        RecordKind::Breathing => {
            let phases: Vec<BreathingPhase> = serde_json::from_str(json)?;
            Sequence::looping(name, phases.iter().map(BreathingPhase::to_step).collect())?
        }
        RecordKind::Workout => {
            let entries: Vec<ExerciseEntry> = serde_json::from_str(json)?;
            let steps = entries
                .iter()
                .enumerate()
                .map(|(index, entry)| entry.to_step(index))
                .collect::<Result<Vec<_>, _>>()?;
            Sequence::once(name, steps)?
        }
        RecordKind::Meditation => {
            let lines: Vec<ScriptLine> = serde_json::from_str(json)?;
            Sequence::once(name, lines.iter().map(ScriptLine::to_step).collect())?
        }
        RecordKind::Native => serde_json::from_str(json)?,
    };

    validate_sequence(&sequence)?;
    Ok(sequence)
}

/// Built-in breathing pattern or meditation script
pub struct PresetSource<'a> {
    presets: &'a Presets,
    kind: RecordKind,
    name: String,
}

impl<'a> PresetSource<'a> {
    pub fn breathing(presets: &'a Presets, name: impl Into<String>) -> Self {
        Self {
            presets,
            kind: RecordKind::Breathing,
            name: name.into(),
        }
    }

    pub fn meditation(presets: &'a Presets, name: impl Into<String>) -> Self {
        Self {
            presets,
            kind: RecordKind::Meditation,
            name: name.into(),
        }
    }
}

impl StepSource for PresetSource<'_> {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Sequence, SourceError> {
        match self.kind {
            RecordKind::Meditation => self.presets.meditation(&self.name),
            _ => self.presets.breathing(&self.name),
        }
    }
}

/// JSON step file, read at fetch time
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    kind: RecordKind,
    name: String,
}

impl FileSource {
    /// The sequence is named after the file stem
    pub fn new(path: impl Into<PathBuf>, kind: RecordKind) -> Self {
        let path = path.into();
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "sequence".to_string());
        Self { path, kind, name }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StepSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<Sequence, SourceError> {
        let json = std::fs::read_to_string(&self.path)?;
        parse_records(&self.name, self.kind, &json)
    }
}

/// Source that falls back to a default sequence when the primary fails
///
/// The caller is never left without a sequence to load.
pub struct FallbackSource<S> {
    primary: S,
    fallback: Sequence,
}

impl<S: StepSource> FallbackSource<S> {
    pub fn new(primary: S, fallback: Sequence) -> Self {
        Self { primary, fallback }
    }

    /// Fetch from the primary source, or the fallback on any error
    ///
    /// Returns the error that triggered the fallback alongside the sequence.
    pub fn fetch_or_default(&self) -> (Sequence, Option<SourceError>) {
        match self.primary.fetch() {
            Ok(sequence) => (sequence, None),
            Err(e) => {
                tracing::warn!(
                    source = self.primary.name(),
                    fallback = %self.fallback.name,
                    error = %e,
                    "Could not fetch sequence, using default"
                );
                (self.fallback.clone(), Some(e))
            }
        }
    }
}

impl<S: StepSource> StepSource for FallbackSource<S> {
    fn name(&self) -> &str {
        self.primary.name()
    }

    fn fetch(&self) -> Result<Sequence, SourceError> {
        Ok(self.fetch_or_default().0)
    }
}
