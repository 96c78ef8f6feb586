// Cue players - Audio/speech side effects behind a trait
// The engine only ever sees `CuePlayer`; concrete backends live with the host

use std::fmt;

/// A cue parsed from a step's cue identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cue {
    /// Short sound effect ("inhale-sound")
    Sound(String),
    /// Text to speak ("speak:Take a deep breath")
    Speak(String),
}

impl Cue {
    /// Prefix marking a speech cue
    pub const SPEAK_PREFIX: &'static str = "speak:";

    /// Parse a cue identifier
    pub fn parse(id: &str) -> Self {
        match id.strip_prefix(Self::SPEAK_PREFIX) {
            Some(text) => Cue::Speak(text.trim().to_string()),
            None => Cue::Sound(id.trim().to_string()),
        }
    }

    /// Build the identifier for a speech cue
    pub fn speak_id(text: &str) -> String {
        format!("{}{}", Self::SPEAK_PREFIX, text)
    }

    /// Check if this is a speech cue
    pub fn is_speech(&self) -> bool {
        matches!(self, Cue::Speak(_))
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cue::Sound(id) => write!(f, "sound '{}'", id),
            Cue::Speak(text) => write!(f, "speech \"{}\"", text),
        }
    }
}

/// Errors a cue backend may report
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CueError {
    #[error("Unknown cue: {0}")]
    Unknown(String),

    #[error("Playback blocked: {0}")]
    Blocked(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

/// Produces the audio or speech side effect of a cue
///
/// Playback is fire-and-forget: implementations must not block waiting for the
/// sound to finish.
pub trait CuePlayer: Send {
    /// Start playing a cue at the given volume (0.0 to 1.0)
    fn play(&mut self, cue: &Cue, volume: f32) -> Result<(), CueError>;

    /// Stop anything currently playing
    fn silence(&mut self);
}

/// Player that does nothing (headless sessions, tests)
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCuePlayer;

impl CuePlayer for NullCuePlayer {
    fn play(&mut self, _cue: &Cue, _volume: f32) -> Result<(), CueError> {
        Ok(())
    }

    fn silence(&mut self) {}
}

/// Player that records cues through `tracing`
#[derive(Debug, Default, Clone)]
pub struct LogCuePlayer {
    last: Option<Cue>,
}

impl LogCuePlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last cue played since the previous silence
    pub fn last(&self) -> Option<&Cue> {
        self.last.as_ref()
    }
}

impl CuePlayer for LogCuePlayer {
    fn play(&mut self, cue: &Cue, volume: f32) -> Result<(), CueError> {
        tracing::info!(%cue, volume, "Playing cue");
        self.last = Some(cue.clone());
        Ok(())
    }

    fn silence(&mut self) {
        if let Some(cue) = self.last.take() {
            tracing::debug!(%cue, "Silenced cue");
        }
    }
}
