// FitPace - Library exports for the binary and tests

pub mod config;
pub mod cue;
pub mod logging;
pub mod messaging;
pub mod sequencer;
pub mod session;
pub mod source;

// Re-export commonly used types for convenience
pub use config::{AppConfig, ConfigError};
pub use cue::{CueDispatcher, CuePlayer, CuePolicy, CueSettings, LogCuePlayer};
pub use messaging::{
    ChannelView, Command, SequencerEvent, StepDisplay, View, create_command_channel,
    create_event_channel,
};
pub use sequencer::{
    PlaybackMode, Sequence, SequencerError, SequencerStatus, Step, StepCounter, StepMode,
    StepSequencer,
};
pub use session::{Session, SessionSummary, Ticker};
pub use source::{FallbackSource, FileSource, Presets, RecordKind, SourceError, StepSource};
