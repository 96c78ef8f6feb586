// Cue module - Audio and speech cues attached to steps
//
// The sequencer never awaits a cue: it hands the identifier to the
// dispatcher, which forwards it to a `CuePlayer` and logs any failure.

pub mod dispatcher;
pub mod player;

pub use dispatcher::{CueDispatcher, CuePolicy, CueSettings};
pub use player::{Cue, CueError, CuePlayer, LogCuePlayer, NullCuePlayer};
