// Sequencer module
// Steps, sequences, per-step counters and the step sequencer engine

pub mod engine;
pub mod error;
pub mod sequence;
pub mod step;
pub mod timeline;
pub mod transport;

pub use engine::{SequencerState, StepSequencer};
pub use error::{SequencerError, SequencerResult};
pub use sequence::{PlaybackMode, Sequence};
pub use step::{Step, StepMode};
pub use timeline::{StepCounter, format_clock};
pub use transport::SequencerStatus;
