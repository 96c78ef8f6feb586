// Sequencer errors

use super::transport::SequencerStatus;

/// Result type for sequencer operations
pub type SequencerResult<T> = Result<T, SequencerError>;

/// Errors raised by the step sequencer
///
/// All of these are local and recoverable: the caller should guard against
/// them or surface them as a no-op.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SequencerError {
    #[error("Sequence contains no steps")]
    EmptySequence,

    #[error("No sequence loaded")]
    NotLoaded,

    #[error("Cannot {operation} while {status}")]
    InvalidState {
        operation: &'static str,
        status: SequencerStatus,
    },

    #[error("Invalid step {index}: {reason}")]
    InvalidStep { index: usize, reason: String },
}
