//! Errors in the library.
use thiserror::Error;

/// Errors raised by the replay buffer and the rolling window.
///
/// Public operations return [`anyhow::Result`]; these variants can be recovered
/// with [`anyhow::Error::downcast_ref`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FrameReplayError {
    /// The configuration can never produce a valid buffer or sample.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Sampling was requested before enough experiences were pushed.
    #[error("Not enough data: {size} experiences stored, at least {required} required")]
    NotEnoughData {
        /// Number of experiences currently stored.
        size: usize,

        /// Minimum number of experiences needed for sampling.
        required: usize,
    },

    /// No index without an episode boundary in its history was found.
    #[error("No valid index found after {attempts} attempts")]
    NoValidIndex {
        /// Number of rejected draws.
        attempts: usize,
    },

    /// The shape of an observation differs from the configured one.
    #[error("Observation shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        /// Configured observation shape.
        expected: Vec<usize>,

        /// Shape of the given observation.
        actual: Vec<usize>,
    },
}
