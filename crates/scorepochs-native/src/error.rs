//! Error types for the scoring pipeline
//!
//! Configuration and shape errors from `scorepochs-core` are wrapped so a
//! whole run reports through a single [`ScoringError`].

use scorepochs_core::{ConfigError, DataShapeError};
use thiserror::Error;

/// Spectral estimator error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpectralError {
    /// No samples were given to the estimator
    #[error("Cannot estimate a spectrum from an empty signal")]
    EmptyInput,

    /// Segment length of zero samples
    #[error("Segment length must be at least one sample")]
    ZeroSegmentLength,
}

/// Scoring pipeline error types
#[derive(Error, Debug)]
pub enum ScoringError {
    /// Invalid configuration, or configuration incompatible with the recording
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Recording has an invalid shape or content
    #[error("Data shape error: {0}")]
    Shape(#[from] DataShapeError),

    /// Spectral estimator failed
    #[error("Spectral estimation failed: {0}")]
    Spectral(#[from] SpectralError),

    /// The estimator returned a frequency axis that differs from the one the
    /// band was resolved on
    #[error("Frequency axis of channel {channel}, epoch {epoch} differs from the reference axis")]
    FrequencyAxisMismatch {
        /// Channel index
        channel: usize,
        /// Epoch index
        epoch: usize,
    },

    /// An estimate holds a different number of power values than axis bins
    #[error("Spectrum of channel {channel}, epoch {epoch} has {got} power values for {expected} bins")]
    PowerLengthMismatch {
        /// Channel index
        channel: usize,
        /// Epoch index
        epoch: usize,
        /// Number of bins on the reference axis
        expected: usize,
        /// Number of power values returned
        got: usize,
    },

    /// The estimator produced no frequency bins to restrict
    #[error("Estimator produced an empty frequency axis")]
    EmptyFrequencyBand,

    /// The caller raised the cancellation flag
    #[error("Scoring cancelled")]
    Cancelled,

    /// Configuration document could not be parsed
    #[error("Invalid configuration JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Result type for scoring operations
pub type ScoringResult<T> = Result<T, ScoringError>;
