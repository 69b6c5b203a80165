//! Error types for scorepochs
//!
//! These errors are detected before any spectral computation starts and
//! abort the whole scoring call. They carry enough context to point at the
//! offending field or sample without requiring heap allocation.

use core::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Configuration Errors
// ============================================================================

/// A required field of the scoring configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigField {
    /// Band of interest in Hz
    FrequencyRange,
    /// Samples per second
    SampleRate,
    /// Epoch length in seconds
    WindowLength,
}

impl ConfigField {
    /// Name of the field as it appears in a configuration document.
    #[inline]
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FrequencyRange => "frequency_range",
            Self::SampleRate => "sample_rate",
            Self::WindowLength => "window_length",
        }
    }
}

impl fmt::Display for ConfigField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors in the scoring configuration or its relation to the recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConfigError {
    /// Sample rate must be positive
    ZeroSampleRate,
    /// Window length must be positive
    ZeroWindowLength,
    /// Epoch length in samples computed to zero
    ZeroEpochLength,
    /// `window_length * sample_rate` does not fit in `usize`
    EpochLengthOverflow {
        /// Window length in seconds
        window_length: u32,
        /// Sample rate in Hz
        sample_rate: u32,
    },
    /// Epoch is longer than the recording, so no epoch can be formed
    EpochExceedsRecording {
        /// Epoch length in samples
        epoch_len: usize,
        /// Recording length in samples
        recording_len: usize,
    },
    /// Frequency range endpoints must be finite
    InvalidFrequencyRange {
        /// Lower endpoint in Hz
        low: f64,
        /// Upper endpoint in Hz
        high: f64,
    },
    /// Smoothing factor must be a finite positive number
    InvalidSmoothingFactor {
        /// The rejected factor
        factor: f64,
    },
    /// A required field is absent from the configuration document
    MissingField {
        /// Which field is missing
        field: ConfigField,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroSampleRate => write!(f, "Sample rate must be positive"),
            Self::ZeroWindowLength => write!(f, "Window length must be positive"),
            Self::ZeroEpochLength => write!(f, "Epoch length computes to zero samples"),
            Self::EpochLengthOverflow { window_length, sample_rate } => {
                write!(f, "Epoch length overflows: {window_length}s x {sample_rate}Hz")
            }
            Self::EpochExceedsRecording { epoch_len, recording_len } => {
                write!(
                    f,
                    "Epoch of {epoch_len} samples exceeds recording of {recording_len} samples"
                )
            }
            Self::InvalidFrequencyRange { low, high } => {
                write!(f, "Invalid frequency range: [{low}, {high}] Hz")
            }
            Self::InvalidSmoothingFactor { factor } => {
                write!(f, "Invalid smoothing factor: {factor}")
            }
            Self::MissingField { field } => {
                write!(f, "Missing required configuration field: {field}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

// ============================================================================
// Data Shape Errors
// ============================================================================

/// Errors in the shape or content of a recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataShapeError {
    /// Recording has no channels
    NoChannels,
    /// A channel's length differs from the first channel's
    RaggedChannels {
        /// Index of the offending channel
        channel: usize,
        /// Length of channel 0
        expected: usize,
        /// Length of the offending channel
        got: usize,
    },
    /// A sample is NaN or infinite
    NonFiniteSample {
        /// Channel index
        channel: usize,
        /// Sample offset within the channel
        offset: usize,
    },
}

impl fmt::Display for DataShapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoChannels => write!(f, "Recording has no channels"),
            Self::RaggedChannels { channel, expected, got } => {
                write!(
                    f,
                    "Channel {channel} has {got} samples, expected {expected} like channel 0"
                )
            }
            Self::NonFiniteSample { channel, offset } => {
                write!(f, "Non-finite sample at channel {channel}, offset {offset}")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DataShapeError {}

// ============================================================================
// Tests
// ============================================================================
