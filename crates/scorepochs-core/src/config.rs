//! Scoring configuration.
//!
//! [`ScoringConfig`] is the immutable, validated record the pipeline runs on.
//! [`ConfigDocument`] is the loosely-typed form read from serialized input,
//! where every field may be absent; it also accepts the legacy key names
//! `freqRange`, `fs`, `windowL` and `smoothFactor`.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigField};

// ============================================================================
// Validated Configuration
// ============================================================================

/// Configuration for one scoring run.
///
/// ```
/// use scorepochs_core::ScoringConfig;
///
/// let config = ScoringConfig::new((10.0, 40.0), 100, 10).with_smoothing(3.0);
/// assert_eq!(config.epoch_len().unwrap(), 1000);
/// assert_eq!(config.smoothing_window(), Some(3));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Inclusive band of interest `(low, high)` in Hz.
    ///
    /// Each endpoint snaps to its nearest frequency bin independently. A range
    /// whose `low` bin lies above its `high` bin is rejected when scoring.
    pub frequency_range: (f64, f64),

    /// Samples per second.
    pub sample_rate: u32,

    /// Epoch length in seconds.
    ///
    /// The same number, read as a count of samples, is also the segment
    /// length of the Welch estimator.
    pub window_length: u32,

    /// Width of the moving average applied to each restricted spectrum.
    ///
    /// Smoothing runs only when this is present and greater than 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smoothing_factor: Option<f64>,
}

impl ScoringConfig {
    /// Create a configuration without smoothing.
    #[must_use]
    pub const fn new(frequency_range: (f64, f64), sample_rate: u32, window_length: u32) -> Self {
        Self {
            frequency_range,
            sample_rate,
            window_length,
            smoothing_factor: None,
        }
    }

    /// Return a copy with the given smoothing factor.
    #[must_use]
    pub fn with_smoothing(mut self, factor: f64) -> Self {
        self.smoothing_factor = Some(factor);
        self
    }

    /// Check every field on its own, without reference to a recording.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for a zero rate or window, a non-finite
    /// frequency endpoint, a non-positive smoothing factor, or an epoch
    /// length that overflows `usize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroSampleRate);
        }
        if self.window_length == 0 {
            return Err(ConfigError::ZeroWindowLength);
        }

        let (low, high) = self.frequency_range;
        if !low.is_finite() || !high.is_finite() {
            return Err(ConfigError::InvalidFrequencyRange { low, high });
        }

        if let Some(factor) = self.smoothing_factor {
            if !factor.is_finite() || factor <= 0.0 {
                return Err(ConfigError::InvalidSmoothingFactor { factor });
            }
        }

        self.epoch_len().map(|_| ())
    }

    /// Epoch length in samples (`window_length * sample_rate`).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroEpochLength`] when either factor is zero and
    /// [`ConfigError::EpochLengthOverflow`] when the product does not fit.
    pub fn epoch_len(&self) -> Result<usize, ConfigError> {
        let len = (self.window_length as usize)
            .checked_mul(self.sample_rate as usize)
            .ok_or(ConfigError::EpochLengthOverflow {
                window_length: self.window_length,
                sample_rate: self.sample_rate,
            })?;

        if len == 0 {
            return Err(ConfigError::ZeroEpochLength);
        }
        Ok(len)
    }

    /// Segment length handed to the spectral estimator, in samples.
    #[inline]
    #[must_use]
    pub const fn segment_len(&self) -> usize {
        self.window_length as usize
    }

    /// Moving-average window size, or `None` when smoothing is disabled.
    ///
    /// The factor is rounded half-to-even, so `1.5` and `2.5` both give a
    /// window of 2.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn smoothing_window(&self) -> Option<usize> {
        match self.smoothing_factor {
            Some(factor) if factor > 1.0 => Some(libm::rint(factor) as usize),
            _ => None,
        }
    }
}

// ============================================================================
// Configuration Document
// ============================================================================

/// Serialized configuration with optional fields.
///
/// Use [`ConfigDocument::into_config`] to turn it into a validated
/// [`ScoringConfig`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigDocument {
    /// Band of interest; the first and last entries are used.
    #[serde(default, alias = "freqRange")]
    pub frequency_range: Option<Vec<f64>>,

    /// Samples per second.
    #[serde(default, alias = "fs")]
    pub sample_rate: Option<u32>,

    /// Epoch length in seconds.
    #[serde(default, alias = "windowL")]
    pub window_length: Option<u32>,

    /// Optional smoothing factor.
    #[serde(default, alias = "smoothFactor")]
    pub smoothing_factor: Option<f64>,
}

impl ConfigDocument {
    /// Resolve into a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] for the first absent required
    /// field (an empty frequency list counts as absent), otherwise any
    /// error from [`ScoringConfig::validate`].
    pub fn into_config(self) -> Result<ScoringConfig, ConfigError> {
        let range = self
            .frequency_range
            .as_deref()
            .and_then(|r| Some((*r.first()?, *r.last()?)))
            .ok_or(ConfigError::MissingField { field: ConfigField::FrequencyRange })?;
        let sample_rate = self
            .sample_rate
            .ok_or(ConfigError::MissingField { field: ConfigField::SampleRate })?;
        let window_length = self
            .window_length
            .ok_or(ConfigError::MissingField { field: ConfigField::WindowLength })?;

        let config = ScoringConfig {
            frequency_range: range,
            sample_rate,
            window_length,
            smoothing_factor: self.smoothing_factor,
        };
        config.validate()?;
        Ok(config)
    }
}

impl From<ScoringConfig> for ConfigDocument {
    fn from(config: ScoringConfig) -> Self {
        let (low, high) = config.frequency_range;
        Self {
            frequency_range: Some(alloc::vec![low, high]),
            sample_rate: Some(config.sample_rate),
            window_length: Some(config.window_length),
            smoothing_factor: config.smoothing_factor,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
