//! Epoch scoring entry point
//!
//! Runs the stages of [`crate::processing`] in order:
//!
//! ```text
//! Recording -> segment -> Welch PSD -> band + smoothing -> Spearman scores -> ranking
//! ```
//!
//! # Example
//!
//! ```rust
//! use scorepochs_native::{score_epochs, Recording, ScoringConfig};
//!
//! let signal: Vec<f64> = (0..2000).map(|i| (i as f64 * 0.37).sin()).collect();
//! let recording = Recording::new(vec![signal.clone(), signal]).unwrap();
//! let config = ScoringConfig::new((10.0, 40.0), 100, 10);
//!
//! let result = score_epochs(&config, &recording).unwrap();
//! assert_eq!(result.epochs.shape(), (2, 2, 1000));
//! assert_eq!(result.scores.len(), 2);
//! ```

use std::sync::atomic::AtomicBool;

use scorepochs_core::{rank_descending, ConfigDocument, EpochSet, Recording, ScoringConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ScoringError, ScoringResult};
use crate::processing::epochs::segment;
use crate::processing::scoring::homogeneity_scores;
use crate::processing::spectral::{band_spectra, SpectralParams};
use crate::processing::welch::{PsdEstimator, WelchEstimator};

/// Result of scoring a recording.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpochScores {
    /// Epoch indices from most to least homogeneous
    pub ranking: Vec<usize>,
    /// The segmented raw data, channels × epochs × samples
    pub epochs: EpochSet,
    /// Score per epoch, in epoch order
    pub scores: Vec<f64>,
    /// Score per channel and epoch before channel averaging
    pub channel_scores: Vec<Vec<f64>>,
    /// Frequencies (Hz) of the bins the scores were computed on
    pub frequencies: Vec<f64>,
}

impl EpochScores {
    /// Split into `(ranking, epochs, scores)`.
    #[must_use]
    pub fn into_parts(self) -> (Vec<usize>, EpochSet, Vec<f64>) {
        (self.ranking, self.epochs, self.scores)
    }

    /// The `n` highest-ranked epochs on every channel, best first.
    ///
    /// Asking for more epochs than exist returns all of them.
    #[must_use]
    pub fn best_epochs(&self, n: usize) -> EpochSet {
        let take = n.min(self.ranking.len());
        self.epochs
            .select(&self.ranking[..take])
            .unwrap_or_else(|| self.epochs.clone())
    }
}

/// Epoch scorer bound to a validated configuration and an estimator.
#[derive(Debug)]
pub struct EpochScorer<E = WelchEstimator> {
    config: ScoringConfig,
    estimator: E,
}

impl EpochScorer<WelchEstimator> {
    /// Create a scorer using the Welch estimator with a segment length of
    /// `window_length` samples.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Config`] if the configuration is invalid.
    pub fn new(config: ScoringConfig) -> ScoringResult<Self> {
        config.validate()?;
        let estimator = WelchEstimator::new(config.segment_len())?;
        Ok(Self { config, estimator })
    }
}

impl<E: PsdEstimator> EpochScorer<E> {
    /// Create a scorer with a custom spectral estimator.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Config`] if the configuration is invalid.
    pub fn with_estimator(config: ScoringConfig, estimator: E) -> ScoringResult<Self> {
        config.validate()?;
        Ok(Self { config, estimator })
    }

    /// The configuration this scorer runs with
    #[must_use]
    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score and rank every epoch of `recording`.
    ///
    /// # Errors
    ///
    /// See [`EpochScorer::score_with_cancel`]; this call is never cancelled.
    pub fn score(&self, recording: &Recording) -> ScoringResult<EpochScores> {
        self.score_with_cancel(recording, &AtomicBool::new(false))
    }

    /// Score and rank every epoch, stopping early once `cancel` is set.
    ///
    /// The flag is checked between spectral estimates, so a long run can be
    /// abandoned from another thread.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::Config`] if the epoch does not fit in the recording
    /// - [`ScoringError::Config`] if the frequency range resolves to a
    ///   reversed band
    /// - [`ScoringError::Spectral`], [`ScoringError::FrequencyAxisMismatch`],
    ///   [`ScoringError::PowerLengthMismatch`] or
    ///   [`ScoringError::EmptyFrequencyBand`] from the spectral stage
    /// - [`ScoringError::Cancelled`] if `cancel` was set
    pub fn score_with_cancel(
        &self,
        recording: &Recording,
        cancel: &AtomicBool,
    ) -> ScoringResult<EpochScores> {
        let epoch_len = self.config.epoch_len()?;
        let epochs = segment(recording, epoch_len)?;

        debug!(
            "Scoring {} channels x {} epochs of {} samples (smoothing window: {:?})",
            epochs.n_channels(),
            epochs.n_epochs(),
            epoch_len,
            self.config.smoothing_window()
        );

        let params = SpectralParams {
            sample_rate: f64::from(self.config.sample_rate),
            frequency_range: self.config.frequency_range,
            smoothing_window: self.config.smoothing_window(),
        };
        let spectra = band_spectra(&epochs, &self.estimator, &params, cancel).map_err(|e| {
            if matches!(e, ScoringError::Cancelled) {
                warn!("Epoch scoring cancelled");
            }
            e
        })?;

        let homogeneity = homogeneity_scores(&spectra);
        let ranking = rank_descending(&homogeneity.scores);

        if let Some(&best) = ranking.first() {
            info!(
                "Scored {} epochs; best epoch {} (score {:.4})",
                ranking.len(),
                best,
                homogeneity.scores[best]
            );
        }

        Ok(EpochScores {
            ranking,
            epochs,
            scores: homogeneity.scores,
            channel_scores: homogeneity.channel_scores,
            frequencies: spectra.frequencies().to_vec(),
        })
    }
}

/// Score and rank the epochs of `recording` with the Welch estimator.
///
/// # Errors
///
/// Returns a [`ScoringError`] for an invalid configuration, an epoch longer
/// than the recording, or a spectral failure.
pub fn score_epochs(config: &ScoringConfig, recording: &Recording) -> ScoringResult<EpochScores> {
    EpochScorer::new(*config)?.score(recording)
}

/// Parse and validate a JSON configuration document.
///
/// Both snake_case keys and the legacy `freqRange` / `fs` / `windowL` /
/// `smoothFactor` keys are accepted.
///
/// # Errors
///
/// Returns [`ScoringError::InvalidJson`] for malformed JSON and
/// [`ScoringError::Config`] for a missing or invalid field.
pub fn config_from_json(json: &str) -> ScoringResult<ScoringConfig> {
    let document: ConfigDocument = serde_json::from_str(json)?;
    Ok(document.into_config()?)
}
