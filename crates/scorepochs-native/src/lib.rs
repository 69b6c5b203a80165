//! scorEpochs Native - Epoch homogeneity scoring for EEG recordings
//!
//! This crate ranks the epochs of a multichannel recording by how similar
//! their power spectra are to those of the other epochs:
//! - Segmentation into non-overlapping epochs
//! - Welch PSD estimation (FFT via `rustfft`)
//! - Band restriction and optional moving-average smoothing
//! - Spearman correlation between epoch spectra, averaged over channels
//!
//! # Modules
//!
//! - [`pipeline`]: Scoring entry points
//! - [`processing`]: Pipeline stages
//! - [`error`]: Error types
//!
//! # Features
//!
//! - `parallel`: Estimate epoch spectra on the rayon thread pool

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

pub mod error;
pub mod pipeline;
pub mod processing;

// Re-export key types
pub use error::{ScoringError, ScoringResult, SpectralError};
pub use pipeline::{config_from_json, score_epochs, EpochScorer, EpochScores};
pub use processing::welch::{PsdEstimator, Spectrum, WelchEstimator};

// Re-export core types
pub use scorepochs_core::{ConfigDocument, ConfigError, DataShapeError, EpochSet, Recording, ScoringConfig};
