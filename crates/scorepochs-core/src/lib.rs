//! scorepochs Core - `no_std` data model and rank statistics
//!
//! This crate provides the foundational types, configuration and numerical
//! primitives used to score resting-state M/EEG epochs by how homogeneous
//! their power spectra are. It only needs `alloc`, so the same types can be
//! shared between host tooling and constrained targets.
//!
//! # Modules
//!
//! - [`config`]: Scoring configuration and its loosely-typed document form
//! - [`types`]: Recordings and epoch sets
//! - [`error`]: Configuration and data-shape errors
//! - [`math`]: Spectrum smoothing, average ranks, Spearman matrix, ranking
//!
//! # Features
//!
//! - `std`: Implement `std::error::Error` for the error types
//!
//! # Example
//!
//! ```rust
//! use scorepochs_core::{Recording, ScoringConfig};
//!
//! let config = ScoringConfig::new((10.0, 40.0), 100, 10);
//! let recording = Recording::new(vec![vec![0.0; 2000]; 2]).unwrap();
//!
//! assert_eq!(config.epoch_len().unwrap(), 1000);
//! assert_eq!(recording.n_channels(), 2);
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_precision_loss)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod config;
pub mod error;
pub mod math;
pub mod types;

// Re-export commonly used types at crate root
pub use config::{ConfigDocument, ScoringConfig};
pub use error::{ConfigError, DataShapeError};
pub use math::{average_ranks, rank_descending, smooth_spectrum, spearman_matrix, CorrelationMatrix};
pub use types::{EpochSet, Recording};
