//! Scoring pipeline stages
//!
//! This module provides the processing steps, in data-flow order:
//! - [`epochs`]: Segmentation into non-overlapping epochs
//! - [`welch`]: Power spectral density estimation
//! - [`spectral`]: Band restriction and smoothing of every epoch spectrum
//! - [`scoring`]: Spearman-based homogeneity scores

pub mod epochs;
pub mod scoring;
pub mod spectral;
pub mod welch;
