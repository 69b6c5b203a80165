//! Welch power spectral density estimation
//!
//! [`WelchEstimator`] averages periodograms of non-overlapping, Hann-windowed,
//! mean-detrended segments and reports a one-sided density in units²/Hz.
//! It is the default [`PsdEstimator`]; any other estimator can be plugged
//! into the pipeline through the same trait.

use std::fmt;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::error::SpectralError;

/// Power spectrum with its frequency axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Spectrum {
    /// Bin center frequencies in Hz, ascending
    pub frequencies: Vec<f64>,
    /// Power spectral density per bin
    pub power: Vec<f64>,
}

/// A power spectral density estimator.
///
/// Implementations must be deterministic in their frequency axis: every
/// input of the same length and sample rate yields the axis returned by
/// [`PsdEstimator::frequencies`].
pub trait PsdEstimator: Send + Sync {
    /// Frequency axis produced for inputs of `n_samples` samples.
    fn frequencies(&self, n_samples: usize, sample_rate: f64) -> Vec<f64>;

    /// Estimate the power spectrum of `samples`.
    ///
    /// # Errors
    ///
    /// Returns a [`SpectralError`] if the input cannot be analyzed.
    fn estimate(&self, samples: &[f64], sample_rate: f64) -> Result<Spectrum, SpectralError>;
}

/// Welch estimator with zero overlap.
///
/// Inputs shorter than the segment length are analyzed as a single segment
/// spanning the whole input. Trailing samples that do not fill a segment are
/// ignored.
pub struct WelchEstimator {
    segment_len: usize,
    fft: Arc<dyn Fft<f64>>,
    window: Vec<f64>,
    window_power: f64,
}

impl WelchEstimator {
    /// Create an estimator with the given segment length in samples.
    ///
    /// # Errors
    ///
    /// Returns [`SpectralError::ZeroSegmentLength`] for a zero length.
    pub fn new(segment_len: usize) -> Result<Self, SpectralError> {
        if segment_len == 0 {
            return Err(SpectralError::ZeroSegmentLength);
        }

        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(segment_len);
        let window = hann_window(segment_len);
        let window_power = window.iter().map(|w| w * w).sum();

        Ok(Self {
            segment_len,
            fft,
            window,
            window_power,
        })
    }

    /// Segment length in samples
    #[must_use]
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Frequency resolution (Hz per bin)
    #[must_use]
    pub fn frequency_resolution(&self, sample_rate: f64) -> f64 {
        sample_rate / self.segment_len as f64
    }
}

impl fmt::Debug for WelchEstimator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WelchEstimator")
            .field("segment_len", &self.segment_len)
            .field("window_power", &self.window_power)
            .finish_non_exhaustive()
    }
}

impl PsdEstimator for WelchEstimator {
    fn frequencies(&self, n_samples: usize, sample_rate: f64) -> Vec<f64> {
        let nperseg = self.segment_len.min(n_samples);
        if nperseg == 0 {
            return Vec::new();
        }
        (0..=nperseg / 2)
            .map(|k| k as f64 * sample_rate / nperseg as f64)
            .collect()
    }

    fn estimate(&self, samples: &[f64], sample_rate: f64) -> Result<Spectrum, SpectralError> {
        if samples.is_empty() {
            return Err(SpectralError::EmptyInput);
        }
        if samples.len() < self.segment_len {
            return Self::new(samples.len())?.estimate(samples, sample_rate);
        }

        let nperseg = self.segment_len;
        let n_freqs = nperseg / 2 + 1;
        let mut power = vec![0.0; n_freqs];

        let mut buffer = vec![Complex::new(0.0, 0.0); nperseg];
        let mut scratch = vec![Complex::new(0.0, 0.0); self.fft.get_inplace_scratch_len()];

        let mut n_segments = 0usize;
        for segment in samples.chunks_exact(nperseg) {
            let mean = segment.iter().sum::<f64>() / nperseg as f64;
            for ((slot, &s), &w) in buffer.iter_mut().zip(segment).zip(&self.window) {
                *slot = Complex::new((s - mean) * w, 0.0);
            }

            self.fft.process_with_scratch(&mut buffer, &mut scratch);

            for (p, c) in power.iter_mut().zip(&buffer[..n_freqs]) {
                *p += c.norm_sqr();
            }
            n_segments += 1;
        }

        // Density scaling, averaged over segments
        let scale = 1.0 / (sample_rate * self.window_power * n_segments as f64);
        let has_nyquist = nperseg % 2 == 0;
        for (k, p) in power.iter_mut().enumerate() {
            *p *= scale;
            // One-sided: fold negative frequencies except DC and Nyquist
            if k != 0 && !(has_nyquist && k == n_freqs - 1) {
                *p *= 2.0;
            }
        }

        Ok(Spectrum {
            frequencies: self.frequencies(samples.len(), sample_rate),
            power,
        })
    }
}

/// Generate periodic Hann window coefficients
fn hann_window(size: usize) -> Vec<f64> {
    if size == 1 {
        return vec![1.0];
    }
    (0..size)
        .map(|i| 0.5 - 0.5 * (2.0 * std::f64::consts::PI * i as f64 / size as f64).cos())
        .collect()
}
