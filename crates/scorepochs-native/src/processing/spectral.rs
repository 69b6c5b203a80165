//! Band-restricted spectra for every (channel, epoch) pair
//!
//! The frequency band is resolved once against the estimator's frequency
//! axis for an epoch-length input. Every estimated spectrum is then checked
//! against that axis, cut to the band and, when enabled, smoothed.

use std::sync::atomic::{AtomicBool, Ordering};

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use scorepochs_core::{smooth_spectrum, ConfigError, EpochSet};
use tracing::{debug, trace};

use crate::error::{ScoringError, ScoringResult};
use crate::processing::welch::PsdEstimator;

/// Inclusive span of frequency-bin indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrequencyBand {
    /// First bin index
    pub start: usize,
    /// Last bin index (inclusive)
    pub end: usize,
}

impl FrequencyBand {
    /// Resolve a `(low, high)` range in Hz against a frequency axis.
    ///
    /// Each endpoint maps to its nearest bin on its own (the lowest index wins
    /// a tie). The band runs from the bin of `low` to the bin of `high`; the
    /// two are never swapped.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::EmptyFrequencyBand`] for an empty axis
    /// - [`ConfigError::InvalidFrequencyRange`] if the bin of `low` lies above
    ///   the bin of `high`
    pub fn resolve(axis: &[f64], range: (f64, f64)) -> ScoringResult<Self> {
        let (low, high) = range;
        let start = nearest_bin(axis, low).ok_or(ScoringError::EmptyFrequencyBand)?;
        let end = nearest_bin(axis, high).ok_or(ScoringError::EmptyFrequencyBand)?;
        if start > end {
            return Err(ConfigError::InvalidFrequencyRange { low, high }.into());
        }
        Ok(Self { start, end })
    }

    /// Number of bins in the band, at least one
    #[inline]
    #[must_use]
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.end - self.start + 1
    }

    /// The part of `values` that falls inside the band.
    #[inline]
    #[must_use]
    pub fn restrict<'a>(&self, values: &'a [f64]) -> &'a [f64] {
        &values[self.start..=self.end]
    }
}

/// Index of the bin closest to `target`, first one on ties.
fn nearest_bin(axis: &[f64], target: f64) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &f) in axis.iter().enumerate() {
        let distance = (f - target).abs();
        if best.map_or(true, |(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Parameters of the spectral stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpectralParams {
    /// Sample rate in Hz
    pub sample_rate: f64,
    /// Band of interest `(low, high)` in Hz
    pub frequency_range: (f64, f64),
    /// Moving-average window, `None` to skip smoothing
    pub smoothing_window: Option<usize>,
}

/// Restricted (and possibly smoothed) spectra, channels × epochs × bins.
#[derive(Clone, Debug, PartialEq)]
pub struct BandSpectra {
    frequencies: Vec<f64>,
    n_channels: usize,
    n_epochs: usize,
    data: Vec<f64>,
}

impl BandSpectra {
    /// Bin center frequencies of the band in Hz
    #[must_use]
    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    /// Number of channels
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Number of epochs per channel
    #[must_use]
    pub fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    /// Number of bins per spectrum
    #[must_use]
    pub fn n_freq(&self) -> usize {
        self.frequencies.len()
    }

    /// Spectrum of one epoch on one channel
    #[must_use]
    pub fn spectrum(&self, channel: usize, epoch: usize) -> &[f64] {
        let start = (channel * self.n_epochs + epoch) * self.n_freq();
        &self.data[start..start + self.n_freq()]
    }

    /// All epoch spectra of one channel, in epoch order
    #[must_use]
    pub fn channel(&self, channel: usize) -> Vec<&[f64]> {
        (0..self.n_epochs).map(|e| self.spectrum(channel, e)).collect()
    }
}

/// Estimate, restrict and smooth the spectrum of every epoch.
///
/// `cancel` is polled before each (channel, epoch) estimate.
///
/// # Errors
///
/// - [`ScoringError::EmptyFrequencyBand`] if the estimator's axis is empty
/// - [`ScoringError::Config`] if the range resolves to a reversed band
/// - [`ScoringError::Spectral`] if an estimate fails
/// - [`ScoringError::FrequencyAxisMismatch`] if an estimate's axis differs
///   from the reference axis
/// - [`ScoringError::PowerLengthMismatch`] if an estimate has a different
///   number of power values than axis bins
/// - [`ScoringError::Cancelled`] once `cancel` is set
pub fn band_spectra<E: PsdEstimator + ?Sized>(
    epochs: &EpochSet,
    estimator: &E,
    params: &SpectralParams,
    cancel: &AtomicBool,
) -> ScoringResult<BandSpectra> {
    let axis = estimator.frequencies(epochs.epoch_len(), params.sample_rate);
    let band = FrequencyBand::resolve(&axis, params.frequency_range)?;

    debug!(
        "Band {:?} Hz -> bins {}..={} ({} of {})",
        params.frequency_range,
        band.start,
        band.end,
        band.len(),
        axis.len()
    );

    let n_epochs = epochs.n_epochs();
    let compute = |unit: usize| -> ScoringResult<Vec<f64>> {
        if cancel.load(Ordering::Relaxed) {
            return Err(ScoringError::Cancelled);
        }

        let (channel, epoch) = (unit / n_epochs, unit % n_epochs);
        let spectrum = estimator.estimate(epochs.epoch(channel, epoch), params.sample_rate)?;
        if spectrum.frequencies != axis {
            return Err(ScoringError::FrequencyAxisMismatch { channel, epoch });
        }
        if spectrum.power.len() != axis.len() {
            return Err(ScoringError::PowerLengthMismatch {
                channel,
                epoch,
                expected: axis.len(),
                got: spectrum.power.len(),
            });
        }

        trace!("Estimated spectrum for channel {channel}, epoch {epoch}");
        let restricted = band.restrict(&spectrum.power);
        Ok(match params.smoothing_window {
            Some(window) => smooth_spectrum(restricted, window),
            None => restricted.to_vec(),
        })
    };

    let units = epochs.n_channels() * n_epochs;

    #[cfg(feature = "parallel")]
    let rows: Vec<Vec<f64>> = (0..units)
        .into_par_iter()
        .map(compute)
        .collect::<ScoringResult<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let rows: Vec<Vec<f64>> = (0..units).map(compute).collect::<ScoringResult<_>>()?;

    Ok(BandSpectra {
        frequencies: band.restrict(&axis).to_vec(),
        n_channels: epochs.n_channels(),
        n_epochs,
        data: rows.concat(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SpectralError;
    use crate::processing::welch::{Spectrum, WelchEstimator};

    const AXIS: [f64; 6] = [0.0, 10.0, 20.0, 30.0, 40.0, 50.0];

    #[test]
    fn test_resolve_exact_endpoints() {
        let band = FrequencyBand::resolve(&AXIS, (10.0, 40.0)).unwrap();
        assert_eq!(band, FrequencyBand { start: 1, end: 4 });
        assert_eq!(band.len(), 4);
        assert_eq!(band.restrict(&AXIS), &[10.0, 20.0, 30.0, 40.0]);
    }

    #[test]
    fn test_resolve_nearest_and_ties() {
        // 14 -> 10, 25 ties between 20 and 30 -> first (20)
        let band = FrequencyBand::resolve(&AXIS, (14.0, 25.0)).unwrap();
        assert_eq!(band, FrequencyBand { start: 1, end: 2 });
    }

    #[test]
    fn test_resolve_reversed_range() {
        assert!(matches!(
            FrequencyBand::resolve(&AXIS, (40.0, 10.0)),
            Err(ScoringError::Config(ConfigError::InvalidFrequencyRange { .. }))
        ));
        // Both ends on the same bin is a one-bin band, whatever their order
        let band = FrequencyBand::resolve(&AXIS, (12.0, 11.0)).unwrap();
        assert_eq!(band, FrequencyBand { start: 1, end: 1 });
        assert_eq!(band.len(), 1);
    }

    #[test]
    fn test_resolve_out_of_axis() {
        let band = FrequencyBand::resolve(&AXIS, (-5.0, 500.0)).unwrap();
        assert_eq!(band, FrequencyBand { start: 0, end: 5 });
        assert!(matches!(
            FrequencyBand::resolve(&[], (1.0, 2.0)),
            Err(ScoringError::EmptyFrequencyBand)
        ));
    }

    fn noise_epochs(n_channels: usize, n_epochs: usize, epoch_len: usize) -> EpochSet {
        // Deterministic pseudo-noise
        let data = (0..n_channels * n_epochs * epoch_len)
            .map(|i| ((i as f64) * 0.731).sin() + ((i as f64) * 0.127).cos())
            .collect();
        EpochSet::from_flat(n_channels, n_epochs, epoch_len, data).unwrap()
    }

    fn params(smoothing_window: Option<usize>) -> SpectralParams {
        SpectralParams {
            sample_rate: 100.0,
            frequency_range: (10.0, 40.0),
            smoothing_window,
        }
    }

    #[test]
    fn test_band_spectra_shape() {
        let epochs = noise_epochs(2, 3, 100);
        let welch = WelchEstimator::new(10).unwrap();
        let spectra = band_spectra(&epochs, &welch, &params(None), &AtomicBool::new(false)).unwrap();

        assert_eq!(spectra.n_channels(), 2);
        assert_eq!(spectra.n_epochs(), 3);
        assert_eq!(spectra.frequencies(), &[10.0, 20.0, 30.0, 40.0]);
        assert_eq!(spectra.channel(1).len(), 3);
        assert_eq!(spectra.spectrum(1, 2).len(), 4);
    }

    #[test]
    fn test_band_spectra_smoothing_applied() {
        let epochs = noise_epochs(1, 2, 100);
        let welch = WelchEstimator::new(10).unwrap();
        let flag = AtomicBool::new(false);
        let raw = band_spectra(&epochs, &welch, &params(None), &flag).unwrap();
        let smoothed = band_spectra(&epochs, &welch, &params(Some(3)), &flag).unwrap();

        for epoch in 0..2 {
            assert_eq!(
                smoothed.spectrum(0, epoch),
                smooth_spectrum(raw.spectrum(0, epoch), 3).as_slice()
            );
        }
    }

    #[test]
    fn test_band_spectra_cancelled() {
        let epochs = noise_epochs(1, 2, 100);
        let welch = WelchEstimator::new(10).unwrap();
        let result = band_spectra(&epochs, &welch, &params(None), &AtomicBool::new(true));
        assert!(matches!(result, Err(ScoringError::Cancelled)));
    }

    /// Reports one axis but estimates on another
    struct DriftingEstimator;

    impl PsdEstimator for DriftingEstimator {
        fn frequencies(&self, _n_samples: usize, _sample_rate: f64) -> Vec<f64> {
            vec![0.0, 1.0, 2.0]
        }

        fn estimate(&self, samples: &[f64], _sample_rate: f64) -> Result<Spectrum, SpectralError> {
            Ok(Spectrum {
                frequencies: vec![0.0, 1.5, 3.0],
                power: vec![samples[0]; 3],
            })
        }
    }

    #[test]
    fn test_band_spectra_axis_mismatch() {
        let epochs = noise_epochs(1, 2, 10);
        let result = band_spectra(
            &epochs,
            &DriftingEstimator,
            &params(None),
            &AtomicBool::new(false),
        );
        assert!(matches!(
            result,
            Err(ScoringError::FrequencyAxisMismatch { channel: 0, .. })
        ));
    }

    /// Reports the right axis but too few power values
    struct TruncatingEstimator;

    impl PsdEstimator for TruncatingEstimator {
        fn frequencies(&self, _n_samples: usize, _sample_rate: f64) -> Vec<f64> {
            AXIS.to_vec()
        }

        fn estimate(&self, _samples: &[f64], _sample_rate: f64) -> Result<Spectrum, SpectralError> {
            Ok(Spectrum {
                frequencies: AXIS.to_vec(),
                power: vec![1.0; 3],
            })
        }
    }

    #[test]
    fn test_band_spectra_short_power() {
        let epochs = noise_epochs(1, 2, 10);
        let result = band_spectra(
            &epochs,
            &TruncatingEstimator,
            &params(None),
            &AtomicBool::new(false),
        );
        assert!(matches!(
            result,
            Err(ScoringError::PowerLengthMismatch {
                channel: 0,
                expected: 6,
                got: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_band_spectra_reversed_range() {
        let epochs = noise_epochs(1, 2, 100);
        let welch = WelchEstimator::new(10).unwrap();
        let reversed = SpectralParams {
            frequency_range: (40.0, 10.0),
            ..params(None)
        };
        let result = band_spectra(&epochs, &welch, &reversed, &AtomicBool::new(false));
        assert!(matches!(
            result,
            Err(ScoringError::Config(ConfigError::InvalidFrequencyRange { .. }))
        ));
    }
}
