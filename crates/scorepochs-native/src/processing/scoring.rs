//! Cross-epoch spectral homogeneity scores
//!
//! For each channel, every epoch's band spectrum is rank-correlated with
//! every other epoch's. An epoch's channel score is the mean of its row in
//! that matrix, self-correlation included. The final score averages the
//! channel scores.

use scorepochs_core::{spearman_matrix, CorrelationMatrix};
use tracing::debug;

use crate::processing::spectral::BandSpectra;

/// Score assigned to the only epoch when there is nothing to correlate with.
pub const SINGLE_EPOCH_SCORE: f64 = 1.0;

/// Per-channel and channel-averaged epoch scores.
#[derive(Clone, Debug, PartialEq)]
pub struct HomogeneityScores {
    /// Row means of each channel's correlation matrix, `[channel][epoch]`
    pub channel_scores: Vec<Vec<f64>>,
    /// Channel average per epoch, in epoch order
    pub scores: Vec<f64>,
}

/// Spearman matrix between the epochs of one channel.
#[must_use]
pub fn channel_correlations(spectra: &BandSpectra, channel: usize) -> CorrelationMatrix {
    spearman_matrix(&spectra.channel(channel))
}

/// Score every epoch of `spectra`.
///
/// With a single epoch no correlation exists; every score is then
/// [`SINGLE_EPOCH_SCORE`].
#[must_use]
pub fn homogeneity_scores(spectra: &BandSpectra) -> HomogeneityScores {
    let n_channels = spectra.n_channels();
    let n_epochs = spectra.n_epochs();

    if n_epochs < 2 {
        debug!("Only {n_epochs} epoch(s); using fallback score {SINGLE_EPOCH_SCORE}");
        return HomogeneityScores {
            channel_scores: vec![vec![SINGLE_EPOCH_SCORE; n_epochs]; n_channels],
            scores: vec![SINGLE_EPOCH_SCORE; n_epochs],
        };
    }

    let channel_scores: Vec<Vec<f64>> = (0..n_channels)
        .map(|c| channel_correlations(spectra, c).row_means())
        .collect();

    let scores = (0..n_epochs)
        .map(|e| channel_scores.iter().map(|row| row[e]).sum::<f64>() / n_channels as f64)
        .collect();

    HomogeneityScores {
        channel_scores,
        scores,
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicBool;

    use scorepochs_core::EpochSet;

    use super::*;
    use crate::processing::spectral::{band_spectra, SpectralParams};
    use crate::processing::welch::WelchEstimator;

    fn spectra_for(data: Vec<f64>, n_channels: usize, n_epochs: usize, epoch_len: usize) -> BandSpectra {
        let epochs = EpochSet::from_flat(n_channels, n_epochs, epoch_len, data).unwrap();
        let welch = WelchEstimator::new(20).unwrap();
        let params = SpectralParams {
            sample_rate: 100.0,
            frequency_range: (5.0, 45.0),
            smoothing_window: None,
        };
        band_spectra(&epochs, &welch, &params, &AtomicBool::new(false)).unwrap()
    }

    fn chirp(i: usize) -> f64 {
        let t = i as f64;
        (0.3 * t).sin() + 0.5 * (1.1 * t).sin() + 0.25 * (2.3 * t).cos()
    }

    #[test]
    fn test_identical_epochs_score_one() {
        let epoch: Vec<f64> = (0..200).map(chirp).collect();
        let data: Vec<f64> = epoch.iter().copied().cycle().take(2 * 3 * 200).collect();
        let spectra = spectra_for(data, 2, 3, 200);

        let matrix = channel_correlations(&spectra, 0);
        for i in 0..3 {
            for j in 0..3 {
                assert!((matrix.get(i, j) - 1.0).abs() < 1e-12);
            }
        }

        let scores = homogeneity_scores(&spectra);
        assert_eq!(scores.scores.len(), 3);
        for s in &scores.scores {
            assert!((s - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_single_epoch_fallback() {
        let data: Vec<f64> = (0..2 * 200).map(chirp).collect();
        let spectra = spectra_for(data, 2, 1, 200);

        let scores = homogeneity_scores(&spectra);
        assert_eq!(scores.scores, vec![SINGLE_EPOCH_SCORE]);
        assert_eq!(scores.channel_scores, vec![vec![SINGLE_EPOCH_SCORE]; 2]);
    }

    #[test]
    fn test_scores_average_channels() {
        let data: Vec<f64> = (0..2 * 4 * 200).map(|i| chirp(i * 7 % 1013)).collect();
        let spectra = spectra_for(data, 2, 4, 200);
        let scores = homogeneity_scores(&spectra);

        assert_eq!(scores.channel_scores.len(), 2);
        for e in 0..4 {
            let expected = (scores.channel_scores[0][e] + scores.channel_scores[1][e]) / 2.0;
            assert!((scores.scores[e] - expected).abs() < 1e-12);
            assert!(scores.scores[e] <= 1.0 + 1e-12);
        }
    }
}
