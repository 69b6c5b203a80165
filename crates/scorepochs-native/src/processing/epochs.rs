//! Epoch segmentation
//!
//! Cuts every channel into non-overlapping epochs starting at offsets
//! `0, epoch_len, 2 * epoch_len, ...`. Samples after the last full epoch are
//! dropped.

use scorepochs_core::{ConfigError, EpochSet, Recording};

/// Number of full epochs of `epoch_len` samples in `n_samples` samples.
#[inline]
#[must_use]
pub fn epoch_count(n_samples: usize, epoch_len: usize) -> usize {
    if epoch_len == 0 || epoch_len > n_samples {
        return 0;
    }
    (n_samples - epoch_len) / epoch_len + 1
}

/// Segment a recording into epochs of `epoch_len` samples.
///
/// # Errors
///
/// Returns [`ConfigError::ZeroEpochLength`] for a zero length and
/// [`ConfigError::EpochExceedsRecording`] when not even one epoch fits.
pub fn segment(recording: &Recording, epoch_len: usize) -> Result<EpochSet, ConfigError> {
    if epoch_len == 0 {
        return Err(ConfigError::ZeroEpochLength);
    }

    let n_samples = recording.n_samples();
    if epoch_len > n_samples {
        return Err(ConfigError::EpochExceedsRecording {
            epoch_len,
            recording_len: n_samples,
        });
    }

    let n_epochs = epoch_count(n_samples, epoch_len);
    let used = n_epochs * epoch_len;

    let mut data = Vec::with_capacity(recording.n_channels() * used);
    for channel in recording.channels() {
        data.extend_from_slice(&channel[..used]);
    }

    // Only a zero epoch length can make this fail, and that is rejected above
    EpochSet::from_flat(recording.n_channels(), n_epochs, epoch_len, data)
        .ok_or(ConfigError::ZeroEpochLength)
}
