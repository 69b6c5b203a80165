//! Core data types for scorepochs
//!
//! A [`Recording`] is the rectangular channels × samples input table. An
//! [`EpochSet`] is the same data cut into equal-length, non-overlapping
//! windows that share their boundaries across channels, so epoch `e` covers
//! the same time span on every channel.

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};

use crate::error::DataShapeError;

// ============================================================================
// Recording
// ============================================================================

/// Multi-channel time series with identical channel lengths.
///
/// Deserialization goes through [`Recording::new`], so a deserialized
/// recording is always rectangular and finite.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct Recording {
    channels: Vec<Vec<f64>>,
}

impl Recording {
    /// Create a recording from per-channel sample vectors.
    ///
    /// # Errors
    ///
    /// Returns a [`DataShapeError`] when there are no channels, when channel
    /// lengths differ, or when any sample is NaN or infinite.
    pub fn new(channels: Vec<Vec<f64>>) -> Result<Self, DataShapeError> {
        let expected = channels.first().ok_or(DataShapeError::NoChannels)?.len();

        for (channel, samples) in channels.iter().enumerate() {
            if samples.len() != expected {
                return Err(DataShapeError::RaggedChannels {
                    channel,
                    expected,
                    got: samples.len(),
                });
            }
            if let Some(offset) = samples.iter().position(|s| !s.is_finite()) {
                return Err(DataShapeError::NonFiniteSample { channel, offset });
            }
        }

        Ok(Self { channels })
    }

    /// Create a recording by copying borrowed channel slices.
    ///
    /// # Errors
    ///
    /// Same as [`Recording::new`].
    pub fn from_slices<S: AsRef<[f64]>>(channels: &[S]) -> Result<Self, DataShapeError> {
        Self::new(channels.iter().map(|c| c.as_ref().to_vec()).collect())
    }

    /// Number of channels (always at least one).
    #[inline]
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.channels.len()
    }

    /// Number of samples per channel.
    #[inline]
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.channels[0].len()
    }

    /// Samples of one channel.
    #[inline]
    #[must_use]
    pub fn channel(&self, index: usize) -> &[f64] {
        &self.channels[index]
    }

    /// Iterate over all channels in order.
    pub fn channels(&self) -> impl Iterator<Item = &[f64]> {
        self.channels.iter().map(Vec::as_slice)
    }

    /// Consume the recording and return its channel vectors.
    #[must_use]
    pub fn into_channels(self) -> Vec<Vec<f64>> {
        self.channels
    }
}

impl TryFrom<Vec<Vec<f64>>> for Recording {
    type Error = DataShapeError;

    fn try_from(channels: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(channels)
    }
}

impl From<Recording> for Vec<Vec<f64>> {
    fn from(recording: Recording) -> Self {
        recording.channels
    }
}

// ============================================================================
// Epoch Set
// ============================================================================

/// Segmented recording: channels × epochs × samples-per-epoch.
///
/// Samples are stored contiguously, channel-major then epoch-major, so each
/// epoch is a single slice.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct EpochSet {
    n_channels: usize,
    n_epochs: usize,
    epoch_len: usize,
    data: Vec<f64>,
}

impl EpochSet {
    /// Build an epoch set from its flat storage.
    ///
    /// `data` must hold exactly `n_channels * n_epochs * epoch_len` samples in
    /// channel-major, epoch-major order and `epoch_len` must be non-zero;
    /// returns `None` otherwise.
    #[must_use]
    pub fn from_flat(
        n_channels: usize,
        n_epochs: usize,
        epoch_len: usize,
        data: Vec<f64>,
    ) -> Option<Self> {
        let expected = n_channels.checked_mul(n_epochs)?.checked_mul(epoch_len)?;
        (epoch_len > 0 && data.len() == expected).then_some(Self {
            n_channels,
            n_epochs,
            epoch_len,
            data,
        })
    }

    /// Number of channels.
    #[inline]
    #[must_use]
    pub const fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Number of epochs per channel.
    #[inline]
    #[must_use]
    pub const fn n_epochs(&self) -> usize {
        self.n_epochs
    }

    /// Samples per epoch.
    #[inline]
    #[must_use]
    pub const fn epoch_len(&self) -> usize {
        self.epoch_len
    }

    /// Shape as `(channels, epochs, samples)`.
    #[inline]
    #[must_use]
    pub const fn shape(&self) -> (usize, usize, usize) {
        (self.n_channels, self.n_epochs, self.epoch_len)
    }

    /// Samples of epoch `epoch` on channel `channel`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    #[must_use]
    pub fn epoch(&self, channel: usize, epoch: usize) -> &[f64] {
        assert!(channel < self.n_channels, "channel {channel} out of range");
        assert!(epoch < self.n_epochs, "epoch {epoch} out of range");
        let start = (channel * self.n_epochs + epoch) * self.epoch_len;
        &self.data[start..start + self.epoch_len]
    }

    /// Iterate over the epochs of one channel in time order.
    pub fn channel_epochs(&self, channel: usize) -> impl Iterator<Item = &[f64]> {
        let per_channel = self.n_epochs * self.epoch_len;
        let start = channel * per_channel;
        self.data[start..start + per_channel].chunks_exact(self.epoch_len)
    }

    /// Copy out as nested vectors indexed `[channel][epoch][sample]`.
    #[must_use]
    pub fn to_nested(&self) -> Vec<Vec<Vec<f64>>> {
        (0..self.n_channels)
            .map(|c| self.channel_epochs(c).map(<[f64]>::to_vec).collect())
            .collect()
    }

    /// Keep only the given epochs, in the given order.
    ///
    /// Typically called with a prefix of a ranking to extract the best epochs
    /// on every channel. Returns `None` if any index is out of range.
    #[must_use]
    pub fn select(&self, epochs: &[usize]) -> Option<Self> {
        if epochs.iter().any(|&e| e >= self.n_epochs) {
            return None;
        }

        let mut data = Vec::with_capacity(self.n_channels * epochs.len() * self.epoch_len);
        for channel in 0..self.n_channels {
            for &epoch in epochs {
                data.extend_from_slice(self.epoch(channel, epoch));
            }
        }

        Some(Self {
            n_channels: self.n_channels,
            n_epochs: epochs.len(),
            epoch_len: self.epoch_len,
            data,
        })
    }

    /// Flat sample storage.
    #[inline]
    #[must_use]
    pub fn as_flat(&self) -> &[f64] {
        &self.data
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_recording_shape() {
        let rec = Recording::new(vec![vec![0.0; 10], vec![1.0; 10]]).unwrap();
        assert_eq!(rec.n_channels(), 2);
        assert_eq!(rec.n_samples(), 10);
        assert_eq!(rec.channel(1)[3], 1.0);
    }

    #[test]
    fn test_recording_no_channels() {
        assert_eq!(Recording::new(vec![]), Err(DataShapeError::NoChannels));
    }

    #[test]
    fn test_recording_ragged() {
        let result = Recording::new(vec![vec![0.0; 10], vec![0.0; 9]]);
        assert_eq!(
            result,
            Err(DataShapeError::RaggedChannels { channel: 1, expected: 10, got: 9 })
        );
    }

    #[test]
    fn test_recording_non_finite() {
        let result = Recording::new(vec![vec![0.0, 1.0], vec![f64::NAN, 0.0]]);
        assert_eq!(
            result,
            Err(DataShapeError::NonFiniteSample { channel: 1, offset: 0 })
        );
    }

    #[test]
    fn test_epoch_set_indexing() {
        // 2 channels, 3 epochs, 2 samples each
        let data: Vec<f64> = (0..12).map(f64::from).collect();
        let set = EpochSet::from_flat(2, 3, 2, data).unwrap();

        assert_eq!(set.shape(), (2, 3, 2));
        assert_eq!(set.epoch(0, 0), &[0.0, 1.0]);
        assert_eq!(set.epoch(0, 2), &[4.0, 5.0]);
        assert_eq!(set.epoch(1, 1), &[8.0, 9.0]);
        assert_eq!(set.channel_epochs(1).count(), 3);
    }

    #[test]
    fn test_epoch_set_from_flat_wrong_len() {
        assert!(EpochSet::from_flat(2, 3, 2, vec![0.0; 11]).is_none());
    }

    #[test]
    fn test_epoch_set_select() {
        let data: Vec<f64> = (0..12).map(f64::from).collect();
        let set = EpochSet::from_flat(2, 3, 2, data).unwrap();

        let best = set.select(&[2, 0]).unwrap();
        assert_eq!(best.shape(), (2, 2, 2));
        assert_eq!(best.epoch(0, 0), &[4.0, 5.0]);
        assert_eq!(best.epoch(1, 1), &[6.0, 7.0]);

        assert!(set.select(&[3]).is_none());
    }

    #[test]
    fn test_epoch_set_nested() {
        let data: Vec<f64> = (0..8).map(f64::from).collect();
        let set = EpochSet::from_flat(2, 2, 2, data).unwrap();
        let nested = set.to_nested();
        assert_eq!(nested, vec![
            vec![vec![0.0, 1.0], vec![2.0, 3.0]],
            vec![vec![4.0, 5.0], vec![6.0, 7.0]],
        ]);
    }
}
