//! Numerical primitives for epoch scoring
//!
//! Everything here is pure and allocation-light:
//! - Boundary-aware moving average over a spectrum
//! - Average (tie-aware) ranks and the Spearman correlation matrix
//! - Stable descending ranking of scores

use alloc::vec;
use alloc::vec::Vec;
use core::cmp::Ordering;

// ============================================================================
// Spectrum Smoothing
// ============================================================================

/// Centered moving average with asymmetric edge windows.
///
/// With `half = window / 2` and `n = spectrum.len()`:
/// - bins `f < half` average `[0, f + half]` (clamped to the end),
/// - bins `f >= n - half` average `[f - half, n)`,
/// - interior bins average `[f - half, f + half)` for an even window and
///   `[f - half, f + half]` for an odd one.
///
/// The output has the same length as the input. A window of 0 or 1 returns
/// the spectrum unchanged.
///
/// ```
/// use scorepochs_core::smooth_spectrum;
///
/// let smoothed = smooth_spectrum(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
/// assert_eq!(smoothed, vec![1.5, 2.0, 3.0, 4.0, 4.5]);
/// ```
#[must_use]
pub fn smooth_spectrum(spectrum: &[f64], window: usize) -> Vec<f64> {
    let n = spectrum.len();
    if window <= 1 {
        return spectrum.to_vec();
    }

    let half = window / 2;
    let tail_start = n.saturating_sub(half);
    let even = window % 2 == 0;

    (0..n)
        .map(|f| {
            let span = if f < half {
                &spectrum[..(f + half + 1).min(n)]
            } else if f >= tail_start {
                &spectrum[f - half..]
            } else if even {
                &spectrum[f - half..f + half]
            } else {
                &spectrum[f - half..=f + half]
            };
            mean(span)
        })
        .collect()
}

/// Arithmetic mean; 0.0 for an empty slice.
#[inline]
fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

// ============================================================================
// Rank Statistics
// ============================================================================

/// 1-based ranks with ties assigned their average rank.
///
/// ```
/// use scorepochs_core::average_ranks;
///
/// assert_eq!(average_ranks(&[10.0, 30.0, 20.0, 20.0]), vec![1.0, 4.0, 2.5, 2.5]);
/// ```
#[must_use]
pub fn average_ranks(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = vec![0.0; n];
    let mut i = 0;
    while i < n {
        let mut j = i + 1;
        while j < n && values[order[j]] == values[order[i]] {
            j += 1;
        }
        // Positions i..j (0-based) share the mean of ranks i+1..=j
        let rank = (i + j + 1) as f64 / 2.0;
        for &idx in &order[i..j] {
            ranks[idx] = rank;
        }
        i = j;
    }
    ranks
}

/// Pearson correlation, or `None` when either input has zero variance.
fn pearson(x: &[f64], y: &[f64]) -> Option<f64> {
    let n = x.len();
    if n < 2 || n != y.len() {
        return None;
    }

    let mean_x = mean(x);
    let mean_y = mean(y);

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (&xi, &yi) in x.iter().zip(y) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let denom = libm::sqrt(var_x * var_y);
    (denom > 0.0).then(|| (cov / denom).clamp(-1.0, 1.0))
}

/// Square, symmetric matrix of correlation coefficients.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationMatrix {
    size: usize,
    data: Vec<f64>,
}

impl CorrelationMatrix {
    /// Number of variables (rows and columns).
    #[inline]
    #[must_use]
    pub const fn size(&self) -> usize {
        self.size
    }

    /// Coefficient between variables `i` and `j`.
    #[inline]
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.size + j]
    }

    /// One row of the matrix.
    #[inline]
    #[must_use]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.size..(i + 1) * self.size]
    }

    /// Mean of each row, diagonal included.
    #[must_use]
    pub fn row_means(&self) -> Vec<f64> {
        (0..self.size).map(|i| mean(self.row(i))).collect()
    }
}

/// Spearman rank-correlation matrix between variables.
///
/// Each element of `variables` is one variable; its entries are the
/// observations. All variables must have the same number of observations.
/// The diagonal is always 1.0. An off-diagonal coefficient that is undefined
/// (fewer than two observations, or a variable whose values are all equal)
/// is reported as 0.0.
#[must_use]
pub fn spearman_matrix<S: AsRef<[f64]>>(variables: &[S]) -> CorrelationMatrix {
    let size = variables.len();
    let ranks: Vec<Vec<f64>> = variables.iter().map(|v| average_ranks(v.as_ref())).collect();

    let mut data = vec![0.0; size * size];
    for i in 0..size {
        data[i * size + i] = 1.0;
        for j in (i + 1)..size {
            let rho = pearson(&ranks[i], &ranks[j]).unwrap_or(0.0);
            data[i * size + j] = rho;
            data[j * size + i] = rho;
        }
    }

    CorrelationMatrix { size, data }
}

// ============================================================================
// Ranking
// ============================================================================

/// Indices of `scores` ordered from highest to lowest score.
///
/// The sort is stable, so equal scores keep ascending index order.
///
/// ```
/// use scorepochs_core::rank_descending;
///
/// assert_eq!(rank_descending(&[0.2, 0.9, 0.2, 0.5]), vec![1, 3, 0, 2]);
/// ```
#[must_use]
pub fn rank_descending(scores: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| match scores[b].total_cmp(&scores[a]) {
        // -0.0 and 0.0 compare unequal under total_cmp
        Ordering::Less | Ordering::Greater if scores[a] == scores[b] => Ordering::Equal,
        ord => ord,
    });
    order
}

// ============================================================================
// Tests
// ============================================================================
