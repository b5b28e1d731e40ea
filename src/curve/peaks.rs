//! Local-maximum peak detection.

use serde::{Deserialize, Serialize};

/// Ordered indices of the peaks detected in one curve.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeakList(Vec<usize>);

impl PeakList {
    /// Wrap already-ordered peak indices.
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Peak indices.
    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    /// Number of peaks.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no peak was found.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over peak indices.
    pub fn iter(&self) -> impl Iterator<Item = &usize> {
        self.0.iter()
    }

    /// Take the indices out.
    pub fn into_inner(self) -> Vec<usize> {
        self.0
    }
}

impl AsRef<[usize]> for PeakList {
    fn as_ref(&self) -> &[usize] {
        &self.0
    }
}

impl From<Vec<usize>> for PeakList {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

/// Indices of local maxima with non-negative height inside `window` (inclusive).
///
/// A maximum is a sample, or a plateau of equal samples, strictly higher than
/// both neighbours. Plateaus report their middle sample (left of centre for
/// even widths). The first and last samples are never peaks.
pub fn locate_peaks(intensity: &[f64], window: [usize; 2]) -> PeakList {
    let [low, high] = window;
    local_maxima(intensity)
        .into_iter()
        .filter(|&i| intensity[i] >= 0.0)
        .filter(|&i| (low..=high).contains(&i))
        .collect::<Vec<_>>()
        .into()
}

fn local_maxima(x: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if x.len() < 3 {
        return peaks;
    }

    let last = x.len() - 1;
    let mut i = 1;
    while i < last {
        if x[i - 1] < x[i] {
            let mut ahead = i + 1;
            while ahead < last && x[ahead] == x[i] {
                ahead += 1;
            }
            if x[ahead] < x[i] {
                peaks.push((i + ahead - 1) / 2);
                i = ahead;
            }
        }
        i += 1;
    }
    peaks
}
