//! Bond assignment for short-range peaks.

use super::{Curve, PeakList};

/// Known C-S-H bond lengths as `(bond, shortest, longest)` in angstrom.
pub const KNOWN_BONDS: [(&str, f64, f64); 4] = [
    ("Si-O", 1.5, 1.7),
    ("Ca-O", 2.3, 2.5),
    ("O-O", 2.6, 2.7),
    ("Si-Si", 3.0, 3.2),
];

/// Only peaks up to this distance are labelled.
pub const MAX_LABEL_DISTANCE: f64 = 5.0;

/// A peak matched to a known bond length.
#[derive(Debug, Clone, PartialEq)]
pub struct BondLabel {
    /// Bond name, e.g. `"Si-O"`.
    pub bond: &'static str,
    /// Radial distance of the peak.
    pub distance: f64,
    /// G(r) at the peak.
    pub intensity: f64,
}

/// Label every peak whose distance falls inside a known bond range.
///
/// Labels are grouped by bond in [`KNOWN_BONDS`] order, peaks in curve order.
pub fn label_bonds(curve: &Curve, peaks: &PeakList) -> Vec<BondLabel> {
    let located: Vec<(f64, f64)> = peaks
        .iter()
        .filter_map(|&i| Some((*curve.radial_distance.get(i)?, *curve.intensity.get(i)?)))
        .filter(|(r, _)| *r <= MAX_LABEL_DISTANCE)
        .collect();

    KNOWN_BONDS
        .iter()
        .flat_map(|&(bond, low, high)| {
            located
                .iter()
                .filter(move |(r, _)| (low..=high).contains(r))
                .map(move |&(distance, intensity)| BondLabel {
                    bond,
                    distance,
                    intensity,
                })
        })
        .collect()
}
