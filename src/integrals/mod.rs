//! # Peak Integration
//!
//! Peak areas are a proxy for coordination numbers. Each peak is integrated
//! between the first minima on either side, the integrals of every curve are
//! normalized so that the first peak (the Si-O bond) has the same area as in
//! the reference curve, and the short-range peaks of hotter curves are
//! differenced against the reference.

mod error;


pub use error::IntegralError;

use crate::config::IntegrationConfig;
use crate::curve::{Curve, CurveKey, CurveStore, PeakList};
use crate::tracking::{PeakId, TrackedMatrix};
use log::{debug, info};
use std::collections::BTreeMap;

/// Integral of one peak.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakIntegral {
    /// Sample index of the peak maximum.
    pub position: usize,
    /// Area under `|G(r)|` between the flanking minima.
    pub integral: f64,
}

/// Peak integrals per curve, in curve order.
///
/// The first curve is the reference for scaling and differences.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntegralTable {
    entries: Vec<(CurveKey, Vec<PeakIntegral>)>,
}

impl IntegralTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the integrals of one curve.
    pub fn push(&mut self, key: CurveKey, integrals: Vec<PeakIntegral>) {
        self.entries.push((key, integrals));
    }

    /// Integrals of `key`.
    pub fn get(&self, key: &CurveKey) -> Option<&[PeakIntegral]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Reference curve and its integrals.
    pub fn reference(&self) -> Option<(&CurveKey, &[PeakIntegral])> {
        self.entries.first().map(|(k, v)| (k, v.as_slice()))
    }

    /// `(key, integrals)` in curve order.
    pub fn iter(&self) -> impl Iterator<Item = (&CurveKey, &[PeakIntegral])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// Number of curves.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no curve was integrated.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Change of one reference peak's scaled integral in a hotter curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeakDifference {
    /// Peak position in the reference curve.
    pub reference_position: usize,
    /// Matching peak position in the hotter curve.
    pub shifted_position: usize,
    /// Absolute difference of the scaled integrals.
    pub difference: f64,
}

/// Integral differences of every hotter curve against the reference.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralDifferences {
    /// Reference curve.
    pub reference_key: CurveKey,
    /// Reference peaks inside the short-range window.
    pub reference_peaks: Vec<PeakIntegral>,
    /// Matches per hotter curve, in curve order. A curve without matches has
    /// an empty list.
    pub curves: Vec<(CurveKey, Vec<PeakDifference>)>,
}

/// Scaled integrals and their differences for a set of dwell curves.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegralReport {
    /// Scaled integrals per curve.
    pub scaled: IntegralTable,
    /// Differences against the reference curve.
    pub differences: IntegralDifferences,
}

/// Inclusive bounds of the peak at `peak`: the first minimum on each side,
/// or the curve edge.
pub fn peak_bounds(intensity: &[f64], peak: usize) -> Result<(usize, usize), IntegralError> {
    if peak >= intensity.len() {
        return Err(IntegralError::PeakOutOfRange {
            position: peak,
            len: intensity.len(),
        });
    }

    let mut lower = peak;
    while lower > 0 && intensity[lower - 1] < intensity[lower] {
        lower -= 1;
    }
    let mut upper = peak;
    while upper + 1 < intensity.len() && intensity[upper + 1] < intensity[upper] {
        upper += 1;
    }
    Ok((lower, upper))
}

/// Trapezoid integral of `|intensity|` between the minima flanking `peak`,
/// with unit sample spacing.
pub fn integrate_peak_area(intensity: &[f64], peak: usize) -> Result<f64, IntegralError> {
    let (lower, upper) = peak_bounds(intensity, peak)?;
    Ok(intensity[lower..=upper]
        .windows(2)
        .map(|w| (w[0].abs() + w[1].abs()) / 2.0)
        .sum())
}

/// Integrate every peak of one curve.
pub fn integrate_curve(curve: &Curve, peaks: &PeakList) -> Result<Vec<PeakIntegral>, IntegralError> {
    peaks
        .iter()
        .map(|&position| {
            Ok(PeakIntegral {
                position,
                integral: integrate_peak_area(&curve.intensity, position)?,
            })
        })
        .collect()
}

/// Scale every curve so its first peak integral equals the reference's.
///
/// The reference curve (first entry) is left unchanged.
pub fn scale_peak_integrals(table: &mut IntegralTable) -> Result<(), IntegralError> {
    let (reference_key, reference) = table.entries.first().ok_or(IntegralError::EmptyTable)?;
    let reference_first = first_integral(reference_key, reference)?;

    for (key, integrals) in table.entries.iter_mut().skip(1) {
        let factor = reference_first / first_integral(key, integrals)?;
        debug!("Scaling curve {key} by {factor:.6}");
        for peak in integrals.iter_mut() {
            peak.integral *= factor;
        }
    }
    Ok(())
}

fn first_integral(key: &CurveKey, integrals: &[PeakIntegral]) -> Result<f64, IntegralError> {
    integrals
        .first()
        .map(|p| p.integral)
        .filter(|v| *v != 0.0 && v.is_finite())
        .ok_or_else(|| IntegralError::DegenerateReference {
            key: key.to_string(),
        })
}

/// Difference the short-range peaks of hotter curves against the reference.
///
/// Reference peaks are those with position below `reference_window`. Every
/// peak of a hotter curve within `tolerance` of a reference peak yields one
/// [`PeakDifference`].
pub fn peak_integral_differences(
    table: &IntegralTable,
    reference_window: usize,
    tolerance: usize,
) -> Result<IntegralDifferences, IntegralError> {
    let (reference_key, reference) = table.reference().ok_or(IntegralError::EmptyTable)?;
    let reference_peaks: Vec<PeakIntegral> = reference
        .iter()
        .filter(|p| p.position < reference_window)
        .copied()
        .collect();

    let curves = table
        .iter()
        .filter(|(key, _)| key.nominal_temperature() > reference_key.nominal_temperature())
        .map(|(key, integrals)| {
            let matches = reference_peaks
                .iter()
                .flat_map(|r| integrals.iter().map(move |s| (r, s)))
                .filter(|(r, s)| r.position.abs_diff(s.position) <= tolerance)
                .map(|(r, s)| PeakDifference {
                    reference_position: r.position,
                    shifted_position: s.position,
                    difference: (s.integral - r.integral).abs(),
                })
                .collect();
            (*key, matches)
        })
        .collect();

    Ok(IntegralDifferences {
        reference_key: *reference_key,
        reference_peaks,
        curves,
    })
}

/// Integral of every present cell of a tracked matrix.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrackedIntegrals {
    values: BTreeMap<(usize, PeakId), f64>,
}

impl TrackedIntegrals {
    /// Integral of peak `id` in row `row`.
    pub fn get(&self, row: usize, id: PeakId) -> Option<f64> {
        self.values.get(&(row, id)).copied()
    }

    /// Number of integrated cells.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when nothing was integrated.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Integrate each present cell of `matrix` against the curve of its row.
pub fn integrate_tracked(
    matrix: &TrackedMatrix,
    curves: &[Curve],
) -> Result<TrackedIntegrals, IntegralError> {
    if curves.len() < matrix.row_count() {
        return Err(IntegralError::RowMismatch {
            rows: matrix.row_count(),
            curves: curves.len(),
        });
    }

    let values = matrix
        .present()
        .map(|(row, id, index)| {
            Ok(((row, id), integrate_peak_area(&curves[row].intensity, index)?))
        })
        .collect::<Result<BTreeMap<_, _>, IntegralError>>()?;
    Ok(TrackedIntegrals { values })
}

/// Integrates the dwell curves of an experiment.
#[derive(Debug, Clone)]
pub struct IntegralAnalyzer {
    config: IntegrationConfig,
}

impl IntegralAnalyzer {
    /// Analyzer using `config`.
    pub fn new(config: &IntegrationConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// True when `key` is a dwell curve hot enough to integrate.
    pub fn qualifies(&self, key: &CurveKey) -> bool {
        key.is_dwell() && key.nominal_temperature() >= self.config.min_temperature
    }

    /// Integrate, scale and difference the qualifying dwell curves.
    ///
    /// `dwell_peaks` is in curve order; its first qualifying curve becomes the
    /// reference.
    pub fn analyze(
        &self,
        store: &CurveStore,
        dwell_peaks: &[(CurveKey, PeakList)],
    ) -> Result<IntegralReport, IntegralError> {
        let mut table = IntegralTable::new();
        for (key, peaks) in dwell_peaks.iter().filter(|(key, _)| self.qualifies(key)) {
            let curve = store.load(key)?;
            let integrals = integrate_curve(&curve, peaks)?;
            debug!("Integrated {} peaks of curve {key}", integrals.len());
            table.push(*key, integrals);
        }
        if table.is_empty() {
            return Err(IntegralError::EmptyTable);
        }

        scale_peak_integrals(&mut table)?;
        let differences = peak_integral_differences(
            &table,
            self.config.reference_window,
            self.config.shift_tolerance,
        )?;

        info!(
            "Integrated {} dwell curves against reference {}",
            table.len(),
            differences.reference_key
        );
        Ok(IntegralReport {
            scaled: table,
            differences,
        })
    }
}
