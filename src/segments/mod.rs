//! Dwell segment detection and analyte selection.
//!
//! A dwell is every sample whose rounded temperature equals one exact multiple
//! of 100. Membership is by value, not contiguity, so each distinct dwell
//! temperature forms exactly one [`DwellGroup`]. Within a group, the sample
//! taken exactly `equilibrium_offset_secs` after the first member marks the
//! equilibration boundary and is excluded from the analyte list.

mod error;

#[cfg(test)]
mod tests;

pub use error::SegmentError;

use crate::config::{RecurrencePolicy, SegmentConfig};
use crate::log_file::{ExperimentLog, Sample};
use log::{debug, info, warn};
use std::collections::BTreeSet;

/// All samples sharing one dwell temperature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DwellGroup {
    /// Rounded dwell temperature.
    pub temperature: i64,
    /// Indices of the members in the experiment log.
    pub indices: Vec<usize>,
    /// Timestamps of the members, in log order.
    pub timestamps: Vec<u32>,
}

impl DwellGroup {
    /// True when the members form one uninterrupted run in the log.
    pub fn is_contiguous(&self) -> bool {
        self.indices.windows(2).all(|w| w[1] == w[0] + 1)
    }

    /// First index where the group resumes after a gap.
    fn first_gap(&self) -> Option<usize> {
        self.indices
            .windows(2)
            .find(|w| w[1] != w[0] + 1)
            .map(|w| w[1])
    }
}

/// Post-equilibrium measurements plus the groups they were derived from.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalyteSelection {
    /// Retained samples, in log order.
    pub analytes: Vec<Sample>,
    /// One group per distinct dwell temperature, in scan order.
    pub groups: Vec<DwellGroup>,
    /// Timestamps of the skip-boundary samples.
    pub excluded: BTreeSet<u32>,
}

impl AnalyteSelection {
    /// Number of retained measurements.
    pub fn analyte_count(&self) -> usize {
        self.analytes.len()
    }

    /// Timestamps of the retained measurements.
    pub fn analyte_timestamps(&self) -> Vec<u32> {
        self.analytes.iter().map(|s| s.timestamp).collect()
    }

    /// Raw temperatures of the retained measurements.
    pub fn analyte_temperatures(&self) -> Vec<f64> {
        self.analytes.iter().map(|s| s.temperature).collect()
    }
}

/// `value / 100` as a float.
pub fn divide_by_100(value: i64) -> f64 {
    value as f64 / 100.0
}

/// True for exact multiples of 100 (100, 200, ...), false for 130 or 250.
pub fn is_dwell_temperature(value: i64) -> bool {
    divide_by_100(value).fract() == 0.0
}

/// Collect the times at which `target` occurs in `values`.
///
/// Returns the index just past the last occurrence together with the matching
/// times. `values` and `times` are parallel slices. When `target` does not
/// occur the returned index is `0`.
///
/// ```
/// use pdfpeak::segments::times_of_target_occurrence;
///
/// let (next, times) = times_of_target_occurrence(4, &[1, 4, 3, 4, 5], &[6, 7, 8, 9, 10]);
/// assert_eq!(next, 4);
/// assert_eq!(times, vec![7, 9]);
/// ```
pub fn times_of_target_occurrence<T: Copy>(target: i64, values: &[i64], times: &[T]) -> (usize, Vec<T>) {
    let indices = occurrence_indices(target, values);
    let next = indices.last().map(|last| last + 1).unwrap_or(0);
    let matched = indices.iter().filter_map(|&i| times.get(i).copied()).collect();
    (next, matched)
}

fn occurrence_indices(target: i64, values: &[i64]) -> Vec<usize> {
    values
        .iter()
        .enumerate()
        .filter(|(_, v)| **v == target)
        .map(|(i, _)| i)
        .collect()
}

/// Offsets of every element from the first (`[5, 32, 108] -> [0, 27, 103]`).
pub fn list_item_differences(values: &[u32]) -> Vec<i64> {
    match values.first() {
        Some(&first) => values.iter().map(|&v| v as i64 - first as i64).collect(),
        None => Vec::new(),
    }
}

/// Group dwell samples by rounded temperature, in scan order.
pub fn dwell_groups(log: &ExperimentLog) -> Vec<DwellGroup> {
    let rounded = log.rounded_temperatures();
    let timestamps = log.timestamps();

    let mut groups = Vec::new();
    let mut cursor = 0;
    while cursor < rounded.len() {
        let value = rounded[cursor];
        if !is_dwell_temperature(value) {
            cursor += 1;
            continue;
        }

        let indices = occurrence_indices(value, &rounded);
        let (next, times) = times_of_target_occurrence(value, &rounded, &timestamps);
        debug!(
            "Dwell {value} degC: {} samples, indices {:?}",
            indices.len(),
            indices
        );
        groups.push(DwellGroup {
            temperature: value,
            indices,
            timestamps: times,
        });
        cursor = next;
    }
    groups
}

/// Drop the equilibration-boundary sample of every dwell group.
pub fn select_analytes(
    log: &ExperimentLog,
    config: &SegmentConfig,
) -> Result<AnalyteSelection, SegmentError> {
    let groups = dwell_groups(log);

    for group in &groups {
        if let Some(index) = group.first_gap() {
            match config.recurrence {
                RecurrencePolicy::Warn => warn!(
                    "Dwell temperature {} degC recurs at sample {}; occurrences merged into one group",
                    group.temperature, index
                ),
                RecurrencePolicy::Reject => {
                    return Err(SegmentError::RecurringDwell {
                        temperature: group.temperature,
                        index,
                    })
                }
            }
        }
    }

    let mut excluded = BTreeSet::new();
    for group in &groups {
        let offsets = list_item_differences(&group.timestamps);
        let boundary = offsets
            .iter()
            .position(|&d| d == config.equilibrium_offset_secs)
            .ok_or(SegmentError::MissingEquilibriumSample {
                temperature: group.temperature,
                first_timestamp: group.timestamps.first().copied().unwrap_or_default(),
                offset_secs: config.equilibrium_offset_secs,
            })?;
        excluded.insert(group.timestamps[boundary]);
    }

    let analytes: Vec<Sample> = log
        .samples()
        .iter()
        .filter(|s| !excluded.contains(&s.timestamp))
        .copied()
        .collect();

    info!(
        "Selected {} of {} measurements ({} dwell groups)",
        analytes.len(),
        log.len(),
        groups.len()
    );

    Ok(AnalyteSelection {
        analytes,
        groups,
        excluded,
    })
}
