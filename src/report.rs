//! Text and CSV outputs.
//!
//! - the tracked matrix as `|`-delimited text, `NaN` for absent cells
//! - peak counts per curve (`key,peaks`)
//! - bond labels of short-range dwell peaks (`key,bond,distance,intensity`)
//! - integral differences against the reference curve, one row per curve

use crate::archive::ArrayArchive;
use crate::curve::{BondLabel, CurveKey};
use crate::integrals::{IntegralDifferences, TrackedIntegrals};
use crate::tracking::{Cell, TrackedMatrix};
use std::fs;
use std::path::Path;

/// Errors that can occur while writing reports
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV writing error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// Row labels do not line up with matrix rows
    #[error("Matrix has {rows} rows but {labels} row labels were given")]
    LabelMismatch {
        /// Rows in the matrix
        rows: usize,
        /// Labels supplied
        labels: usize,
    },
}

/// Placeholder written for absent cells.
pub const ABSENT: &str = "NaN";

fn check_labels(matrix: &TrackedMatrix, labels: &[CurveKey]) -> Result<(), ReportError> {
    if labels.len() != matrix.row_count() {
        return Err(ReportError::LabelMismatch {
            rows: matrix.row_count(),
            labels: labels.len(),
        });
    }
    Ok(())
}

/// Render the tracked matrix, one line per curve, prefixed by the curve key.
///
/// ```text
/// 30|164|237|NaN|362
/// 100_00|166|240|300|365
/// ```
pub fn format_matrix(matrix: &TrackedMatrix, labels: &[CurveKey]) -> Result<String, ReportError> {
    check_labels(matrix, labels)?;
    Ok(join_rows(labels, |row| {
        matrix
            .row(row)
            .into_iter()
            .map(|cell| match cell {
                Cell::Present(index) => index.to_string(),
                Cell::Absent => ABSENT.to_string(),
            })
            .collect()
    }))
}

/// Render tracked integrals in the same layout as [`format_matrix`].
pub fn format_integral_matrix(
    matrix: &TrackedMatrix,
    integrals: &TrackedIntegrals,
    labels: &[CurveKey],
) -> Result<String, ReportError> {
    check_labels(matrix, labels)?;
    Ok(join_rows(labels, |row| {
        matrix
            .column_ids()
            .iter()
            .map(|&id| match integrals.get(row, id) {
                Some(value) => format!("{value:.4}"),
                None => ABSENT.to_string(),
            })
            .collect()
    }))
}

/// One `|`-joined line per label, the label first.
fn join_rows<F>(labels: &[CurveKey], cells: F) -> String
where
    F: Fn(usize) -> Vec<String>,
{
    labels
        .iter()
        .enumerate()
        .map(|(row, label)| {
            let mut fields = vec![label.to_string()];
            fields.extend(cells(row));
            fields.join("|") + "\n"
        })
        .collect()
}

/// Write [`format_matrix`] output to `path`.
pub fn write_matrix<P: AsRef<Path>>(
    path: P,
    matrix: &TrackedMatrix,
    labels: &[CurveKey],
) -> Result<(), ReportError> {
    let text = format_matrix(matrix, labels)?;
    write_text(path.as_ref(), &text)
}

/// Write [`format_integral_matrix`] output to `path`.
pub fn write_integral_matrix<P: AsRef<Path>>(
    path: P,
    matrix: &TrackedMatrix,
    integrals: &TrackedIntegrals,
    labels: &[CurveKey],
) -> Result<(), ReportError> {
    let text = format_integral_matrix(matrix, integrals, labels)?;
    write_text(path.as_ref(), &text)
}

fn write_text(path: &Path, text: &str) -> Result<(), ReportError> {
    create_parent(path)?;
    fs::write(path, text)?;
    Ok(())
}

fn create_parent(path: &Path) -> Result<(), ReportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

/// Number of peaks stored under every key, in archive order.
pub fn peak_counts(archive: &ArrayArchive) -> Vec<(String, usize)> {
    archive
        .iter()
        .map(|(key, array)| (key.to_string(), array.len()))
        .collect()
}

/// Write `key,peaks` rows for every key of `archive`.
pub fn write_peak_counts<P: AsRef<Path>>(path: P, archive: &ArrayArchive) -> Result<(), ReportError> {
    let path = path.as_ref();
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["key", "peaks"])?;
    for (key, count) in peak_counts(archive) {
        writer.write_record([key, count.to_string()])?;
    }
    writer.flush()?;
    Ok(())
}

/// Write one `key,bond,distance,intensity` row per labelled peak.
pub fn write_bond_labels<P: AsRef<Path>>(
    path: P,
    curves: &[(CurveKey, Vec<BondLabel>)],
) -> Result<(), ReportError> {
    let path = path.as_ref();
    create_parent(path)?;
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(["key", "bond", "distance", "intensity"])?;
    for (key, labels) in curves {
        for label in labels {
            writer.write_record([
                key.to_string(),
                label.bond.to_string(),
                format!("{:.4}", label.distance),
                format!("{:.6}", label.intensity),
            ])?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Round to one decimal place.
pub fn round_1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Rows of the integral-difference table: the reference row of zeros, then
/// each hotter curve's differences rounded to one decimal.
pub fn difference_rows(diffs: &IntegralDifferences) -> Vec<(CurveKey, Vec<f64>)> {
    let mut rows = vec![(diffs.reference_key, vec![0.0; diffs.reference_peaks.len()])];
    rows.extend(diffs.curves.iter().map(|(key, matches)| {
        (*key, matches.iter().map(|m| round_1(m.difference)).collect())
    }));
    rows
}

/// Write the integral-difference table as CSV.
///
/// Columns are `temperature,Peak 1,...,Peak n` where `n` is the number of
/// reference peaks. A curve with more or fewer matches than reference peaks
/// gets a row of a different length.
pub fn write_differences_table<P: AsRef<Path>>(
    path: P,
    diffs: &IntegralDifferences,
) -> Result<(), ReportError> {
    let path = path.as_ref();
    create_parent(path)?;
    let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;

    let mut header = vec!["temperature".to_string()];
    header.extend((1..=diffs.reference_peaks.len()).map(|i| format!("Peak {i}")));
    writer.write_record(&header)?;

    for (key, values) in difference_rows(diffs) {
        let mut record = vec![key.to_string()];
        record.extend(values.iter().map(|v| format!("{v:.1}")));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}
