//! Tracker input selection.
//!
//! The user picks which archived curves to feed into the tracker, and in which
//! order, with a comma-separated file:
//!
//! ```text
//! # experiment,key
//! dwell,30
//! ramp,100_00
//! ramp,100_01
//! dwell,100
//! ```
//!
//! Blank lines and `#` comments are ignored.

use crate::archive::{ArchiveError, ArrayArchive};
use crate::curve::{CurveKey, PeakList};
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Errors that can occur while reading or resolving a selection
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    /// The selection file could not be opened
    #[error("Failed to read selection file {path}: {source}")]
    IoError {
        /// Path of the selection file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// CSV syntax error
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),

    /// A record does not have both fields
    #[error("Line {line}: expected 'experiment,key'")]
    MissingField {
        /// 1-based line number
        line: u64,
    },

    /// First field is neither `ramp` nor `dwell`
    #[error("Line {line}: unknown experiment '{value}' (expected 'ramp' or 'dwell')")]
    UnknownExperiment {
        /// 1-based line number
        line: u64,
        /// Offending value
        value: String,
    },

    /// Second field is not a curve key of the named experiment
    #[error("Line {line}: '{value}' is not a valid {kind} key")]
    InvalidKey {
        /// 1-based line number
        line: u64,
        /// Experiment named on the line
        kind: ExperimentKind,
        /// Offending value
        value: String,
    },

    /// The file selected no curves
    #[error("Selection is empty")]
    Empty,

    /// A selected curve is not in its archive
    #[error("Archive error: {0}")]
    ArchiveError(#[from] ArchiveError),
}

/// Which archive a selected curve comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExperimentKind {
    /// Ramp peak archive.
    Ramp,
    /// Dwell peak archive.
    Dwell,
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentKind::Ramp => write!(f, "ramp"),
            ExperimentKind::Dwell => write!(f, "dwell"),
        }
    }
}

impl FromStr for ExperimentKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ramp" => Ok(ExperimentKind::Ramp),
            "dwell" => Ok(ExperimentKind::Dwell),
            _ => Err(()),
        }
    }
}

/// Ordered list of curves to track.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackingSelection {
    entries: Vec<(ExperimentKind, CurveKey)>,
}

impl TrackingSelection {
    /// Build a selection directly.
    pub fn new(entries: Vec<(ExperimentKind, CurveKey)>) -> Self {
        Self { entries }
    }

    /// Read a selection file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SelectionError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| SelectionError::IoError {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(file)
    }

    /// Parse a selection from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, SelectionError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .comment(Some(b'#'))
            .from_reader(reader);

        let mut entries = Vec::new();
        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map(|p| p.line()).unwrap_or_default();

            if record.iter().all(str::is_empty) {
                continue;
            }
            let (Some(experiment), Some(key)) = (record.get(0), record.get(1)) else {
                return Err(SelectionError::MissingField { line });
            };

            let kind: ExperimentKind =
                experiment
                    .parse()
                    .map_err(|_| SelectionError::UnknownExperiment {
                        line,
                        value: experiment.to_string(),
                    })?;
            let invalid_key = || SelectionError::InvalidKey {
                line,
                kind,
                value: key.to_string(),
            };
            let curve_key: CurveKey = key.parse().map_err(|_| invalid_key())?;
            if curve_key.is_dwell() != (kind == ExperimentKind::Dwell) {
                return Err(invalid_key());
            }

            entries.push((kind, curve_key));
        }

        Ok(Self { entries })
    }

    /// Selected curves in tracking order.
    pub fn entries(&self) -> &[(ExperimentKind, CurveKey)] {
        &self.entries
    }

    /// Number of selected curves.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up the peak list of every selected curve.
    pub fn resolve(
        &self,
        ramp_peaks: &ArrayArchive,
        dwell_peaks: &ArrayArchive,
    ) -> Result<Vec<(CurveKey, PeakList)>, SelectionError> {
        if self.entries.is_empty() {
            return Err(SelectionError::Empty);
        }

        self.entries
            .iter()
            .map(|(kind, key)| {
                let archive = match kind {
                    ExperimentKind::Ramp => ramp_peaks,
                    ExperimentKind::Dwell => dwell_peaks,
                };
                let peaks = archive.indices(&key.to_string())?;
                Ok((*key, PeakList::new(peaks.to_vec())))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archive::ArchiveArray;

    const SAMPLE: &str = "\
# experiment,key
dwell,30

 ramp , 100_00
ramp,100_01
Dwell,100
";

    fn archives() -> (ArrayArchive, ArrayArchive) {
        let mut ramp = ArrayArchive::new();
        ramp.insert("100_00", ArchiveArray::Indices(vec![160, 240]))
            .unwrap();
        ramp.insert("100_01", ArchiveArray::Indices(vec![158, 244, 300]))
            .unwrap();
        let mut dwell = ArrayArchive::new();
        dwell
            .insert("30", ArchiveArray::Indices(vec![164, 237]))
            .unwrap();
        dwell
            .insert("100", ArchiveArray::Indices(vec![157, 245, 302]))
            .unwrap();
        (ramp, dwell)
    }

    #[test]
    fn test_parse_selection() {
        let selection = TrackingSelection::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(
            selection.entries(),
            &[
                (ExperimentKind::Dwell, CurveKey::dwell(30)),
                (ExperimentKind::Ramp, CurveKey::ramp(100, 0)),
                (ExperimentKind::Ramp, CurveKey::ramp(100, 1)),
                (ExperimentKind::Dwell, CurveKey::dwell(100)),
            ]
        );
    }

    #[test]
    fn test_unknown_experiment() {
        let err = TrackingSelection::from_reader("dwell,30\ncool,20\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::UnknownExperiment { line: 2, ref value } if value == "cool"
        ));
    }

    #[test]
    fn test_key_must_match_experiment() {
        let err = TrackingSelection::from_reader("dwell,200_03\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidKey { kind: ExperimentKind::Dwell, .. }));

        let err = TrackingSelection::from_reader("ramp,200\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SelectionError::InvalidKey { .. }));
    }

    #[test]
    fn test_missing_field() {
        let err = TrackingSelection::from_reader("dwell\n".as_bytes()).unwrap_err();
        assert!(matches!(err, SelectionError::MissingField { line: 1 }));
    }

    #[test]
    fn test_resolve_in_file_order() {
        let (ramp, dwell) = archives();
        let selection = TrackingSelection::from_reader(SAMPLE.as_bytes()).unwrap();

        let rows = selection.resolve(&ramp, &dwell).unwrap();
        let keys: Vec<String> = rows.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, vec!["30", "100_00", "100_01", "100"]);
        assert_eq!(rows[2].1.as_slice(), &[158, 244, 300]);
    }

    #[test]
    fn test_resolve_missing_key() {
        let (ramp, dwell) = archives();
        let selection =
            TrackingSelection::new(vec![(ExperimentKind::Ramp, CurveKey::ramp(300, 0))]);

        let err = selection.resolve(&ramp, &dwell).unwrap_err();
        assert!(matches!(
            err,
            SelectionError::ArchiveError(ArchiveError::MissingKey(_))
        ));
    }

    #[test]
    fn test_resolve_empty() {
        let (ramp, dwell) = archives();
        let err = TrackingSelection::default()
            .resolve(&ramp, &dwell)
            .unwrap_err();
        assert!(matches!(err, SelectionError::Empty));
    }
}
