//! The row-by-row tracking state machine.

use super::{TrackedMatrix, TrackingError};
use log::{debug, warn};

/// Assigns the peaks of successive curves to persistent identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeakTracker {
    threshold: i64,
}

impl Default for PeakTracker {
    fn default() -> Self {
        Self::new(20)
    }
}

impl PeakTracker {
    /// Tracker tolerating `threshold` index units of drift between curves.
    pub fn new(threshold: i64) -> Self {
        Self { threshold }
    }

    /// Maximum tolerated drift.
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// Track every peak list in order, one matrix row per list.
    ///
    /// The first list seeds one column per peak. Each later list is merged by
    /// [`PeakTracker::track_row`].
    pub fn track<P: AsRef<[usize]>>(&self, rows: &[P]) -> Result<TrackedMatrix, TrackingError> {
        let (first, rest) = rows
            .split_first()
            .ok_or_else(|| TrackingError::inconsistency(0, "no peak lists to track"))?;

        let mut matrix = TrackedMatrix::new();
        self.seed(&mut matrix, first.as_ref())?;
        for peaks in rest {
            self.track_row(&mut matrix, peaks.as_ref())?;
        }
        Ok(matrix)
    }

    /// Seed an empty matrix with one column per peak.
    pub fn seed(&self, matrix: &mut TrackedMatrix, peaks: &[usize]) -> Result<(), TrackingError> {
        let row = matrix.push_row();
        if peaks.is_empty() {
            return Err(TrackingError::inconsistency(row, "first curve has no peaks"));
        }
        for &peak in peaks {
            let col = matrix.column_count();
            matrix.insert_column(col);
            matrix.set(row, col, peak);
        }
        debug!("Seeded {} tracked peaks", peaks.len());
        Ok(())
    }

    /// Append one row and assign `peaks` to existing or new columns.
    ///
    /// Two cursors walk the candidate peaks and the columns. A candidate
    /// within the threshold of a column's last known position joins it, unless
    /// the next column is strictly closer, in which case the current column is
    /// left absent. A column whose peak lies further than the threshold below
    /// the candidate is left absent. A candidate further than the threshold
    /// below the column opens a new column in front of it.
    pub fn track_row(&self, matrix: &mut TrackedMatrix, peaks: &[usize]) -> Result<(), TrackingError> {
        if matrix.column_count() == 0 {
            return Err(TrackingError::inconsistency(
                matrix.row_count(),
                "tracked matrix has no columns",
            ));
        }
        let row = matrix.push_row();
        let final_peak = *peaks
            .last()
            .ok_or_else(|| TrackingError::inconsistency(row, "curve has no peaks"))?;

        let mut p_ori = 0;
        let mut p_tracked = 0;
        while p_tracked < matrix.column_count() && p_ori < peaks.len() {
            let candidate = peaks[p_ori];
            let diff = self.diff(matrix, row, p_tracked, candidate)?;

            if diff.abs() <= self.threshold {
                let diff2 = if p_tracked + 1 < matrix.column_count() {
                    self.diff(matrix, row, p_tracked + 1, candidate)?
                } else {
                    diff
                };
                if diff2 < diff {
                    p_tracked += 1;
                } else {
                    matrix.set(row, p_tracked, candidate);
                    p_ori += 1;
                    p_tracked += 1;
                }
            } else if diff < -self.threshold {
                p_tracked += 1;
            } else {
                matrix.insert_column(p_tracked);
                matrix.set(row, p_tracked, candidate);
                p_ori += 1;
                p_tracked += 1;
            }
        }

        // The last detected peak of a curve always ends up in the matrix
        let tail = p_tracked
            .checked_sub(1)
            .map(|col| matrix.cell(row, col).index());
        if tail != Some(Some(final_peak)) {
            if p_ori + 1 < peaks.len() {
                warn!(
                    "Row {row}: peaks {:?} could not be matched to a tracked column",
                    &peaks[p_ori..peaks.len() - 1]
                );
            }
            matrix.insert_column(p_tracked);
            matrix.set(row, p_tracked, final_peak);
        }

        debug!(
            "Row {row}: {} of {} peaks placed, {} columns",
            matrix.present_in_row(row),
            peaks.len(),
            matrix.column_count()
        );
        Ok(())
    }

    /// Last known position of column `col` above `row`, minus `candidate`.
    fn diff(
        &self,
        matrix: &TrackedMatrix,
        row: usize,
        col: usize,
        candidate: usize,
    ) -> Result<i64, TrackingError> {
        let previous = matrix.last_seen(row, col).ok_or_else(|| {
            TrackingError::inconsistency(row, format!("column {col} has no earlier value"))
        })?;
        Ok(previous as i64 - candidate as i64)
    }
}
