//! Sparse storage for tracked peak positions.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of one tracked peak.
///
/// Identifiers are handed out in creation order and never reused, so they stay
/// stable when columns are inserted in front of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PeakId(pub u32);

impl fmt::Display for PeakId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P{}", self.0)
    }
}

/// Content of one matrix cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    /// The peak was observed at this sample index.
    Present(usize),
    /// The peak was not observed in this curve.
    Absent,
}

impl Cell {
    /// Sample index, if present.
    pub fn index(self) -> Option<usize> {
        match self {
            Cell::Present(i) => Some(i),
            Cell::Absent => None,
        }
    }

    /// True for [`Cell::Present`].
    pub fn is_present(self) -> bool {
        matches!(self, Cell::Present(_))
    }
}

impl From<Option<usize>> for Cell {
    fn from(value: Option<usize>) -> Self {
        value.map_or(Cell::Absent, Cell::Present)
    }
}

/// Rows are curves in tracking order, columns are tracked peaks.
///
/// Only present cells are stored. Columns can be inserted anywhere but never
/// removed; a new column is absent in every existing row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrackedMatrix {
    row_count: usize,
    order: Vec<PeakId>,
    cells: BTreeMap<(usize, PeakId), usize>,
    next_id: u32,
}

impl TrackedMatrix {
    /// Empty matrix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a matrix from dense rows, `None` meaning absent.
    ///
    /// Rows shorter than the widest row are padded with absent cells.
    pub fn from_rows(rows: &[Vec<Option<usize>>]) -> Self {
        let mut matrix = Self::new();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        for _ in 0..width {
            matrix.insert_column(matrix.column_count());
        }
        for values in rows {
            let row = matrix.push_row();
            for (col, value) in values.iter().enumerate() {
                if let Some(index) = value {
                    matrix.set(row, col, *index);
                }
            }
        }
        matrix
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.order.len()
    }

    /// Column identities, left to right.
    pub fn column_ids(&self) -> &[PeakId] {
        &self.order
    }

    /// Current column position of `id`.
    pub fn column_of(&self, id: PeakId) -> Option<usize> {
        self.order.iter().position(|&c| c == id)
    }

    /// Append an all-absent row and return its index.
    pub fn push_row(&mut self) -> usize {
        self.row_count += 1;
        self.row_count - 1
    }

    /// Insert an all-absent column at position `at`, shifting later columns right.
    ///
    /// `at` is clamped to the column count.
    pub fn insert_column(&mut self, at: usize) -> PeakId {
        let id = PeakId(self.next_id);
        self.next_id += 1;
        let at = at.min(self.order.len());
        self.order.insert(at, id);
        id
    }

    /// Record `index` in row `row`, column position `col`.
    ///
    /// Writes outside the matrix are ignored.
    pub fn set(&mut self, row: usize, col: usize, index: usize) {
        if row >= self.row_count {
            return;
        }
        if let Some(&id) = self.order.get(col) {
            self.cells.insert((row, id), index);
        }
    }

    /// Cell at row `row`, column position `col`.
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        self.order
            .get(col)
            .map_or(Cell::Absent, |&id| self.cell_by_id(row, id))
    }

    /// Cell at row `row` for peak `id`.
    pub fn cell_by_id(&self, row: usize, id: PeakId) -> Cell {
        self.cells.get(&(row, id)).copied().into()
    }

    /// Most recent present value in column `col` strictly above `row`.
    pub fn last_seen(&self, row: usize, col: usize) -> Option<usize> {
        let id = *self.order.get(col)?;
        (0..row.min(self.row_count))
            .rev()
            .find_map(|r| self.cells.get(&(r, id)).copied())
    }

    /// One row, left to right.
    pub fn row(&self, row: usize) -> Vec<Cell> {
        (0..self.column_count()).map(|c| self.cell(row, c)).collect()
    }

    /// All rows, top to bottom.
    pub fn rows(&self) -> Vec<Vec<Cell>> {
        (0..self.row_count).map(|r| self.row(r)).collect()
    }

    /// Every present cell as `(row, id, index)`, ordered by row then id.
    pub fn present(&self) -> impl Iterator<Item = (usize, PeakId, usize)> + '_ {
        self.cells.iter().map(|(&(row, id), &index)| (row, id, index))
    }

    /// Number of present cells in row `row`.
    pub fn present_in_row(&self, row: usize) -> usize {
        self.cells.range((row, PeakId(0))..=(row, PeakId(u32::MAX))).count()
    }
}
