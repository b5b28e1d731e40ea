use crate::curve::CurveError;

/// Errors that can occur while integrating peaks
#[derive(Debug, thiserror::Error)]
pub enum IntegralError {
    /// No curve qualified for integration
    #[error("No curves to integrate")]
    EmptyTable,

    /// A curve's first peak integral cannot serve as a scale reference
    #[error("Curve {key} has no usable first peak integral for scaling")]
    DegenerateReference {
        /// Curve key
        key: String,
    },

    /// A peak index lies outside its curve
    #[error("Peak at index {position} is outside a curve of {len} samples")]
    PeakOutOfRange {
        /// Peak index
        position: usize,
        /// Curve length
        len: usize,
    },

    /// Fewer curves than tracked rows
    #[error("Tracked matrix has {rows} rows but {curves} curves were supplied")]
    RowMismatch {
        /// Rows in the tracked matrix
        rows: usize,
        /// Curves supplied
        curves: usize,
    },

    /// Loading a curve failed
    #[error("Curve error: {0}")]
    CurveError(#[from] CurveError),
}
