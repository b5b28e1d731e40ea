/// Errors raised by the peak tracker
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    /// The tracked matrix reached a state the algorithm cannot continue from
    #[error("Tracking inconsistency at row {row}: {reason}")]
    Inconsistency {
        /// Row being tracked when the problem was found
        row: usize,
        /// What went wrong
        reason: String,
    },
}

impl TrackingError {
    pub(crate) fn inconsistency(row: usize, reason: impl Into<String>) -> Self {
        TrackingError::Inconsistency {
            row,
            reason: reason.into(),
        }
    }
}
