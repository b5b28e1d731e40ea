/// Errors raised while classifying dwell segments
#[derive(Debug, thiserror::Error)]
pub enum SegmentError {
    /// No member of a dwell group sits exactly at the equilibrium offset
    #[error(
        "Dwell at {temperature} degC (first sample at {first_timestamp}s) has no sample \
         exactly {offset_secs}s after its start"
    )]
    MissingEquilibriumSample {
        /// Rounded dwell temperature
        temperature: i64,
        /// Timestamp of the first member of the group
        first_timestamp: u32,
        /// Required offset in seconds
        offset_secs: i64,
    },

    /// A dwell temperature was left and later revisited
    #[error("Dwell temperature {temperature} degC recurs after the furnace left it (sample {index})")]
    RecurringDwell {
        /// Rounded dwell temperature
        temperature: i64,
        /// Index of the first sample of the later occurrence
        index: usize,
    },
}
