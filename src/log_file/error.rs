use std::path::PathBuf;

/// Errors that can occur while reading the experiment log
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    /// The log file could not be read
    #[error("Failed to read log file {path}: {source}")]
    IoError {
        /// Path of the log file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// A measurement record has no `HH:MM:SS` timestamp
    #[error("Line {line}: measurement record has no HH:MM:SS timestamp")]
    MissingTimestamp {
        /// 1-based line number
        line: usize,
    },

    /// A measurement record has no token two places after `T`
    #[error("Line {line}: measurement record has no temperature after the 'T' label")]
    MissingTemperature {
        /// 1-based line number
        line: usize,
    },

    /// The timestamp token is not a valid time of day
    #[error("Line {line}: invalid timestamp '{value}'")]
    InvalidTimestamp {
        /// 1-based line number
        line: usize,
        /// Offending token
        value: String,
    },

    /// The temperature token is not a number
    #[error("Line {line}: invalid temperature '{value}'")]
    InvalidTemperature {
        /// 1-based line number
        line: usize,
        /// Offending token
        value: String,
    },
}

impl LogError {
    /// True for errors caused by a malformed measurement record.
    pub fn is_parse_error(&self) -> bool {
        !matches!(self, LogError::IoError { .. })
    }

    /// Line number of the offending record, if any.
    pub fn line(&self) -> Option<usize> {
        match self {
            LogError::IoError { .. } => None,
            LogError::MissingTimestamp { line }
            | LogError::MissingTemperature { line }
            | LogError::InvalidTimestamp { line, .. }
            | LogError::InvalidTemperature { line, .. } => Some(*line),
        }
    }
}
