use super::ArrayKind;

/// Errors that can occur while reading or writing archives
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Not a pdfpeak archive, or a damaged one
    #[error("Invalid archive format: {0}")]
    InvalidFormat(String),

    /// Key cannot be stored as an archive entry
    #[error("Invalid archive key '{0}'")]
    InvalidKey(String),

    /// Requested key is not in the archive
    #[error("Key not found in archive: {0}")]
    MissingKey(String),

    /// The array under a key has a different kind than requested
    #[error("Array '{key}' holds {found}, expected {expected}")]
    KindMismatch {
        /// Requested key
        key: String,
        /// Kind the caller asked for
        expected: ArrayKind,
        /// Kind actually stored
        found: ArrayKind,
    },
}
