use std::path::PathBuf;

/// Errors that can occur while loading or processing curves
#[derive(Debug, thiserror::Error)]
pub enum CurveError {
    /// The curve file could not be read
    #[error("Failed to read curve file {path}: {source}")]
    IoError {
        /// Path of the curve file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// The curve file for a key does not exist
    #[error("Curve file not found: {path}")]
    NotFound {
        /// Path that was constructed for the key
        path: PathBuf,
    },

    /// Malformed curve data
    #[error("Invalid curve format: {0}")]
    Format(String),

    /// Rescaling is not possible for this curve
    #[error("Cannot rescale curve: {0}")]
    Rescale(String),

    /// A curve key string could not be parsed
    #[error("Invalid curve key '{0}'")]
    InvalidKey(String),
}
