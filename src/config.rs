//! TOML configuration for the analysis pipeline.
//!
//! Every stage receives the configuration explicitly; nothing is read from
//! hard-coded relative directories. All fields have defaults that match the
//! synthetic C-S-H heating experiment the pipeline was first built for, so an
//! empty file is a valid configuration:
//!
//! ```toml
//! # pdfpeak.toml
//! [paths]
//! log_file = "data/log.txt"
//! curve_dir = "data/gr_files"
//! archive_dir = "data"
//! output_dir = "output"
//! selection_file = "data/user_input.txt"
//!
//! [segments]
//! equilibrium_offset_secs = 120
//! recurrence = "reject"
//!
//! [tracking]
//! threshold = 20
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Errors that can occur while loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// I/O error reading the configuration file
    #[error("Failed to read config file {path}: {source}")]
    IoError {
        /// Path of the configuration file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// TOML syntax or type error
    #[error("Failed to parse TOML configuration: {0}")]
    ParseError(#[from] toml::de::Error),

    /// A value is syntactically valid but unusable
    #[error("Invalid configuration value for {field}: {reason}")]
    Invalid {
        /// Dotted name of the offending field
        field: &'static str,
        /// What is wrong with it
        reason: String,
    },
}

/// Root configuration structure for pdfpeak.toml files.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Input and output locations.
    pub paths: PathsConfig,
    /// Experiment log parsing.
    pub log: LogConfig,
    /// Dwell detection and equilibrium exclusion.
    pub segments: SegmentConfig,
    /// Curve file naming, rescaling and peak detection.
    pub curves: CurveConfig,
    /// Peak tracking.
    pub tracking: TrackingConfig,
    /// Peak integration.
    pub integration: IntegrationConfig,
}

/// Input and output locations.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Experiment log file.
    pub log_file: PathBuf,
    /// Directory holding the `.gr` curve files.
    pub curve_dir: PathBuf,
    /// Directory where peak and integral archives are written and read.
    pub archive_dir: PathBuf,
    /// Directory for matrices and tables.
    pub output_dir: PathBuf,
    /// Comma-separated list of curves to feed into the tracker.
    pub selection_file: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            log_file: PathBuf::from("data/log.txt"),
            curve_dir: PathBuf::from("data/gr_files"),
            archive_dir: PathBuf::from("data"),
            output_dir: PathBuf::from("output"),
            selection_file: PathBuf::from("data/user_input.txt"),
        }
    }
}

/// Experiment log parsing.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Substring identifying a measurement record line.
    pub record_marker: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            record_marker: "Synthetic_CSH_pdf".to_string(),
        }
    }
}

/// What to do when a dwell temperature recurs after the furnace has left it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePolicy {
    /// Merge every occurrence into one dwell group and log a warning.
    #[default]
    Warn,
    /// Abort the run.
    Reject,
}

/// Dwell detection and equilibrium exclusion.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// Offset from the start of a dwell at which the skip-boundary sample sits.
    pub equilibrium_offset_secs: i64,
    /// Handling of non-contiguous dwell groups.
    pub recurrence: RecurrencePolicy,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            equilibrium_offset_secs: 120,
            recurrence: RecurrencePolicy::Warn,
        }
    }
}

/// Curve file naming, rescaling and peak detection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CurveConfig {
    /// File name prefix of dwell curves.
    pub dwell_prefix: String,
    /// File name prefix of ramp curves.
    pub ramp_prefix: String,
    /// File name suffix shared by all curves.
    pub suffix: String,
    /// Curves whose nominal temperature is at or below this value are rescaled.
    pub rescale_max_temperature: i64,
    /// Intensity the rescaling window maximum is mapped to.
    pub rescale_target: f64,
    /// Half-open index window `[start, end)` searched for the rescaling maximum.
    pub rescale_window: [usize; 2],
    /// Inclusive index window `[start, end]` in which peaks are kept.
    pub peak_window: [usize; 2],
    /// Temperature of the first dwell plateau after the initial one.
    pub first_dwell_target: i64,
    /// Spacing between consecutive dwell plateaus.
    pub dwell_step: i64,
}

impl Default for CurveConfig {
    fn default() -> Self {
        Self {
            dwell_prefix: "Synthetic_CSH_".to_string(),
            ramp_prefix: "Synthetic_CSH_CSH_pdf_ramp_".to_string(),
            suffix: "_normalized.gr".to_string(),
            rescale_max_temperature: 100,
            rescale_target: 0.278468,
            rescale_window: [160, 170],
            peak_window: [81, 3001],
            first_dwell_target: 100,
            dwell_step: 100,
        }
    }
}

/// Peak tracking.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Largest positional drift, in index units, still treated as the same peak.
    pub threshold: i64,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self { threshold: 20 }
    }
}

/// Peak integration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IntegrationConfig {
    /// Dwell curves below this temperature are not integrated.
    pub min_temperature: i64,
    /// Reference peaks at or beyond this index are ignored.
    pub reference_window: usize,
    /// Largest index shift between a reference peak and its hotter counterpart.
    pub shift_tolerance: usize,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            min_temperature: 100,
            reference_window: 500,
            shift_tolerance: 15,
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with every path placed under `root`.
    pub fn rooted_at<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref();
        Self {
            paths: PathsConfig {
                log_file: root.join("log.txt"),
                curve_dir: root.join("gr_files"),
                archive_dir: root.to_path_buf(),
                output_dir: root.join("output"),
                selection_file: root.join("user_input.txt"),
            },
            ..Default::default()
        }
    }

    /// Check values that deserialize fine but would break a stage.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log.record_marker.is_empty() {
            return Err(ConfigError::Invalid {
                field: "log.record_marker",
                reason: "must not be empty".to_string(),
            });
        }
        if self.segments.equilibrium_offset_secs <= 0 {
            return Err(ConfigError::Invalid {
                field: "segments.equilibrium_offset_secs",
                reason: "must be positive".to_string(),
            });
        }
        if self.tracking.threshold <= 0 {
            return Err(ConfigError::Invalid {
                field: "tracking.threshold",
                reason: "must be positive".to_string(),
            });
        }
        let [start, end] = self.curves.rescale_window;
        if start >= end {
            return Err(ConfigError::Invalid {
                field: "curves.rescale_window",
                reason: format!("[{start}, {end}) is empty"),
            });
        }
        let [start, end] = self.curves.peak_window;
        if start > end {
            return Err(ConfigError::Invalid {
                field: "curves.peak_window",
                reason: format!("start {start} is past end {end}"),
            });
        }
        if self.curves.dwell_step <= 0 {
            return Err(ConfigError::Invalid {
                field: "curves.dwell_step",
                reason: "must be positive".to_string(),
            });
        }
        if !(self.curves.rescale_target.is_finite() && self.curves.rescale_target > 0.0) {
            return Err(ConfigError::Invalid {
                field: "curves.rescale_target",
                reason: "must be a positive number".to_string(),
            });
        }
        Ok(())
    }

    /// Archive holding ramp-curve peak positions.
    pub fn ramp_peaks_archive(&self) -> PathBuf {
        self.paths.archive_dir.join("pdf_ramp_peaks.pdfz")
    }

    /// Archive holding dwell-curve peak positions.
    pub fn dwell_peaks_archive(&self) -> PathBuf {
        self.paths.archive_dir.join("pdf_dwell_peaks.pdfz")
    }

    /// Archive holding dwell-curve integral differences.
    pub fn integral_differences_archive(&self) -> PathBuf {
        self.paths
            .archive_dir
            .join("pdf_dwell_integral_differences.pdfz")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = AnalysisConfig::from_str("").unwrap();
        assert_eq!(config.tracking.threshold, 20);
        assert_eq!(config.segments.equilibrium_offset_secs, 120);
        assert_eq!(config.segments.recurrence, RecurrencePolicy::Warn);
        assert_eq!(config.curves.peak_window, [81, 3001]);
        assert_eq!(config.curves.rescale_window, [160, 170]);
        assert_eq!(config.integration.shift_tolerance, 15);
        assert_eq!(config.paths.curve_dir, PathBuf::from("data/gr_files"));
    }

    #[test]
    fn test_partial_config() {
        let toml = r#"
            [paths]
            curve_dir = "/srv/beamline/gr"

            [segments]
            recurrence = "reject"

            [tracking]
            threshold = 12
        "#;

        let config = AnalysisConfig::from_str(toml).unwrap();
        assert_eq!(config.paths.curve_dir, PathBuf::from("/srv/beamline/gr"));
        assert_eq!(config.paths.log_file, PathBuf::from("data/log.txt"));
        assert_eq!(config.segments.recurrence, RecurrencePolicy::Reject);
        assert_eq!(config.tracking.threshold, 12);
        assert_eq!(config.curves.rescale_target, 0.278468);
    }

    #[test]
    fn test_invalid_threshold_rejected() {
        let err = AnalysisConfig::from_str("[tracking]\nthreshold = 0\n").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "tracking.threshold",
                ..
            }
        ));
    }

    #[test]
    fn test_empty_rescale_window_rejected() {
        let err = AnalysisConfig::from_str("[curves]\nrescale_window = [170, 170]\n").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn test_unknown_policy_is_parse_error() {
        let err = AnalysisConfig::from_str("[segments]\nrecurrence = \"ignore\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = AnalysisConfig::from_file("/nonexistent/pdfpeak.toml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError { .. }));
    }

    #[test]
    fn test_rooted_paths() {
        let config = AnalysisConfig::rooted_at("/tmp/run");
        assert_eq!(config.paths.log_file, PathBuf::from("/tmp/run/log.txt"));
        assert_eq!(
            config.dwell_peaks_archive(),
            PathBuf::from("/tmp/run/pdf_dwell_peaks.pdfz")
        );
    }
}
