//! # Curve Store
//!
//! Loads G(r) curves from `.gr` files, applies the low-temperature intensity
//! rescaling, and detects peaks.
//!
//! A `.gr` file has a free-form header terminated by a `#### start data` line,
//! two column-header lines, and then whitespace-delimited rows:
//!
//! ```text
//! [DEFAULT]
//! version = ...
//! #### start data
//! #S 1 - PDF from PDFgetX3
//! #L r($\AA$)  G($\AA^{-2}$)
//! 0.01 0.0123
//! 0.02 0.0260
//! ```
//!
//! Curves whose nominal temperature is at or below
//! `rescale_max_temperature` are rescaled so that the maximum intensity in the
//! calibration window equals `rescale_target`.

mod bonds;
mod error;
mod key;
mod peaks;
mod plan;
mod reader;


pub use bonds::{label_bonds, BondLabel, KNOWN_BONDS, MAX_LABEL_DISTANCE};
pub use error::CurveError;
pub use key::{CurveKey, CurveNaming};
pub use peaks::{locate_peaks, PeakList};
pub use plan::{plan_curves, CurvePlan};
pub use reader::{parse_curve, rescale_intensity, START_DATA_MARKER};

use crate::config::CurveConfig;
use log::debug;
use std::path::{Path, PathBuf};

/// One measured G(r) curve.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Identity of the measurement.
    pub key: CurveKey,
    /// Strictly increasing radial distances.
    pub radial_distance: Vec<f64>,
    /// G(r) at each radial distance.
    pub intensity: Vec<f64>,
}

impl Curve {
    /// Number of samples.
    pub fn len(&self) -> usize {
        self.intensity.len()
    }

    /// True for a curve without data rows.
    pub fn is_empty(&self) -> bool {
        self.intensity.is_empty()
    }
}

/// Loads curves from a directory of `.gr` files.
#[derive(Debug, Clone)]
pub struct CurveStore {
    dir: PathBuf,
    naming: CurveNaming,
    config: CurveConfig,
}

impl CurveStore {
    /// Create a store reading from `dir`.
    pub fn new<P: AsRef<Path>>(dir: P, config: &CurveConfig) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            naming: CurveNaming::from(config),
            config: config.clone(),
        }
    }

    /// Directory the store reads from.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File naming in use.
    pub fn naming(&self) -> &CurveNaming {
        &self.naming
    }

    /// Path of the file holding `key`.
    pub fn path_for(&self, key: &CurveKey) -> PathBuf {
        self.dir.join(self.naming.file_name(key))
    }

    /// True when `key` is measured cold enough to need rescaling.
    pub fn needs_rescale(&self, key: &CurveKey) -> bool {
        key.nominal_temperature() <= self.config.rescale_max_temperature
    }

    /// Read, parse and (when required) rescale the curve for `key`.
    pub fn load(&self, key: &CurveKey) -> Result<Curve, CurveError> {
        let path = self.path_for(key);
        if !path.exists() {
            return Err(CurveError::NotFound { path });
        }

        let content = std::fs::read_to_string(&path).map_err(|source| CurveError::IoError {
            path: path.clone(),
            source,
        })?;
        let (radial_distance, mut intensity) = parse_curve(&content).map_err(|e| match e {
            CurveError::Format(reason) => {
                CurveError::Format(format!("{}: {reason}", path.display()))
            }
            other => other,
        })?;

        if self.needs_rescale(key) {
            let factor = rescale_intensity(
                &mut intensity,
                self.config.rescale_window,
                self.config.rescale_target,
            )?;
            debug!("Rescaled curve {key} by {factor:.6}");
        }

        debug!("Loaded curve {key}: {} samples", intensity.len());
        Ok(Curve {
            key: *key,
            radial_distance,
            intensity,
        })
    }

    /// Peaks of `curve` inside the configured index window.
    pub fn peaks(&self, curve: &Curve) -> PeakList {
        locate_peaks(&curve.intensity, self.config.peak_window)
    }

    /// Load `key` and detect its peaks.
    pub fn load_peaks(&self, key: &CurveKey) -> Result<(Curve, PeakList), CurveError> {
        let curve = self.load(key)?;
        let peaks = self.peaks(&curve);
        debug!("Curve {key}: {} peaks", peaks.len());
        Ok((curve, peaks))
    }
}
