//! # pdfpeak - Peak Tracking for In-Situ PDF Heating Experiments
//!
//! `pdfpeak` analyzes time- and temperature-resolved pair distribution function
//! (PDF) measurements recorded while a sample is heated in a furnace. It reads the
//! experiment log, reconstructs the temperature program, follows individual
//! G(r) peaks across curves recorded at increasing temperature, and integrates
//! their areas to expose coordination-number changes.
//!
//! ## Key Features
//!
//! - **Analyte Selection**: Dwell plateaus are detected from the log and the
//!   measurement taken at the two-minute equilibration mark of each plateau is
//!   excluded.
//!
//! - **Peak Tracking**: A cursor-driven state machine assigns every detected
//!   peak to a persistent identity, inserting new identities as peaks appear and
//!   marking them absent as they vanish.
//!
//! - **Peak Integration**: Trapezoid integrals between the flanking minima of
//!   each peak, normalized to a reference peak and differenced against the
//!   coolest dwell curve.
//!
//! - **Re-runnable Stages**: Peak positions and integral differences are
//!   persisted in small ZIP archives so that each stage can be repeated alone.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfpeak::config::AnalysisConfig;
//! use pdfpeak::pipeline;
//!
//! let config = AnalysisConfig::from_file("pdfpeak.toml")?;
//!
//! // Log -> analytes -> curves -> peak archives
//! let prepared = pipeline::prepare(&config)?;
//! println!("{} analyte measurements", prepared.analytes.analyte_count());
//!
//! // Selected peak lists -> tracked matrix
//! let tracked = pipeline::track(&config)?;
//! println!("{} tracked peaks", tracked.matrix.column_count());
//!
//! // Dwell curves -> scaled integral differences
//! let integrated = pipeline::integrate(&config)?;
//! println!("reference curve {}", integrated.differences.reference_key);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Tracking Without Files
//!
//! ```rust
//! use pdfpeak::tracking::{Cell, PeakTracker};
//!
//! let rows = vec![vec![164, 237, 362], vec![166, 240, 300, 365]];
//! let matrix = PeakTracker::new(20).track(&rows)?;
//!
//! assert_eq!(matrix.row_count(), 2);
//! assert_eq!(matrix.cell(1, 0), Cell::Present(166));
//! # Ok::<(), pdfpeak::tracking::TrackingError>(())
//! ```
//!
//! ## Architecture
//!
//! - [`config`]: explicit directories and tuning constants (TOML)
//! - [`log_file`]: experiment log parsing
//! - [`segments`]: dwell grouping and equilibrium exclusion
//! - [`curve`]: `.gr` curve loading, rescaling, peak detection, curve planning
//! - [`archive`]: persisted key to array archives
//! - [`selection`]: user-selected tracker input list
//! - [`tracking`]: the peak-tracking state machine
//! - [`integrals`]: peak integration, scaling and differences
//! - [`report`]: text and CSV sinks
//! - [`pipeline`]: stage orchestration

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]

pub mod archive;
pub mod config;
pub mod curve;
pub mod integrals;
pub mod log_file;
pub mod pipeline;
pub mod report;
pub mod segments;
pub mod selection;
pub mod tracking;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::archive::{ArchiveArray, ArchiveError, ArrayArchive};
    pub use crate::config::{AnalysisConfig, ConfigError};
    pub use crate::curve::{Curve, CurveError, CurveKey, CurveNaming, CurveStore, PeakList};
    pub use crate::integrals::{
        IntegralAnalyzer, IntegralDifferences, IntegralError, IntegralTable, PeakIntegral,
    };
    pub use crate::log_file::{ExperimentLog, LogError, Sample};
    pub use crate::pipeline::{PipelineError, Stage};
    pub use crate::segments::{AnalyteSelection, DwellGroup, SegmentError};
    pub use crate::selection::{ExperimentKind, TrackingSelection};
    pub use crate::tracking::{Cell, PeakId, PeakTracker, TrackedMatrix, TrackingError};
}
