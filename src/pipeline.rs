//! # Pipeline
//!
//! Wires the modules into the three re-runnable stages of an analysis:
//!
//! 1. [`prepare`]: log, analytes, curve plan, peak detection, peak archives
//! 2. [`track`]: selection file, tracked matrix, tracked integrals
//! 3. [`integrate`]: dwell peak archive, scaled integral differences
//!
//! Each stage reads what the previous one persisted, so a stage can be
//! repeated after editing the selection file or the configuration. Every
//! failure is reported as a [`PipelineError`] naming the [`Stage`] it came
//! from.

use crate::archive::{ArchiveArray, ArchiveError, ArrayArchive};
use crate::config::AnalysisConfig;
use crate::curve::{
    label_bonds, plan_curves, BondLabel, CurveError, CurveKey, CurvePlan, CurveStore, PeakList,
};
use crate::integrals::{
    integrate_tracked, IntegralAnalyzer, IntegralDifferences, IntegralError, IntegralTable,
    TrackedIntegrals,
};
use crate::log_file::{read_log, ExperimentLog, LogError};
use crate::report::{self, ReportError};
use crate::segments::{select_analytes, AnalyteSelection, SegmentError};
use crate::selection::{SelectionError, TrackingSelection};
use crate::tracking::{PeakTracker, TrackedMatrix, TrackingError};
use log::{info, warn};
use std::fmt;
use std::path::PathBuf;

/// Tracked matrix written by [`track`].
pub const TRACKED_MATRIX_FILE: &str = "tracked_peaks_matrix.txt";
/// Tracked integrals written by [`track`].
pub const TRACKED_INTEGRALS_FILE: &str = "tracked_peak_integrals.txt";
/// Ramp peak counts written by [`prepare`].
pub const RAMP_COUNTS_FILE: &str = "ramp_peak_counts.csv";
/// Dwell peak counts written by [`prepare`].
pub const DWELL_COUNTS_FILE: &str = "dwell_peak_counts.csv";
/// Bond labels of the dwell curves written by [`prepare`].
pub const BOND_LABELS_FILE: &str = "bond_labels.csv";
/// Integral difference table written by [`integrate`].
pub const DIFFERENCES_TABLE_FILE: &str = "integral_differences.csv";

/// Step of the pipeline an error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Reading the experiment log.
    ReadLog,
    /// Dwell grouping and equilibrium exclusion.
    SelectAnalytes,
    /// Loading `.gr` curves.
    LoadCurves,
    /// Writing a peak or integral archive.
    WriteArchive,
    /// Reading the selection file and the archives it refers to.
    ReadSelection,
    /// Running the peak tracker.
    Track,
    /// Integrating peaks.
    Integrate,
    /// Writing matrices and tables.
    WriteReport,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::ReadLog => "read log",
            Stage::SelectAnalytes => "select analytes",
            Stage::LoadCurves => "load curves",
            Stage::WriteArchive => "write archive",
            Stage::ReadSelection => "read selection",
            Stage::Track => "track peaks",
            Stage::Integrate => "integrate peaks",
            Stage::WriteReport => "write report",
        };
        f.write_str(name)
    }
}

/// Error raised inside a stage.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// Log error
    #[error(transparent)]
    Log(#[from] LogError),

    /// Segment error
    #[error(transparent)]
    Segment(#[from] SegmentError),

    /// Curve error
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Archive error
    #[error(transparent)]
    Archive(#[from] ArchiveError),

    /// Selection error
    #[error(transparent)]
    Selection(#[from] SelectionError),

    /// Tracking error
    #[error(transparent)]
    Tracking(#[from] TrackingError),

    /// Integration error
    #[error(transparent)]
    Integral(#[from] IntegralError),

    /// Report error
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// A stage failed.
#[derive(Debug, thiserror::Error)]
#[error("Stage '{stage}' failed: {source}")]
pub struct PipelineError {
    /// Failing stage.
    pub stage: Stage,
    /// Underlying error.
    #[source]
    pub source: StageError,
}

trait AtStage<T> {
    fn at(self, stage: Stage) -> Result<T, PipelineError>;
}

impl<T, E: Into<StageError>> AtStage<T> for Result<T, E> {
    fn at(self, stage: Stage) -> Result<T, PipelineError> {
        self.map_err(|e| PipelineError {
            stage,
            source: e.into(),
        })
    }
}

/// Output of [`prepare`].
#[derive(Debug, Clone)]
pub struct Prepared {
    /// Every measurement in the log.
    pub log: ExperimentLog,
    /// Measurements kept after equilibrium exclusion.
    pub analytes: AnalyteSelection,
    /// Curves derived from the heating program.
    pub plan: CurvePlan,
    /// Peak positions of every ramp curve.
    pub ramp_peaks: ArrayArchive,
    /// Peak positions of every dwell curve.
    pub dwell_peaks: ArrayArchive,
    /// Short-range peaks of every dwell curve matched to known bonds.
    pub bond_labels: Vec<(CurveKey, Vec<BondLabel>)>,
}

/// Output of [`track`].
#[derive(Debug, Clone)]
pub struct Tracked {
    /// Selected curves, one per matrix row.
    pub keys: Vec<CurveKey>,
    /// Tracked peak positions.
    pub matrix: TrackedMatrix,
    /// Integral of every tracked peak.
    pub integrals: TrackedIntegrals,
}

/// Output of [`integrate`].
#[derive(Debug, Clone)]
pub struct Integrated {
    /// Scaled integrals of every qualifying dwell curve.
    pub scaled: IntegralTable,
    /// Differences against the reference curve.
    pub differences: IntegralDifferences,
    /// Archive written to [`AnalysisConfig::integral_differences_archive`].
    pub archive: ArrayArchive,
}

/// Output of [`run_all`].
#[derive(Debug, Clone)]
pub struct Completed {
    /// Preparation results.
    pub prepared: Prepared,
    /// Tracking results.
    pub tracked: Tracked,
    /// Integration results.
    pub integrated: Integrated,
}

fn output_path(config: &AnalysisConfig, name: &str) -> PathBuf {
    config.paths.output_dir.join(name)
}

/// Read the log, select analytes, detect peaks in every planned curve and
/// persist the ramp and dwell peak archives.
pub fn prepare(config: &AnalysisConfig) -> Result<Prepared, PipelineError> {
    info!("Preparing peaks from {}", config.paths.log_file.display());

    let log = read_log(&config.paths.log_file, &config.log.record_marker).at(Stage::ReadLog)?;
    let analytes = select_analytes(&log, &config.segments).at(Stage::SelectAnalytes)?;

    let plan = plan_curves(
        &log.rounded_temperatures(),
        config.curves.first_dwell_target,
        config.curves.dwell_step,
    );
    if plan.is_empty() {
        warn!("Log contains no measurements; no curves to load");
    }
    info!(
        "Curve plan: {} ramp and {} dwell curves",
        plan.ramps.len(),
        plan.dwells.len()
    );

    let store = CurveStore::new(&config.paths.curve_dir, &config.curves);
    let (ramp_peaks, _) = detect_peaks(&store, &plan.ramps)?;
    let (dwell_peaks, bond_labels) = detect_peaks(&store, &plan.dwells)?;

    ramp_peaks
        .save(config.ramp_peaks_archive())
        .at(Stage::WriteArchive)?;
    dwell_peaks
        .save(config.dwell_peaks_archive())
        .at(Stage::WriteArchive)?;

    report::write_peak_counts(output_path(config, RAMP_COUNTS_FILE), &ramp_peaks)
        .at(Stage::WriteReport)?;
    report::write_peak_counts(output_path(config, DWELL_COUNTS_FILE), &dwell_peaks)
        .at(Stage::WriteReport)?;
    report::write_bond_labels(output_path(config, BOND_LABELS_FILE), &bond_labels)
        .at(Stage::WriteReport)?;

    info!(
        "Prepared {} analytes, {} peak lists",
        analytes.analyte_count(),
        ramp_peaks.len() + dwell_peaks.len()
    );

    Ok(Prepared {
        log,
        analytes,
        plan,
        ramp_peaks,
        dwell_peaks,
        bond_labels,
    })
}

type LabelledCurves = Vec<(CurveKey, Vec<BondLabel>)>;

fn detect_peaks(
    store: &CurveStore,
    keys: &[CurveKey],
) -> Result<(ArrayArchive, LabelledCurves), PipelineError> {
    let mut archive = ArrayArchive::new();
    let mut labels = Vec::with_capacity(keys.len());
    for key in keys {
        let (curve, peaks) = store.load_peaks(key).at(Stage::LoadCurves)?;
        labels.push((*key, label_bonds(&curve, &peaks)));
        archive
            .insert(key.to_string(), ArchiveArray::Indices(peaks.into_inner()))
            .at(Stage::WriteArchive)?;
    }
    Ok((archive, labels))
}

/// Track the peaks of the curves listed in the selection file.
pub fn track(config: &AnalysisConfig) -> Result<Tracked, PipelineError> {
    info!(
        "Tracking peaks listed in {}",
        config.paths.selection_file.display()
    );

    let selection =
        TrackingSelection::from_file(&config.paths.selection_file).at(Stage::ReadSelection)?;
    let ramp_peaks = ArrayArchive::load(config.ramp_peaks_archive()).at(Stage::ReadSelection)?;
    let dwell_peaks = ArrayArchive::load(config.dwell_peaks_archive()).at(Stage::ReadSelection)?;
    let rows = selection
        .resolve(&ramp_peaks, &dwell_peaks)
        .at(Stage::ReadSelection)?;

    let (keys, peak_lists): (Vec<CurveKey>, Vec<PeakList>) = rows.into_iter().unzip();
    let matrix = PeakTracker::new(config.tracking.threshold)
        .track(&peak_lists)
        .at(Stage::Track)?;
    info!(
        "Tracked {} curves into {} peak columns",
        matrix.row_count(),
        matrix.column_count()
    );
    report::write_matrix(output_path(config, TRACKED_MATRIX_FILE), &matrix, &keys)
        .at(Stage::WriteReport)?;

    let store = CurveStore::new(&config.paths.curve_dir, &config.curves);
    let curves = keys
        .iter()
        .map(|key| store.load(key))
        .collect::<Result<Vec<_>, _>>()
        .at(Stage::LoadCurves)?;
    let integrals = integrate_tracked(&matrix, &curves).at(Stage::Integrate)?;
    report::write_integral_matrix(
        output_path(config, TRACKED_INTEGRALS_FILE),
        &matrix,
        &integrals,
        &keys,
    )
    .at(Stage::WriteReport)?;

    Ok(Tracked {
        keys,
        matrix,
        integrals,
    })
}

/// Integrate the dwell curves and persist their differences against the
/// reference curve.
pub fn integrate(config: &AnalysisConfig) -> Result<Integrated, PipelineError> {
    let archive_path = config.dwell_peaks_archive();
    info!("Integrating dwell peaks from {}", archive_path.display());

    let dwell_archive = ArrayArchive::load(&archive_path).at(Stage::Integrate)?;
    let dwell_peaks = dwell_archive
        .iter()
        .map(|(key, _)| {
            let curve_key: CurveKey = key.parse()?;
            let peaks = dwell_archive.indices(key)?;
            Ok((curve_key, PeakList::new(peaks.to_vec())))
        })
        .collect::<Result<Vec<_>, StageError>>()
        .at(Stage::Integrate)?;

    let store = CurveStore::new(&config.paths.curve_dir, &config.curves);
    let analysis = IntegralAnalyzer::new(&config.integration)
        .analyze(&store, &dwell_peaks)
        .at(Stage::Integrate)?;

    let mut archive = ArrayArchive::new();
    for (key, values) in report::difference_rows(&analysis.differences) {
        archive
            .insert(key.to_string(), ArchiveArray::Values(values))
            .at(Stage::WriteArchive)?;
    }
    archive
        .save(config.integral_differences_archive())
        .at(Stage::WriteArchive)?;

    report::write_differences_table(
        output_path(config, DIFFERENCES_TABLE_FILE),
        &analysis.differences,
    )
    .at(Stage::WriteReport)?;

    Ok(Integrated {
        scaled: analysis.scaled,
        differences: analysis.differences,
        archive,
    })
}

/// Run [`prepare`], [`track`] and [`integrate`] in order.
pub fn run_all(config: &AnalysisConfig) -> Result<Completed, PipelineError> {
    let prepared = prepare(config)?;
    let tracked = track(config)?;
    let integrated = integrate(config)?;
    Ok(Completed {
        prepared,
        tracked,
        integrated,
    })
}
