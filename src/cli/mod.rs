use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use pdfpeak::config::AnalysisConfig;
use std::path::{Path, PathBuf};

mod info;
mod summary;

/// Configuration file picked up from the working directory when `--config`
/// is not given.
const DEFAULT_CONFIG_FILE: &str = "pdfpeak.toml";

/// pdfpeak - Peak tracking for in-situ PDF heating experiments
#[derive(Parser)]
#[command(name = "pdfpeak")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Read the log, detect peaks in every curve and write the peak archives
    Prepare,

    /// Track the peaks of the curves listed in the selection file
    Track,

    /// Integrate dwell curves and write the integral differences
    Integrate,

    /// Run prepare, track and integrate in order
    Run,

    /// Display the contents of a peak or integral archive
    Info {
        /// Archive file path
        #[arg(value_name = "ARCHIVE")]
        file: PathBuf,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }

    pub fn execute(self) -> Result<()> {
        let command = match self.command {
            Commands::Info { file } => return info::run(&file),
            other => other,
        };

        let config = load_config(self.config.as_deref())?;
        match command {
            Commands::Prepare => {
                let prepared = pdfpeak::pipeline::prepare(&config).context("Preparation failed")?;
                summary::print_prepared(&prepared);
            }
            Commands::Track => {
                let tracked = pdfpeak::pipeline::track(&config).context("Tracking failed")?;
                summary::print_tracked(&tracked);
            }
            Commands::Integrate => {
                let integrated =
                    pdfpeak::pipeline::integrate(&config).context("Integration failed")?;
                summary::print_integrated(&integrated);
            }
            Commands::Run => {
                let completed = pdfpeak::pipeline::run_all(&config).context("Analysis failed")?;
                summary::print_prepared(&completed.prepared);
                summary::print_tracked(&completed.tracked);
                summary::print_integrated(&completed.integrated);
            }
            Commands::Info { .. } => {}
        }
        Ok(())
    }
}

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
            info!("Using {DEFAULT_CONFIG_FILE} from the working directory");
            AnalysisConfig::from_file(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("Failed to load config {DEFAULT_CONFIG_FILE}"))
        }
        None => {
            info!("No config file given, using defaults");
            Ok(AnalysisConfig::default())
        }
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}
