//! # pdfpeak
//!
//! Command-line front end for the in-situ PDF heating analysis.
//!
//! ## Usage
//!
//! ```bash
//! # Detect peaks in every curve of the experiment and write the peak archives
//! pdfpeak -v --config pdfpeak.toml prepare
//!
//! # Track the curves listed in the selection file
//! pdfpeak track
//!
//! # Integrate dwell curves against the coolest one
//! pdfpeak integrate
//!
//! # Inspect an archive
//! pdfpeak info data/pdf_dwell_peaks.pdfz
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

use cli::Cli;

fn main() -> Result<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbosity());
    cli.execute()
}
