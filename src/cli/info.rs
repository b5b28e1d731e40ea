use anyhow::{Context, Result};
use pdfpeak::archive::ArrayArchive;
use std::path::Path;

/// Display the keys of a peak or integral archive
pub fn run(file: &Path) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let archive = ArrayArchive::load(file).context("Failed to read archive")?;

    println!("pdfpeak Archive Information");
    println!("===========================");
    println!("File: {}", file.display());
    if let Some(created) = archive.created() {
        println!("Created: {}", created.format("%Y-%m-%d %H:%M:%S UTC"));
    }
    println!("Keys: {}", archive.len());
    println!();

    for (i, (key, array)) in archive.iter().enumerate() {
        println!("  {:3}. {:<10} {:<8} {:>6}", i + 1, key, array.kind(), array.len());
    }

    Ok(())
}
