//! # Experiment Log Interpreter
//!
//! The beamline writes one line per PDF measurement into a plain-text log. A
//! measurement line carries the dataset name (which contains the record
//! marker), a wall-clock `HH:MM:SS` stamp, and the furnace temperature two
//! whitespace tokens after a bare `T` label:
//!
//! ```text
//! 04:54:29 collect Synthetic_CSH_pdf_0001 T = 25.3 C
//! ```
//!
//! Lines without the marker are ignored. Timestamps are converted to seconds
//! since midnight; there is no day rollover handling, so logs spanning
//! midnight produce non-monotonic timestamps.

mod error;

#[cfg(test)]
mod tests;

pub use error::LogError;

use chrono::{NaiveTime, Timelike};
use log::{debug, info};
use std::path::Path;

/// One measurement record from the log.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    /// Seconds since midnight.
    pub timestamp: u32,
    /// Furnace temperature as logged.
    pub temperature: f64,
}

impl Sample {
    /// Temperature rounded to the nearest ten.
    pub fn rounded_temperature(&self) -> i64 {
        round_to_tens(self.temperature)
    }
}

/// Time series of measurement records in log order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExperimentLog {
    samples: Vec<Sample>,
}

impl ExperimentLog {
    /// Wrap samples that are already in chronological order.
    pub fn from_samples(samples: Vec<Sample>) -> Self {
        Self { samples }
    }

    /// All samples in log order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Number of measurement records.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when the log held no measurement records.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Timestamps in log order.
    pub fn timestamps(&self) -> Vec<u32> {
        self.samples.iter().map(|s| s.timestamp).collect()
    }

    /// Raw temperatures in log order.
    pub fn temperatures(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.temperature).collect()
    }

    /// Temperatures rounded to the nearest ten, in log order.
    pub fn rounded_temperatures(&self) -> Vec<i64> {
        self.samples.iter().map(Sample::rounded_temperature).collect()
    }
}

/// Read and parse an experiment log file.
pub fn read_log<P: AsRef<Path>>(path: P, record_marker: &str) -> Result<ExperimentLog, LogError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| LogError::IoError {
        path: path.to_path_buf(),
        source,
    })?;

    let log = parse_log(&content, record_marker)?;
    info!(
        "Read {} measurement records from {}",
        log.len(),
        path.display()
    );
    Ok(log)
}

/// Parse log text, keeping only lines that contain `record_marker`.
pub fn parse_log(content: &str, record_marker: &str) -> Result<ExperimentLog, LogError> {
    let mut samples = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        if !is_record_line(line, record_marker) {
            continue;
        }
        let line_number = idx + 1;

        let time = extract_time(line).ok_or(LogError::MissingTimestamp { line: line_number })?;
        let timestamp = time_hms_to_seconds(time).map_err(|_| LogError::InvalidTimestamp {
            line: line_number,
            value: time.to_string(),
        })?;

        let token = extract_temperature(line)
            .ok_or(LogError::MissingTemperature { line: line_number })?;
        let temperature = token
            .parse::<f64>()
            .ok()
            .filter(|t| t.is_finite())
            .ok_or_else(|| LogError::InvalidTemperature {
                line: line_number,
                value: token.to_string(),
            })?;

        debug!("line {line_number}: t={timestamp}s T={temperature}");
        samples.push(Sample {
            timestamp,
            temperature,
        });
    }

    Ok(ExperimentLog { samples })
}

/// A record line contains the marker followed by at least one more character.
pub fn is_record_line(line: &str, record_marker: &str) -> bool {
    line.find(record_marker)
        .map(|pos| line.len() > pos + record_marker.len())
        .unwrap_or(false)
}

/// Find the first `HH:MM:SS` token bounded by non-word characters.
pub fn extract_time(line: &str) -> Option<&str> {
    const LEN: usize = 8;
    let bytes = line.as_bytes();
    if bytes.len() < LEN {
        return None;
    }

    (0..=bytes.len() - LEN)
        .find(|&start| {
            let window = &bytes[start..start + LEN];
            let shape_ok = window.iter().enumerate().all(|(i, b)| match i {
                2 | 5 => *b == b':',
                _ => b.is_ascii_digit(),
            });
            let left_ok = start == 0 || !is_word_byte(bytes[start - 1]);
            let right_ok = start + LEN == bytes.len() || !is_word_byte(bytes[start + LEN]);
            shape_ok && left_ok && right_ok
        })
        .map(|start| &line[start..start + LEN])
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || !b.is_ascii()
}

/// The whitespace token two positions after a literal `T` token.
pub fn extract_temperature(line: &str) -> Option<&str> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    let label = tokens.iter().position(|t| *t == "T")?;
    tokens.get(label + 2).copied()
}

/// Convert `H:M:S` to seconds since midnight.
pub fn time_hms_to_seconds(time: &str) -> Result<u32, chrono::ParseError> {
    let parsed = NaiveTime::parse_from_str(time, "%H:%M:%S")?;
    Ok(parsed.num_seconds_from_midnight())
}

/// Round to the nearest multiple of ten, ties away from zero (`134 -> 130`, `78 -> 80`).
pub fn round_to_tens(value: f64) -> i64 {
    ((value / 10.0).round() * 10.0) as i64
}
