//! `.gr` text parsing and intensity rescaling.

use super::CurveError;

/// Line marking the end of the free-form header.
pub const START_DATA_MARKER: &str = "#### start data";

/// Column header lines between the marker and the first data row.
const HEADER_LINES_AFTER_MARKER: usize = 2;

/// Parse `.gr` text into radial distance and intensity columns.
///
/// Rows are whitespace delimited; only the first two columns are read and
/// blank lines are skipped. Radial distance must be strictly increasing.
pub fn parse_curve(content: &str) -> Result<(Vec<f64>, Vec<f64>), CurveError> {
    let lines: Vec<&str> = content.lines().collect();
    let marker = lines
        .iter()
        .position(|line| line.contains(START_DATA_MARKER))
        .ok_or_else(|| CurveError::Format(format!("missing '{START_DATA_MARKER}' line")))?;

    let first_row = marker + 1 + HEADER_LINES_AFTER_MARKER;
    let mut radial_distance = Vec::new();
    let mut intensity = Vec::new();

    for (idx, line) in lines.iter().enumerate().skip(first_row) {
        let mut fields = line.split_whitespace();
        let Some(first) = fields.next() else {
            continue;
        };
        let line_number = idx + 1;
        let second = fields.next().ok_or_else(|| {
            CurveError::Format(format!("line {line_number}: expected at least two columns"))
        })?;

        let r = parse_field(first, line_number)?;
        let g = parse_field(second, line_number)?;

        if let Some(&previous) = radial_distance.last() {
            if r <= previous {
                return Err(CurveError::Format(format!(
                    "line {line_number}: radial distance {r} does not increase (previous {previous})"
                )));
            }
        }

        radial_distance.push(r);
        intensity.push(g);
    }

    Ok((radial_distance, intensity))
}

fn parse_field(token: &str, line_number: usize) -> Result<f64, CurveError> {
    token.parse().map_err(|_| {
        CurveError::Format(format!("line {line_number}: '{token}' is not a number"))
    })
}

/// Scale `intensity` so the maximum within `window` (half-open) equals `target`.
///
/// Returns the factor that was applied.
pub fn rescale_intensity(
    intensity: &mut [f64],
    window: [usize; 2],
    target: f64,
) -> Result<f64, CurveError> {
    let [start, end] = window;
    let slice = intensity.get(start..end).ok_or_else(|| {
        CurveError::Rescale(format!(
            "window [{start}, {end}) exceeds curve length {}",
            intensity.len()
        ))
    })?;

    let max = slice.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if max.is_nan() || max <= 0.0 {
        return Err(CurveError::Rescale(format!(
            "maximum {max} in window [{start}, {end}) is not positive"
        )));
    }

    let factor = target / max;
    intensity.iter_mut().for_each(|v| *v *= factor);
    Ok(factor)
}
