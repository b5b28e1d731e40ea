//! Curve identifiers and the file names derived from them.

use super::CurveError;
use crate::config::CurveConfig;
use std::fmt;
use std::str::FromStr;

/// Identifies one measured curve.
///
/// The string form doubles as the archive key: dwell curves are written as the
/// plateau temperature (`"100"`), ramp curves as `"{target}_0{interval}"`
/// (`"200_03"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CurveKey {
    /// Measured while the furnace held a plateau.
    Dwell {
        /// Plateau temperature.
        temperature: i64,
    },
    /// Measured while ramping towards a dwell target.
    Ramp {
        /// Dwell temperature the ramp is heading for.
        target: i64,
        /// Two-minute interval counter within the ramp.
        interval: u32,
    },
}

impl CurveKey {
    /// Dwell curve key.
    pub fn dwell(temperature: i64) -> Self {
        CurveKey::Dwell { temperature }
    }

    /// Ramp curve key.
    pub fn ramp(target: i64, interval: u32) -> Self {
        CurveKey::Ramp { target, interval }
    }

    /// Plateau temperature for dwells, the ramp's target for ramps.
    pub fn nominal_temperature(&self) -> i64 {
        match *self {
            CurveKey::Dwell { temperature } => temperature,
            CurveKey::Ramp { target, .. } => target,
        }
    }

    /// True for dwell curves.
    pub fn is_dwell(&self) -> bool {
        matches!(self, CurveKey::Dwell { .. })
    }
}

impl fmt::Display for CurveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CurveKey::Dwell { temperature } => write!(f, "{temperature}"),
            CurveKey::Ramp { target, interval } => write!(f, "{target}_0{interval}"),
        }
    }
}

impl FromStr for CurveKey {
    type Err = CurveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CurveError::InvalidKey(s.to_string());

        match s.split_once('_') {
            None => s
                .parse()
                .map(CurveKey::dwell)
                .map_err(|_| invalid()),
            Some((target, interval)) => {
                let target = target.parse().map_err(|_| invalid())?;
                let interval = interval
                    .strip_prefix('0')
                    .filter(|rest| !rest.is_empty())
                    .ok_or_else(invalid)?
                    .parse()
                    .map_err(|_| invalid())?;
                Ok(CurveKey::ramp(target, interval))
            }
        }
    }
}

/// Builds curve file names from keys.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurveNaming {
    /// Prefix of dwell curve files.
    pub dwell_prefix: String,
    /// Prefix of ramp curve files.
    pub ramp_prefix: String,
    /// Suffix shared by every curve file.
    pub suffix: String,
}

impl CurveNaming {
    /// File name of the curve identified by `key`.
    ///
    /// Dwell temperatures are zero-padded to three digits
    /// (`Synthetic_CSH_025degC_normalized.gr`).
    pub fn file_name(&self, key: &CurveKey) -> String {
        match key {
            CurveKey::Dwell { temperature } => {
                format!("{}{:03}degC{}", self.dwell_prefix, temperature, self.suffix)
            }
            CurveKey::Ramp { .. } => format!("{}{}{}", self.ramp_prefix, key, self.suffix),
        }
    }
}

impl From<&CurveConfig> for CurveNaming {
    fn from(config: &CurveConfig) -> Self {
        Self {
            dwell_prefix: config.dwell_prefix.clone(),
            ramp_prefix: config.ramp_prefix.clone(),
            suffix: config.suffix.clone(),
        }
    }
}

impl Default for CurveNaming {
    fn default() -> Self {
        Self::from(&CurveConfig::default())
    }
}
