//! Which curves a heating program produced.
//!
//! The beamline names curves after the temperature program rather than after
//! the log, so the set of files to load is rebuilt from the distinct rounded
//! temperatures: every ramp step gets one curve keyed by the dwell it is heading
//! for and a running interval counter, and reaching a new plateau adds the dwell
//! curve for it.

use super::CurveKey;
use crate::segments::is_dwell_temperature;
use std::collections::HashSet;

/// Curves to load, split by experiment kind, in archive order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurvePlan {
    /// Ramp curves in the order they were measured.
    pub ramps: Vec<CurveKey>,
    /// Dwell curves, starting with the initial (pre-heating) curve.
    pub dwells: Vec<CurveKey>,
}

impl CurvePlan {
    /// Total number of curves in the plan.
    pub fn len(&self) -> usize {
        self.ramps.len() + self.dwells.len()
    }

    /// True when nothing needs to be loaded.
    pub fn is_empty(&self) -> bool {
        self.ramps.is_empty() && self.dwells.is_empty()
    }
}

/// Derive the curve plan from rounded temperatures in log order.
///
/// `first_dwell_target` is the first plateau after the initial curve and
/// `dwell_step` the spacing between plateaus.
pub fn plan_curves(rounded: &[i64], first_dwell_target: i64, dwell_step: i64) -> CurvePlan {
    let mut plan = CurvePlan::default();
    let (Some(&initial), Some(&final_temperature)) = (rounded.first(), rounded.last()) else {
        return plan;
    };
    plan.dwells.push(CurveKey::dwell(initial));

    let mut seen = HashSet::new();
    let mut interval = 0u32;
    let mut next_dwell = first_dwell_target;

    for &temperature in rounded.iter().filter(|t| seen.insert(**t)) {
        if temperature == initial {
            continue;
        }

        plan.ramps.push(CurveKey::ramp(next_dwell, interval));
        if !is_dwell_temperature(temperature) {
            interval += 1;
        } else if next_dwell != final_temperature {
            plan.dwells.push(CurveKey::dwell(next_dwell));
            interval = 0;
            next_dwell += dwell_step;
        }
    }

    plan
}
