use super::*;
use crate::log_file::Sample;
use proptest::prelude::*;

fn log_from(points: &[(u32, f64)]) -> ExperimentLog {
    ExperimentLog::from_samples(
        points
            .iter()
            .map(|&(timestamp, temperature)| Sample {
                timestamp,
                temperature,
            })
            .collect(),
    )
}

fn default_config() -> SegmentConfig {
    SegmentConfig::default()
}

#[test]
fn test_divide_by_100() {
    assert_eq!(divide_by_100(100), 1.0);
    assert_eq!(divide_by_100(250), 2.5);
}

#[test]
fn test_is_dwell_temperature() {
    for v in [100, 200, 300, 1000] {
        assert!(is_dwell_temperature(v), "{v} should be a dwell temperature");
    }
    for v in [130, 250, 30, 990] {
        assert!(!is_dwell_temperature(v), "{v} should not be a dwell temperature");
    }
}

#[test]
fn test_times_of_target_occurrence() {
    let (next, times) = times_of_target_occurrence(4, &[1, 4, 3, 4, 5], &[6, 7, 8, 9, 10]);
    assert_eq!(next, 4);
    assert_eq!(times, vec![7, 9]);
}

#[test]
fn test_times_of_missing_target() {
    let (next, times) = times_of_target_occurrence::<u32>(7, &[1, 2], &[10, 20]);
    assert_eq!(next, 0);
    assert!(times.is_empty());
}

#[test]
fn test_list_item_differences() {
    assert_eq!(list_item_differences(&[5, 32, 108]), vec![0, 27, 103]);
    assert!(list_item_differences(&[]).is_empty());
}

#[test]
fn test_select_analytes_skips_equilibrium_boundary() {
    // ramp 30 -> dwell 100 (4 samples) -> ramp 150 -> dwell 200 (3 samples)
    let log = log_from(&[
        (0, 31.0),
        (60, 98.0),
        (120, 101.0),
        (180, 99.5),
        (240, 100.2),
        (300, 151.0),
        (360, 199.0),
        (420, 200.0),
        (480, 201.0),
    ]);

    let selection = select_analytes(&log, &default_config()).unwrap();

    assert_eq!(selection.groups.len(), 2);
    assert_eq!(selection.groups[0].temperature, 100);
    assert_eq!(selection.groups[0].timestamps, vec![60, 120, 180, 240]);
    assert_eq!(selection.groups[1].indices, vec![6, 7, 8]);

    assert_eq!(selection.excluded.iter().copied().collect::<Vec<_>>(), vec![180, 480]);
    assert_eq!(
        selection.analyte_timestamps(),
        vec![0, 60, 120, 240, 300, 360, 420]
    );
    assert_eq!(selection.analyte_count(), log.len() - selection.groups.len());
    assert_eq!(selection.analyte_temperatures()[0], 31.0);
}

#[test]
fn test_missing_equilibrium_sample() {
    let log = log_from(&[(0, 100.0), (90, 100.0), (200, 100.0)]);

    let err = select_analytes(&log, &default_config()).unwrap_err();
    assert!(matches!(
        err,
        SegmentError::MissingEquilibriumSample {
            temperature: 100,
            first_timestamp: 0,
            offset_secs: 120
        }
    ));
}

#[test]
fn test_custom_equilibrium_offset() {
    let log = log_from(&[(0, 200.0), (30, 200.0), (60, 200.0)]);
    let config = SegmentConfig {
        equilibrium_offset_secs: 60,
        ..Default::default()
    };

    let selection = select_analytes(&log, &config).unwrap();
    assert_eq!(selection.analyte_timestamps(), vec![0, 30]);
}

#[test]
fn test_recurring_dwell_merged_with_warn_policy() {
    // 100 is visited, left for 150, then revisited
    let log = log_from(&[
        (0, 100.0),
        (60, 100.0),
        (120, 150.0),
        (180, 100.0),
    ]);

    let groups = dwell_groups(&log);
    assert_eq!(groups.len(), 1);
    assert!(!groups[0].is_contiguous());
    assert_eq!(groups[0].timestamps, vec![0, 60, 180]);

    // no member sits at offset 120 once merged
    let err = select_analytes(&log, &default_config()).unwrap_err();
    assert!(matches!(err, SegmentError::MissingEquilibriumSample { .. }));
}

#[test]
fn test_recurring_dwell_rejected() {
    let log = log_from(&[
        (0, 100.0),
        (60, 100.0),
        (120, 100.0),
        (180, 150.0),
        (240, 100.0),
    ]);
    let config = SegmentConfig {
        recurrence: RecurrencePolicy::Reject,
        ..Default::default()
    };

    let err = select_analytes(&log, &config).unwrap_err();
    assert!(matches!(
        err,
        SegmentError::RecurringDwell {
            temperature: 100,
            index: 4
        }
    ));

    // the merged group still has its 120s member under the default policy
    let selection = select_analytes(&log, &default_config()).unwrap();
    assert_eq!(selection.analyte_timestamps(), vec![0, 60, 180, 240]);
}

#[test]
fn test_no_dwell_keeps_everything() {
    let log = log_from(&[(0, 30.0), (60, 50.0), (120, 70.0)]);
    let selection = select_analytes(&log, &default_config()).unwrap();

    assert!(selection.groups.is_empty());
    assert_eq!(selection.analyte_count(), 3);
}

/// Build a heating program: for each dwell, a short ramp then `members`
/// dwell samples spaced 60 s apart, so the third member sits at +120 s.
fn heating_program(dwell_members: &[usize]) -> ExperimentLog {
    let mut points = Vec::new();
    let mut t = 0u32;
    for (i, &members) in dwell_members.iter().enumerate() {
        let dwell = 100.0 * (i as f64 + 1.0);
        points.push((t, dwell - 50.0));
        t += 60;
        for _ in 0..members {
            points.push((t, dwell));
            t += 60;
        }
    }
    log_from(&points)
}

proptest! {
    #[test]
    fn prop_one_exclusion_per_dwell_group(dwell_members in prop::collection::vec(3usize..8, 0..6)) {
        let log = heating_program(&dwell_members);
        let selection = select_analytes(&log, &default_config()).unwrap();

        prop_assert_eq!(selection.groups.len(), dwell_members.len());
        prop_assert_eq!(selection.analyte_count(), log.len() - selection.groups.len());
    }
}
