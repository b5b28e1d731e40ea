use super::*;
use proptest::prelude::*;
use std::collections::HashSet;

fn reference_matrix() -> TrackedMatrix {
    let nan = None;
    let row = |values: &[Option<usize>]| values.to_vec();
    TrackedMatrix::from_rows(&[
        row(&[
            Some(164), Some(237), Some(362), Some(436), Some(585), Some(658), Some(716),
            Some(927), nan, Some(989), Some(1247), Some(1282), Some(1314), nan, Some(1552),
            nan, nan, Some(1682), Some(1843), Some(1875), Some(1901), Some(2146), Some(2181),
            Some(2216), Some(2445), Some(2473), Some(2513), Some(2535), Some(2771),
        ]),
        row(&[
            Some(165), Some(237), Some(361), Some(435), Some(589), Some(664), nan, Some(930),
            Some(963), Some(988), nan, nan, Some(1308), Some(1500), Some(1533), Some(1553),
            Some(1659), Some(1685), Some(1849), Some(1881), Some(1911), nan, Some(2195), nan,
            Some(2449), Some(2479), Some(2515), Some(2545), Some(2769),
        ]),
        row(&[
            Some(165), nan, Some(361), Some(435), Some(590), Some(657), Some(719), Some(928),
            Some(961), Some(989), nan, Some(1284), Some(1313), Some(1497), Some(1527),
            Some(1553), Some(1657), Some(1687), Some(1843), Some(1874), Some(1904), nan,
            Some(2184), Some(2222), Some(2463), nan, Some(2511), nan, Some(2770),
        ]),
    ])
}

fn present_values(matrix: &TrackedMatrix, row: usize) -> Vec<usize> {
    matrix.row(row).into_iter().filter_map(Cell::index).collect()
}

// ==================== Matrix ====================

#[test]
fn test_last_seen_skips_absent_cells() {
    let matrix = reference_matrix();
    assert_eq!(matrix.column_count(), 29);

    let diff_0 = matrix.last_seen(3, 0).unwrap() as i64 - 240;
    let diff_1 = matrix.last_seen(3, 1).unwrap() as i64 - 240;
    assert_eq!(diff_0, -75);
    assert_eq!(diff_1, -3);

    // column 15 is absent in row 0 only
    assert_eq!(matrix.last_seen(1, 15), None);
    assert_eq!(matrix.last_seen(3, 15), Some(1553));
}

#[test]
fn test_insert_column_adds_absent_column() {
    let mut matrix = reference_matrix();
    let shifted = matrix.column_ids()[3];

    let id = matrix.insert_column(3);

    assert_eq!(matrix.column_count(), 30);
    assert_eq!(matrix.column_of(id), Some(3));
    assert_eq!(matrix.column_of(shifted), Some(4));
    for row in 0..matrix.row_count() {
        assert_eq!(matrix.cell(row, 3), Cell::Absent);
    }
    assert_eq!(matrix.cell(0, 4), Cell::Present(436));
}

#[test]
fn test_peak_ids_are_monotonic() {
    let mut matrix = TrackedMatrix::new();
    let a = matrix.insert_column(0);
    let b = matrix.insert_column(0);
    let c = matrix.insert_column(1);

    assert!(a < b && b < c);
    assert_eq!(matrix.column_ids(), &[b, c, a]);
    assert_eq!(c.to_string(), "P2");
}

#[test]
fn test_cell_conversions() {
    assert_eq!(Cell::from(Some(5)), Cell::Present(5));
    assert_eq!(Cell::from(None), Cell::Absent);
    assert_eq!(Cell::Present(5).index(), Some(5));
    assert!(!Cell::Absent.is_present());
}

#[test]
fn test_out_of_range_access() {
    let mut matrix = TrackedMatrix::from_rows(&[vec![Some(1)]]);
    matrix.set(5, 0, 9);
    matrix.set(0, 5, 9);

    assert_eq!(matrix.cell(0, 5), Cell::Absent);
    assert_eq!(matrix.cell(5, 0), Cell::Absent);
    assert_eq!(matrix.present().count(), 1);
}

// ==================== Tracker ====================

#[test]
fn test_first_row_is_seeded_directly() {
    let matrix = PeakTracker::new(20).track(&[vec![164, 237, 362]]).unwrap();

    assert_eq!(matrix.row_count(), 1);
    assert_eq!(
        matrix.row(0),
        vec![Cell::Present(164), Cell::Present(237), Cell::Present(362)]
    );
}

#[test]
fn test_candidate_within_threshold_joins_column() {
    let matrix = PeakTracker::new(20)
        .track(&[vec![164, 237, 362], vec![166, 240, 300, 365]])
        .unwrap();

    assert_eq!(matrix.column_count(), 4);
    assert_eq!(
        matrix.row(1),
        vec![
            Cell::Present(166),
            Cell::Present(240),
            Cell::Present(300),
            Cell::Present(365)
        ]
    );
    // 300 opened a new column between 237 and 362
    assert_eq!(matrix.cell(0, 2), Cell::Absent);
    assert_eq!(matrix.column_ids()[2].0, 3);
}

#[test]
fn test_closer_next_column_defers_candidate() {
    let mut matrix = TrackedMatrix::from_rows(&[vec![Some(130), Some(125)]]);
    PeakTracker::new(20).track_row(&mut matrix, &[128]).unwrap();

    assert_eq!(matrix.row(1), vec![Cell::Absent, Cell::Present(128)]);
}

#[test]
fn test_threshold_is_inclusive() {
    let matrix = PeakTracker::new(20).track(&[vec![100], vec![120]]).unwrap();
    assert_eq!(matrix.column_count(), 1);
    assert_eq!(matrix.cell(1, 0), Cell::Present(120));

    let matrix = PeakTracker::new(20).track(&[vec![100], vec![79]]).unwrap();
    assert_eq!(matrix.column_count(), 2);
    assert_eq!(matrix.row(1), vec![Cell::Present(79), Cell::Absent]);
}

#[test]
fn test_vanished_peak_is_absent() {
    let matrix = PeakTracker::new(20)
        .track(&[vec![100, 200], vec![205]])
        .unwrap();

    assert_eq!(matrix.row(1), vec![Cell::Absent, Cell::Present(205)]);
}

#[test]
fn test_new_peak_opens_column_in_front() {
    let matrix = PeakTracker::new(20)
        .track(&[vec![200], vec![150, 205]])
        .unwrap();

    assert_eq!(matrix.row(0), vec![Cell::Absent, Cell::Present(200)]);
    assert_eq!(matrix.row(1), vec![Cell::Present(150), Cell::Present(205)]);
    assert_eq!(matrix.column_ids(), &[PeakId(1), PeakId(0)]);
}

#[test]
fn test_final_peak_is_never_dropped() {
    let matrix = PeakTracker::new(20)
        .track(&[vec![100], vec![100, 300, 400]])
        .unwrap();

    assert_eq!(matrix.row(1), vec![Cell::Present(100), Cell::Present(400)]);
    assert_eq!(matrix.row(0), vec![Cell::Present(100), Cell::Absent]);
}

#[test]
fn test_comparison_uses_last_present_value() {
    let mut matrix = TrackedMatrix::from_rows(&[
        vec![Some(100), Some(200)],
        vec![None, Some(210)],
    ]);
    PeakTracker::new(20)
        .track_row(&mut matrix, &[104, 212])
        .unwrap();

    assert_eq!(matrix.row(2), vec![Cell::Present(104), Cell::Present(212)]);
}

#[test]
fn test_inconsistent_inputs() {
    let tracker = PeakTracker::default();
    assert_eq!(tracker.threshold(), 20);

    let empty: Vec<Vec<usize>> = Vec::new();
    assert!(matches!(
        tracker.track(&empty),
        Err(TrackingError::Inconsistency { .. })
    ));
    assert!(matches!(
        tracker.track(&[vec![], vec![100]]),
        Err(TrackingError::Inconsistency { row: 0, .. })
    ));
    assert!(matches!(
        tracker.track(&[vec![100], vec![]]),
        Err(TrackingError::Inconsistency { row: 1, .. })
    ));

    let mut blank = TrackedMatrix::new();
    assert!(tracker.track_row(&mut blank, &[5]).is_err());
}

fn peak_lists() -> impl Strategy<Value = Vec<Vec<usize>>> {
    prop::collection::vec(prop::collection::btree_set(81usize..3001, 1..25), 1..8)
        .prop_map(|rows| rows.into_iter().map(|s| s.into_iter().collect()).collect())
}

proptest! {
    #[test]
    fn prop_rows_hold_only_their_own_peaks(rows in peak_lists()) {
        let matrix = PeakTracker::new(20).track(&rows).unwrap();
        prop_assert_eq!(matrix.row_count(), rows.len());
        prop_assert_eq!(present_values(&matrix, 0), rows[0].clone());

        for (r, peaks) in rows.iter().enumerate() {
            let placed = present_values(&matrix, r);
            let unique: HashSet<usize> = placed.iter().copied().collect();
            prop_assert_eq!(unique.len(), placed.len());
            prop_assert!(placed.iter().all(|p| peaks.contains(p)));
            prop_assert!(placed.contains(peaks.last().unwrap()));
        }
    }

    #[test]
    fn prop_columns_never_disappear(rows in peak_lists()) {
        let tracker = PeakTracker::new(20);
        let mut matrix = TrackedMatrix::new();
        tracker.seed(&mut matrix, &rows[0]).unwrap();

        for peaks in &rows[1..] {
            let before: Vec<PeakId> = matrix.column_ids().to_vec();
            let earlier_rows = matrix.rows();
            tracker.track_row(&mut matrix, peaks).unwrap();

            prop_assert!(before.iter().all(|id| matrix.column_of(*id).is_some()));
            for (r, cells) in earlier_rows.iter().enumerate() {
                let now: Vec<Cell> = before
                    .iter()
                    .filter_map(|id| matrix.column_of(*id))
                    .map(|c| matrix.cell(r, c))
                    .collect();
                prop_assert_eq!(&now, cells);
            }
        }
    }
}
