use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use pdfpeak::curve::locate_peaks;
use pdfpeak::tracking::PeakTracker;

/// Peak lists drifting slowly with temperature, with peaks appearing and
/// vanishing every few curves
fn drifting_peak_lists(curves: usize, peaks_per_curve: usize) -> Vec<Vec<usize>> {
    (0..curves)
        .map(|c| {
            (0..peaks_per_curve)
                .filter(|p| (p + c) % 7 != 0)
                .map(|p| 100 + p * 60 + (c % 5) * 2)
                .collect()
        })
        .collect()
}

/// Synthetic G(r) with a damped oscillation
fn synthetic_curve(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| {
            let r = i as f64 * 0.01;
            (r * 4.0).sin() * (-r / 15.0).exp()
        })
        .collect()
}

fn bench_track(c: &mut Criterion) {
    let mut group = c.benchmark_group("track");

    for curves in [10, 50, 200] {
        let rows = drifting_peak_lists(curves, 40);
        let peaks: usize = rows.iter().map(Vec::len).sum();
        group.throughput(Throughput::Elements(peaks as u64));

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{curves}curves")),
            &rows,
            |b, rows| {
                let tracker = PeakTracker::new(20);
                b.iter(|| tracker.track(black_box(rows)).unwrap());
            },
        );
    }

    group.finish();
}

fn bench_locate_peaks(c: &mut Criterion) {
    let mut group = c.benchmark_group("locate_peaks");

    for len in [3_000, 30_000] {
        let curve = synthetic_curve(len);
        group.throughput(Throughput::Elements(len as u64));

        group.bench_with_input(BenchmarkId::from_parameter(len), &curve, |b, curve| {
            b.iter(|| locate_peaks(black_box(curve), [81, 3001]));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_track, bench_locate_peaks);
criterion_main!(benches);
