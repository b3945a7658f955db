//! Benchmarks for the signal stages.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use gait_signal::conditioner::SignalConditioner;
use gait_signal::filtering::low_pass_zero_phase;
use gait_signal::ingest::SyntheticWalk;
use gait_signal::peaks::{adaptive_threshold, detect_peaks, min_distance_samples};

fn benchmark_filtering(c: &mut Criterion) {
    let samples = SyntheticWalk::new().with_seed(1).generate();
    let ay: Vec<f64> = samples.iter().map(|s| s.ay).collect();

    c.bench_function("filtfilt_2000", |b| {
        b.iter(|| low_pass_zero_phase(black_box(&ay), 10.0, 50.0))
    });

    let conditioner = SignalConditioner::default();
    c.bench_function("condition_3_axes_2000", |b| {
        b.iter(|| conditioner.condition(black_box(&samples)))
    });
}

fn benchmark_peaks(c: &mut Criterion) {
    let samples = SyntheticWalk::new().with_seed(2).generate();
    let ay: Vec<f64> = samples.iter().map(|s| s.ay).collect();
    let filtered = low_pass_zero_phase(&ay, 10.0, 50.0);
    let threshold = adaptive_threshold(&filtered, 0.7);
    let min_distance = min_distance_samples(50.0, 0.35);

    c.bench_function("detect_peaks_2000", |b| {
        b.iter(|| detect_peaks(black_box(&filtered), threshold, min_distance))
    });
}

criterion_group!(benches, benchmark_filtering, benchmark_peaks);
criterion_main!(benches);
