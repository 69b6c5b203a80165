//! Benchmarks for the scoring pipeline stages

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use scorepochs_core::{smooth_spectrum, spearman_matrix};
use scorepochs_native::{score_epochs, PsdEstimator, Recording, ScoringConfig, WelchEstimator};

/// Generate synthetic EEG data (alpha sinusoid with noise)
fn generate_eeg_samples(rng: &mut StdRng, n: usize, sample_rate: f64) -> Vec<f64> {
    use std::f64::consts::PI;

    (0..n)
        .map(|i| {
            let t = i as f64 / sample_rate;
            let signal = (2.0 * PI * 10.0 * t).sin();
            let noise = rng.random_range(-0.5..0.5);
            (signal + noise) * 50.0 // Scale to ~50 µV
        })
        .collect()
}

fn bench_welch(c: &mut Criterion) {
    let mut group = c.benchmark_group("welch_psd");
    let mut rng = StdRng::seed_from_u64(7);
    let samples = generate_eeg_samples(&mut rng, 5000, 250.0);

    for segment_len in [64, 250, 512].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(segment_len),
            segment_len,
            |b, &segment_len| {
                let welch = WelchEstimator::new(segment_len).unwrap();
                b.iter(|| black_box(welch.estimate(black_box(&samples), 250.0)));
            },
        );
    }

    group.finish();
}

fn bench_smoothing(c: &mut Criterion) {
    let mut group = c.benchmark_group("smooth_spectrum");
    let mut rng = StdRng::seed_from_u64(8);
    let spectrum: Vec<f64> = (0..1024).map(|_| rng.random::<f64>()).collect();

    for window in [2, 5, 16].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(window), window, |b, &window| {
            b.iter(|| black_box(smooth_spectrum(black_box(&spectrum), window)));
        });
    }

    group.finish();
}

fn bench_spearman(c: &mut Criterion) {
    let mut group = c.benchmark_group("spearman_matrix");
    let mut rng = StdRng::seed_from_u64(9);

    for n_epochs in [10, 50, 100].iter() {
        let spectra: Vec<Vec<f64>> = (0..*n_epochs)
            .map(|_| (0..128).map(|_| rng.random::<f64>()).collect())
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(n_epochs), n_epochs, |b, _| {
            b.iter(|| black_box(spearman_matrix(black_box(&spectra))));
        });
    }

    group.finish();
}

fn bench_full_pipeline(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(10);
    // 8 channels, 60 s at 250 Hz
    let channels = (0..8).map(|_| generate_eeg_samples(&mut rng, 15_000, 250.0)).collect();
    let recording = Recording::new(channels).unwrap();
    let config = ScoringConfig::new((1.0, 40.0), 250, 2).with_smoothing(3.0);

    c.bench_function("score_epochs_8ch_60s", |b| {
        b.iter(|| black_box(score_epochs(black_box(&config), black_box(&recording))));
    });
}

criterion_group!(
    benches,
    bench_welch,
    bench_smoothing,
    bench_spearman,
    bench_full_pipeline,
);

criterion_main!(benches);
