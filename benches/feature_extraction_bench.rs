//! Performance benchmarks for feature extraction

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use waveprint::{extract_features, AnalysisConfig};

/// Synthetic 30-second click track at 120 BPM
fn synthetic_track() -> Vec<f32> {
    let sample_rate = 44100u32;
    let n_samples = sample_rate as usize * 30;
    let mut samples = vec![0.0f32; n_samples];

    let beat_interval = (60.0 / 120.0 * sample_rate as f32) as usize;
    let click_len = (0.03 * sample_rate as f32) as usize;

    let mut state = 0x2545F491u32;
    let noise: Vec<f32> = (0..click_len)
        .map(|_| {
            state = state.wrapping_mul(1664525).wrapping_add(1013904223);
            (state >> 8) as f32 / (1u32 << 24) as f32 - 0.5
        })
        .collect();

    let mut position = 0;
    while position < n_samples {
        let end = (position + click_len).min(n_samples);
        for i in 0..(end - position) {
            let t = i as f32 / click_len as f32;
            samples[position + i] = noise[i] * (-5.0 * t).exp() * 1.6;
        }
        position += beat_interval;
    }

    samples
}

fn bench_extract_features(c: &mut Criterion) {
    let samples = synthetic_track();
    let config = AnalysisConfig::default();

    c.bench_function("extract_features_30s", |b| {
        b.iter(|| {
            let _ = extract_features(black_box(&samples), black_box(44100), black_box(&config));
        });
    });
}

criterion_group!(benches, bench_extract_features);
criterion_main!(benches);
