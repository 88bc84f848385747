//! Criterion benchmarks for aulos-core DSP primitives
//!
//! Run with: cargo bench -p aulos-core
#![allow(missing_docs)]

use aulos_core::{
    AsymmetricFollower, Biquad, BiquadBandpass, NoiseGenerator, OnePole, Phasor, Resonator,
    SmoothedParam, StateVariableFilter, lowpass_coefficients,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    let mut noise = NoiseGenerator::new(1);
    (0..size).map(|_| noise.next_white() * 0.5).collect()
}

/// Slowly sweeping pitch, as a glide plus vibrato would produce.
fn generate_pitch_track(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 220.0 + 220.0 * i as f32 / size as f32)
        .collect()
}

fn bench_resonators(c: &mut Criterion) {
    let mut group = c.benchmark_group("Resonator");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        let pitch = generate_pitch_track(block_size);

        group.bench_with_input(
            BenchmarkId::new("svf_retune_per_sample", block_size),
            &block_size,
            |b, _| {
                let mut svf = StateVariableFilter::bandpass(SAMPLE_RATE);
                b.iter(|| {
                    for (&x, &hz) in input.iter().zip(&pitch) {
                        black_box(svf.tune_and_process(black_box(hz), 0.8, black_box(x)));
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("biquad_retune_per_sample", block_size),
            &block_size,
            |b, _| {
                let mut bp = BiquadBandpass::new(SAMPLE_RATE);
                b.iter(|| {
                    for (&x, &hz) in input.iter().zip(&pitch) {
                        black_box(bp.tune_and_process(black_box(hz), 0.8, black_box(x)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("process", block_size),
            &block_size,
            |b, _| {
                let mut biquad =
                    Biquad::with_coefficients(lowpass_coefficients(4500.0, 0.707, SAMPLE_RATE));
                b.iter(|| {
                    for &sample in &input {
                        black_box(biquad.process(black_box(sample)));
                    }
                });
            },
        );
    }

    // Tone stage redesigns both biquads every sample
    group.bench_function("coefficient_calc", |b| {
        b.iter(|| {
            black_box(lowpass_coefficients(
                black_box(4500.0),
                black_box(0.707),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.finish();
}

fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("NoiseGenerator");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, &size| {
                let mut noise = NoiseGenerator::default();
                b.iter(|| {
                    for _ in 0..size {
                        black_box(noise.next_sample());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_phasor(c: &mut Criterion) {
    let mut group = c.benchmark_group("Phasor");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("sine_libm", block_size),
            &block_size,
            |b, &size| {
                let mut osc = Phasor::new();
                b.iter(|| {
                    for _ in 0..size {
                        black_box(osc.next_sine(black_box(440.0), SAMPLE_RATE));
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("sine_fast", block_size),
            &block_size,
            |b, &size| {
                let mut lfo = Phasor::new();
                b.iter(|| {
                    for _ in 0..size {
                        black_box(lfo.next_sine_fast(black_box(5.0), SAMPLE_RATE));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_smoothed_param(c: &mut Criterion) {
    let mut group = c.benchmark_group("SmoothedParam");

    for &block_size in BLOCK_SIZES {
        // Ramping: set a new target each block
        group.bench_with_input(
            BenchmarkId::new("ramping", block_size),
            &block_size,
            |b, &size| {
                let mut param = SmoothedParam::with_config(1.0f32, SAMPLE_RATE, 50.0);
                let mut flip = false;
                b.iter(|| {
                    flip = !flip;
                    param.set_target(black_box(if flip { 0.5 } else { 1.0 }));
                    for _ in 0..size {
                        black_box(param.advance());
                    }
                });
            },
        );

        // Settled: already at target
        group.bench_with_input(
            BenchmarkId::new("settled", block_size),
            &block_size,
            |b, &size| {
                let mut param = SmoothedParam::with_config(1.0f32, SAMPLE_RATE, 50.0);
                b.iter(|| {
                    for _ in 0..size {
                        black_box(param.advance());
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_followers(c: &mut Criterion) {
    let mut group = c.benchmark_group("Followers");

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);

        group.bench_with_input(
            BenchmarkId::new("asymmetric", block_size),
            &block_size,
            |b, _| {
                let mut env = AsymmetricFollower::new(SAMPLE_RATE, 25.0, 180.0);
                b.iter(|| {
                    for &sample in &input {
                        black_box(env.process(black_box(sample.abs())));
                    }
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("one_pole", block_size),
            &block_size,
            |b, _| {
                let mut filter = OnePole::new(SAMPLE_RATE, 10.0);
                b.iter(|| {
                    for &sample in &input {
                        black_box(filter.process(black_box(sample)));
                    }
                });
            },
        );
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_resonators,
    bench_biquad,
    bench_noise,
    bench_phasor,
    bench_smoothed_param,
    bench_followers,
);

criterion_main!(benches);
