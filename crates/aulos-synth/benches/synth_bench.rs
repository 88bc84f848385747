//! Criterion benchmarks for aulos-synth components
//!
//! Run with: cargo bench -p aulos-synth

use aulos_core::BiquadBandpass;
use aulos_synth::{
    BreathCore, BreathEnvelope, BreathInstrument, BreathParams, FilterBank, MotionSustain,
    ToneShaper, pressure_target,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 128, 256, 512, 1024];

// ============================================================================
// Building blocks
// ============================================================================

fn bench_filter_bank(c: &mut Criterion) {
    let mut group = c.benchmark_group("FilterBank");

    for &block_size in BLOCK_SIZES {
        let mut svf = FilterBank::new(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("Svf", block_size), &block_size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    let hz = 220.0 + i as f32;
                    sum += svf.process(black_box(0.1), hz, 0.35, 0.4);
                }
                black_box(sum)
            })
        });

        let mut biquad = FilterBank::<BiquadBandpass>::with_resonators(SAMPLE_RATE);
        group.bench_with_input(BenchmarkId::new("Biquad", block_size), &block_size, |b, &size| {
            b.iter(|| {
                let mut sum = 0.0f32;
                for i in 0..size {
                    let hz = 220.0 + i as f32;
                    sum += biquad.process(black_box(0.1), hz, 0.35, 0.4);
                }
                black_box(sum)
            })
        });
    }

    group.finish();
}

fn bench_tone_and_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("Stages");

    let mut tone = ToneShaper::new(SAMPLE_RATE);
    group.bench_function("ToneShaper_512", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for i in 0..512 {
                sum += tone.process(black_box(0.2), i as f32 / 512.0);
            }
            black_box(sum)
        })
    });

    let mut env = BreathEnvelope::new(SAMPLE_RATE, 25.0, 180.0);
    let mut motion = MotionSustain::new(SAMPLE_RATE);
    group.bench_function("Envelope_Motion_512", |b| {
        b.iter(|| {
            let mut sum = 0.0f32;
            for i in 0..512 {
                let mw = (i % 64) as f32 / 64.0;
                let m = motion.process(mw, 0.0, 0.0, 0.22, 0.5);
                sum += env.process(pressure_target(true, 0.8, mw, m));
            }
            black_box(sum)
        })
    });

    group.finish();
}

// ============================================================================
// Whole instrument
// ============================================================================

fn bench_core(c: &mut Criterion) {
    let mut group = c.benchmark_group("BreathCore");

    for &block_size in BLOCK_SIZES {
        let mut core = BreathCore::new();
        core.set_params(&BreathParams {
            motion_sustain: true,
            ..BreathParams::default()
        });
        core.prepare(SAMPLE_RATE, block_size, 2);
        core.set_gate(true);
        core.set_velocity(0.8);
        core.set_pitch_hz(440.0);
        let mut left = vec![0.0f32; block_size];
        let mut right = vec![0.0f32; block_size];

        group.bench_with_input(BenchmarkId::new("Stereo", block_size), &block_size, |b, &size| {
            b.iter(|| {
                left.fill(0.0);
                right.fill(0.0);
                core.render(&mut [&mut left, &mut right], 0, size);
                black_box(left[0])
            })
        });
    }

    group.finish();
}

fn bench_instrument_glide(c: &mut Criterion) {
    let mut group = c.benchmark_group("BreathInstrument");

    let mut synth = BreathInstrument::new();
    synth.prepare(SAMPLE_RATE, 512, 1);
    let mut block = vec![0.0f32; 512];
    let mut note = 60u8;

    group.bench_function("Legato_512", |b| {
        b.iter(|| {
            note = if note == 60 { 67 } else { 60 };
            synth.handle_event(aulos_synth::ControlEvent::NoteOn { note, velocity: 100 });
            block.fill(0.0);
            synth.render(&mut [&mut block], 0, 512);
            black_box(block[511])
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_filter_bank,
    bench_tone_and_envelope,
    bench_core,
    bench_instrument_glide
);
criterion_main!(benches);
