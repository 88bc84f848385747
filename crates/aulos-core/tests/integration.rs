//! Integration tests for aulos-core DSP primitives.
//!
//! Verifies filter responses with sine-wave measurements, smoother timing,
//! follower time constants, and the composition the instrument relies on:
//! a noise source through per-sample retuned resonators.

use aulos_core::{
    AsymmetricFollower, Biquad, BiquadBandpass, NoiseGenerator, Phasor, Resonator, SmoothedParam,
    StateVariableFilter, SvfOutput, highpass_coefficients, lowpass_coefficients,
    time_constant_coeff,
};

const SAMPLE_RATE: f32 = 48000.0;
const TAU: f32 = core::f32::consts::TAU;
const BUTTERWORTH_Q: f32 = core::f32::consts::FRAC_1_SQRT_2;

/// Generate a sine wave buffer at the given frequency and sample rate.
fn generate_sine(freq_hz: f32, sample_rate: f32, num_samples: usize) -> Vec<f32> {
    (0..num_samples)
        .map(|n| libm::sinf(TAU * freq_hz * n as f32 / sample_rate))
        .collect()
}

/// Measure RMS amplitude of a signal buffer.
fn rms(signal: &[f32]) -> f32 {
    let sum_sq: f32 = signal.iter().map(|&s| s * s).sum();
    libm::sqrtf(sum_sq / signal.len() as f32)
}

/// Convert linear amplitude to dB.
fn to_db(linear: f32) -> f32 {
    20.0 * libm::log10f(linear.max(1e-10))
}

/// Gain in dB of `process` at `freq_hz`, measured after settling.
fn measure_response(mut process: impl FnMut(f32) -> f32, freq_hz: f32) -> f32 {
    let num_samples = 9600;
    let settle_samples = 4800;
    let input = generate_sine(freq_hz, SAMPLE_RATE, num_samples);
    let output: Vec<f32> = input.iter().map(|&s| process(s)).collect();
    to_db(rms(&output[settle_samples..]) / rms(&input[settle_samples..]))
}

// ============================================================================
// 1. Tone-stage biquads
// ============================================================================

#[test]
fn lowpass_corner_is_minus_3db() {
    let mut biquad = Biquad::with_coefficients(lowpass_coefficients(
        4500.0,
        BUTTERWORTH_Q,
        SAMPLE_RATE,
    ));
    let at_corner = measure_response(|x| biquad.process(x), 4500.0);
    assert!(
        (at_corner + 3.0).abs() < 0.5,
        "Butterworth LP should be -3 dB at the corner, got {at_corner:.2}"
    );

    biquad.clear();
    let passband = measure_response(|x| biquad.process(x), 200.0);
    assert!(passband.abs() < 0.2, "passband gain {passband:.2}");
}

#[test]
fn highpass_attenuates_below_corner() {
    let mut biquad = Biquad::with_coefficients(highpass_coefficients(
        160.0,
        BUTTERWORTH_Q,
        SAMPLE_RATE,
    ));
    let low = measure_response(|x| biquad.process(x), 20.0);
    biquad.clear();
    let high = measure_response(|x| biquad.process(x), 2000.0);
    assert!(low < -30.0, "20 Hz should be ~-36 dB, got {low:.2}");
    assert!(high.abs() < 0.2, "2 kHz passband gain {high:.2}");
}

// ============================================================================
// 2. Resonators
// ============================================================================

#[test]
fn svf_bandpass_peak_gain_equals_q() {
    let mut svf = StateVariableFilter::bandpass(SAMPLE_RATE);
    svf.set_cutoff(440.0);
    svf.set_resonance(0.8);
    let gain = measure_response(|x| svf.process_sample(x), 440.0);
    assert!(
        (gain - to_db(0.8)).abs() < 0.3,
        "peak gain should be Q (≈ -1.9 dB), got {gain:.2}"
    );
}

#[test]
fn svf_and_biquad_bandpass_agree_off_center() {
    let mut svf = StateVariableFilter::bandpass(SAMPLE_RATE);
    let mut bq = BiquadBandpass::new(SAMPLE_RATE);
    for r in [&mut svf as &mut dyn Resonator, &mut bq as &mut dyn Resonator] {
        r.set_cutoff(1000.0);
        r.set_resonance(0.9);
    }
    let svf_db = measure_response(|x| svf.process_sample(x), 3000.0);
    let bq_db = measure_response(|x| bq.process_sample(x), 3000.0);
    assert!((svf_db - bq_db).abs() < 1.0, "svf {svf_db:.2} vs biquad {bq_db:.2}");
}

#[test]
fn svf_output_types_sum_to_input_shape() {
    // lp + k·bp + hp == input for the TPT structure
    let mut svf = StateVariableFilter::new(SAMPLE_RATE);
    svf.set_cutoff(800.0);
    svf.set_resonance(1.5);
    let k = 1.0 / 1.5;
    let mut noise = NoiseGenerator::new(3);
    for _ in 0..2000 {
        let x = noise.next_white();
        let (lp, hp, bp) = svf.process_all(x);
        assert!((lp + k * bp + hp - x).abs() < 1e-4);
    }
    assert_eq!(svf.output_type(), SvfOutput::Bandpass);
}

#[test]
fn noise_through_retuned_bank_is_bounded_and_deterministic() {
    fn run(seed: u32) -> Vec<f32> {
        let mut noise = NoiseGenerator::new(seed);
        let mut pitch = StateVariableFilter::bandpass(SAMPLE_RATE);
        let mut vibrato = Phasor::new();
        (0..48000)
            .map(|_| {
                let v = vibrato.next_sine_fast(5.0, SAMPLE_RATE);
                let hz = 440.0 * libm::exp2f(0.35 * v / 12.0);
                let n = noise.next_sample();
                pitch.tune_and_process(hz, 0.8, 0.65 * n.white + 0.35 * n.pink)
            })
            .collect()
    }
    let a = run(0x1234_5678);
    let b = run(0x1234_5678);
    assert_eq!(a, b, "same seed must reproduce bit-identical output");
    assert!(a.iter().all(|s| s.is_finite() && s.abs() < 4.0));
    assert!(rms(&a) > 0.01);
}

// ============================================================================
// 3. Smoothing and following
// ============================================================================

#[test]
fn smoother_ramp_time_independent_of_rate() {
    for sr in [44100.0f32, 48000.0, 96000.0] {
        let mut p = SmoothedParam::with_config(0.0f32, sr, 20.0);
        p.set_target(1.0);
        let expected = (0.020 * sr) as u32;
        let mut steps = 0u32;
        while !p.is_settled() {
            p.advance();
            steps += 1;
        }
        assert_eq!(steps, expected, "ramp at {sr} Hz");
        assert_eq!(p.get(), 1.0);
    }
}

#[test]
fn smoother_steps_are_bounded() {
    let mut p = SmoothedParam::with_config(0.0f32, SAMPLE_RATE, 50.0);
    p.set_target(1.0);
    let max_step = 1.0 / (0.050 * SAMPLE_RATE) + 1e-6;
    let mut prev = p.get();
    while !p.is_settled() {
        let v = p.advance();
        assert!((v - prev).abs() <= max_step, "step {} too large", v - prev);
        prev = v;
    }
}

#[test]
fn follower_reaches_63_percent_after_one_time_constant() {
    let mut env = AsymmetricFollower::new(SAMPLE_RATE, 25.0, 180.0);
    let samples = (0.025 * SAMPLE_RATE) as usize;
    for _ in 0..samples {
        env.process(1.0);
    }
    assert!(
        (env.value() - 0.632).abs() < 0.01,
        "one time constant ≈ 63.2%, got {}",
        env.value()
    );
}

#[test]
fn time_constant_coeff_guards_degenerate_inputs() {
    assert_eq!(time_constant_coeff(10.0, 0.0), 0.0);
    assert_eq!(time_constant_coeff(10.0, f32::NAN), 0.0);
    let tiny = time_constant_coeff(0.0, SAMPLE_RATE);
    let negative = time_constant_coeff(-5.0, SAMPLE_RATE);
    assert!(tiny.is_finite() && (0.0..1.0).contains(&tiny));
    assert_eq!(tiny, negative);
}
