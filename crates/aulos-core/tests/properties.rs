//! Property-based tests for aulos-core DSP primitives.
//!
//! Tests resonator stability under per-sample retuning, smoother
//! boundedness, and the shape of the saturation curve using proptest for
//! randomized input generation.

use aulos_core::{
    AsymmetricFollower, Biquad, BiquadBandpass, NoiseGenerator, Resonator, SmoothedParam,
    StateVariableFilter, fast_tanh, highpass_coefficients, lowpass_coefficients, soft_clip,
    time_constant_coeff,
};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Retuning the SVF every sample to random pitch-range frequencies and
    /// instrument-range Q values never yields non-finite state or output.
    #[test]
    fn svf_per_sample_retune_stability(
        sample_rate in prop::sample::select(vec![22050.0f32, 44100.0, 48000.0, 96000.0]),
        freqs in prop::collection::vec(20.0f32..12000.0, 256),
        qs in prop::collection::vec(0.45f32..0.95, 256),
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut svf = StateVariableFilter::bandpass(sample_rate);
        for ((&f, &q), &x) in freqs.iter().zip(&qs).zip(&input) {
            let y = svf.tune_and_process(f, q, x);
            let (g, k) = svf.coefficients();
            prop_assert!(g.is_finite() && g > 0.0, "g={} at f={} sr={}", g, f, sample_rate);
            prop_assert!(k.is_finite());
            prop_assert!(y.is_finite(), "output {} at f={} q={}", y, f, q);
        }
    }

    /// Same property for the biquad realization.
    #[test]
    fn biquad_bandpass_per_sample_retune_stability(
        freqs in prop::collection::vec(20.0f32..12000.0, 256),
        qs in prop::collection::vec(0.45f32..0.95, 256),
        input in prop::collection::vec(-1.0f32..=1.0, 256),
    ) {
        let mut bp = BiquadBandpass::new(44100.0);
        for ((&f, &q), &x) in freqs.iter().zip(&qs).zip(&input) {
            let y = bp.tune_and_process(f, q, x);
            prop_assert!(y.is_finite(), "output {} at f={} q={}", y, f, q);
        }
    }

    /// Tone-stage coefficients are finite over the whole tone control range.
    #[test]
    fn tone_coefficients_finite(
        tone in 0.0f32..=1.0,
        sample_rate in 8000.0f32..192000.0,
    ) {
        let q = core::f32::consts::FRAC_1_SQRT_2;
        let hp = highpass_coefficients(40.0 + (1.0 - tone) * 120.0, q, sample_rate);
        let lp = lowpass_coefficients(4500.0 + tone * 11500.0, q, sample_rate);
        prop_assert!(hp.is_finite());
        prop_assert!(lp.is_finite());

        let mut noise = NoiseGenerator::new(11);
        let mut hp_f = Biquad::with_coefficients(hp);
        let mut lp_f = Biquad::with_coefficients(lp);
        for _ in 0..512 {
            let y = lp_f.process(hp_f.process(noise.next_white()));
            prop_assert!(y.is_finite() && y.abs() < 8.0);
        }
    }

    /// A smoothed value never leaves the interval spanned by its start and
    /// target, and lands exactly on the target.
    #[test]
    fn smoother_bounded(
        start in -10.0f32..10.0,
        target in -10.0f32..10.0,
        ramp_ms in 0.0f32..100.0,
    ) {
        let mut p = SmoothedParam::with_config(start, 48000.0, ramp_ms);
        p.set_target(target);
        let (lo, hi) = if start < target { (start, target) } else { (target, start) };
        for _ in 0..(p.ramp_samples() + 2) {
            let v = p.advance();
            prop_assert!(v >= lo - 1e-4 && v <= hi + 1e-4, "{} outside [{}, {}]", v, lo, hi);
        }
        prop_assert_eq!(p.get(), target);
    }

    /// The follower approaches any constant target without overshoot.
    #[test]
    fn follower_never_overshoots(
        start_target in 0.0f32..=1.0,
        target in 0.0f32..=1.0,
        attack_ms in 1.0f32..200.0,
        release_ms in 5.0f32..2000.0,
    ) {
        let mut env = AsymmetricFollower::new(48000.0, attack_ms, release_ms);
        for _ in 0..4800 {
            env.process(start_target);
        }
        let from = env.value();
        let (lo, hi) = if from < target { (from, target) } else { (target, from) };
        let mut prev = from;
        for _ in 0..2048 {
            let v = env.process(target);
            prop_assert!(v >= lo - 1e-6 && v <= hi + 1e-6);
            prop_assert!((v - target).abs() <= (prev - target).abs() + 1e-7);
            prev = v;
        }
    }

    /// Saturation is odd-symmetric and bounded.
    #[test]
    fn saturator_odd_and_bounded(x in -100.0f32..100.0) {
        let y = soft_clip(x);
        prop_assert!((soft_clip(-x) + y).abs() < 1e-6);
        prop_assert!(y.abs() <= 1.0);
        prop_assert_eq!(y, fast_tanh(x));
    }

    /// Saturation is monotonic non-decreasing.
    #[test]
    fn saturator_monotonic(a in -20.0f32..20.0, delta in 0.0f32..5.0) {
        prop_assert!(soft_clip(a + delta) >= soft_clip(a) - 1e-6);
    }

    /// Time-constant coefficients stay in [0, 1) for any time and rate.
    #[test]
    fn time_constant_coeff_in_unit_interval(
        ms in -1000.0f32..10000.0,
        sample_rate in -1.0f32..384000.0,
    ) {
        let c = time_constant_coeff(ms, sample_rate);
        prop_assert!(c.is_finite());
        prop_assert!((0.0..1.0).contains(&c), "coeff {} for ms={} sr={}", c, ms, sample_rate);
    }
}
