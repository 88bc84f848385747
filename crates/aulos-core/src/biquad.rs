//! Biquad (bi-quadratic) filter structure.
//!
//! A Direct Form I second-order IIR filter plus RBJ Audio EQ Cookbook
//! coefficient designs. The instrument's tone stage is a biquad high-pass
//! into a biquad low-pass; [`BiquadBandpass`] offers a biquad realization of
//! the per-sample retuned [`Resonator`].

use core::f32::consts::{FRAC_1_SQRT_2, PI};
use libm::{cosf, sinf};

use crate::flush_denormal;
use crate::resonator::Resonator;

/// Normalized biquad coefficients (`a0 == 1`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Feedforward coefficients
    pub b0: f32,
    pub b1: f32,
    pub b2: f32,
    /// Feedback coefficients
    pub a1: f32,
    pub a2: f32,
}

impl BiquadCoefficients {
    /// Coefficients that pass the input through unchanged.
    pub const PASSTHROUGH: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// Normalize raw cookbook coefficients by `a0`.
    pub fn from_raw(b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) -> Self {
        let a0_inv = 1.0 / a0;
        Self {
            b0: b0 * a0_inv,
            b1: b1 * a0_inv,
            b2: b2 * a0_inv,
            a1: a1 * a0_inv,
            a2: a2 * a0_inv,
        }
    }

    /// Whether every coefficient is finite.
    pub fn is_finite(&self) -> bool {
        self.b0.is_finite()
            && self.b1.is_finite()
            && self.b2.is_finite()
            && self.a1.is_finite()
            && self.a2.is_finite()
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::PASSTHROUGH
    }
}

/// Direct Form I biquad:
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coeffs: BiquadCoefficients,

    /// Input delay line: x[n-1], x[n-2]
    x1: f32,
    x2: f32,

    /// Output delay line: y[n-1], y[n-2]
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a new biquad with passthrough coefficients.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a biquad with the given coefficients.
    pub fn with_coefficients(coeffs: BiquadCoefficients) -> Self {
        Self {
            coeffs,
            ..Self::default()
        }
    }

    /// Replaces the coefficients, keeping the delay lines.
    pub fn set_coefficients(&mut self, coeffs: BiquadCoefficients) {
        self.coeffs = coeffs;
    }

    /// Current coefficients.
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coeffs
    }

    /// Processes a single sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let c = &self.coeffs;
        let output = c.b0 * input + c.b1 * self.x1 + c.b2 * self.x2
            - c.a1 * self.y1
            - c.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = flush_denormal(output);

        output
    }

    /// Clears the delay lines without changing coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

/// `(cos ω, α)` for a cookbook design, or `None` when the sample rate
/// cannot hold a filter.
fn omega_terms(frequency: f32, q: f32, sample_rate: f32) -> Option<(f32, f32)> {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return None;
    }
    let frequency = if frequency.is_finite() { frequency } else { 1.0 };
    let frequency = frequency.max(1.0).min(sample_rate * 0.49);
    let q = if q.is_finite() { q.max(0.01) } else { FRAC_1_SQRT_2 };
    let omega = 2.0 * PI * frequency / sample_rate;
    Some((cosf(omega), sinf(omega) / (2.0 * q)))
}

/// Low-pass coefficients (RBJ cookbook).
///
/// `q = 1/√2` gives the Butterworth response the tone stage uses. A
/// non-positive sample rate yields [`BiquadCoefficients::PASSTHROUGH`].
pub fn lowpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let Some((cos_omega, alpha)) = omega_terms(frequency, q, sample_rate) else {
        return BiquadCoefficients::PASSTHROUGH;
    };
    BiquadCoefficients::from_raw(
        (1.0 - cos_omega) / 2.0,
        1.0 - cos_omega,
        (1.0 - cos_omega) / 2.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// High-pass coefficients (RBJ cookbook).
pub fn highpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let Some((cos_omega, alpha)) = omega_terms(frequency, q, sample_rate) else {
        return BiquadCoefficients::PASSTHROUGH;
    };
    BiquadCoefficients::from_raw(
        (1.0 + cos_omega) / 2.0,
        -(1.0 + cos_omega),
        (1.0 + cos_omega) / 2.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Band-pass coefficients (RBJ cookbook, constant skirt gain).
///
/// Peak gain equals `q`, matching the bandpass output of
/// [`StateVariableFilter`](crate::StateVariableFilter), so the two
/// resonators are interchangeable.
pub fn bandpass_coefficients(frequency: f32, q: f32, sample_rate: f32) -> BiquadCoefficients {
    let Some((cos_omega, alpha)) = omega_terms(frequency, q, sample_rate) else {
        return BiquadCoefficients::PASSTHROUGH;
    };
    let q = if q.is_finite() { q.max(0.01) } else { FRAC_1_SQRT_2 };
    BiquadCoefficients::from_raw(
        q * alpha,
        0.0,
        -q * alpha,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Biquad bandpass that can be retuned every sample.
///
/// Each setter redesigns the whole filter (one `sinf`/`cosf` pair), so it
/// costs more than the SVF per retune and reacts less gracefully to fast
/// sweeps. Kept as an alternative [`Resonator`] for comparison.
#[derive(Debug, Clone)]
pub struct BiquadBandpass {
    biquad: Biquad,
    sample_rate: f32,
    cutoff: f32,
    q: f32,
}

impl BiquadBandpass {
    /// Create a bandpass at 1 kHz, Q = 0.707.
    pub fn new(sample_rate: f32) -> Self {
        let mut bp = Self {
            biquad: Biquad::new(),
            sample_rate,
            cutoff: 1000.0,
            q: FRAC_1_SQRT_2,
        };
        bp.redesign();
        bp
    }

    fn redesign(&mut self) {
        self.biquad
            .set_coefficients(bandpass_coefficients(self.cutoff, self.q, self.sample_rate));
    }
}

impl Default for BiquadBandpass {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl Resonator for BiquadBandpass {
    fn set_cutoff(&mut self, freq_hz: f32) {
        self.cutoff = freq_hz;
        self.redesign();
    }

    fn set_resonance(&mut self, q: f32) {
        self.q = q;
        self.redesign();
    }

    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        self.biquad.process(input)
    }

    fn reset(&mut self) {
        self.biquad.clear();
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.redesign();
    }

    fn tune_and_process(&mut self, freq_hz: f32, q: f32, input: f32) -> f32 {
        self.cutoff = freq_hz;
        self.q = q;
        self.redesign();
        self.biquad.process(input)
    }
}
