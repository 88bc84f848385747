//! Fast mathematical approximations for per-sample coefficient work.
//!
//! The instrument retunes five filters and a vibrato LFO on every sample.
//! These functions trade full IEEE 754 precision for speed where the input
//! range is bounded. Each function documents its maximum error and valid
//! input range.
//!
//! | Function | Replaces | Use case | Max error |
//! |----------|----------|----------|-----------|
//! | [`fast_sin_turns`] | `libm::sinf` | Vibrato LFO | < 0.001 |
//! | [`fast_tan`] | `libm::tanf` | SVF prewarping | < 0.1% (f < sr/4) |
//! | [`fast_tanh`] | `libm::tanhf` | Soft saturation | < 2.5% (shape, not accuracy) |
//!
//! Audio-rate oscillators (the sine anchor) use `libm` directly.

use libm::floorf;

/// Fast sine from phase in turns (full cycles).
///
/// Input: `turns` where 0.0 → sin(0) = 0, 0.25 → 1, 0.5 → 0, 0.75 → −1.
/// Values outside \[0, 1) are wrapped automatically.
///
/// Uses the corrected parabolic approximation (Bhaskara I variant).
///
/// # Accuracy
///
/// Maximum absolute error: < 0.001.
///
/// # Examples
///
/// ```
/// use aulos_core::fast_math::fast_sin_turns;
///
/// assert!(fast_sin_turns(0.0).abs() < 0.002);
/// assert!((fast_sin_turns(0.25) - 1.0).abs() < 0.002);
/// assert!((fast_sin_turns(0.75) + 1.0).abs() < 0.002);
/// ```
#[inline]
pub fn fast_sin_turns(turns: f32) -> f32 {
    let p = turns - floorf(turns);
    let (half_p, sign) = if p < 0.5 {
        (p * 2.0, 1.0_f32)
    } else {
        ((p - 0.5) * 2.0, -1.0_f32)
    };
    // Parabolic base: sin(π·t) ≈ 4t(1−t), then Bhaskara correction
    let y = 4.0 * half_p * (1.0 - half_p);
    sign * (0.225 * y * (y - 1.0) + y)
}

/// Fast tangent for small positive angles.
///
/// Padé \[2/1\] rational approximation: `tan(x) ≈ x · (15 − x²) / (15 − 6x²)`.
///
/// # Accuracy
///
/// | Frequency (@ 48 kHz) | Argument x = π·f/sr | Relative error |
/// |----------------------|---------------------|----------------|
/// | < 4.6 kHz | < 0.3 | < 0.03% |
/// | < 7.6 kHz | < 0.5 | < 0.2% |
///
/// # Arguments
///
/// * `x` - Angle in radians. Valid for x ∈ \[0, π/3\].
///
/// # Examples
///
/// ```
/// use aulos_core::fast_math::fast_tan;
///
/// let x = core::f32::consts::PI * 1000.0 / 48000.0;
/// let exact = libm::tanf(x);
/// assert!((fast_tan(x) - exact).abs() / exact < 0.001);
/// ```
#[inline]
pub fn fast_tan(x: f32) -> f32 {
    let x2 = x * x;
    x * (15.0 - x2) / (15.0 - 6.0 * x2)
}

/// Rational tanh-shaped saturation curve.
///
/// `x · (27 + x²) / (27 + 9x²)` for |x| < 3, ±1 beyond. The derivative is
/// `9(x² − 9)² / (27 + 9x²)²`, never negative, so the curve is monotonic and
/// meets ±1 with zero slope at |x| = 3.
///
/// # Examples
///
/// ```
/// use aulos_core::fast_math::fast_tanh;
///
/// assert_eq!(fast_tanh(0.0), 0.0);
/// assert!((fast_tanh(3.0) - 1.0).abs() < 1e-6);
/// assert!((fast_tanh(-10.0) + 1.0).abs() < 1e-6);
/// ```
#[inline]
pub fn fast_tanh(x: f32) -> f32 {
    if x >= 3.0 {
        1.0
    } else if x <= -3.0 {
        -1.0
    } else {
        let x2 = x * x;
        x * (27.0 + x2) / (27.0 + 9.0 * x2)
    }
}
