//! Mathematical utility functions for DSP.
//!
//! Provides common DSP math operations used throughout the instrument.
//! All functions are allocation-free and suitable for `no_std`.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] - Convert dB to linear gain
//!
//! # Time Constants
//!
//! - [`time_constant_coeff`] - One-pole coefficient from a time in milliseconds
//! - [`ms_to_samples`] - Time conversion
//!
//! # Waveshaping / Clipping
//!
//! | Function | Character | Use Case |
//! |----------|-----------|----------|
//! | [`soft_clip`] | Smooth, odd-symmetric | Warmth stage |
//! | [`hard_clip`] | Brick wall | Final safety clamp |

use crate::fast_math::fast_tanh;
use libm::{expf, powf};

/// Shortest time constant accepted by [`time_constant_coeff`], in seconds.
///
/// Guards the exponential against a zero or negative time.
pub const MIN_TIME_CONSTANT_S: f32 = 0.0001;

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use aulos_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// One-pole follower coefficient for a time constant in milliseconds.
///
/// `coeff = exp(-1 / (max(1e-4, ms / 1000) * sample_rate))`, used as
/// `current = target + coeff * (current - target)`. After one time constant
/// the follower has covered ~63.2% of the distance to its target.
///
/// A non-positive or non-finite sample rate yields `0.0` (instant response)
/// instead of a NaN.
///
/// # Example
/// ```rust
/// use aulos_core::time_constant_coeff;
///
/// let c = time_constant_coeff(10.0, 48000.0);
/// assert!(c > 0.99 && c < 1.0);
/// assert_eq!(time_constant_coeff(10.0, 0.0), 0.0);
/// ```
#[inline]
pub fn time_constant_coeff(ms: f32, sample_rate: f32) -> f32 {
    if !(sample_rate.is_finite() && sample_rate > 0.0) {
        return 0.0;
    }
    let tau = (ms / 1000.0).max(MIN_TIME_CONSTANT_S);
    expf(-1.0 / (tau * sample_rate))
}

/// Convert a MIDI note number to frequency in Hz (A4 = 69 = 440 Hz).
///
/// # Example
/// ```rust
/// use aulos_core::midi_to_freq;
///
/// assert!((midi_to_freq(69) - 440.0).abs() < 1e-3);
/// assert!((midi_to_freq(81) - 880.0).abs() < 1e-2);
/// ```
#[inline]
pub fn midi_to_freq(note: u8) -> f32 {
    440.0 * powf(2.0, (f32::from(note) - 69.0) / 12.0)
}

/// Soft clip with a rational tanh curve.
///
/// Monotonic, odd-symmetric, unity slope at the origin, and reaches ±1
/// exactly at |x| = 3. See [`fast_tanh`].
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    fast_tanh(x)
}

/// Hard clip to ±threshold range.
///
/// # Arguments
/// * `x` - Input sample
/// * `threshold` - Clipping threshold
///
/// # Returns
/// Hard-clipped output in range [-threshold, threshold]
#[inline]
pub fn hard_clip(x: f32, threshold: f32) -> f32 {
    x.clamp(-threshold, threshold)
}

/// Linear interpolation between two values.
///
/// # Arguments
/// * `a` - Start value (at t=0)
/// * `b` - End value (at t=1)
/// * `t` - Interpolation factor (0.0 to 1.0)
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Convert milliseconds to samples.
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// Flush subnormal (denormalized) floats to zero.
///
/// Subnormal floats (~1e-38 to 1e-45) cause severe CPU performance
/// degradation on most architectures. This function replaces values below
/// 1e-20 with zero, providing margin before the IEEE 754 subnormal range.
///
/// Use this on filter and follower state that decays toward zero after a
/// note is released.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}
