//! Saturation and output safety.
//!
//! `y = clamp(soft_clip(y·(1.2 + 0.9·resistance))·gain, −1, 1)`
//!
//! [`soft_clip`] is the rational tanh approximation from aulos-core:
//! monotonic, odd, and flat at ±1 beyond |x| = 3. The drive grows with
//! resistance, so a tighter embouchure also sounds a little harder. The
//! final clamp guarantees the `[-1, 1]` output bound whatever the gain.

use aulos_core::{hard_clip, soft_clip};

/// Drive at zero resistance.
pub const BASE_DRIVE: f32 = 1.2;
/// Extra drive at full resistance.
pub const RESISTANCE_DRIVE: f32 = 0.9;

/// Pre-saturation drive for a resistance in `[0, 1]`.
#[inline]
pub fn drive(resistance: f32) -> f32 {
    BASE_DRIVE + RESISTANCE_DRIVE * resistance
}

/// Saturate, apply the linear output gain, and clamp to `[-1, 1]`.
///
/// ```rust
/// use aulos_synth::saturate;
///
/// assert_eq!(saturate(0.0, 0.4, 1.0), 0.0);
/// assert_eq!(saturate(100.0, 0.0, 4.0), 1.0);
/// assert_eq!(saturate(-100.0, 1.0, 4.0), -1.0);
/// ```
#[inline]
pub fn saturate(y: f32, resistance: f32, output_gain: f32) -> f32 {
    let out = soft_clip(y * drive(resistance)) * output_gain;
    // NaN never reaches here from the core, but a NaN in must not escape
    if out.is_nan() { 0.0 } else { hard_clip(out, 1.0) }
}
