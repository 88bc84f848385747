//! Tone shaping: a brightness tilt from a highpass/lowpass pair.
//!
//! ```text
//! highpass corner = 40 + (1 − tone)·120 Hz     (dark → more low cleanup)
//! lowpass corner  = 4500 + tone·11500 Hz       (bright → higher lowpass)
//! ```
//!
//! Both are Butterworth RBJ biquads redesigned on every sample, in step with
//! the resonators.

use aulos_core::{Biquad, highpass_coefficients, lowpass_coefficients};
use core::f32::consts::FRAC_1_SQRT_2;

/// Highpass corner at full brightness, in Hz.
pub const HIGHPASS_BASE_HZ: f32 = 40.0;
/// Extra highpass corner at full darkness, in Hz.
pub const HIGHPASS_DARK_HZ: f32 = 120.0;
/// Lowpass corner at full darkness, in Hz.
pub const LOWPASS_BASE_HZ: f32 = 4500.0;
/// Extra lowpass corner at full brightness, in Hz.
pub const LOWPASS_BRIGHT_HZ: f32 = 11500.0;

/// Corners `(highpass, lowpass)` in Hz for a tone setting in `[0, 1]`.
#[inline]
pub fn tone_corners(tone: f32) -> (f32, f32) {
    (
        HIGHPASS_BASE_HZ + (1.0 - tone) * HIGHPASS_DARK_HZ,
        LOWPASS_BASE_HZ + tone * LOWPASS_BRIGHT_HZ,
    )
}

/// Highpass into lowpass, retuned from the tone control.
#[derive(Debug, Clone)]
pub struct ToneShaper {
    highpass: Biquad,
    lowpass: Biquad,
    sample_rate: f32,
}

impl Default for ToneShaper {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl ToneShaper {
    /// Create a tone stage at a neutral 60 Hz / 14 kHz setting.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            highpass: Biquad::with_coefficients(highpass_coefficients(
                60.0,
                FRAC_1_SQRT_2,
                sample_rate,
            )),
            lowpass: Biquad::with_coefficients(lowpass_coefficients(
                14000.0,
                FRAC_1_SQRT_2,
                sample_rate,
            )),
            sample_rate,
        }
    }

    /// Update the sample rate; coefficients follow on the next sample.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
    }

    /// Clear both filters.
    pub fn reset(&mut self) {
        self.highpass.clear();
        self.lowpass.clear();
    }

    /// Redesign both filters for `tone` and process one sample.
    #[inline]
    pub fn process(&mut self, x: f32, tone: f32) -> f32 {
        let (hp_hz, lp_hz) = tone_corners(tone);
        self.highpass.set_coefficients(highpass_coefficients(
            hp_hz,
            FRAC_1_SQRT_2,
            self.sample_rate,
        ));
        self.lowpass.set_coefficients(lowpass_coefficients(
            lp_hz,
            FRAC_1_SQRT_2,
            self.sample_rate,
        ));
        self.lowpass.process(self.highpass.process(x))
    }
}
