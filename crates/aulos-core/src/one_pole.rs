//! One-pole lowpass filter for control-signal smoothing.
//!
//! A single-pole IIR lowpass with the difference equation:
//!
//! ```text
//! y[n] = x[n] + coeff * (y[n-1] - x[n])
//! ```
//!
//! where `coeff = exp(-2π * freq / sample_rate)`.
//!
//! The instrument uses it to take the edge off raw controller derivatives
//! before they become motion energy: MIDI controllers move in steps, and
//! the derivative of a step is a one-sample spike.
//!
//! # Usage
//!
//! ```rust
//! use aulos_core::OnePole;
//!
//! let mut lp = OnePole::new(48000.0, 10.0);
//! let filtered = lp.process(1.0);
//! assert!(filtered < 0.01);
//! ```
//!
//! # Reference
//!
//! Julius O. Smith III, "Introduction to Digital Filters with Audio Applications",
//! Section: One-Pole Filter.

use crate::flush_denormal;
use libm::expf;

/// One-pole (6 dB/oct) lowpass filter.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1) for stable operation
/// - `state` is flushed to zero when below 1e-20 (denormal protection)
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    freq: f32,
}

impl Default for OnePole {
    fn default() -> Self {
        Self::new(48000.0, 10.0)
    }
}

impl OnePole {
    /// Create a new one-pole lowpass filter.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `freq_hz` - Cutoff frequency in Hz
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        let mut filter = Self {
            state: 0.0,
            coeff: 0.0,
            sample_rate,
            freq: freq_hz,
        };
        filter.recalculate_coeff();
        filter
    }

    /// Set the cutoff frequency and recalculate the coefficient.
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.freq = freq_hz;
        self.recalculate_coeff();
    }

    /// Cutoff frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.freq
    }

    /// Process one sample through the lowpass filter.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = flush_denormal(input + self.coeff * (self.state - input));
        self.state
    }

    /// Last output value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.state
    }

    /// Reset filter state to zero.
    pub fn reset(&mut self) {
        self.state = 0.0;
    }

    /// Update sample rate and recalculate the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// `coeff = exp(-2π * freq / sample_rate)`, or 0 (pass-through) when the
    /// sample rate is not positive.
    fn recalculate_coeff(&mut self) {
        self.coeff = if self.sample_rate > 0.0 {
            expf(-core::f32::consts::TAU * self.freq.max(0.0) / self.sample_rate).min(1.0)
        } else {
            0.0
        };
    }
}
