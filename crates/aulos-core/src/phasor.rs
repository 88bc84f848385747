//! Wrapped phase accumulator.
//!
//! Drives both the vibrato LFO and the audio-rate sine anchor. The frequency
//! is supplied on every call because both follow a gliding pitch or a
//! smoothed rate, so there is no cached increment to go stale.

use core::f32::consts::TAU;
use libm::{floorf, sinf};

use crate::fast_math::fast_sin_turns;

/// Phase accumulator with phase kept in `[0, 1)`.
///
/// # Example
///
/// ```rust
/// use aulos_core::Phasor;
///
/// let mut lfo = Phasor::new();
/// for _ in 0..48000 {
///     let _v = lfo.next_sine_fast(5.0, 48000.0);
///     assert!((0.0..1.0).contains(&lfo.phase()));
/// }
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Phasor {
    /// Current phase position [0.0, 1.0)
    phase: f32,
}

impl Phasor {
    /// Create a phasor at phase 0.
    pub fn new() -> Self {
        Self { phase: 0.0 }
    }

    /// Current phase in turns.
    #[inline]
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Reset phase to 0.
    pub fn reset(&mut self) {
        self.phase = 0.0;
    }

    /// Advance by `freq_hz / sample_rate` turns, wrapping into `[0, 1)`.
    ///
    /// Returns the phase *before* the advance, so the first call after a
    /// reset reads phase 0. A non-positive sample rate holds the phase.
    #[inline]
    pub fn advance(&mut self, freq_hz: f32, sample_rate: f32) -> f32 {
        let current = self.phase;
        if sample_rate > 0.0 {
            let next = self.phase + freq_hz / sample_rate;
            // floorf handles increments above one turn and negative rates
            let wrapped = next - floorf(next);
            self.phase = if wrapped >= 1.0 || !wrapped.is_finite() {
                0.0
            } else {
                wrapped
            };
        }
        current
    }

    /// Sine at the current phase (full-precision `sinf`), then advance.
    #[inline]
    pub fn next_sine(&mut self, freq_hz: f32, sample_rate: f32) -> f32 {
        sinf(self.advance(freq_hz, sample_rate) * TAU)
    }

    /// Sine at the current phase via [`fast_sin_turns`], then advance.
    ///
    /// For control-rate uses such as vibrato.
    #[inline]
    pub fn next_sine_fast(&mut self, freq_hz: f32, sample_rate: f32) -> f32 {
        fast_sin_turns(self.advance(freq_hz, sample_rate))
    }
}
