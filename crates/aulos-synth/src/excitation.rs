//! Excitation: the raw breath before it reaches the resonators.
//!
//! ```text
//! noise     = (1 − color)·white + color·pink
//! excite    = noise·(1 − 0.35·resistance) + sin(anchor)·0.15·sine_anchor
//! ```
//!
//! The sine anchor is a quiet oscillator at the rendered pitch. It is not a
//! tone source of its own; it gives the pitch resonator something periodic
//! to lock onto so intonation reads clearly even with a lot of noise. Its
//! phase belongs to the voice, so two instruments never share it.

use aulos_core::{NoiseGenerator, Phasor};

/// How much full resistance removes from the raw noise.
pub const RESISTANCE_NOISE_CUT: f32 = 0.35;

/// Level of the sine anchor at `sine_anchor = 1`.
pub const ANCHOR_LEVEL: f32 = 0.15;

/// Noise source plus sine anchor.
#[derive(Debug, Clone)]
pub struct Excitation {
    noise: NoiseGenerator,
    anchor: Phasor,
}

impl Default for Excitation {
    fn default() -> Self {
        Self::new(aulos_core::noise::DEFAULT_SEED)
    }
}

impl Excitation {
    /// Create an excitation stage with a noise seed.
    pub fn new(seed: u32) -> Self {
        Self {
            noise: NoiseGenerator::new(seed),
            anchor: Phasor::new(),
        }
    }

    /// Restart the noise sequence from its seed.
    pub fn reseed(&mut self) {
        self.noise.reset();
    }

    /// Seed of the noise generator.
    pub fn seed(&self) -> u32 {
        self.noise.seed()
    }

    /// Zero the anchor phase; the noise sequence keeps running.
    pub fn reset(&mut self) {
        self.anchor.reset();
    }

    /// Anchor phase in turns, `[0, 1)`.
    pub fn anchor_phase(&self) -> f32 {
        self.anchor.phase()
    }

    /// One sample of excitation at pitch `hz`.
    ///
    /// `noise_color`, `sine_anchor` and `resistance` are expected in `[0, 1]`.
    #[inline]
    pub fn process(
        &mut self,
        hz: f32,
        sample_rate: f32,
        noise_color: f32,
        sine_anchor: f32,
        resistance: f32,
    ) -> f32 {
        let n = self.noise.next_sample();
        let noise = (1.0 - noise_color) * n.white + noise_color * n.pink;
        let sine = self.anchor.next_sine(hz, sample_rate);
        noise * (1.0 - RESISTANCE_NOISE_CUT * resistance) + sine * (ANCHOR_LEVEL * sine_anchor)
    }
}
