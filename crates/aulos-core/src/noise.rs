//! Seeded white and pink noise.
//!
//! The breath excitation is a blend of white and pink noise drawn from a
//! single deterministic generator: the same seed reproduces the same
//! sequence on every host.
//!
//! # White noise
//!
//! Xorshift32 PRNG mapped to `[-1, 1]`. Broadband and cheap.
//!
//! # Pink noise
//!
//! Each white sample is also fed through three parallel leaky integrators
//! (Paul Kellet's "economy" pinking filter). The pole radii are spaced so
//! the summed response falls at roughly −3 dB/octave across the audio band.
//! The sum is scaled down to a level comparable to the white stream and
//! clamped to `[-1, 1]`; every pole is inside the unit circle, so there is
//! no DC runaway.
//!
//! # Reference
//!
//! Paul Kellet, "Filter to make pink noise from white", music-dsp archive (1999).

use crate::flush_denormal;

/// Default seed for a fresh generator.
pub const DEFAULT_SEED: u32 = 0x1234_5678;

/// Level compensation applied to the pinking filter sum.
const PINK_GAIN: f32 = 0.11;

/// One white and one pink sample produced from the same PRNG draw.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NoiseSample {
    /// Flat-spectrum sample in `[-1, 1]`.
    pub white: f32,
    /// 1/f-shaped sample in `[-1, 1]`.
    pub pink: f32,
}

/// Deterministic white + pink noise generator.
///
/// # Example
///
/// ```rust
/// use aulos_core::NoiseGenerator;
///
/// let mut a = NoiseGenerator::new(42);
/// let mut b = NoiseGenerator::new(42);
/// for _ in 0..256 {
///     assert_eq!(a.next_sample(), b.next_sample());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct NoiseGenerator {
    /// Xorshift32 state, never zero
    state: u32,
    /// Seed restored by [`reset`](Self::reset)
    seed: u32,
    // Pinking filter integrators
    b0: f32,
    b1: f32,
    b2: f32,
}

impl Default for NoiseGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl NoiseGenerator {
    /// Create a generator from a seed.
    ///
    /// A zero seed would lock xorshift at zero forever, so it is replaced by
    /// [`DEFAULT_SEED`].
    pub fn new(seed: u32) -> Self {
        let seed = if seed == 0 { DEFAULT_SEED } else { seed };
        Self {
            state: seed,
            seed,
            b0: 0.0,
            b1: 0.0,
            b2: 0.0,
        }
    }

    /// Seed this generator was created with.
    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Restart the sequence from `seed` and clear the pinking filter.
    pub fn reseed(&mut self, seed: u32) {
        *self = Self::new(seed);
        #[cfg(feature = "tracing")]
        tracing::trace!(seed = self.seed, "noise reseeded");
    }

    /// Restart the sequence from the original seed.
    pub fn reset(&mut self) {
        self.reseed(self.seed);
    }

    /// Draw one white sample in `[-1, 1]` without touching the pink filter.
    #[inline]
    pub fn next_white(&mut self) -> f32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        // Top 24 bits → [0, 1) → [-1, 1)
        (x >> 8) as f32 * (2.0 / 16_777_216.0) - 1.0
    }

    /// Draw one white sample and derive the matching pink sample from it.
    #[inline]
    pub fn next_sample(&mut self) -> NoiseSample {
        let white = self.next_white();
        self.b0 = flush_denormal(0.99765 * self.b0 + white * 0.099_046);
        self.b1 = flush_denormal(0.963 * self.b1 + white * 0.296_516_4);
        self.b2 = flush_denormal(0.57 * self.b2 + white * 1.052_691_3);
        let pink = (self.b0 + self.b1 + self.b2 + white * 0.1848) * PINK_GAIN;
        NoiseSample {
            white,
            pink: pink.clamp(-1.0, 1.0),
        }
    }
}
