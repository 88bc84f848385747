//! Asymmetric one-pole follower.
//!
//! Moves toward a target with one time constant when rising (attack) and
//! another when falling (release):
//!
//! ```text
//! coeff   = target > current ? attack_coeff : release_coeff
//! current = target + coeff * (current - target)
//! ```
//!
//! Coefficients come from [`time_constant_coeff`]. The follower never
//! overshoots: each step covers a fraction `(1 - coeff)` of the remaining
//! distance. The breath envelope and the motion-energy estimator are both
//! built on it.

use crate::flush_denormal;
use crate::math::time_constant_coeff;

/// One-pole follower with separate attack and release times.
///
/// # Example
///
/// ```rust
/// use aulos_core::AsymmetricFollower;
///
/// let mut env = AsymmetricFollower::new(48000.0, 5.0, 200.0);
/// let rising = env.process(1.0);
/// assert!(rising > 0.0 && rising < 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct AsymmetricFollower {
    /// Current follower value
    value: f32,
    /// Attack coefficient
    attack_coeff: f32,
    /// Release coefficient
    release_coeff: f32,
    /// Sample rate
    sample_rate: f32,
    /// Attack time in ms (for recalculation)
    attack_ms: f32,
    /// Release time in ms (for recalculation)
    release_ms: f32,
}

impl Default for AsymmetricFollower {
    fn default() -> Self {
        Self::new(48000.0, 10.0, 100.0)
    }
}

impl AsymmetricFollower {
    /// Create a follower resting at 0.
    pub fn new(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut follower = Self {
            value: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
            sample_rate,
            attack_ms,
            release_ms,
        };
        follower.recalculate_coefficients();
        follower
    }

    /// Set the attack time in milliseconds.
    pub fn set_attack_ms(&mut self, attack_ms: f32) {
        self.attack_ms = attack_ms;
        self.attack_coeff = time_constant_coeff(attack_ms, self.sample_rate);
    }

    /// Attack time in milliseconds.
    pub fn attack_ms(&self) -> f32 {
        self.attack_ms
    }

    /// Set the release time in milliseconds.
    pub fn set_release_ms(&mut self, release_ms: f32) {
        self.release_ms = release_ms;
        self.release_coeff = time_constant_coeff(release_ms, self.sample_rate);
    }

    /// Release time in milliseconds.
    pub fn release_ms(&self) -> f32 {
        self.release_ms
    }

    /// Attack coefficient in `[0, 1)`.
    pub fn attack_coeff(&self) -> f32 {
        self.attack_coeff
    }

    /// Release coefficient in `[0, 1)`.
    pub fn release_coeff(&self) -> f32 {
        self.release_coeff
    }

    /// Update sample rate and recalculate coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coefficients();
    }

    /// Whether the next step toward `target` uses the attack coefficient.
    #[inline]
    pub fn is_rising_toward(&self, target: f32) -> bool {
        target > self.value
    }

    /// Step one sample toward `target` and return the new value.
    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        let coeff = if self.is_rising_toward(target) {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.value = flush_denormal(target + coeff * (self.value - target));
        self.value
    }

    /// Current value without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.value
    }

    /// Reset the value to 0.
    pub fn reset(&mut self) {
        self.value = 0.0;
    }

    fn recalculate_coefficients(&mut self) {
        self.attack_coeff = time_constant_coeff(self.attack_ms, self.sample_rate);
        self.release_coeff = time_constant_coeff(self.release_ms, self.sample_rate);
    }
}
