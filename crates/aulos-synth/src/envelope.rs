//! Breath envelope: the pressure a player puts into the instrument.
//!
//! Two states, chosen afresh every sample by comparing target and value:
//!
//! | State | Condition | Coefficient |
//! |-------|-----------|-------------|
//! | [`EnvelopeState::Attacking`] | target > value | attack |
//! | [`EnvelopeState::Releasing`] | target ≤ value | release |
//!
//! The update is the asymmetric one-pole `value = target + c·(value − target)`
//! from [`AsymmetricFollower`]. The target comes from [`pressure_target`]:
//! while the gate is open it blends velocity, mod wheel and motion energy;
//! with the gate closed it is zero and the envelope decays naturally.

use aulos_core::AsymmetricFollower;

use crate::params::{ATTACK_MS_RANGE, RELEASE_MS_RANGE, sanitize};

/// Below this value a released envelope counts as silent.
pub const SILENCE_THRESHOLD: f32 = 1e-4;

/// Share of the velocity term that is granted even at velocity 0.
pub const VELOCITY_FLOOR: f32 = 0.2;
/// Weight of the velocity term in the pressure target.
pub const VELOCITY_WEIGHT: f32 = 0.55;
/// Weight of the mod wheel in the pressure target.
pub const MOD_WHEEL_WEIGHT: f32 = 0.75;
/// Weight of the motion energy in the pressure target.
pub const MOTION_WEIGHT: f32 = 0.60;

/// Which time constant the envelope used on its last step.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnvelopeState {
    /// Moving up toward a higher target.
    Attacking,
    /// Holding or falling toward a lower target.
    #[default]
    Releasing,
}

/// Pressure the envelope should move toward.
///
/// ```text
/// gate on:  clamp(0.55·(0.2 + 0.8·velocity) + 0.75·mod_wheel + 0.60·motion, 0, 1)
/// gate off: 0
/// ```
///
/// Velocity alone makes the note speak; the mod wheel and motion energy hold
/// it up. Pass `motion = 0` when motion sustain is disabled.
///
/// ```rust
/// use aulos_synth::pressure_target;
///
/// assert!((pressure_target(true, 1.0, 0.0, 0.0) - 0.55).abs() < 1e-6);
/// assert_eq!(pressure_target(true, 1.0, 1.0, 1.0), 1.0);
/// assert_eq!(pressure_target(false, 1.0, 1.0, 1.0), 0.0);
/// ```
#[inline]
pub fn pressure_target(gate: bool, velocity: f32, mod_wheel: f32, motion: f32) -> f32 {
    if !gate {
        return 0.0;
    }
    let speak = VELOCITY_FLOOR + (1.0 - VELOCITY_FLOOR) * velocity;
    let target = speak * VELOCITY_WEIGHT + mod_wheel * MOD_WHEEL_WEIGHT + motion * MOTION_WEIGHT;
    sanitize(target, 0.0, 1.0, 0.0)
}

/// Gated asymmetric breath envelope.
#[derive(Debug, Clone)]
pub struct BreathEnvelope {
    follower: AsymmetricFollower,
    state: EnvelopeState,
}

impl Default for BreathEnvelope {
    fn default() -> Self {
        Self::new(48000.0, 25.0, 180.0)
    }
}

impl BreathEnvelope {
    /// Create an envelope at rest.
    pub fn new(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        let mut env = Self {
            follower: AsymmetricFollower::new(sample_rate, ATTACK_MS_RANGE.0, RELEASE_MS_RANGE.0),
            state: EnvelopeState::Releasing,
        };
        env.set_times(attack_ms, release_ms);
        env
    }

    /// Set attack and release times in ms (attack ≥ 1 ms, release ≥ 5 ms).
    ///
    /// Coefficients are only recomputed for times that changed.
    pub fn set_times(&mut self, attack_ms: f32, release_ms: f32) {
        let attack_ms = sanitize(attack_ms, ATTACK_MS_RANGE.0, ATTACK_MS_RANGE.1, 25.0);
        let release_ms = sanitize(release_ms, RELEASE_MS_RANGE.0, RELEASE_MS_RANGE.1, 180.0);
        if attack_ms != self.follower.attack_ms() {
            self.follower.set_attack_ms(attack_ms);
        }
        if release_ms != self.follower.release_ms() {
            self.follower.set_release_ms(release_ms);
        }
    }

    /// Update the sample rate and recompute coefficients.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.follower.set_sample_rate(sample_rate);
    }

    /// Step one sample toward `target` and return the envelope value.
    #[inline]
    pub fn process(&mut self, target: f32) -> f32 {
        self.state = if self.follower.is_rising_toward(target) {
            EnvelopeState::Attacking
        } else {
            EnvelopeState::Releasing
        };
        self.follower.process(target)
    }

    /// Current envelope value.
    #[inline]
    pub fn value(&self) -> f32 {
        self.follower.value()
    }

    /// State used on the last step.
    pub fn state(&self) -> EnvelopeState {
        self.state
    }

    /// Attack coefficient in `[0, 1)`.
    pub fn attack_coeff(&self) -> f32 {
        self.follower.attack_coeff()
    }

    /// Release coefficient in `[0, 1)`.
    pub fn release_coeff(&self) -> f32 {
        self.follower.release_coeff()
    }

    /// Whether the envelope has decayed below [`SILENCE_THRESHOLD`].
    pub fn is_silent(&self) -> bool {
        self.follower.value() < SILENCE_THRESHOLD
    }

    /// Drop to zero.
    pub fn reset(&mut self) {
        self.follower.reset();
        self.state = EnvelopeState::Releasing;
    }
}
