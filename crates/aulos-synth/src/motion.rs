//! Motion energy: breath pressure from controller movement.
//!
//! A wind player keeps a note alive by blowing; on a keyboard the closest
//! gesture is *moving* something. [`MotionEnergy`] turns the rate of change of
//! one control into a bounded, smoothed energy value, and [`MotionSustain`]
//! sums four of them (mod wheel, aftertouch, pitch bend, pitch) into the
//! motion term of the breath envelope's pressure target.
//!
//! # Signal flow
//!
//! ```text
//! value ─► |Δ|·fs ─► OnePole (10 Hz) ─► ×sensitivity×0.5 ─► min(1) ─► follower ─► energy
//! ```
//!
//! The derivative of a stepped MIDI controller is a train of one-sample
//! spikes; the 10 Hz one-pole spreads each spike over ~16 ms so a turning
//! wheel reads as continuous energy. The asymmetric follower (20 ms attack,
//! 400 ms release) then makes energy arrive quickly and fade slowly, which is
//! what lets movement *sustain* a note.

use aulos_core::{AsymmetricFollower, OnePole};

/// Corner of the rate-smoothing lowpass in Hz.
pub const RATE_SMOOTHING_HZ: f32 = 10.0;

/// Energy per unit of (control range per second) at full sensitivity.
///
/// Sweeping a 0–1 control end to end in one second at sensitivity 1 yields
/// energy 0.5; faster wiggles saturate at 1.
pub const ENERGY_SCALE: f32 = 0.5;

/// Energy follower attack in ms.
pub const ENERGY_ATTACK_MS: f32 = 20.0;

/// Energy follower release in ms.
pub const ENERGY_RELEASE_MS: f32 = 400.0;

/// Weight of the pitch cue in the motion sum.
pub const PITCH_WEIGHT: f32 = 0.5;

/// Rate-of-change energy estimator for one control.
///
/// # Example
///
/// ```rust
/// use aulos_synth::MotionEnergy;
///
/// let mut me = MotionEnergy::new(48000.0);
/// let mut e = 0.0;
/// for i in 0..4800 {
///     // 4 Hz wiggle over the full range
///     let v = 0.5 + 0.5 * libm::sinf(i as f32 * 4.0 * core::f32::consts::TAU / 48000.0);
///     e = me.process(v, 1.0);
/// }
/// assert!(e > 0.5);
/// ```
#[derive(Debug, Clone)]
pub struct MotionEnergy {
    previous: f32,
    /// False until the first value after a reset has been seen
    primed: bool,
    rate: OnePole,
    follower: AsymmetricFollower,
    sample_rate: f32,
}

impl Default for MotionEnergy {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl MotionEnergy {
    /// Create an estimator at rest.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            previous: 0.0,
            primed: false,
            rate: OnePole::new(sample_rate, RATE_SMOOTHING_HZ),
            follower: AsymmetricFollower::new(sample_rate, ENERGY_ATTACK_MS, ENERGY_RELEASE_MS),
            sample_rate,
        }
    }

    /// Update the sample rate; the time constants stay fixed in ms/Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.rate.set_sample_rate(sample_rate);
        self.follower.set_sample_rate(sample_rate);
    }

    /// Observe `value` and return the energy in `[0, 1]`.
    ///
    /// `sensitivity` is clamped to `[0, 1]`. The first call after
    /// [`reset`](Self::reset) only records the value: a control resting
    /// away from zero carries no motion.
    #[inline]
    pub fn process(&mut self, value: f32, sensitivity: f32) -> f32 {
        let value = if value.is_finite() { value } else { self.previous };
        let delta = if self.primed {
            (value - self.previous).abs()
        } else {
            self.primed = true;
            0.0
        };
        self.previous = value;

        let rate = self.rate.process(delta * self.sample_rate);
        let sensitivity = if sensitivity.is_nan() {
            0.0
        } else {
            sensitivity.clamp(0.0, 1.0)
        };
        let target = (rate * sensitivity * ENERGY_SCALE).min(1.0);
        self.follower.process(target).clamp(0.0, 1.0)
    }

    /// Current energy without advancing.
    #[inline]
    pub fn energy(&self) -> f32 {
        self.follower.value().clamp(0.0, 1.0)
    }

    /// Forget the previous value and drop the energy to zero.
    pub fn reset(&mut self) {
        self.previous = 0.0;
        self.primed = false;
        self.rate.reset();
        self.follower.reset();
    }
}

/// The four motion estimators of a voice and their combination.
#[derive(Debug, Clone, Default)]
pub struct MotionSustain {
    mod_wheel: MotionEnergy,
    aftertouch: MotionEnergy,
    pitch_bend: MotionEnergy,
    pitch: MotionEnergy,
}

impl MotionSustain {
    /// Create four estimators at rest.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            mod_wheel: MotionEnergy::new(sample_rate),
            aftertouch: MotionEnergy::new(sample_rate),
            pitch_bend: MotionEnergy::new(sample_rate),
            pitch: MotionEnergy::new(sample_rate),
        }
    }

    /// Update the sample rate of every estimator.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.mod_wheel.set_sample_rate(sample_rate);
        self.aftertouch.set_sample_rate(sample_rate);
        self.pitch_bend.set_sample_rate(sample_rate);
        self.pitch.set_sample_rate(sample_rate);
    }

    /// Feed one sample of every control and return the combined motion in
    /// `[0, 1]`.
    ///
    /// `pitch_cue` is the rendered pitch scaled to roughly unit range
    /// (`hz / 2000`); it counts half as much as the controllers.
    #[inline]
    pub fn process(
        &mut self,
        mod_wheel: f32,
        aftertouch: f32,
        pitch_bend: f32,
        pitch_cue: f32,
        sensitivity: f32,
    ) -> f32 {
        let e_mw = self.mod_wheel.process(mod_wheel, sensitivity);
        let e_at = self.aftertouch.process(aftertouch, sensitivity);
        let e_pb = self.pitch_bend.process(pitch_bend, sensitivity);
        let e_p = self.pitch.process(pitch_cue, sensitivity);
        (e_mw + e_at + e_pb + PITCH_WEIGHT * e_p).min(1.0)
    }

    /// Reset every estimator.
    pub fn reset(&mut self) {
        self.mod_wheel.reset();
        self.aftertouch.reset();
        self.pitch_bend.reset();
        self.pitch.reset();
    }
}
