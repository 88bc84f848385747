//! The voice controller: pitch glide, note lifecycle and tail-off.
//!
//! A [`BreathVoice`] wraps a [`BreathCore`] with the state a played note
//! needs on top of the DSP:
//!
//! - **Glide.** `current_hz` follows `target_hz` with the one-pole update
//!   `current = target + coeff·(current − target)`. A note started while the
//!   voice is active glides from wherever the pitch is; a note started from
//!   silence snaps.
//! - **Stopping.** A hard stop closes the gate, resets the core and makes the
//!   voice inactive at once. A tail-off stop only closes the gate; the voice
//!   stays active while the breath decays and goes inactive on the first
//!   sample the envelope falls below the silence threshold.
//!
//! Discrete controls take effect on the next rendered sample.

use aulos_core::{
    Resonator, StateVariableFilter, midi_to_freq, noise::DEFAULT_SEED, time_constant_coeff,
};

use crate::breath::{BreathCore, PITCH_RANGE_HZ, mix_into};
use crate::event::{MOD_WHEEL_CC, normalize_7bit, normalize_pitch_wheel};
use crate::params::{BreathParams, sanitize};

/// Portamento time constant of a new voice, in ms.
pub const DEFAULT_GLIDE_MS: f32 = 60.0;
/// Accepted portamento range in ms. Times below 1 ms glide as 1 ms.
pub const GLIDE_MS_RANGE: (f32, f32) = (0.0, 10_000.0);

/// The single sound-producing voice.
///
/// # Example
///
/// ```rust
/// use aulos_synth::BreathVoice;
///
/// let mut voice = BreathVoice::new();
/// voice.prepare(48000.0, 256, 1);
/// voice.start_note(69, 0.9);
///
/// let mut out = vec![0.0f32; 256];
/// voice.render(&mut [&mut out], 0, 256);
/// assert!(voice.is_active());
///
/// // A different note glides from 440 Hz
/// voice.start_note(72, 0.9);
/// assert_eq!(voice.current_hz(), 440.0);
/// ```
#[derive(Debug, Clone)]
pub struct BreathVoice<R: Resonator = StateVariableFilter> {
    core: BreathCore<R>,
    current_hz: f32,
    target_hz: f32,
    glide_ms: f32,
    glide_coeff: f32,
    active: bool,
    tail_off: bool,
    note: Option<u8>,
}

impl BreathVoice {
    /// Create a voice with the default noise seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a voice whose noise generator starts from `seed`.
    pub fn with_seed(seed: u32) -> Self {
        Self::with_resonators(seed)
    }
}

impl Default for BreathVoice {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resonator + Default> BreathVoice<R> {
    /// Create a voice over any default-constructible resonator.
    pub fn with_resonators(seed: u32) -> Self {
        let core = BreathCore::with_resonators(seed);
        let glide_coeff = time_constant_coeff(DEFAULT_GLIDE_MS, core.sample_rate());
        Self {
            current_hz: core.pitch_hz(),
            target_hz: core.pitch_hz(),
            core,
            glide_ms: DEFAULT_GLIDE_MS,
            glide_coeff,
            active: false,
            tail_off: false,
            note: None,
        }
    }
}

impl<R: Resonator> BreathVoice<R> {
    /// Prepare the core and silence the voice.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize) {
        self.core.prepare(sample_rate, max_block_size, num_channels);
        self.update_glide_coeff();
        self.silence();
    }

    /// Silence the voice and zero all running state.
    pub fn reset(&mut self) {
        self.core.reset();
        self.silence();
    }

    fn silence(&mut self) {
        self.core.set_gate(false);
        self.active = false;
        self.tail_off = false;
        self.note = None;
    }

    /// Set the portamento time constant in ms.
    pub fn set_glide_ms(&mut self, glide_ms: f32) {
        self.glide_ms = sanitize(glide_ms, GLIDE_MS_RANGE.0, GLIDE_MS_RANGE.1, DEFAULT_GLIDE_MS);
        self.update_glide_coeff();
    }

    fn update_glide_coeff(&mut self) {
        self.glide_coeff = time_constant_coeff(self.glide_ms.max(1.0), self.core.sample_rate());
    }

    /// Apply a parameter set to the core.
    pub fn set_params(&mut self, params: &BreathParams) {
        self.core.set_params(params);
    }

    /// Start `note` at `velocity` in `[0, 1]` and open the gate.
    ///
    /// The pitch glides when the voice is already sounding (including a
    /// tail-off) and snaps otherwise.
    pub fn start_note(&mut self, note: u8, velocity: f32) {
        self.target_hz = midi_to_freq(note).clamp(PITCH_RANGE_HZ.0, PITCH_RANGE_HZ.1);
        if !self.active {
            self.current_hz = self.target_hz;
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(note, velocity, glide = self.active, "note on");

        self.core.set_velocity(velocity);
        self.core.set_pitch_hz(self.current_hz);
        self.core.set_gate(true);
        self.active = true;
        self.tail_off = false;
        self.note = Some(note);
    }

    /// Close the gate.
    ///
    /// With `allow_tail_off` the breath decays naturally and the voice stays
    /// active until it is silent; without, the voice stops at once.
    pub fn stop_note(&mut self, allow_tail_off: bool) {
        #[cfg(feature = "tracing")]
        tracing::debug!(note = ?self.note, allow_tail_off, "note off");

        self.note = None;
        if allow_tail_off && self.active {
            self.core.set_gate(false);
            self.tail_off = true;
        } else {
            self.reset();
        }
    }

    /// Map a 14-bit pitch wheel position to the core's pitch bend.
    pub fn pitch_wheel_moved(&mut self, value: u16) {
        self.core.set_pitch_bend(normalize_pitch_wheel(value));
    }

    /// Apply a controller change; only the mod wheel is interpreted.
    pub fn controller_moved(&mut self, number: u8, value: u8) {
        if number == MOD_WHEEL_CC {
            self.core.set_mod_wheel(normalize_7bit(value));
        }
    }

    /// Apply a channel aftertouch change.
    pub fn aftertouch_changed(&mut self, value: u8) {
        self.core.set_aftertouch(normalize_7bit(value));
    }

    /// Add `num_samples` samples into every channel from `start`.
    ///
    /// An inactive voice writes nothing. A tail-off that reaches silence
    /// ends the voice and leaves the rest of the region untouched.
    pub fn render(&mut self, output: &mut [&mut [f32]], start: usize, num_samples: usize) {
        if !self.active {
            return;
        }
        for index in start..start.saturating_add(num_samples) {
            self.current_hz = self.target_hz + self.glide_coeff * (self.current_hz - self.target_hz);
            self.core.set_pitch_hz(self.current_hz);
            let sample = self.core.next_sample();
            mix_into(output, index, sample);

            if self.tail_off && self.core.is_silent() {
                #[cfg(feature = "tracing")]
                tracing::debug!("tail-off complete");
                self.reset();
                break;
            }
        }
    }

    /// Whether the voice is sounding (including a tail-off).
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Whether the voice is decaying after a tail-off stop.
    pub fn is_tailing_off(&self) -> bool {
        self.tail_off
    }

    /// Note being held, if any.
    pub fn note(&self) -> Option<u8> {
        self.note
    }

    /// Glided pitch in Hz.
    pub fn current_hz(&self) -> f32 {
        self.current_hz
    }

    /// Pitch the glide is heading to.
    pub fn target_hz(&self) -> f32 {
        self.target_hz
    }

    /// Portamento time constant in ms.
    pub fn glide_ms(&self) -> f32 {
        self.glide_ms
    }

    /// Per-sample glide coefficient.
    pub fn glide_coeff(&self) -> f32 {
        self.glide_coeff
    }

    /// The DSP core.
    pub fn core(&self) -> &BreathCore<R> {
        &self.core
    }
}
