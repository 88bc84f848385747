//! The per-sample DSP core of the breath instrument.
//!
//! [`BreathCore`] owns every piece of running state a voice needs and turns
//! the current controls into one output sample at a time:
//!
//! ```text
//!  smoothed params ─┬─▶ vibrato LFO ──▶ pitch·2^((2·bend + 0.35·vib)/12) = hz
//!                   │                                   │
//!  mw / at / bend ──┴─▶ motion sustain ◀── hz / 2000 ───┤
//!                             │                         │
//!  gate, velocity, mw ──▶ pressure target ──▶ envelope  │
//!                                                 │     │
//!  noise + sine anchor ──▶ excitation · air · env ┴─▶ filter bank(hz)
//!                                                          │
//!                                  tone shaper ◀───────────┘
//!                                       │
//!                                  saturator ──▶ + every channel
//! ```
//!
//! Nothing in [`next_sample`](BreathCore::next_sample) or
//! [`render`](BreathCore::render) allocates, blocks, or fails. Every setter
//! clamps its input, so the output stays inside `[-1, 1]` whatever the
//! caller passes.

use aulos_core::{
    Phasor, Resonator, SmoothedParam, StateVariableFilter, db_to_linear, noise::DEFAULT_SEED,
};
use libm::exp2f;

use crate::envelope::{BreathEnvelope, EnvelopeState, pressure_target};
use crate::excitation::Excitation;
use crate::filter_bank::FilterBank;
use crate::motion::MotionSustain;
use crate::params::{BreathParams, sanitize};
use crate::saturator::saturate;
use crate::tone::ToneShaper;

/// Sample rate used before [`BreathCore::prepare`] and for invalid rates.
pub const DEFAULT_SAMPLE_RATE: f32 = 48000.0;
/// Accepted sample-rate range in Hz.
pub const SAMPLE_RATE_RANGE: (f32, f32) = (1000.0, 768_000.0);
/// Playable pitch range in Hz.
pub const PITCH_RANGE_HZ: (f32, f32) = (20.0, 12000.0);
/// Pitch bend range in semitones at full deflection.
pub const PITCH_BEND_SEMITONES: f32 = 2.0;
/// Vibrato excursion in semitones at full depth.
pub const VIBRATO_SEMITONES: f32 = 0.35;
/// Scaling of the rendered pitch into the motion estimator.
pub const PITCH_CUE_SCALE: f32 = 1.0 / 2000.0;

/// Ramp time of the timbre controls (air, tone, formant, resistance).
pub const TIMBRE_RAMP_MS: f32 = 20.0;
/// Ramp time of every other smoothed control.
pub const MODULATION_RAMP_MS: f32 = 50.0;

/// Clamp a host sample rate into [`SAMPLE_RATE_RANGE`].
///
/// NaN and rates at or below zero mean "unset" and become
/// [`DEFAULT_SAMPLE_RATE`]; positive rates below the range clamp up to it.
#[inline]
pub fn sanitize_sample_rate(sample_rate: f32) -> f32 {
    if sample_rate <= 0.0 {
        return DEFAULT_SAMPLE_RATE;
    }
    sanitize(
        sample_rate,
        SAMPLE_RATE_RANGE.0,
        SAMPLE_RATE_RANGE.1,
        DEFAULT_SAMPLE_RATE,
    )
}

/// Add `sample` at `index` of every channel long enough to hold it.
#[inline]
pub(crate) fn mix_into(output: &mut [&mut [f32]], index: usize, sample: f32) {
    for channel in output.iter_mut() {
        if let Some(slot) = channel.get_mut(index) {
            *slot += sample;
        }
    }
}

/// One step of every smoothed control.
#[derive(Debug, Clone, Copy)]
struct Controls {
    air: f32,
    tone: f32,
    formant: f32,
    resistance: f32,
    vibrato_depth: f32,
    vibrato_rate_hz: f32,
    noise_color: f32,
    sine_anchor: f32,
    motion_sensitivity: f32,
    output_gain: f32,
}

/// One linear smoother per continuous control.
#[derive(Debug, Clone)]
struct Smoothers {
    air: SmoothedParam,
    tone: SmoothedParam,
    formant: SmoothedParam,
    resistance: SmoothedParam,
    vibrato_depth: SmoothedParam,
    vibrato_rate_hz: SmoothedParam,
    noise_color: SmoothedParam,
    sine_anchor: SmoothedParam,
    motion_sensitivity: SmoothedParam,
    /// Linear gain, ramped after the dB conversion.
    output_gain: SmoothedParam,
}

impl Smoothers {
    fn new(params: &BreathParams, sample_rate: f32) -> Self {
        let timbre = |v: f32| SmoothedParam::with_config(v, sample_rate, TIMBRE_RAMP_MS);
        let modulation = |v: f32| SmoothedParam::with_config(v, sample_rate, MODULATION_RAMP_MS);
        Self {
            air: timbre(params.air),
            tone: timbre(params.tone),
            formant: timbre(params.formant),
            resistance: timbre(params.resistance),
            vibrato_depth: modulation(params.vibrato_depth),
            vibrato_rate_hz: modulation(params.vibrato_rate_hz),
            noise_color: modulation(params.noise_color),
            sine_anchor: modulation(params.sine_anchor),
            motion_sensitivity: modulation(params.motion_sensitivity),
            output_gain: modulation(db_to_linear(params.output_gain_db)),
        }
    }

    /// Recompute ramp lengths; ramps in progress complete immediately.
    fn configure(&mut self, sample_rate: f32) {
        for param in [
            &mut self.air,
            &mut self.tone,
            &mut self.formant,
            &mut self.resistance,
        ] {
            param.reset(sample_rate, TIMBRE_RAMP_MS);
        }
        for param in [
            &mut self.vibrato_depth,
            &mut self.vibrato_rate_hz,
            &mut self.noise_color,
            &mut self.sine_anchor,
            &mut self.motion_sensitivity,
            &mut self.output_gain,
        ] {
            param.reset(sample_rate, MODULATION_RAMP_MS);
        }
    }

    fn set_targets(&mut self, params: &BreathParams) {
        self.air.set_target(params.air);
        self.tone.set_target(params.tone);
        self.formant.set_target(params.formant);
        self.resistance.set_target(params.resistance);
        self.vibrato_depth.set_target(params.vibrato_depth);
        self.vibrato_rate_hz.set_target(params.vibrato_rate_hz);
        self.noise_color.set_target(params.noise_color);
        self.sine_anchor.set_target(params.sine_anchor);
        self.motion_sensitivity.set_target(params.motion_sensitivity);
        self.output_gain.set_target(db_to_linear(params.output_gain_db));
    }

    fn snap(&mut self) {
        for param in [
            &mut self.air,
            &mut self.tone,
            &mut self.formant,
            &mut self.resistance,
            &mut self.vibrato_depth,
            &mut self.vibrato_rate_hz,
            &mut self.noise_color,
            &mut self.sine_anchor,
            &mut self.motion_sensitivity,
            &mut self.output_gain,
        ] {
            param.snap_to_target();
        }
    }

    #[inline]
    fn advance(&mut self) -> Controls {
        Controls {
            air: self.air.advance(),
            tone: self.tone.advance(),
            formant: self.formant.advance(),
            resistance: self.resistance.advance(),
            vibrato_depth: self.vibrato_depth.advance(),
            vibrato_rate_hz: self.vibrato_rate_hz.advance(),
            noise_color: self.noise_color.advance(),
            sine_anchor: self.sine_anchor.advance(),
            motion_sensitivity: self.motion_sensitivity.advance(),
            output_gain: self.output_gain.advance(),
        }
    }
}

/// Complete running state of one breath voice.
///
/// Generic over the [`Resonator`] realization of the filter bank. The state
/// variable filter is the default.
///
/// # Example
///
/// ```rust
/// use aulos_synth::BreathCore;
///
/// let mut core = BreathCore::new();
/// core.prepare(48000.0, 512, 2);
/// core.set_gate(true);
/// core.set_velocity(1.0);
/// core.set_pitch_hz(440.0);
///
/// let mut left = vec![0.0f32; 512];
/// let mut right = vec![0.0f32; 512];
/// core.render(&mut [&mut left, &mut right], 0, 512);
///
/// assert!(left.iter().all(|s| s.abs() <= 1.0));
/// assert_eq!(left, right);
/// ```
#[derive(Debug, Clone)]
pub struct BreathCore<R: Resonator = StateVariableFilter> {
    sample_rate: f32,
    max_block_size: usize,
    num_channels: usize,

    params: BreathParams,
    smoothers: Smoothers,

    // Discrete controls, already clamped
    pitch_hz: f32,
    gate: bool,
    velocity: f32,
    mod_wheel: f32,
    aftertouch: f32,
    pitch_bend: f32,

    vibrato: Phasor,
    motion: MotionSustain,
    envelope: BreathEnvelope,
    excitation: Excitation,
    bank: FilterBank<R>,
    tone: ToneShaper,

    // Last per-sample values, for inspection
    rendered_hz: f32,
    motion_energy: f32,
    target: f32,
}

impl BreathCore {
    /// Create a core with the default noise seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create a core whose noise generator starts from `seed`.
    pub fn with_seed(seed: u32) -> Self {
        Self::with_resonators(seed)
    }
}

impl Default for BreathCore {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resonator + Default> BreathCore<R> {
    /// Create a core over any default-constructible resonator.
    ///
    /// The core runs at [`DEFAULT_SAMPLE_RATE`] until
    /// [`prepare`](Self::prepare) is called.
    pub fn with_resonators(seed: u32) -> Self {
        let sample_rate = DEFAULT_SAMPLE_RATE;
        let params = BreathParams::default();
        Self {
            sample_rate,
            max_block_size: 0,
            num_channels: 0,
            smoothers: Smoothers::new(&params, sample_rate),
            envelope: BreathEnvelope::new(sample_rate, params.attack_ms, params.release_ms),
            params,
            pitch_hz: 440.0,
            gate: false,
            velocity: 0.0,
            mod_wheel: 0.0,
            aftertouch: 0.0,
            pitch_bend: 0.0,
            vibrato: Phasor::new(),
            motion: MotionSustain::new(sample_rate),
            excitation: Excitation::new(seed),
            bank: FilterBank::with_resonators(sample_rate),
            tone: ToneShaper::new(sample_rate),
            rendered_hz: 440.0,
            motion_energy: 0.0,
            target: 0.0,
        }
    }
}

impl<R: Resonator> BreathCore<R> {
    /// Configure for a sample rate, block size and channel count.
    ///
    /// Recomputes every time constant, restarts the noise sequence from its
    /// seed and [`reset`](Self::reset)s all running state. Smoothers land on
    /// the last [`set_params`](Self::set_params) values without a ramp.
    /// The rate goes through [`sanitize_sample_rate`].
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize) {
        let sample_rate = sanitize_sample_rate(sample_rate);
        self.sample_rate = sample_rate;
        self.max_block_size = max_block_size;
        self.num_channels = num_channels;

        self.smoothers.configure(sample_rate);
        self.envelope.set_sample_rate(sample_rate);
        self.motion.set_sample_rate(sample_rate);
        self.bank.set_sample_rate(sample_rate);
        self.tone.set_sample_rate(sample_rate);
        self.excitation.reseed();
        self.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            max_block_size,
            num_channels,
            seed = self.excitation.seed(),
            "breath core prepared"
        );
    }

    /// Zero all running state: envelope, phases, filters, motion estimators.
    ///
    /// Smoothers snap to their targets. Controls, parameters and the noise
    /// sequence position are kept.
    pub fn reset(&mut self) {
        self.smoothers.snap();
        self.envelope.reset();
        self.vibrato.reset();
        self.excitation.reset();
        self.motion.reset();
        self.bank.reset();
        self.tone.reset();
        self.motion_energy = 0.0;
        self.target = 0.0;

        #[cfg(feature = "tracing")]
        tracing::trace!("breath core reset");
    }

    /// Set the base pitch in Hz, clamped to [`PITCH_RANGE_HZ`].
    pub fn set_pitch_hz(&mut self, hz: f32) {
        self.pitch_hz = sanitize(hz, PITCH_RANGE_HZ.0, PITCH_RANGE_HZ.1, self.pitch_hz);
    }

    /// Open or close the breath gate.
    pub fn set_gate(&mut self, gate: bool) {
        self.gate = gate;
    }

    /// Set the note velocity in `[0, 1]`.
    pub fn set_velocity(&mut self, velocity: f32) {
        self.velocity = sanitize(velocity, 0.0, 1.0, 0.0);
    }

    /// Set the mod wheel in `[0, 1]`.
    pub fn set_mod_wheel(&mut self, value: f32) {
        self.mod_wheel = sanitize(value, 0.0, 1.0, 0.0);
    }

    /// Set channel aftertouch in `[0, 1]`.
    pub fn set_aftertouch(&mut self, value: f32) {
        self.aftertouch = sanitize(value, 0.0, 1.0, 0.0);
    }

    /// Set the pitch bend in `[-1, 1]` (±2 semitones).
    pub fn set_pitch_bend(&mut self, value: f32) {
        self.pitch_bend = sanitize(value, -1.0, 1.0, 0.0);
    }

    /// Apply a full parameter set. Continuous values ramp to their new
    /// targets; envelope times take effect on the next sample.
    pub fn set_params(&mut self, params: &BreathParams) {
        self.params = params.clamped();
        self.smoothers.set_targets(&self.params);
        self.envelope.set_times(self.params.attack_ms, self.params.release_ms);
    }

    /// Render one sample.
    #[inline]
    pub fn next_sample(&mut self) -> f32 {
        let c = self.smoothers.advance();
        let sr = self.sample_rate;

        let vibrato = self.vibrato.next_sine_fast(c.vibrato_rate_hz, sr) * c.vibrato_depth;
        let semitones = PITCH_BEND_SEMITONES * self.pitch_bend + VIBRATO_SEMITONES * vibrato;
        let hz = (self.pitch_hz * exp2f(semitones / 12.0)).clamp(PITCH_RANGE_HZ.0, PITCH_RANGE_HZ.1);
        self.rendered_hz = hz;

        // The estimators always track so enabling motion sustain mid-note
        // picks up the movement already in progress
        self.motion_energy = self.motion.process(
            self.mod_wheel,
            self.aftertouch,
            self.pitch_bend,
            hz * PITCH_CUE_SCALE,
            c.motion_sensitivity,
        );
        let motion = if self.params.motion_sustain {
            self.motion_energy
        } else {
            0.0
        };
        self.target = pressure_target(self.gate, self.velocity, self.mod_wheel, motion);
        let env = self.envelope.process(self.target);

        let excite = self
            .excitation
            .process(hz, sr, c.noise_color, c.sine_anchor, c.resistance);
        let resonated = self
            .bank
            .process(excite * c.air * env, hz, c.formant, c.resistance);
        let shaped = self.tone.process(resonated, c.tone);
        saturate(shaped, c.resistance, c.output_gain)
    }

    /// Add `num_samples` samples into every channel starting at `start`.
    ///
    /// The buffer is not cleared. Channels shorter than the region are
    /// written as far as they reach; the core still advances the full
    /// `num_samples`.
    pub fn render(&mut self, output: &mut [&mut [f32]], start: usize, num_samples: usize) {
        for index in start..start.saturating_add(num_samples) {
            let sample = self.next_sample();
            mix_into(output, index, sample);
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Block size passed to the last [`prepare`](Self::prepare).
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Channel count passed to the last [`prepare`](Self::prepare).
    pub fn num_channels(&self) -> usize {
        self.num_channels
    }

    /// The clamped parameter set in effect.
    pub fn params(&self) -> &BreathParams {
        &self.params
    }

    /// Base pitch in Hz.
    pub fn pitch_hz(&self) -> f32 {
        self.pitch_hz
    }

    /// Pitch of the last sample after bend and vibrato.
    pub fn rendered_hz(&self) -> f32 {
        self.rendered_hz
    }

    /// Whether the gate is open.
    pub fn gate(&self) -> bool {
        self.gate
    }

    /// Current velocity.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Current mod wheel.
    pub fn mod_wheel(&self) -> f32 {
        self.mod_wheel
    }

    /// Current aftertouch.
    pub fn aftertouch(&self) -> f32 {
        self.aftertouch
    }

    /// Current pitch bend.
    pub fn pitch_bend(&self) -> f32 {
        self.pitch_bend
    }

    /// Breath envelope value.
    pub fn envelope(&self) -> f32 {
        self.envelope.value()
    }

    /// State of the breath envelope on the last sample.
    pub fn envelope_state(&self) -> EnvelopeState {
        self.envelope.state()
    }

    /// Pressure target of the last sample.
    pub fn pressure_target(&self) -> f32 {
        self.target
    }

    /// Combined motion energy of the last sample, whether or not motion
    /// sustain is enabled.
    pub fn motion_energy(&self) -> f32 {
        self.motion_energy
    }

    /// Vibrato LFO phase in turns.
    pub fn vibrato_phase(&self) -> f32 {
        self.vibrato.phase()
    }

    /// Sine anchor phase in turns.
    pub fn anchor_phase(&self) -> f32 {
        self.excitation.anchor_phase()
    }

    /// Noise seed.
    pub fn seed(&self) -> u32 {
        self.excitation.seed()
    }

    /// Whether the envelope has decayed to silence.
    pub fn is_silent(&self) -> bool {
        self.envelope.is_silent()
    }
}
