//! The instrument's parameter set.
//!
//! [`BreathParams`] is the batch of continuous controls the core reads every
//! block. Values arrive from a host, a patch file, or a test; every field is
//! forced into its documented domain by [`BreathParams::clamped`] before the
//! DSP sees it, so any `BreathParams` value is safe to apply.
//!
//! | Field | Domain | Default |
//! |-------|--------|---------|
//! | `air` | 0 – 1 | 0.8 |
//! | `tone` | 0 – 1 | 0.55 |
//! | `formant` | 0 – 1 | 0.35 |
//! | `resistance` | 0 – 1 | 0.4 |
//! | `vibrato_depth` | 0 – 1 | 0.15 |
//! | `vibrato_rate_hz` | 0.5 – 8 Hz | 5.0 |
//! | `noise_color` | 0 – 1 | 0.35 |
//! | `sine_anchor` | 0 – 1 | 0.3 |
//! | `motion_sustain` | bool | false |
//! | `motion_sensitivity` | 0 – 1 | 0.5 |
//! | `attack_ms` | 1 – 10000 ms | 25.0 |
//! | `release_ms` | 5 – 10000 ms | 180.0 |
//! | `output_gain_db` | −60 – +12 dB | −3.0 |

/// Vibrato LFO rate range in Hz.
pub const VIBRATO_RATE_RANGE: (f32, f32) = (0.5, 8.0);

/// Breath envelope attack range in milliseconds.
pub const ATTACK_MS_RANGE: (f32, f32) = (1.0, 10_000.0);

/// Breath envelope release range in milliseconds.
pub const RELEASE_MS_RANGE: (f32, f32) = (5.0, 10_000.0);

/// Output gain range in decibels.
pub const OUTPUT_GAIN_DB_RANGE: (f32, f32) = (-60.0, 12.0);

/// Clamp `value` into `[min, max]`, replacing NaN with `fallback`.
///
/// `f32::clamp` passes NaN through, and a NaN control would poison every
/// filter state it reaches.
#[inline]
pub fn sanitize(value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if value.is_nan() {
        fallback
    } else {
        value.clamp(min, max)
    }
}

#[inline]
fn unit(value: f32, fallback: f32) -> f32 {
    sanitize(value, 0.0, 1.0, fallback)
}

/// Continuous controls of the breath instrument.
///
/// # Example
///
/// ```rust
/// use aulos_synth::BreathParams;
///
/// let params = BreathParams {
///     air: 1.7,
///     vibrato_rate_hz: 0.0,
///     ..BreathParams::default()
/// }
/// .clamped();
///
/// assert_eq!(params.air, 1.0);
/// assert_eq!(params.vibrato_rate_hz, 0.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BreathParams {
    /// Breath drive scaling the excitation.
    pub air: f32,
    /// Brightness tilt: 0 dark, 1 bright.
    pub tone: f32,
    /// Vowel morph between the "A" and "E" formant pairs.
    pub formant: f32,
    /// Tightness: less raw noise, more resonance, harder saturation.
    pub resistance: f32,
    /// Vibrato depth (scaled to ±0.35 semitone at 1.0).
    pub vibrato_depth: f32,
    /// Vibrato LFO rate in Hz.
    pub vibrato_rate_hz: f32,
    /// Noise blend: 0 white, 1 pink.
    pub noise_color: f32,
    /// Level of the pitched sine mixed into the excitation.
    pub sine_anchor: f32,
    /// Let controller movement sustain breath pressure.
    pub motion_sustain: bool,
    /// Scaling of controller movement into motion energy.
    pub motion_sensitivity: f32,
    /// Breath envelope attack time constant in ms.
    pub attack_ms: f32,
    /// Breath envelope release time constant in ms.
    pub release_ms: f32,
    /// Output gain in dB.
    pub output_gain_db: f32,
}

impl Default for BreathParams {
    fn default() -> Self {
        Self {
            air: 0.8,
            tone: 0.55,
            formant: 0.35,
            resistance: 0.4,
            vibrato_depth: 0.15,
            vibrato_rate_hz: 5.0,
            noise_color: 0.35,
            sine_anchor: 0.3,
            motion_sustain: false,
            motion_sensitivity: 0.5,
            attack_ms: 25.0,
            release_ms: 180.0,
            output_gain_db: -3.0,
        }
    }
}

impl BreathParams {
    /// Copy with every field forced into its domain.
    ///
    /// NaN fields fall back to the default value of that field.
    pub fn clamped(&self) -> Self {
        let d = Self::default();
        Self {
            air: unit(self.air, d.air),
            tone: unit(self.tone, d.tone),
            formant: unit(self.formant, d.formant),
            resistance: unit(self.resistance, d.resistance),
            vibrato_depth: unit(self.vibrato_depth, d.vibrato_depth),
            vibrato_rate_hz: sanitize(
                self.vibrato_rate_hz,
                VIBRATO_RATE_RANGE.0,
                VIBRATO_RATE_RANGE.1,
                d.vibrato_rate_hz,
            ),
            noise_color: unit(self.noise_color, d.noise_color),
            sine_anchor: unit(self.sine_anchor, d.sine_anchor),
            motion_sustain: self.motion_sustain,
            motion_sensitivity: unit(self.motion_sensitivity, d.motion_sensitivity),
            attack_ms: sanitize(self.attack_ms, ATTACK_MS_RANGE.0, ATTACK_MS_RANGE.1, d.attack_ms),
            release_ms: sanitize(
                self.release_ms,
                RELEASE_MS_RANGE.0,
                RELEASE_MS_RANGE.1,
                d.release_ms,
            ),
            output_gain_db: sanitize(
                self.output_gain_db,
                OUTPUT_GAIN_DB_RANGE.0,
                OUTPUT_GAIN_DB_RANGE.1,
                d.output_gain_db,
            ),
        }
    }
}
