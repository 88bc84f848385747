//! Resonant filter bank: pitch resonance plus two formants.
//!
//! Three bandpass [`Resonator`]s run in parallel on the same excitation and
//! are retuned on every sample:
//!
//! | Band | Center | Q |
//! |------|--------|---|
//! | pitch | rendered pitch | 0.70 + 0.25·r |
//! | formant 1 | lerp(750, 450, formant)·2^track, clamped 120 – 6000 Hz | 0.55 + 0.25·r |
//! | formant 2 | lerp(1200, 2000, formant)·2^track, clamped 200 – 8000 Hz | 0.45 + 0.20·r |
//!
//! `track = clamp(log2(hz / 220)·0.08, −0.12, 0.18)` lifts the formants
//! slightly for higher notes so the body follows the pitch. The bands are
//! mixed `0.70·pitch + 0.40·f1 + 0.30·f2`.
//!
//! The bank is generic over the resonator realization; the TPT state
//! variable filter is the default.

use aulos_core::{Resonator, StateVariableFilter, lerp};
use libm::{exp2f, log2f};

/// Formant pair of the "A"-like vowel (`formant = 0`), in Hz.
pub const VOWEL_A: (f32, f32) = (750.0, 1200.0);
/// Formant pair of the "E"-like vowel (`formant = 1`), in Hz.
pub const VOWEL_E: (f32, f32) = (450.0, 2000.0);

/// Pitch at which formant tracking is neutral.
pub const TRACKING_REFERENCE_HZ: f32 = 220.0;
/// Formant shift in octaves per octave of pitch.
pub const TRACKING_AMOUNT: f32 = 0.08;
/// Bounds of the formant shift in octaves.
pub const TRACKING_RANGE: (f32, f32) = (-0.12, 0.18);

/// Center-frequency bounds of formant 1.
pub const FORMANT1_RANGE: (f32, f32) = (120.0, 6000.0);
/// Center-frequency bounds of formant 2.
pub const FORMANT2_RANGE: (f32, f32) = (200.0, 8000.0);

/// Mix weights `(pitch, formant 1, formant 2)`.
pub const BAND_MIX: (f32, f32, f32) = (0.70, 0.40, 0.30);

/// Formant shift in octaves for a pitch.
#[inline]
pub fn formant_tracking(hz: f32) -> f32 {
    let octaves = log2f(hz.max(1.0) / TRACKING_REFERENCE_HZ);
    (octaves * TRACKING_AMOUNT).clamp(TRACKING_RANGE.0, TRACKING_RANGE.1)
}

/// Formant centers `(f1, f2)` in Hz for a formant control and pitch.
///
/// ```rust
/// use aulos_synth::filter_bank::formant_centers;
///
/// // At the tracking reference pitch the centers are the raw vowel pair
/// let (f1, f2) = formant_centers(0.0, 220.0);
/// assert!((f1 - 750.0).abs() < 1e-3 && (f2 - 1200.0).abs() < 1e-3);
/// ```
#[inline]
pub fn formant_centers(formant: f32, hz: f32) -> (f32, f32) {
    let shift = exp2f(formant_tracking(hz));
    let f1 = lerp(VOWEL_A.0, VOWEL_E.0, formant) * shift;
    let f2 = lerp(VOWEL_A.1, VOWEL_E.1, formant) * shift;
    (
        f1.clamp(FORMANT1_RANGE.0, FORMANT1_RANGE.1),
        f2.clamp(FORMANT2_RANGE.0, FORMANT2_RANGE.1),
    )
}

/// Resonance of the pitch band.
#[inline]
pub fn pitch_q(resistance: f32) -> f32 {
    0.70 + 0.25 * resistance
}

/// Resonances of the two formant bands.
#[inline]
pub fn formant_qs(resistance: f32) -> (f32, f32) {
    (0.55 + 0.25 * resistance, 0.45 + 0.20 * resistance)
}

/// Pitch and formant resonators mixed into one signal.
///
/// # Example
///
/// ```rust
/// use aulos_synth::FilterBank;
///
/// let mut bank = FilterBank::new(48000.0);
/// let y = bank.process(1.0, 440.0, 0.35, 0.4);
/// assert!(y.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct FilterBank<R: Resonator = StateVariableFilter> {
    pitch: R,
    formant1: R,
    formant2: R,
}

impl FilterBank {
    /// Create a bank of state variable filters.
    pub fn new(sample_rate: f32) -> Self {
        Self::with_resonators(sample_rate)
    }
}

impl Default for FilterBank {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl<R: Resonator + Default> FilterBank<R> {
    /// Create a bank over any default-constructible resonator.
    ///
    /// ```rust
    /// use aulos_core::BiquadBandpass;
    /// use aulos_synth::FilterBank;
    ///
    /// let mut bank = FilterBank::<BiquadBandpass>::with_resonators(44100.0);
    /// assert!(bank.process(0.5, 220.0, 0.0, 0.0).is_finite());
    /// ```
    pub fn with_resonators(sample_rate: f32) -> Self {
        let mut bank = Self {
            pitch: R::default(),
            formant1: R::default(),
            formant2: R::default(),
        };
        bank.set_sample_rate(sample_rate);
        bank
    }
}

impl<R: Resonator> FilterBank<R> {
    /// Update the sample rate of all three resonators.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.pitch.set_sample_rate(sample_rate);
        self.formant1.set_sample_rate(sample_rate);
        self.formant2.set_sample_rate(sample_rate);
    }

    /// Clear all resonator state.
    pub fn reset(&mut self) {
        self.pitch.reset();
        self.formant1.reset();
        self.formant2.reset();
    }

    /// Retune every band for this sample and return the mixed output.
    ///
    /// `hz` is the rendered pitch (already clamped to the playable range);
    /// `formant` and `resistance` are in `[0, 1]`.
    #[inline]
    pub fn process(&mut self, x: f32, hz: f32, formant: f32, resistance: f32) -> f32 {
        let (f1, f2) = formant_centers(formant, hz);
        let (q1, q2) = formant_qs(resistance);

        let y_pitch = self.pitch.tune_and_process(hz, pitch_q(resistance), x);
        let y_f1 = self.formant1.tune_and_process(f1, q1, x);
        let y_f2 = self.formant2.tune_and_process(f2, q2, x);

        BAND_MIX.0 * y_pitch + BAND_MIX.1 * y_f1 + BAND_MIX.2 * y_f2
    }
}
