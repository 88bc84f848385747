//! State Variable Filter implementation.
//!
//! The default [`Resonator`] of the instrument: the pitch bandpass and both
//! formant bandpasses are TPT SVFs retuned on every sample.
//!
//! # Topology
//!
//! Implements the Topology-Preserving Transform (TPT) SVF after Zavalishin,
//! "The Art of VA Filter Design" (2012). The trapezoidal integrators keep the
//! analog prototype's response and stay stable under audio-rate cutoff
//! modulation, which Direct Form structures do not.
//!
//! # Performance
//!
//! Retuning touches one coefficient per setter: `set_cutoff` recomputes the
//! prewarped gain `g = tan(π·fc/fs)`, `set_resonance` recomputes `k = 1/Q`.
//! `g` uses [`fast_tan`] while the argument is below 0.5 rad (< 0.2% error),
//! and [`libm::tanf`] above, where the Padé approximation drifts toward its
//! pole.
//!
//! # Reference
//!
//! Zavalishin, "The Art of VA Filter Design", rev. 2.1.2 (2018), Chapter 3.

use core::f32::consts::PI;
use libm::tanf;

use crate::fast_math::fast_tan;
use crate::flush_denormal;
use crate::resonator::Resonator;

/// Lowest cutoff the filter accepts, in Hz.
pub const MIN_CUTOFF_HZ: f32 = 20.0;

/// Resonance (Q) range accepted by the filter.
pub const Q_RANGE: (f32, f32) = (0.1, 20.0);

/// Largest prewarp argument handed to [`fast_tan`].
const FAST_TAN_LIMIT: f32 = 0.5;

/// State Variable Filter output type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SvfOutput {
    /// Low-pass filter output: passes frequencies below the cutoff.
    Lowpass,
    /// High-pass filter output: passes frequencies above the cutoff.
    Highpass,
    /// Band-pass filter output: passes frequencies near the cutoff.
    ///
    /// Peak gain equals Q at the center frequency.
    #[default]
    Bandpass,
}

/// State Variable Filter (2-pole, 12 dB/oct).
///
/// ## Parameters
///
/// - `cutoff`: Cutoff/center frequency in Hz (20.0 to sr×0.49, default 1000.0)
/// - `resonance`: Q factor (0.1 to 20.0, default 0.707)
/// - `output_type`: Which filter output to use (default `Bandpass`)
///
/// # Example
///
/// ```rust
/// use aulos_core::{Resonator, StateVariableFilter, SvfOutput};
///
/// let mut svf = StateVariableFilter::new(48000.0);
/// svf.set_output_type(SvfOutput::Lowpass);
/// svf.set_cutoff(1000.0);
/// svf.set_resonance(2.0);
///
/// let output = svf.process_sample(0.5);
/// assert!(output.is_finite());
/// ```
#[derive(Debug, Clone)]
pub struct StateVariableFilter {
    // Filter state
    ic1eq: f32,
    ic2eq: f32,

    // Coefficients
    g: f32,
    k: f32,

    // Parameters
    sample_rate: f32,
    cutoff: f32,
    resonance: f32,
    output_type: SvfOutput,
}

impl Default for StateVariableFilter {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

impl StateVariableFilter {
    /// Create a new SVF with the given sample rate.
    ///
    /// Initialises with cutoff = 1000 Hz, Q = 0.707 (Butterworth),
    /// bandpass output.
    pub fn new(sample_rate: f32) -> Self {
        let mut svf = Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            g: 0.0,
            k: 0.0,
            sample_rate,
            cutoff: 1000.0,
            resonance: core::f32::consts::FRAC_1_SQRT_2,
            output_type: SvfOutput::Bandpass,
        };
        svf.update_g();
        svf.update_k();
        svf
    }

    /// Create a bandpass SVF.
    pub fn bandpass(sample_rate: f32) -> Self {
        Self::new(sample_rate)
    }

    /// Get current cutoff frequency in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Get current resonance (Q factor).
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Set the output type.
    pub fn set_output_type(&mut self, output_type: SvfOutput) {
        self.output_type = output_type;
    }

    /// Get current output type.
    pub fn output_type(&self) -> SvfOutput {
        self.output_type
    }

    /// Current `(g, k)` coefficient pair.
    pub fn coefficients(&self) -> (f32, f32) {
        (self.g, self.k)
    }

    /// Highest cutoff allowed at the current sample rate.
    fn max_cutoff(&self) -> f32 {
        (self.sample_rate * 0.49).max(MIN_CUTOFF_HZ)
    }

    fn update_g(&mut self) {
        let arg = if self.sample_rate > 0.0 {
            PI * self.cutoff / self.sample_rate
        } else {
            0.0
        };
        self.g = if arg < FAST_TAN_LIMIT {
            fast_tan(arg)
        } else {
            tanf(arg)
        };
    }

    fn update_k(&mut self) {
        self.k = 1.0 / self.resonance;
    }

    /// Process one sample and return all outputs (lowpass, highpass, bandpass).
    pub fn process_all(&mut self, input: f32) -> (f32, f32, f32) {
        let v3 = input - self.ic2eq;
        let v1 = (self.g * v3 + self.ic1eq) / (1.0 + self.g * (self.g + self.k));
        let v2 = self.ic2eq + self.g * v1;

        self.ic1eq = flush_denormal(2.0 * v1 - self.ic1eq);
        self.ic2eq = flush_denormal(2.0 * v2 - self.ic2eq);

        let lp = v2;
        let bp = v1;
        let hp = input - self.k * v1 - v2;

        (lp, hp, bp)
    }
}

impl Resonator for StateVariableFilter {
    /// Range: 20.0 to `sample_rate × 0.49`. Values are clamped.
    fn set_cutoff(&mut self, freq_hz: f32) {
        let freq = if freq_hz.is_finite() { freq_hz } else { MIN_CUTOFF_HZ };
        self.cutoff = freq.max(MIN_CUTOFF_HZ).min(self.max_cutoff());
        self.update_g();
    }

    /// Range: 0.1 to 20.0. Values are clamped. Q = 0.707 gives a Butterworth
    /// response; the instrument runs its resonators around 0.45 – 0.95.
    fn set_resonance(&mut self, q: f32) {
        let q = if q.is_finite() { q } else { Q_RANGE.0 };
        self.resonance = q.clamp(Q_RANGE.0, Q_RANGE.1);
        self.update_k();
    }

    #[inline]
    fn process_sample(&mut self, input: f32) -> f32 {
        let (lp, hp, bp) = self.process_all(input);

        match self.output_type {
            SvfOutput::Lowpass => lp,
            SvfOutput::Highpass => hp,
            SvfOutput::Bandpass => bp,
        }
    }

    fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.cutoff = self.cutoff.min(self.max_cutoff());
        self.update_g();
    }
}
