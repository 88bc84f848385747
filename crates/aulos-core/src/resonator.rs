//! The retunable second-order filter abstraction.
//!
//! The instrument retunes its pitch and formant bandpasses on every sample,
//! so each step is "compute coefficients from Hz/Q, then run the state". The
//! [`Resonator`] trait captures exactly that, which lets the filter bank run
//! over any realization: the TPT [`StateVariableFilter`](crate::StateVariableFilter)
//! by default, or a [`BiquadBandpass`](crate::BiquadBandpass).
//!
//! ## Requirements on implementors
//!
//! - **Closed-form retuning**: `set_cutoff`/`set_resonance` must be cheap
//!   and free of iterative solves; they are called every sample.
//! - **No allocations**: all methods run inside the audio loop.
//! - **Finite coefficients**: any cutoff in `[20, 12000]` Hz with the
//!   instrument's Q range must yield finite coefficients; out-of-range
//!   requests are clamped, never rejected.

/// A second-order filter that can be retuned every sample.
///
/// # Example
///
/// ```rust
/// use aulos_core::{Resonator, StateVariableFilter};
///
/// fn sweep<R: Resonator>(r: &mut R, input: &[f32]) -> f32 {
///     let mut last = 0.0;
///     for (i, &x) in input.iter().enumerate() {
///         r.set_cutoff(200.0 + i as f32);
///         r.set_resonance(0.7);
///         last = r.process_sample(x);
///     }
///     last
/// }
///
/// let mut svf = StateVariableFilter::bandpass(48000.0);
/// assert!(sweep(&mut svf, &[1.0; 64]).is_finite());
/// ```
pub trait Resonator {
    /// Set the center/cutoff frequency in Hz.
    fn set_cutoff(&mut self, freq_hz: f32);

    /// Set the resonance (Q factor).
    fn set_resonance(&mut self, q: f32);

    /// Process one sample through the filter state.
    fn process_sample(&mut self, input: f32) -> f32;

    /// Clear all delay/state registers without touching the tuning.
    fn reset(&mut self);

    /// Update the sample rate and recompute the coefficients.
    fn set_sample_rate(&mut self, sample_rate: f32);

    /// Retune and process in one call.
    ///
    /// The default calls both setters, then processes.
    #[inline]
    fn tune_and_process(&mut self, freq_hz: f32, q: f32, input: f32) -> f32 {
        self.set_cutoff(freq_hz);
        self.set_resonance(q);
        self.process_sample(input)
    }
}
