//! Parameter handling with smoothing for zipper-free changes.
//!
//! Every continuous control of the instrument (air, tone, formant, output
//! gain, ...) is read through a [`SmoothedParam`]. A new target starts a
//! linear ramp whose duration is fixed at configuration time, so the
//! per-sample increment is bounded and a jump from one extreme to the other
//! never clicks.
//!
//! One generic type covers every control; the value type only needs to
//! implement [`Smoothable`] (provided for `f32` and `f64`).
//!
//! ## Usage
//!
//! ```rust
//! use aulos_core::SmoothedParam;
//!
//! let mut gain = SmoothedParam::new(1.0);
//! gain.reset(48000.0, 20.0); // 20 ms ramp
//!
//! gain.set_target(0.5);
//!
//! // In the audio callback, advance once per sample
//! for _ in 0..960 { // 20 ms at 48 kHz
//!     let _smoothed_gain = gain.advance();
//! }
//! assert!(gain.is_settled());
//! assert_eq!(gain.get(), 0.5);
//! ```

use core::fmt::Debug;
use core::ops::{Add, Sub};

/// A value type a [`SmoothedParam`] can ramp linearly.
pub trait Smoothable: Copy + Debug + PartialEq + Add<Output = Self> + Sub<Output = Self> {
    /// Divide by a step count to obtain the per-sample increment.
    fn div_steps(self, steps: u32) -> Self;
}

impl Smoothable for f32 {
    #[inline]
    fn div_steps(self, steps: u32) -> Self {
        self / steps as f32
    }
}

impl Smoothable for f64 {
    #[inline]
    fn div_steps(self, steps: u32) -> Self {
        self / f64::from(steps)
    }
}

/// A parameter with linear smoothing (constant rate of change).
///
/// Changing the target starts a ramp from the current value that lands
/// exactly on the target after `ramp_ms` worth of samples, independent of
/// sample rate. The final step snaps to the target so no rounding residue
/// is left behind.
///
/// A ramp time of zero (or a non-positive sample rate) makes every change
/// instant.
#[derive(Debug, Clone)]
pub struct SmoothedParam<T: Smoothable = f32> {
    /// Current value
    current: T,
    /// Target value
    target: T,
    /// Increment per sample (can be positive or negative)
    increment: T,
    /// Samples remaining until target reached
    samples_remaining: u32,
    /// Ramp length in samples
    ramp_samples: u32,
}

impl<T: Smoothable> SmoothedParam<T> {
    /// Create a new parameter resting at `initial` with instant changes.
    ///
    /// Call [`reset`](Self::reset) to configure the ramp time.
    pub fn new(initial: T) -> Self {
        Self {
            current: initial,
            target: initial,
            increment: initial - initial,
            samples_remaining: 0,
            ramp_samples: 0,
        }
    }

    /// Create with full configuration.
    ///
    /// # Arguments
    /// * `initial` - Initial value
    /// * `sample_rate` - Sample rate in Hz
    /// * `ramp_ms` - Ramp duration in milliseconds
    pub fn with_config(initial: T, sample_rate: f32, ramp_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.reset(sample_rate, ramp_ms);
        param
    }

    /// Configure the ramp duration for a sample rate.
    ///
    /// Any ramp in progress is completed immediately.
    pub fn reset(&mut self, sample_rate: f32, ramp_ms: f32) {
        let samples = crate::math::ms_to_samples(ramp_ms.max(0.0), sample_rate.max(0.0));
        self.ramp_samples = if samples.is_finite() { samples as u32 } else { 0 };
        self.snap_to_target();
        #[cfg(feature = "tracing")]
        tracing::trace!(ramp_ms, sample_rate, ramp_samples = self.ramp_samples, "smoother reset");
    }

    /// Set the target value and start a ramp toward it.
    ///
    /// Setting the same target again leaves a ramp in progress untouched.
    pub fn set_target(&mut self, target: T) {
        if target == self.target {
            return;
        }

        self.target = target;

        if self.ramp_samples == 0 {
            self.snap_to_target();
        } else {
            self.increment = (target - self.current).div_steps(self.ramp_samples);
            self.samples_remaining = self.ramp_samples;
        }
    }

    /// Set value immediately (no ramp).
    pub fn set_immediate(&mut self, value: T) {
        self.target = value;
        self.snap_to_target();
    }

    /// Advance one sample toward the target and return the new value.
    #[inline]
    pub fn advance(&mut self) -> T {
        if self.samples_remaining > 0 {
            self.samples_remaining -= 1;
            self.current = if self.samples_remaining == 0 {
                self.target
            } else {
                self.current + self.increment
            };
        }
        self.current
    }

    /// Get current value without advancing.
    #[inline]
    pub fn get(&self) -> T {
        self.current
    }

    /// Get target value.
    #[inline]
    pub fn target(&self) -> T {
        self.target
    }

    /// Ramp length in samples.
    #[inline]
    pub fn ramp_samples(&self) -> u32 {
        self.ramp_samples
    }

    /// Check if the ramp is complete.
    #[inline]
    pub fn is_settled(&self) -> bool {
        self.samples_remaining == 0
    }

    /// Snap to target immediately.
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
        self.increment = self.target - self.target;
        self.samples_remaining = 0;
    }
}

impl<T: Smoothable + Default> Default for SmoothedParam<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
