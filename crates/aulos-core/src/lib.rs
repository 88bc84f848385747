//! Aulos Core - DSP primitives for a physically-modeled breath instrument
//!
//! This crate provides the building blocks the aulos instrument is assembled
//! from, designed for real-time audio processing with zero allocation in the
//! audio path.
//!
//! # Core Abstractions
//!
//! ## Parameter Smoothing
//!
//! Declicked control values with a fixed ramp time:
//!
//! - [`SmoothedParam`] - Linear ramp smoother, generic over the value type
//! - [`Smoothable`] - Value types a smoother can ramp (`f32`, `f64`)
//!
//! ## Resonators and Filters
//!
//! Every second-order filter the instrument retunes per sample implements
//! [`Resonator`], so the algorithm never depends on a particular realization:
//!
//! - [`StateVariableFilter`] - TPT state variable filter (lowpass, highpass, bandpass)
//! - [`Biquad`] - Direct Form I biquad with RBJ cookbook coefficients
//! - [`BiquadBandpass`] - Biquad realization of a bandpass [`Resonator`]
//! - [`OnePole`] - 6 dB/oct lowpass for control-signal smoothing
//!
//! ## Sources and Followers
//!
//! - [`NoiseGenerator`] - Seeded white + pink noise
//! - [`Phasor`] - Wrapped phase accumulator for LFOs and sine oscillators
//! - [`AsymmetricFollower`] - One-pole follower with separate attack/release
//!
//! ## Utilities
//!
//! - Math functions: [`db_to_linear`], [`time_constant_coeff`], [`soft_clip`], etc.
//! - Fast approximations in [`fast_math`] for coefficient computation
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible for embedded audio applications.
//! Disable the default `std` feature in your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! aulos-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use aulos_core::{NoiseGenerator, Resonator, SmoothedParam, StateVariableFilter};
//!
//! let mut noise = NoiseGenerator::new(0x1234_5678);
//! let mut cutoff = SmoothedParam::with_config(440.0, 48000.0, 20.0);
//! let mut bp = StateVariableFilter::bandpass(48000.0);
//!
//! cutoff.set_target(880.0);
//! for _ in 0..64 {
//!     bp.set_cutoff(cutoff.advance());
//!     let y = bp.process_sample(noise.next_white());
//!     assert!(y.is_finite());
//! }
//! ```
//!
//! # Design Principles
//!
//! - **Real-time safe**: No allocations in audio processing paths
//! - **No dependencies on std**: Pure `no_std` with `libm` for math
//! - **Deterministic**: Same seed and inputs give the same samples on every host

#![cfg_attr(not(feature = "std"), no_std)]

pub mod biquad;
pub mod envelope;
pub mod fast_math;
pub mod math;
pub mod noise;
pub mod one_pole;
pub mod param;
pub mod phasor;
pub mod resonator;
pub mod svf;

// Re-export main types at crate root
pub use biquad::{
    Biquad, BiquadBandpass, BiquadCoefficients, bandpass_coefficients, highpass_coefficients,
    lowpass_coefficients,
};
pub use envelope::AsymmetricFollower;
pub use fast_math::{fast_sin_turns, fast_tan, fast_tanh};
pub use math::{
    db_to_linear, flush_denormal, hard_clip, lerp, midi_to_freq, ms_to_samples, soft_clip,
    time_constant_coeff,
};
pub use noise::{NoiseGenerator, NoiseSample};
pub use one_pole::OnePole;
pub use param::{Smoothable, SmoothedParam};
pub use phasor::Phasor;
pub use resonator::Resonator;
pub use svf::{StateVariableFilter, SvfOutput};
