//! Aulos Synth - a monophonic, physically-modeled breath instrument
//!
//! Breath noise is shaped by a pitch resonator and two vowel formants, driven
//! by a pressure envelope that responds to velocity, the mod wheel, and how
//! much the player is moving their controllers.
//!
//! # Signal Chain
//!
//! ```text
//! noise + sine anchor → ×air×envelope → pitch/formant bank → tone → saturator
//! ```
//!
//! # Layers
//!
//! ## Building Blocks
//!
//! - [`MotionEnergy`] / [`MotionSustain`] - Controller movement as a bounded energy signal
//! - [`BreathEnvelope`] - Gated asymmetric pressure follower, target from [`pressure_target`]
//! - [`Excitation`] - White/pink noise blend plus a quiet pitched sine anchor
//! - [`FilterBank`] - Pitch resonator and two formants, retuned every sample
//! - [`ToneShaper`] - Highpass/lowpass brightness tilt
//! - [`saturate`] - Soft saturation, output gain and the final `[-1, 1]` clamp
//!
//! ## Playing It
//!
//! - [`BreathCore`] - All running state; renders one sample from the current controls
//! - [`BreathVoice`] - Pitch glide, note lifecycle and tail-off
//! - [`BreathInstrument`] - One voice, [`ControlEvent`] dispatch and sample-offset events
//! - [`BreathParams`] - The continuous parameter set, clamped on entry
//!
//! # no_std Support
//!
//! This crate is `no_std` compatible. Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! aulos-synth = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use aulos_synth::{BreathInstrument, BreathParams, ControlEvent};
//!
//! let mut synth = BreathInstrument::new();
//! synth.set_params(&BreathParams {
//!     formant: 0.8,
//!     vibrato_depth: 0.3,
//!     ..BreathParams::default()
//! });
//! synth.prepare(44100.0, 256, 2);
//! synth.handle_event(ControlEvent::NoteOn { note: 67, velocity: 110 });
//!
//! let mut left = [0.0f32; 256];
//! let mut right = [0.0f32; 256];
//! for _ in 0..8 {
//!     left.fill(0.0);
//!     right.fill(0.0);
//!     synth.render(&mut [&mut left, &mut right], 0, 256);
//! }
//! assert!(left.iter().any(|&s| s != 0.0));
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod breath;
pub mod envelope;
pub mod event;
pub mod excitation;
pub mod filter_bank;
pub mod motion;
pub mod params;
pub mod saturator;
pub mod synth;
pub mod tone;
pub mod voice;

pub use aulos_core::noise::DEFAULT_SEED;
pub use breath::BreathCore;
pub use envelope::{BreathEnvelope, EnvelopeState, pressure_target};
pub use event::{ControlEvent, TimedEvent};
pub use excitation::Excitation;
pub use filter_bank::FilterBank;
pub use motion::{MotionEnergy, MotionSustain};
pub use params::BreathParams;
pub use saturator::saturate;
pub use synth::BreathInstrument;
pub use tone::ToneShaper;
pub use voice::BreathVoice;
