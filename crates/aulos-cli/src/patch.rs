//! Patch files: instrument parameters plus an optional scripted phrase.
//!
//! ```toml
//! glide_ms = 60.0
//! seed = 305419896
//!
//! [params]
//! air = 0.8
//! formant = 0.6
//! motion_sustain = true
//!
//! [[phrase]]
//! at = 0.0
//! type = "note_on"
//! note = 62
//! velocity = 100
//!
//! [[phrase]]
//! at = 0.5
//! type = "mod_wheel"
//! value = 0.4
//!
//! [[phrase]]
//! at = 1.5
//! type = "note_off"
//! note = 62
//! ```
//!
//! Every key is optional; missing parameters take their defaults. Event
//! times are in seconds from the start of the render.

use std::path::Path;

use aulos_synth::event::{MOD_WHEEL_CC, PITCH_WHEEL_CENTER};
use aulos_synth::voice::DEFAULT_GLIDE_MS;
use aulos_synth::{BreathParams, ControlEvent, DEFAULT_SEED};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

/// Longest time, in seconds, a phrase event or render setting may name.
pub const MAX_SECONDS: f64 = 3600.0;

fn default_tail_off() -> bool {
    true
}

/// One scripted control change.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PhraseAction {
    /// Start a note.
    NoteOn {
        /// MIDI note number, 0-127.
        note: u8,
        /// Velocity, 1-127.
        velocity: u8,
    },
    /// Release a note.
    NoteOff {
        /// MIDI note number, 0-127.
        note: u8,
        /// Let the breath decay (default) instead of cutting it.
        #[serde(default = "default_tail_off")]
        tail_off: bool,
    },
    /// Mod wheel position, 0-1.
    ModWheel {
        /// Normalized position.
        value: f32,
    },
    /// Channel aftertouch, 0-1.
    Aftertouch {
        /// Normalized pressure.
        value: f32,
    },
    /// Pitch bend, -1 to 1 (±2 semitones).
    PitchBend {
        /// Normalized bend.
        value: f32,
    },
    /// Release everything with tail-off.
    AllNotesOff,
}

/// A [`PhraseAction`] at a time in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhraseEvent {
    /// Seconds from the start of the render.
    pub at: f64,
    /// What happens.
    #[serde(flatten)]
    pub action: PhraseAction,
}

fn to_7bit(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 127.0).round() as u8
}

impl PhraseAction {
    /// The instrument event this action sends.
    ///
    /// Normalized values are quantized to 7 or 14 bits the way a MIDI
    /// controller would send them.
    pub fn to_control_event(self) -> ControlEvent {
        match self {
            PhraseAction::NoteOn { note, velocity } => ControlEvent::NoteOn { note, velocity },
            PhraseAction::NoteOff { note, tail_off } => ControlEvent::NoteOff {
                note,
                allow_tail_off: tail_off,
            },
            PhraseAction::ModWheel { value } => ControlEvent::Controller {
                number: MOD_WHEEL_CC,
                value: to_7bit(value),
            },
            PhraseAction::Aftertouch { value } => ControlEvent::Aftertouch(to_7bit(value)),
            PhraseAction::PitchBend { value } => {
                let center = f32::from(PITCH_WHEEL_CENTER);
                let position = (value.clamp(-1.0, 1.0) * center + center).round();
                ControlEvent::PitchWheel(position.min(16383.0) as u16)
            }
            PhraseAction::AllNotesOff => ControlEvent::AllNotesOff,
        }
    }
}

/// A complete patch file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Patch {
    /// Portamento time constant in ms.
    pub glide_ms: f32,
    /// Noise seed.
    pub seed: u32,
    /// Instrument parameters.
    pub params: BreathParams,
    /// Scripted events; empty means "hold one note".
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phrase: Vec<PhraseEvent>,
}

impl Default for Patch {
    fn default() -> Self {
        Self {
            glide_ms: DEFAULT_GLIDE_MS,
            seed: DEFAULT_SEED,
            params: BreathParams::default(),
            phrase: Vec::new(),
        }
    }
}

impl Patch {
    /// Load a patch from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| CliError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a patch from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, CliError> {
        let patch: Patch = toml::from_str(toml_str)?;
        patch.validate()?;
        Ok(patch)
    }

    /// Convert the patch to a TOML string.
    pub fn to_toml(&self) -> Result<String, CliError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// A short legato phrase showing every event type.
    pub fn example() -> Self {
        let event = |at, action| PhraseEvent { at, action };
        Self {
            params: BreathParams {
                motion_sustain: true,
                ..BreathParams::default()
            },
            phrase: vec![
                event(0.0, PhraseAction::NoteOn { note: 62, velocity: 96 }),
                event(0.4, PhraseAction::ModWheel { value: 0.3 }),
                event(0.6, PhraseAction::NoteOn { note: 66, velocity: 90 }),
                event(0.7, PhraseAction::NoteOff { note: 62, tail_off: true }),
                event(1.0, PhraseAction::PitchBend { value: 0.25 }),
                event(1.2, PhraseAction::Aftertouch { value: 0.5 }),
                event(1.6, PhraseAction::NoteOff { note: 66, tail_off: true }),
            ],
            ..Self::default()
        }
    }

    /// Reject events that cannot be scheduled or sent.
    ///
    /// Parameters are not checked here; the instrument clamps them.
    pub fn validate(&self) -> Result<(), CliError> {
        for (index, event) in self.phrase.iter().enumerate() {
            if !(event.at.is_finite() && (0.0..=MAX_SECONDS).contains(&event.at)) {
                return Err(CliError::invalid_phrase(
                    index,
                    format!("time {} is not between 0 and {MAX_SECONDS} seconds", event.at),
                ));
            }
            match event.action {
                PhraseAction::NoteOn { note, .. } | PhraseAction::NoteOff { note, .. }
                    if note > 127 =>
                {
                    return Err(CliError::invalid_phrase(
                        index,
                        format!("note {note} is outside 0-127"),
                    ));
                }
                PhraseAction::NoteOn { velocity, .. } if velocity > 127 => {
                    return Err(CliError::invalid_phrase(
                        index,
                        format!("velocity {velocity} is outside 0-127"),
                    ));
                }
                PhraseAction::ModWheel { value }
                | PhraseAction::Aftertouch { value }
                | PhraseAction::PitchBend { value }
                    if value.is_nan() =>
                {
                    return Err(CliError::invalid_phrase(index, "value is not a number"));
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Phrase events sorted by time, converted to sample positions.
    ///
    /// Events at the same time keep their file order.
    pub fn schedule(&self, sample_rate: u32) -> Vec<(usize, ControlEvent)> {
        let mut scheduled: Vec<(usize, ControlEvent)> = self
            .phrase
            .iter()
            .map(|event| {
                let position = (event.at * f64::from(sample_rate)).round() as usize;
                (position, event.action.to_control_event())
            })
            .collect();
        scheduled.sort_by_key(|&(position, _)| position);
        scheduled
    }
}
