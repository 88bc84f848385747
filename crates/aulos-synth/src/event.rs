//! Discrete control events and MIDI-style value mapping.
//!
//! The instrument does not parse MIDI bytes. Hosts decode their own event
//! stream into [`ControlEvent`]s, and [`TimedEvent`] pins one to a sample
//! offset inside a render block.

/// Controller number interpreted as the mod wheel. All others are ignored.
pub const MOD_WHEEL_CC: u8 = 1;

/// Center of the 14-bit pitch wheel.
pub const PITCH_WHEEL_CENTER: u16 = 8192;

/// A control event for the single voice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlEvent {
    /// Start a note. Velocity 0 acts as a release with tail-off.
    NoteOn {
        /// MIDI note number.
        note: u8,
        /// 7-bit velocity.
        velocity: u8,
    },
    /// Release a note if it is the one playing.
    NoteOff {
        /// MIDI note number.
        note: u8,
        /// Let the breath decay instead of cutting the sound.
        allow_tail_off: bool,
    },
    /// Continuous controller change.
    Controller {
        /// Controller number.
        number: u8,
        /// 7-bit value.
        value: u8,
    },
    /// 14-bit pitch wheel position, centered at 8192.
    PitchWheel(u16),
    /// Channel pressure, 7-bit.
    Aftertouch(u8),
    /// Release whatever is sounding, with tail-off.
    AllNotesOff,
}

/// A [`ControlEvent`] at a sample offset from the start of a render block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedEvent {
    /// Samples from the block start.
    pub offset: usize,
    /// The event.
    pub event: ControlEvent,
}

impl TimedEvent {
    /// Pin `event` to `offset`.
    pub const fn new(offset: usize, event: ControlEvent) -> Self {
        Self { offset, event }
    }
}

/// Map a 7-bit value to `[0, 1]`.
#[inline]
pub fn normalize_7bit(value: u8) -> f32 {
    (f32::from(value) / 127.0).min(1.0)
}

/// Map a 14-bit pitch wheel position to `[-1, 1]`.
///
/// ```rust
/// use aulos_synth::event::normalize_pitch_wheel;
///
/// assert_eq!(normalize_pitch_wheel(8192), 0.0);
/// assert_eq!(normalize_pitch_wheel(0), -1.0);
/// assert!(normalize_pitch_wheel(16383) > 0.999);
/// ```
#[inline]
pub fn normalize_pitch_wheel(value: u16) -> f32 {
    let centered = f32::from(value) - f32::from(PITCH_WHEEL_CENTER);
    (centered / f32::from(PITCH_WHEEL_CENTER)).clamp(-1.0, 1.0)
}
