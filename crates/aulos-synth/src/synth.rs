//! The instrument: one voice plus event dispatch.
//!
//! [`BreathInstrument`] is what a host talks to. It owns exactly one
//! [`BreathVoice`], turns [`ControlEvent`]s into voice calls, and splits a
//! render block at the offsets of [`TimedEvent`]s so each event lands
//! before the sample it is pinned to.

use aulos_core::{Resonator, StateVariableFilter, noise::DEFAULT_SEED};

use crate::event::{ControlEvent, TimedEvent, normalize_7bit};
use crate::params::BreathParams;
use crate::voice::BreathVoice;

/// Monophonic breath instrument.
///
/// # Example
///
/// ```rust
/// use aulos_synth::{BreathInstrument, ControlEvent, TimedEvent};
///
/// let mut synth = BreathInstrument::new();
/// synth.prepare(48000.0, 512, 2);
///
/// let events = [
///     TimedEvent::new(0, ControlEvent::NoteOn { note: 62, velocity: 100 }),
///     TimedEvent::new(256, ControlEvent::Controller { number: 1, value: 90 }),
/// ];
///
/// let mut left = vec![0.0f32; 512];
/// let mut right = vec![0.0f32; 512];
/// synth.render_with_events(&mut [&mut left, &mut right], 0, 512, &events);
///
/// assert_eq!(synth.voice().note(), Some(62));
/// assert!(left.iter().all(|s| s.abs() <= 1.0));
/// ```
#[derive(Debug, Clone)]
pub struct BreathInstrument<R: Resonator = StateVariableFilter> {
    voice: BreathVoice<R>,
    params: BreathParams,
}

impl BreathInstrument {
    /// Create an instrument with the default noise seed.
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Create an instrument whose noise generator starts from `seed`.
    pub fn with_seed(seed: u32) -> Self {
        Self::with_resonators(seed)
    }
}

impl Default for BreathInstrument {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Resonator + Default> BreathInstrument<R> {
    /// Create an instrument over any default-constructible resonator.
    pub fn with_resonators(seed: u32) -> Self {
        Self {
            voice: BreathVoice::with_resonators(seed),
            params: BreathParams::default(),
        }
    }
}

impl<R: Resonator> BreathInstrument<R> {
    /// Configure for a sample rate, block size and channel count.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize, num_channels: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(sample_rate, max_block_size, num_channels, "instrument prepare");
        self.voice.prepare(sample_rate, max_block_size, num_channels);
    }

    /// Stop the voice without tail-off and zero all running state.
    pub fn reset(&mut self) {
        self.voice.reset();
    }

    /// Apply a parameter set. Out-of-range values are clamped.
    pub fn set_params(&mut self, params: &BreathParams) {
        self.params = params.clamped();
        self.voice.set_params(&self.params);
    }

    /// The clamped parameter set in effect.
    pub fn params(&self) -> &BreathParams {
        &self.params
    }

    /// Set the portamento time constant in ms.
    pub fn set_glide_ms(&mut self, glide_ms: f32) {
        self.voice.set_glide_ms(glide_ms);
    }

    /// The single voice.
    pub fn voice(&self) -> &BreathVoice<R> {
        &self.voice
    }

    /// Apply one control event.
    pub fn handle_event(&mut self, event: ControlEvent) {
        match event {
            ControlEvent::NoteOn { note, velocity: 0 } => self.note_off(note, true),
            ControlEvent::NoteOn { note, velocity } => {
                self.voice.start_note(note, normalize_7bit(velocity));
            }
            ControlEvent::NoteOff {
                note,
                allow_tail_off,
            } => self.note_off(note, allow_tail_off),
            ControlEvent::Controller { number, value } => {
                self.voice.controller_moved(number, value);
            }
            ControlEvent::PitchWheel(value) => self.voice.pitch_wheel_moved(value),
            ControlEvent::Aftertouch(value) => self.voice.aftertouch_changed(value),
            ControlEvent::AllNotesOff => {
                if self.voice.is_active() {
                    self.voice.stop_note(true);
                }
            }
        }
    }

    fn note_off(&mut self, note: u8, allow_tail_off: bool) {
        // Legato: releasing a note that was already replaced does nothing
        if self.voice.note() == Some(note) {
            self.voice.stop_note(allow_tail_off);
        }
    }

    /// Add `num_samples` samples into every channel from `start`.
    ///
    /// The buffer is not cleared; clear it before the first render of a
    /// block.
    pub fn render(&mut self, output: &mut [&mut [f32]], start: usize, num_samples: usize) {
        self.voice.render(output, start, num_samples);
    }

    /// Render a region, applying each event before the sample at
    /// `start + offset`.
    ///
    /// Events apply in slice order. An offset behind the previous event
    /// applies at the previous event's position; offsets past the region
    /// apply after its last sample.
    pub fn render_with_events(
        &mut self,
        output: &mut [&mut [f32]],
        start: usize,
        num_samples: usize,
        events: &[TimedEvent],
    ) {
        let end = start.saturating_add(num_samples);
        let mut position = start;
        for timed in events {
            let at = start.saturating_add(timed.offset).min(end);
            if at > position {
                self.voice.render(output, position, at - position);
                position = at;
            }
            self.handle_event(timed.event);
        }
        if end > position {
            self.voice.render(output, position, end - position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prepared() -> BreathInstrument {
        let mut synth = BreathInstrument::new();
        synth.prepare(48000.0, 512, 1);
        synth
    }

    #[test]
    fn velocity_zero_is_note_off() {
        let mut synth = prepared();
        synth.handle_event(ControlEvent::NoteOn {
            note: 60,
            velocity: 100,
        });
        synth.handle_event(ControlEvent::NoteOn {
            note: 60,
            velocity: 0,
        });
        assert!(synth.voice().is_tailing_off());
        assert_eq!(synth.voice().note(), None);
    }

    #[test]
    fn legato_release_keeps_new_note() {
        let mut synth = prepared();
        synth.handle_event(ControlEvent::NoteOn {
            note: 60,
            velocity: 100,
        });
        synth.handle_event(ControlEvent::NoteOn {
            note: 64,
            velocity: 100,
        });
        synth.handle_event(ControlEvent::NoteOff {
            note: 60,
            allow_tail_off: true,
        });
        assert_eq!(synth.voice().note(), Some(64));
        assert!(synth.voice().core().gate());
    }

    #[test]
    fn all_notes_off_tails() {
        let mut synth = prepared();
        synth.handle_event(ControlEvent::NoteOn {
            note: 60,
            velocity: 100,
        });
        synth.handle_event(ControlEvent::AllNotesOff);
        assert!(synth.voice().is_active());
        assert!(!synth.voice().core().gate());
        synth.reset();
        assert!(!synth.voice().is_active());
    }

    #[test]
    fn events_split_the_block() {
        let mut synth = prepared();
        let mut out = vec![0.0f32; 512];
        let events = [TimedEvent::new(
            300,
            ControlEvent::NoteOn {
                note: 69,
                velocity: 127,
            },
        )];
        synth.render_with_events(&mut [&mut out], 0, 512, &events);
        assert!(out[..300].iter().all(|&s| s == 0.0));
        assert!(out[300..].iter().any(|&s| s != 0.0));
    }

    #[test]
    fn late_events_apply_after_block() {
        let mut synth = prepared();
        let mut out = vec![0.0f32; 64];
        let events = [TimedEvent::new(
            1000,
            ControlEvent::NoteOn {
                note: 69,
                velocity: 127,
            },
        )];
        synth.render_with_events(&mut [&mut out], 0, 64, &events);
        assert!(out.iter().all(|&s| s == 0.0));
        assert!(synth.voice().is_active());
    }

    #[test]
    fn params_clamped() {
        let mut synth = prepared();
        synth.set_params(&BreathParams {
            air: 4.0,
            ..BreathParams::default()
        });
        assert_eq!(synth.params().air, 1.0);
        assert_eq!(synth.voice().core().params().air, 1.0);
    }
}
