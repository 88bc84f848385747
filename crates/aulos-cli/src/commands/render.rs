//! Render a patch (or a single held note) to a WAV file.

use clap::Args;
use std::path::PathBuf;

use aulos_synth::{BreathInstrument, ControlEvent, TimedEvent};

use crate::error::CliError;
use crate::patch::{MAX_SECONDS, Patch};
use crate::wav::{BitDepth, write_wav};

/// Seconds a note is held when neither a phrase nor `--duration` is given.
const DEFAULT_HOLD_SECONDS: f64 = 2.0;

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Output WAV file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Patch file (TOML) with parameters and an optional phrase
    #[arg(long, value_name = "FILE")]
    patch: Option<PathBuf>,

    /// MIDI note held when the patch has no phrase
    #[arg(long, default_value_t = 62, value_parser = clap::value_parser!(u8).range(0..=127))]
    note: u8,

    /// Velocity of the held note (1-127)
    #[arg(long, default_value_t = 100, value_parser = clap::value_parser!(u8).range(1..=127))]
    velocity: u8,

    /// Seconds before the release tail (hold time of the note, or minimum
    /// phrase length)
    #[arg(long)]
    duration: Option<f64>,

    /// Sample rate in Hz
    #[arg(long, default_value_t = 48000)]
    sample_rate: u32,

    /// Frames per render block
    #[arg(long, default_value_t = 512)]
    block_size: usize,

    /// Output channels (the mono voice is copied to each)
    #[arg(long, default_value_t = 2)]
    channels: u16,

    /// Output sample format
    #[arg(long, value_enum, default_value_t = BitDepth::Int24)]
    bits: BitDepth,

    /// Longest release tail rendered after the last event, in seconds
    #[arg(long, default_value_t = 5.0)]
    max_tail: f64,
}

/// Validated render settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderSettings {
    pub sample_rate: u32,
    pub block_size: usize,
    pub channels: u16,
    pub note: u8,
    pub velocity: u8,
    pub duration: Option<f64>,
    pub max_tail: f64,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            sample_rate: 48000,
            block_size: 512,
            channels: 2,
            note: 62,
            velocity: 100,
            duration: None,
            max_tail: 5.0,
        }
    }
}

fn check_seconds(name: &'static str, value: f64) -> Result<f64, CliError> {
    if value.is_finite() && (0.0..=MAX_SECONDS).contains(&value) {
        Ok(value)
    } else {
        Err(CliError::invalid_setting(
            name,
            format!("{value} is not between 0 and {MAX_SECONDS} seconds"),
        ))
    }
}

impl RenderSettings {
    /// Reject settings the renderer cannot honor.
    pub fn validate(self) -> Result<Self, CliError> {
        if !(8000..=384_000).contains(&self.sample_rate) {
            return Err(CliError::invalid_setting(
                "sample-rate",
                format!("{} Hz is outside 8000-384000", self.sample_rate),
            ));
        }
        if !(1..=16384).contains(&self.block_size) {
            return Err(CliError::invalid_setting(
                "block-size",
                format!("{} is outside 1-16384", self.block_size),
            ));
        }
        if !(1..=8).contains(&self.channels) {
            return Err(CliError::invalid_setting(
                "channels",
                format!("{} is outside 1-8", self.channels),
            ));
        }
        if let Some(duration) = self.duration {
            check_seconds("duration", duration)?;
        }
        check_seconds("max-tail", self.max_tail)?;
        Ok(self)
    }

    fn frames(&self, seconds: f64) -> usize {
        (seconds * f64::from(self.sample_rate)).round() as usize
    }
}

/// Interleaved output of a render plus its level statistics.
#[derive(Debug, Clone)]
pub struct Rendered {
    pub interleaved: Vec<f32>,
    pub frames: usize,
    pub tail_frames: usize,
    pub peak: f32,
    pub rms: f32,
}

/// Clear, render and interleave one block.
fn render_block(
    instrument: &mut BreathInstrument,
    buffers: &mut [Vec<f32>],
    frames: usize,
    events: &[TimedEvent],
    out: &mut Vec<f32>,
) {
    let mut channels: Vec<&mut [f32]> = buffers
        .iter_mut()
        .map(|buffer| {
            let region = &mut buffer[..frames];
            region.fill(0.0);
            region
        })
        .collect();
    instrument.render_with_events(&mut channels, 0, frames, events);

    for i in 0..frames {
        out.extend(channels.iter().map(|channel| channel[i]));
    }
}

/// Render `patch` with `settings`.
///
/// Without a phrase a single note is held for the duration and released
/// with tail-off. After the last event the render continues until the voice
/// falls silent, for at most `max_tail` seconds.
pub fn render_patch(patch: &Patch, settings: &RenderSettings) -> Rendered {
    let schedule = if patch.phrase.is_empty() {
        let hold = settings.duration.unwrap_or(DEFAULT_HOLD_SECONDS);
        vec![
            (
                0,
                ControlEvent::NoteOn {
                    note: settings.note,
                    velocity: settings.velocity,
                },
            ),
            (
                settings.frames(hold),
                ControlEvent::NoteOff {
                    note: settings.note,
                    allow_tail_off: true,
                },
            ),
        ]
    } else {
        patch.schedule(settings.sample_rate)
    };

    let last_event = schedule.last().map_or(0, |&(position, _)| position);
    let body_frames = last_event.max(settings.duration.map_or(0, |d| settings.frames(d)));

    let mut instrument = BreathInstrument::with_seed(patch.seed);
    instrument.set_params(&patch.params);
    instrument.set_glide_ms(patch.glide_ms);
    instrument.prepare(
        settings.sample_rate as f32,
        settings.block_size,
        usize::from(settings.channels),
    );

    let channels = usize::from(settings.channels);
    let mut buffers = vec![vec![0.0f32; settings.block_size]; channels];
    let mut out = Vec::with_capacity(body_frames * channels);
    let mut pending = schedule.into_iter().peekable();
    let mut block_events = Vec::new();

    let mut frame = 0;
    while frame < body_frames {
        let n = settings.block_size.min(body_frames - frame);
        block_events.clear();
        while let Some(&(position, event)) = pending.peek() {
            if position >= frame + n {
                break;
            }
            block_events.push(TimedEvent::new(position.saturating_sub(frame), event));
            pending.next();
        }
        render_block(&mut instrument, &mut buffers, n, &block_events, &mut out);
        frame += n;
    }

    // Events at the very end of the body land before the tail
    for (_, event) in pending {
        instrument.handle_event(event);
    }

    let tail_limit = settings.frames(settings.max_tail);
    let mut tail_frames = 0;
    while instrument.voice().is_active() && tail_frames < tail_limit {
        let n = settings.block_size.min(tail_limit - tail_frames);
        render_block(&mut instrument, &mut buffers, n, &[], &mut out);
        tail_frames += n;
    }

    let peak = out.iter().fold(0.0f32, |peak, s| peak.max(s.abs()));
    let rms = if out.is_empty() {
        0.0
    } else {
        (out.iter().map(|s| f64::from(s * s)).sum::<f64>() / out.len() as f64).sqrt() as f32
    };

    Rendered {
        frames: frame + tail_frames,
        tail_frames,
        interleaved: out,
        peak,
        rms,
    }
}

pub fn run(args: RenderArgs) -> anyhow::Result<()> {
    let patch = match &args.patch {
        Some(path) => {
            let patch = Patch::load(path)?;
            tracing::info!(path = %path.display(), events = patch.phrase.len(), "patch loaded");
            patch
        }
        None => Patch::default(),
    };

    let settings = RenderSettings {
        sample_rate: args.sample_rate,
        block_size: args.block_size,
        channels: args.channels,
        note: args.note,
        velocity: args.velocity,
        duration: args.duration,
        max_tail: args.max_tail,
    }
    .validate()?;

    tracing::debug!(?settings, seed = patch.seed, "rendering");
    let rendered = render_patch(&patch, &settings);

    write_wav(
        &args.output,
        &rendered.interleaved,
        settings.channels,
        settings.sample_rate,
        args.bits,
    )?;

    let seconds = rendered.frames as f64 / f64::from(settings.sample_rate);
    tracing::info!(
        frames = rendered.frames,
        tail_frames = rendered.tail_frames,
        seconds,
        peak = rendered.peak,
        rms = rendered.rms,
        "rendered"
    );
    println!(
        "Wrote {} ({:.2} s, {} ch, {}-bit)",
        args.output.display(),
        seconds,
        settings.channels,
        args.bits.bits()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{PhraseAction, PhraseEvent};

    fn quick() -> RenderSettings {
        RenderSettings {
            sample_rate: 16000,
            block_size: 100,
            channels: 2,
            duration: Some(0.25),
            max_tail: 3.0,
            ..RenderSettings::default()
        }
    }

    #[test]
    fn held_note_renders_body_and_tail() {
        let rendered = render_patch(&Patch::default(), &quick());
        assert_eq!(rendered.interleaved.len(), rendered.frames * 2);
        assert!(rendered.frames > 4000, "body is 0.25 s");
        assert!(rendered.tail_frames > 0);
        // The tail stops once the breath is silent, long before the cap
        assert!(rendered.tail_frames < 48000);
        assert!(rendered.peak > 0.0 && rendered.peak <= 1.0);
        assert!(rendered.rms > 0.0);
    }

    #[test]
    fn channels_are_identical() {
        let rendered = render_patch(&Patch::default(), &quick());
        for frame in rendered.interleaved.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
    }

    #[test]
    fn renders_are_reproducible() {
        let patch = Patch::example();
        let a = render_patch(&patch, &quick());
        let b = render_patch(&patch, &quick());
        assert_eq!(a.interleaved, b.interleaved);
    }

    #[test]
    fn phrase_sets_the_length() {
        let patch = Patch {
            phrase: vec![
                PhraseEvent {
                    at: 0.0,
                    action: PhraseAction::NoteOn { note: 60, velocity: 100 },
                },
                PhraseEvent {
                    at: 0.5,
                    action: PhraseAction::NoteOff { note: 60, tail_off: false },
                },
            ],
            ..Patch::default()
        };
        let settings = RenderSettings {
            duration: None,
            ..quick()
        };
        let rendered = render_patch(&patch, &settings);
        // Hard stop at the last event: no tail
        assert_eq!(rendered.frames, 8000);
        assert_eq!(rendered.tail_frames, 0);
    }

    #[test]
    fn tail_is_capped() {
        let patch = Patch {
            phrase: vec![PhraseEvent {
                at: 0.0,
                action: PhraseAction::NoteOn { note: 60, velocity: 100 },
            }],
            ..Patch::default()
        };
        let settings = RenderSettings {
            duration: Some(0.1),
            max_tail: 0.2,
            ..quick()
        };
        let rendered = render_patch(&patch, &settings);
        // The note is never released, so the tail runs to the cap
        assert_eq!(rendered.tail_frames, 3200);
        assert_eq!(rendered.frames, 1600 + 3200);
    }

    #[test]
    fn settings_validated() {
        let bad_rate = RenderSettings {
            sample_rate: 100,
            ..RenderSettings::default()
        };
        assert!(matches!(
            bad_rate.validate(),
            Err(CliError::InvalidSetting { name: "sample-rate", .. })
        ));
        let bad_duration = RenderSettings {
            duration: Some(f64::NAN),
            ..RenderSettings::default()
        };
        assert!(bad_duration.validate().is_err());
        assert!(RenderSettings::default().validate().is_ok());
    }
}
