//! Breath demo: envelope, motion sustain, and glide at a glance.
//!
//! Run with: cargo run -p aulos-synth --example breath_demo

use aulos_synth::{BreathInstrument, BreathParams, ControlEvent, TimedEvent};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK: usize = 480;

fn rms(block: &[f32]) -> f32 {
    (block.iter().map(|s| s * s).sum::<f32>() / block.len() as f32).sqrt()
}

fn main() {
    // --- Pressure envelope over a held note ---
    println!("=== A4, velocity 100: 10 ms blocks ===\n");
    println!("Block | Envelope | Target | RMS");
    println!("------+----------+--------+--------");

    let mut synth = BreathInstrument::new();
    synth.prepare(SAMPLE_RATE, BLOCK, 1);
    let mut block = vec![0.0f32; BLOCK];

    let note_on = [TimedEvent::new(0, ControlEvent::NoteOn { note: 69, velocity: 100 })];
    let note_off = [TimedEvent::new(
        0,
        ControlEvent::NoteOff {
            note: 69,
            allow_tail_off: true,
        },
    )];

    for i in 0..40 {
        let events: &[TimedEvent] = match i {
            0 => &note_on,
            25 => &note_off,
            _ => &[],
        };
        block.fill(0.0);
        synth.render_with_events(&mut [&mut block], 0, BLOCK, events);
        if i % 5 == 0 || i == 25 {
            let core = synth.voice().core();
            println!(
                "{:>5} | {:>8.4} | {:>6.3} | {:>6.4}",
                i,
                core.envelope(),
                core.pressure_target(),
                rms(&block)
            );
        }
    }

    // --- Motion sustain: a wiggled mod wheel holds the breath up ---
    println!("\n=== Wiggled mod wheel, motion sustain off vs on ===\n");

    for motion_sustain in [false, true] {
        let mut synth = BreathInstrument::new();
        synth.set_params(&BreathParams {
            motion_sustain,
            motion_sensitivity: 1.0,
            ..BreathParams::default()
        });
        synth.prepare(SAMPLE_RATE, BLOCK, 1);
        synth.handle_event(ControlEvent::NoteOn { note: 64, velocity: 40 });

        for i in 0..50 {
            let value = if i % 2 == 0 { 10 } else { 60 };
            block.fill(0.0);
            synth.render_with_events(
                &mut [&mut block],
                0,
                BLOCK,
                &[TimedEvent::new(0, ControlEvent::Controller { number: 1, value })],
            );
        }
        let core = synth.voice().core();
        println!(
            "motion_sustain={:<5}  motion={:.3}  envelope={:.4}",
            motion_sustain,
            core.motion_energy(),
            core.envelope()
        );
    }

    // --- Legato glide ---
    println!("\n=== Legato A4 -> E5, 60 ms glide ===\n");

    let mut synth = BreathInstrument::new();
    synth.prepare(SAMPLE_RATE, BLOCK, 1);
    synth.handle_event(ControlEvent::NoteOn { note: 69, velocity: 100 });
    block.fill(0.0);
    synth.render(&mut [&mut block], 0, BLOCK);
    synth.handle_event(ControlEvent::NoteOn { note: 76, velocity: 100 });

    for i in 0..12 {
        block.fill(0.0);
        synth.render(&mut [&mut block], 0, BLOCK);
        println!("{:>4} ms  {:>8.2} Hz", (i + 1) * 10, synth.voice().current_hz());
    }
}
