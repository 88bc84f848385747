//! Integration tests for aulos-cli.
//!
//! Tests run the built binary end to end: patch printing, rendering to WAV,
//! and error exits.

use std::process::Command;

/// Helper to get the path to the `aulos` binary built by cargo.
fn aulos_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_aulos"))
}

// ---------------------------------------------------------------------------
// `aulos patch`
// ---------------------------------------------------------------------------

#[test]
fn cli_patch_prints_defaults() {
    let output = aulos_bin()
        .arg("patch")
        .output()
        .expect("failed to run aulos patch");
    assert!(output.status.success(), "aulos patch failed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("[params]"), "should contain a [params] table");
    assert!(stdout.contains("glide_ms"));
    assert!(!stdout.contains("[[phrase]]"), "default patch has no phrase");

    let value: toml::Value = toml::from_str(&stdout).expect("output should be valid TOML");
    assert!(value.get("params").is_some());
}

#[test]
fn cli_patch_example_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("example.toml");

    let status = aulos_bin()
        .args(["patch", "--example", "--output"])
        .arg(&path)
        .status()
        .expect("failed to run aulos patch --example");
    assert!(status.success());

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("[[phrase]]"));
    assert!(text.contains("motion_sustain = true"));
}

// ---------------------------------------------------------------------------
// `aulos render`
// ---------------------------------------------------------------------------

fn read_wav(path: &std::path::Path) -> (hound::WavSpec, Vec<i32>) {
    let mut reader = hound::WavReader::open(path).expect("rendered file should be a WAV");
    let spec = reader.spec();
    let samples = reader.samples::<i32>().map(Result::unwrap).collect();
    (spec, samples)
}

#[test]
fn cli_render_held_note() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("note.wav");

    let output = aulos_bin()
        .arg("render")
        .arg(&path)
        .args(["--note", "60", "--duration", "0.3", "--sample-rate", "22050"])
        .output()
        .expect("failed to run aulos render");
    assert!(
        output.status.success(),
        "render failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let (spec, samples) = read_wav(&path);
    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, 22050);
    assert_eq!(spec.bits_per_sample, 24);

    // 0.3 s of note plus a release tail
    let frames = samples.len() / 2;
    assert!(frames > 6615, "got {frames} frames");

    let full_scale = 1 << 23;
    assert!(samples.iter().all(|s| s.abs() <= full_scale));
    assert!(samples.iter().any(|&s| s != 0));
}

#[test]
fn cli_render_patch_phrase_mono_16bit() {
    let dir = tempfile::tempdir().unwrap();
    let patch_path = dir.path().join("phrase.toml");
    let wav_path = dir.path().join("phrase.wav");

    std::fs::write(
        &patch_path,
        r#"
seed = 7
glide_ms = 30.0

[params]
formant = 0.7
motion_sustain = true

[[phrase]]
at = 0.0
type = "note_on"
note = 64
velocity = 110

[[phrase]]
at = 0.2
type = "note_on"
note = 67
velocity = 110

[[phrase]]
at = 0.4
type = "note_off"
note = 67
tail_off = false
"#,
    )
    .unwrap();

    let status = aulos_bin()
        .arg("render")
        .arg(&wav_path)
        .arg("--patch")
        .arg(&patch_path)
        .args(["--channels", "1", "--bits", "16", "--sample-rate", "16000"])
        .status()
        .expect("failed to run aulos render --patch");
    assert!(status.success());

    let (spec, samples) = read_wav(&wav_path);
    assert_eq!(spec.channels, 1);
    assert_eq!(spec.bits_per_sample, 16);
    // The hard stop at 0.4 s ends the render with no tail
    assert_eq!(samples.len(), 6400);
}

#[test]
fn cli_render_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let a = dir.path().join("a.wav");
    let b = dir.path().join("b.wav");

    for path in [&a, &b] {
        let status = aulos_bin()
            .arg("render")
            .arg(path)
            .args(["--duration", "0.2", "--sample-rate", "16000"])
            .status()
            .unwrap();
        assert!(status.success());
    }
    assert_eq!(read_wav(&a).1, read_wav(&b).1);
}

// ---------------------------------------------------------------------------
// Error exits
// ---------------------------------------------------------------------------

#[test]
fn cli_render_rejects_bad_patch() {
    let dir = tempfile::tempdir().unwrap();
    let patch_path = dir.path().join("bad.toml");
    std::fs::write(&patch_path, "[[phrase]]\nat = -2.0\ntype = \"all_notes_off\"\n").unwrap();

    let output = aulos_bin()
        .arg("render")
        .arg(dir.path().join("out.wav"))
        .arg("--patch")
        .arg(&patch_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("phrase event 0"));
}

#[test]
fn cli_render_rejects_missing_patch() {
    let dir = tempfile::tempdir().unwrap();
    let output = aulos_bin()
        .arg("render")
        .arg(dir.path().join("out.wav"))
        .args(["--patch", "/nonexistent/patch.toml"])
        .output()
        .unwrap();
    assert!(!output.status.success());
}

#[test]
fn cli_render_rejects_zero_block_size() {
    let dir = tempfile::tempdir().unwrap();
    let output = aulos_bin()
        .arg("render")
        .arg(dir.path().join("out.wav"))
        .args(["--block-size", "0"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("block-size"));
}

#[test]
fn cli_render_rejects_phrase_time_out_of_range() {
    let dir = tempfile::tempdir().unwrap();
    let patch_path = dir.path().join("late.toml");
    std::fs::write(
        &patch_path,
        "[[phrase]]\nat = 0.0\ntype = \"note_on\"\nnote = 60\nvelocity = 100\n\n\
         [[phrase]]\nat = 1e30\ntype = \"note_off\"\nnote = 60\n",
    )
    .unwrap();
    let wav_path = dir.path().join("out.wav");

    let output = aulos_bin()
        .arg("render")
        .arg(&wav_path)
        .arg("--patch")
        .arg(&patch_path)
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("phrase event 1"), "stderr: {stderr}");
    assert!(!stderr.contains("panicked"), "stderr: {stderr}");
    assert!(!wav_path.exists());
}
