use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn run_aelwave(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_aelwave"))
        .args(args)
        .output()
        .expect("Failed to execute aelwave")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn encode(message: &str, wav: &Path, extra: &[&str]) {
    let mut args = vec!["encode", message, wav.to_str().unwrap()];
    args.extend_from_slice(extra);
    let output = run_aelwave(&args);
    assert!(
        output.status.success(),
        "encode failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

fn decode(wav: &Path, extra: &[&str]) -> String {
    let mut args = vec!["decode", wav.to_str().unwrap()];
    args.extend_from_slice(extra);
    let output = run_aelwave(&args);
    assert!(
        output.status.success(),
        "decode failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    stdout(&output)
}

#[test]
fn test_encode_writes_wav() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("req_act.wav");

    encode("REQ|ACT", &wav, &[]);

    // 44-byte header plus two 4848-sample tokens of 16-bit PCM
    let size = fs::metadata(&wav).expect("Output file not created").len();
    assert_eq!(size, 44 + 2 * 4848 * 2);
}

#[test]
fn test_encode_decode_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("mixed.wav");

    encode("SENSOR|CONTENT\"21.5C\"|DATA", &wav, &[]);
    assert_eq!(decode(&wav, &[]), "SENSOR|CONTENT\"21.5C\"|DATA");
}

#[test]
fn test_round_trip_with_custom_timing() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("slow.wav");

    encode("GPS|REPLY", &wav, &["--tone-duration", "0.2"]);
    assert_eq!(decode(&wav, &["--tone-duration", "0.2"]), "GPS|REPLY");
}

#[test]
fn test_config_file_is_applied() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("aelwave.json");
    fs::write(&config, r#"{"tone_duration": 0.05}"#).unwrap();
    let wav = dir.path().join("short.wav");
    let config_arg = config.to_str().unwrap();

    encode("AUTH|LOCK", &wav, &["--config", config_arg]);
    let size = fs::metadata(&wav).unwrap().len();
    assert_eq!(size, 44 + 2 * (2400 + 24) * 2);

    assert_eq!(decode(&wav, &["--config", config_arg]), "AUTH|LOCK");
}

#[test]
fn test_vocab_lists_symbols() {
    let output = run_aelwave(&["vocab"]);
    assert!(output.status.success());

    let text = stdout(&output);
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 25);
    assert!(lines[0].starts_with("REQ"));
    assert!(lines[0].ends_with("1500 Hz"));
    assert!(lines[24].starts_with("EXCH"));
}

#[test]
fn test_malformed_message_fails() {
    let dir = tempfile::tempdir().unwrap();
    let wav = dir.path().join("bad.wav");

    let output = run_aelwave(&["encode", "CONTENT\"open", wav.to_str().unwrap()]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unterminated"));
    assert!(!wav.exists());
}

#[test]
fn test_missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.wav");

    let output = run_aelwave(&["decode", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}
