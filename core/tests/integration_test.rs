// ============================================================================
// INTEGRATION TESTS
// ============================================================================
// Full encode/decode round trips through the public API. Every tone spans two
// analysis windows at the default settings, so decoding a message of N tokens
// runs 2N zero-padded FFTs of 19392 points. Release mode is noticeably faster:
//   cargo test -p aelwave-core --test integration_test --release
// ============================================================================

use aelwave_core::waveform::resample_linear;
use aelwave_core::{
    AelConfig, Decoder, Diagnostic, Encoder, Message, Recorder, Token, Vocabulary, Waveform,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::sync::Arc;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn round_trip(text: &str) -> String {
    let encoder = Encoder::new().expect("Failed to create encoder");
    let decoder = Decoder::new().expect("Failed to create decoder");

    let waveform = encoder.encode_str(text).expect("Failed to encode");
    decoder
        .decode(&waveform)
        .expect("Failed to decode")
        .to_string()
}

#[test]
fn test_command_round_trip() {
    init_logging();
    assert_eq!(round_trip("REQ|ACT"), "REQ|ACT");
    assert_eq!(round_trip("SENSOR|TEMP|DATA|CONF"), "SENSOR|TEMP|DATA|CONF");
}

#[test]
fn test_every_symbol_round_trips() {
    init_logging();
    let all: Vec<&str> = Vocabulary::canonical().entries().map(|(s, _)| s).collect();
    let text = all.join("|");
    assert_eq!(round_trip(&text), text);

    // Descending order exercises the other neighbour of each tone
    let reversed: Vec<&str> = all.iter().rev().copied().collect();
    let text = reversed.join("|");
    assert_eq!(round_trip(&text), text);
}

#[test]
fn test_content_round_trip() {
    init_logging();
    assert_eq!(round_trip("CONTENT\"hi\""), "CONTENT\"hi\"");
    assert_eq!(round_trip("CONTENT\"x = 42!\""), "CONTENT\"x = 42!\"");
}

#[test]
fn test_printable_ascii_boundaries_round_trip() {
    init_logging();
    // Space and tilde are the lowest and highest encodable codes
    assert_eq!(round_trip("CONTENT\" ~ \""), "CONTENT\" ~ \"");
}

#[test]
fn test_mixed_message_round_trip() {
    init_logging();
    let text = "REQ|CONTENT\"Temp?\"|SENSOR|CONTENT\"ok\"|ACK_MISSING|ACT";
    // The unknown symbol is skipped on encode and simply absent on decode
    assert_eq!(round_trip(text), "REQ|CONTENT\"Temp?\"|SENSOR|CONTENT\"ok\"|ACT");
}

#[test]
fn test_adjacent_repeats_collapse() {
    init_logging();
    assert_eq!(round_trip("REQ|REQ|ACT"), "REQ|ACT");
    assert_eq!(round_trip("CONTENT\"book\""), "CONTENT\"bok\"");
}

#[test]
fn test_unknown_symbol_matches_plain_encoding() {
    let recorder = Arc::new(Recorder::new());
    let encoder = Encoder::new().unwrap().with_observer(recorder.clone());

    let skipped = encoder.encode_str("NONEXISTENT|REQ").unwrap();
    let plain = encoder.encode_str("REQ").unwrap();
    assert_eq!(skipped.samples, plain.samples);
    assert!(recorder.events().contains(&Diagnostic::TokenSkipped {
        token: "NONEXISTENT".into()
    }));
}

#[test]
fn test_silence_only_decodes_to_empty_message() {
    let decoder = Decoder::new().unwrap();
    let waveform = Waveform::new(vec![0.0; 48000 * 2], 48000);
    let message = decoder.decode(&waveform).unwrap();
    assert!(message.is_empty());
    assert_eq!(message.to_string(), "");
}

#[test]
fn test_round_trip_through_pcm16() {
    init_logging();
    let encoder = Encoder::new().unwrap();
    let decoder = Decoder::new().unwrap();

    let waveform = encoder.encode_str("AUTH|CONTENT\"pin 7\"|UNLOCK").unwrap();
    let pcm = waveform.to_pcm16();
    let restored = Waveform::from_pcm16(&pcm, waveform.sample_rate);

    let message = decoder.decode(&restored).unwrap();
    assert_eq!(message.to_string(), "AUTH|CONTENT\"pin 7\"|UNLOCK");
}

#[test]
fn test_round_trip_with_uneven_padding() {
    let encoder = Encoder::new().unwrap();
    let decoder = Decoder::new().unwrap();

    // Neither pad is a multiple of the window or the token period
    let waveform = encoder.encode_str("PAY|BILL|CONTENT\"42\"").unwrap();
    let mut padded = vec![0.0f32; 1249];
    padded.extend_from_slice(&waveform.samples);
    padded.extend(std::iter::repeat(0.0f32).take(999));

    let message = decoder.decode(&Waveform::new(padded, 48000)).unwrap();
    assert_eq!(message.to_string(), "PAY|BILL|CONTENT\"42\"");
}

#[test]
fn test_round_trip_with_noise() {
    init_logging();
    let encoder = Encoder::new().unwrap();
    let decoder = Decoder::new().unwrap();

    let mut waveform = encoder.encode_str("GPS|CONTENT\"N47\"|REPLY").unwrap();
    let mut rng = StdRng::seed_from_u64(54321);
    let noise = Normal::new(0.0f32, 0.02).unwrap();
    for sample in waveform.samples.iter_mut() {
        *sample += noise.sample(&mut rng);
    }

    let message = decoder.decode(&waveform).unwrap();
    assert_eq!(message.to_string(), "GPS|CONTENT\"N47\"|REPLY");
}

#[test]
fn test_round_trip_with_attenuation() {
    let encoder = Encoder::new().unwrap();
    let decoder = Decoder::new().unwrap();

    let mut waveform = encoder.encode_str("AI|TASK|CONTENT\"go\"").unwrap();
    for sample in waveform.samples.iter_mut() {
        *sample *= 0.2;
    }

    let message = decoder.decode(&waveform).unwrap();
    assert_eq!(message.to_string(), "AI|TASK|CONTENT\"go\"");
}

#[test]
fn test_round_trip_through_resampling() {
    let encoder = Encoder::new().unwrap();
    let decoder = Decoder::new().unwrap();

    let waveform = encoder.encode_str("CRYPTO|FIAT|EXCH").unwrap();
    let at_44k = resample_linear(&waveform.samples, 48000, 44100);
    let back = Waveform::new(at_44k, 44100).resampled(48000);

    let message = decoder.decode(&back).unwrap();
    assert_eq!(message.to_string(), "CRYPTO|FIAT|EXCH");
}

#[test]
fn test_custom_timing_round_trip() {
    let config = AelConfig::with_timing(48000, 0.2, 0.002);
    let encoder = Encoder::with_config(config.clone()).unwrap();
    let decoder = Decoder::with_config(config).unwrap();

    let waveform = encoder.encode_str("LEARN|CONTENT\"AI\"|PREDICT").unwrap();
    assert_eq!(waveform.len(), 4 * 9696);

    let message = decoder.decode(&waveform).unwrap();
    assert_eq!(message.to_string(), "LEARN|CONTENT\"AI\"|PREDICT");
}

#[test]
fn test_decoded_message_reencodes_identically() {
    let encoder = Encoder::new().unwrap();
    let decoder = Decoder::new().unwrap();

    let first = encoder.encode_str("SEC|CONTENT\"key\"|LOCK").unwrap();
    let decoded = decoder.decode(&first).unwrap();
    let second = encoder.encode(&decoded);
    assert_eq!(first, second);
}

#[test]
fn test_unknown_tokens_can_be_filtered() {
    let encoder = Encoder::new().unwrap();
    let decoder = Decoder::new().unwrap();
    let synth = aelwave_core::ToneSynthesizer::new(encoder.config());

    // One analysis window of guard-band tone keeps the following token aligned
    let mut samples = encoder.encode_str("REQ").unwrap().samples;
    samples.extend(synth.synthesize(&[6500], 0.0505));
    samples.extend(encoder.encode_str("ACT").unwrap().samples);

    let message = decoder.decode(&Waveform::new(samples, 48000)).unwrap();
    assert_eq!(message.len(), 3);
    assert!(matches!(message.tokens()[1], Token::Unknown(f) if f.abs_diff(6500) <= 2));
    assert_eq!(message.without_unknown().to_string(), "REQ|ACT");
}

#[test]
fn test_message_parse_errors_surface() {
    let encoder = Encoder::new().unwrap();
    assert!(encoder.encode_str("CONTENT\"unterminated").is_err());
    assert!("CONTENT\"tab\there\"".parse::<Message>().is_err());
}
