//! AEL acoustic protocol: symbolic messages carried as discrete audio tones
//!
//! Commands map to fixed frequencies below 6 kHz, free text is sent one
//! character per tone in the 7-10 kHz band, and a receiver recovers the message
//! by picking the dominant frequency of each analysis window.

pub mod assembler;
pub mod config;
pub mod decoder;
pub mod detector;
pub mod encoder;
pub mod error;
pub mod matcher;
pub mod message;
pub mod observe;
pub mod tone;
pub mod vocabulary;
pub mod waveform;

pub use assembler::{assemble, collapse_runs};
pub use config::{AelConfig, BandPlan};
pub use decoder::Decoder;
pub use detector::FrequencyDetector;
pub use encoder::Encoder;
pub use error::{AelError, Result};
pub use matcher::{Classification, SymbolMatcher};
pub use message::{Message, Token};
pub use observe::{Diagnostic, LogObserver, Observer, Recorder};
pub use tone::ToneSynthesizer;
pub use vocabulary::Vocabulary;
pub use waveform::Waveform;

// Timing configuration
pub const DEFAULT_SAMPLE_RATE: u32 = 48000;
pub const DEFAULT_TONE_DURATION_SECS: f32 = 0.1;
pub const DEFAULT_SILENCE_DURATION_SECS: f32 = DEFAULT_TONE_DURATION_SECS / 100.0;

// Analysis configuration
pub const DEFAULT_FFT_OVERSAMPLING: usize = 8;
pub const DEFAULT_MIN_PEAK_AMPLITUDE: f32 = 0.01;

// Band plan (Hz)
pub const SILENCE_CEILING_HZ: u32 = 1200;
pub const COMMAND_BAND_CEILING_HZ: u32 = 6000;
pub const TEXT_BAND_LOW_HZ: u32 = 7000;
pub const TEXT_BAND_HIGH_HZ: u32 = 10000;
pub const TOLERANCE_FLOOR_HZ: u32 = 30;
pub const TOLERANCE_PERCENT: u32 = 30;

// Free text: printable ASCII, 10 Hz per code point
pub const CHAR_SPACING_HZ: u32 = 10;
pub const MIN_CHAR_CODE: u32 = 32;
pub const MAX_CHAR_CODE: u32 = 126;
pub const REPLACEMENT_CHAR: char = '?';

// Message grammar
pub const TOKEN_DELIMITER: char = '|';
pub const CONTENT_PREFIX: &str = "CONTENT\"";
pub const CONTENT_QUOTE: char = '"';

// PCM output
pub const PCM16_SCALE: f32 = 32767.0;
