use crate::config::AelConfig;
use crate::error::Result;
use crate::message::{Message, Token};
use crate::observe::{Diagnostic, LogObserver, Observer};
use crate::tone::ToneSynthesizer;
use crate::vocabulary::Vocabulary;
use crate::waveform::Waveform;
use std::sync::Arc;

/// Message encoder
///
/// Each symbol becomes one tone at its vocabulary frequency, each content
/// character becomes its own tone in the text band, and every tone is followed
/// by a short silence:
///
/// ```text
/// REQ|CONTENT"hi"  ->  [1500 Hz][gap][8040 Hz][gap][8050 Hz][gap]
/// ```
///
/// Symbols missing from the vocabulary contribute nothing (no tone, no gap) and
/// are reported as `TokenSkipped`.
pub struct Encoder {
    config: AelConfig,
    vocabulary: Arc<Vocabulary>,
    synth: ToneSynthesizer,
    observer: Arc<dyn Observer>,
}

impl Encoder {
    /// Encoder with the canonical vocabulary and default timing
    pub fn new() -> Result<Self> {
        Self::with_config(AelConfig::default())
    }

    pub fn with_config(config: AelConfig) -> Result<Self> {
        Self::with_vocabulary(config, Vocabulary::canonical_shared())
    }

    pub fn with_vocabulary(config: AelConfig, vocabulary: Arc<Vocabulary>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            synth: ToneSynthesizer::new(&config),
            config,
            vocabulary,
            observer: Arc::new(LogObserver),
        })
    }

    /// Route diagnostics to `observer` instead of the log
    pub fn with_observer(mut self, observer: Arc<dyn Observer>) -> Self {
        self.observer = observer;
        self
    }

    pub fn config(&self) -> &AelConfig {
        &self.config
    }

    /// Parse `text` and encode it
    pub fn encode_str(&self, text: &str) -> Result<Waveform> {
        let message = Message::parse(text)?;
        Ok(self.encode(&message))
    }

    pub fn encode(&self, message: &Message) -> Waveform {
        let mut samples = Vec::new();
        for token in message.tokens() {
            self.encode_token(token, &mut samples);
        }
        Waveform::new(samples, self.config.sample_rate)
    }

    fn encode_token(&self, token: &Token, samples: &mut Vec<f32>) {
        match token {
            Token::Symbol(name) => match self.vocabulary.lookup(name) {
                Some(frequency) => {
                    self.observer.observe(&Diagnostic::SymbolEncoded {
                        symbol: name.clone(),
                        frequency,
                    });
                    self.push_tone(frequency, samples);
                }
                None => self.observer.observe(&Diagnostic::TokenSkipped {
                    token: name.clone(),
                }),
            },
            Token::Content(text) => {
                let mut chars = 0;
                for ch in text.chars() {
                    // Parsed messages only carry printable ASCII; anything else is dropped
                    if let Some(frequency) = self.synth.char_frequency(ch) {
                        self.push_tone(frequency, samples);
                        chars += 1;
                    }
                }
                self.observer.observe(&Diagnostic::ContentEncoded { chars });
            }
            Token::Unknown(_) => self.observer.observe(&Diagnostic::TokenSkipped {
                token: token.to_string(),
            }),
        }
    }

    fn push_tone(&self, frequency: u32, samples: &mut Vec<f32>) {
        samples.extend(self.synth.synthesize(&[frequency], self.config.tone_duration));
        samples.extend(self.synth.silence(self.config.silence_duration));
    }
}
