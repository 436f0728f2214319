use crate::assembler::assemble;
use crate::config::AelConfig;
use crate::detector::FrequencyDetector;
use crate::error::Result;
use crate::matcher::{Classification, SymbolMatcher};
use crate::message::Message;
use crate::observe::{Diagnostic, LogObserver, Observer};
use crate::vocabulary::Vocabulary;
use crate::waveform::Waveform;
use crate::{MAX_CHAR_CODE, MIN_CHAR_CODE};
use std::sync::Arc;

/// Message decoder
///
/// Detects one dominant frequency per analysis window, classifies each one
/// and reassembles the token stream. Frequencies that match nothing come back
/// as `Unknown` tokens rather than errors.
pub struct Decoder {
    config: AelConfig,
    vocabulary: Arc<Vocabulary>,
    detector: FrequencyDetector,
    observer: Arc<dyn Observer>,
}

impl Decoder {
    /// Decoder with the canonical vocabulary and default analysis settings
    pub fn new() -> Result<Self> {
        Self::with_config(AelConfig::default())
    }

    pub fn with_config(config: AelConfig) -> Result<Self> {
        Self::with_vocabulary(config, Vocabulary::canonical_shared())
    }

    pub fn with_vocabulary(config: AelConfig, vocabulary: Arc<Vocabulary>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            detector: FrequencyDetector::new(&config)?,
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

    /// Decode a mono waveform into a message
    pub fn decode(&self, waveform: &Waveform) -> Result<Message> {
        let classifications = self.classify(waveform)?;
        Ok(Message::new(assemble(classifications)))
    }

    /// Per-window classifications, silence removed, before run collapsing
    ///
    /// Input at another rate is resampled to the configured one first. Analysis
    /// starts at the first tone onset and advances one token period at a time,
    /// so no window spans two tones of a synchronously keyed waveform.
    pub fn classify(&self, waveform: &Waveform) -> Result<Vec<Classification>> {
        let rate = self.config.sample_rate;
        let resampled;
        let samples = if waveform.sample_rate == rate {
            &waveform.samples
        } else {
            log::debug!(
                "resampling {} Hz input to {} Hz before analysis",
                waveform.sample_rate,
                rate
            );
            resampled = waveform.resampled(rate);
            &resampled.samples
        };

        let Some(onset) = self.detector.find_onset(samples) else {
            return Ok(Vec::new());
        };

        let mut frequencies = Vec::new();
        for slot in samples[onset..].chunks(self.config.token_period().max(1)) {
            frequencies.extend(self.detector.detect(slot, rate)?);
        }

        let matcher = SymbolMatcher::new(&self.vocabulary, self.config.band);

        let classifications = frequencies
            .into_iter()
            .map(|frequency| {
                let classification = matcher.classify(frequency);
                self.report(&matcher, frequency, &classification);
                classification
            })
            .filter(|classification| *classification != Classification::Silence)
            .collect();

        Ok(classifications)
    }

    fn report(&self, matcher: &SymbolMatcher<'_>, frequency: u32, classification: &Classification) {
        match classification {
            Classification::Char(ch) => {
                let code = matcher.char_code(frequency);
                if (MIN_CHAR_CODE..=MAX_CHAR_CODE).contains(&code) {
                    self.observer
                        .observe(&Diagnostic::CharDecoded { frequency, ch: *ch });
                } else {
                    self.observer
                        .observe(&Diagnostic::CharOutOfRange { frequency, code });
                }
            }
            Classification::Unknown(_) => {
                let in_command_band = frequency < self.config.band.command_ceiling;
                let nearest = matcher
                    .vocabulary()
                    .nearest(frequency)
                    .filter(|_| in_command_band);
                let event = Diagnostic::FrequencyUnmatched {
                    frequency,
                    tolerance: nearest.map(|(_, closest, _)| matcher.tolerance_for(closest)),
                    nearest: nearest.map(|(symbol, _, distance)| (symbol.to_string(), distance)),
                };
                self.observer.observe(&event);
            }
            Classification::Symbol(_) | Classification::Silence => {}
        }
    }
}
