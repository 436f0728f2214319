//! Structured diagnostics emitted while encoding and decoding
//!
//! Encoders and decoders report what they did through an [`Observer`]. The
//! default [`LogObserver`] forwards to the `log` facade; [`Recorder`] keeps the
//! events in memory so callers can inspect them.

use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A vocabulary symbol was turned into a tone
    SymbolEncoded { symbol: String, frequency: u32 },
    /// A content literal was turned into one tone per character
    ContentEncoded { chars: usize },
    /// A token had no tone and was left out of the waveform
    TokenSkipped { token: String },
    /// A detected frequency matched no band or symbol
    FrequencyUnmatched {
        frequency: u32,
        nearest: Option<(String, u32)>,
        tolerance: Option<u32>,
    },
    /// A text-band frequency decoded to a printable character
    CharDecoded { frequency: u32, ch: char },
    /// A text-band frequency decoded to a code outside printable ASCII
    CharOutOfRange { frequency: u32, code: u32 },
}

pub trait Observer: Send + Sync {
    fn observe(&self, event: &Diagnostic);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogObserver;

impl Observer for LogObserver {
    fn observe(&self, event: &Diagnostic) {
        match event {
            Diagnostic::SymbolEncoded { symbol, frequency } => {
                log::debug!("encoded symbol {} at {} Hz", symbol, frequency);
            }
            Diagnostic::ContentEncoded { chars } => {
                log::debug!("encoded content literal of {} chars", chars);
            }
            Diagnostic::TokenSkipped { token } => {
                log::warn!("skipping token {:?}: not in vocabulary", token);
            }
            Diagnostic::FrequencyUnmatched {
                frequency,
                nearest,
                tolerance,
            } => match (nearest, tolerance) {
                (Some((symbol, distance)), Some(tolerance)) => log::debug!(
                    "unmatched {} Hz: nearest {} is {} Hz away (tolerance {} Hz)",
                    frequency,
                    symbol,
                    distance,
                    tolerance
                ),
                _ => log::debug!("unmatched {} Hz: outside every band", frequency),
            },
            Diagnostic::CharDecoded { frequency, ch } => {
                log::trace!("decoded {:?} from {} Hz", ch, frequency);
            }
            Diagnostic::CharOutOfRange { frequency, code } => {
                log::debug!(
                    "code {} from {} Hz is not printable, substituting '?'",
                    code,
                    frequency
                );
            }
        }
    }
}

/// Collects diagnostics in memory
#[derive(Debug, Default)]
pub struct Recorder {
    events: Mutex<Vec<Diagnostic>>,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every event recorded so far
    pub fn events(&self) -> Vec<Diagnostic> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    // A panicking observer cannot leave the Vec half-written, so poison is ignored.
    fn lock(&self) -> MutexGuard<'_, Vec<Diagnostic>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Observer for Recorder {
    fn observe(&self, event: &Diagnostic) {
        self.lock().push(event.clone());
    }
}
