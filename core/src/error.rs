use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AelError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unterminated content literal starting at byte {position}")]
    UnterminatedContent { position: usize },

    #[error("Content character {ch:?} at byte {position} is not printable ASCII")]
    InvalidContentChar { ch: char, position: usize },

    #[error("Duplicate vocabulary symbol: {0}")]
    DuplicateSymbol(String),

    #[error("Duplicate vocabulary frequency: {0} Hz")]
    DuplicateFrequency(u32),

    #[error("Frequency {frequency} Hz for symbol {symbol} lies outside the command band")]
    FrequencyOutOfBand { symbol: String, frequency: u32 },

    #[error("Invalid symbol name: {0:?}")]
    InvalidSymbolName(String),

    #[error("FFT error: {0}")]
    FftError(String),
}

pub type Result<T> = std::result::Result<T, AelError>;
