use crate::error::{AelError, Result};
use crate::{
    CHAR_SPACING_HZ, COMMAND_BAND_CEILING_HZ, DEFAULT_FFT_OVERSAMPLING, DEFAULT_MIN_PEAK_AMPLITUDE,
    DEFAULT_SAMPLE_RATE, DEFAULT_SILENCE_DURATION_SECS, DEFAULT_TONE_DURATION_SECS, MAX_CHAR_CODE,
    SILENCE_CEILING_HZ, TEXT_BAND_HIGH_HZ, TEXT_BAND_LOW_HZ, TOLERANCE_FLOOR_HZ,
    TOLERANCE_PERCENT,
};

/// Frequency band layout shared by the synthesizer and the matcher.
///
/// ```text
///   0 ..= silence_ceiling        silence, dropped
///   .. < command_ceiling         vocabulary symbols
///   command_ceiling .. text_low  guard band, Unknown
///   text_low .. text_high        free text, one tone per character
///   >= text_high                 out of range, Unknown
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BandPlan {
    pub silence_ceiling: u32,
    pub command_ceiling: u32,
    pub text_low: u32,
    pub text_high: u32,
    /// Absolute lower bound of the match tolerance in Hz
    pub tolerance_floor_hz: u32,
    /// Relative match tolerance, in percent of the matched frequency
    pub tolerance_percent: u32,
}

impl Default for BandPlan {
    fn default() -> Self {
        Self {
            silence_ceiling: SILENCE_CEILING_HZ,
            command_ceiling: COMMAND_BAND_CEILING_HZ,
            text_low: TEXT_BAND_LOW_HZ,
            text_high: TEXT_BAND_HIGH_HZ,
            tolerance_floor_hz: TOLERANCE_FLOOR_HZ,
            tolerance_percent: TOLERANCE_PERCENT,
        }
    }
}

impl BandPlan {
    pub fn validate(&self) -> Result<()> {
        if self.silence_ceiling >= self.command_ceiling {
            return Err(AelError::InvalidConfig(format!(
                "silence ceiling {} Hz must lie below command ceiling {} Hz",
                self.silence_ceiling, self.command_ceiling
            )));
        }
        if self.command_ceiling > self.text_low {
            return Err(AelError::InvalidConfig(format!(
                "command ceiling {} Hz overlaps the text band starting at {} Hz",
                self.command_ceiling, self.text_low
            )));
        }
        // The highest printable code must still map inside the band.
        let top = self.text_low + MAX_CHAR_CODE * CHAR_SPACING_HZ;
        if top >= self.text_high {
            return Err(AelError::InvalidConfig(format!(
                "text band [{}, {}) Hz cannot hold character code {}",
                self.text_low, self.text_high, MAX_CHAR_CODE
            )));
        }
        Ok(())
    }
}

/// Protocol timing, analysis and band configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AelConfig {
    /// Samples per second used for synthesis
    pub sample_rate: u32,
    /// Seconds per command or character tone
    pub tone_duration: f32,
    /// Seconds of silence after every tone
    pub silence_duration: f32,
    /// Samples per analysis window (windows do not overlap)
    pub window_size: usize,
    /// FFT length; the window is zero-padded up to this size
    pub fft_size: usize,
    /// Windows whose peak amplitude falls below this report 0 Hz
    pub min_peak_amplitude: f32,
    pub band: BandPlan,
}

impl Default for AelConfig {
    fn default() -> Self {
        Self::with_timing(
            DEFAULT_SAMPLE_RATE,
            DEFAULT_TONE_DURATION_SECS,
            DEFAULT_SILENCE_DURATION_SECS,
        )
    }
}

impl AelConfig {
    /// Build a config for the given timing, deriving the analysis window from it
    ///
    /// The window is half a token period so that synchronously sampled input gets
    /// two windows per token, none of which straddle two tones.
    pub fn with_timing(sample_rate: u32, tone_duration: f32, silence_duration: f32) -> Self {
        let period = seconds_to_samples(tone_duration, sample_rate)
            + seconds_to_samples(silence_duration, sample_rate);
        let window_size = (period / 2).max(1);
        Self {
            sample_rate,
            tone_duration,
            silence_duration,
            window_size,
            fft_size: analysis_fft_size(window_size, sample_rate),
            min_peak_amplitude: DEFAULT_MIN_PEAK_AMPLITUDE,
            band: BandPlan::default(),
        }
    }

    /// Replace the analysis window and re-derive the FFT size for it
    pub fn with_window_size(mut self, window_size: usize) -> Self {
        self.window_size = window_size;
        self.fft_size = analysis_fft_size(window_size, self.sample_rate);
        self
    }

    /// Width of one FFT bin in Hz
    pub fn bin_width_hz(&self) -> f32 {
        self.sample_rate as f32 / self.fft_size.max(1) as f32
    }

    pub fn tone_samples(&self) -> usize {
        seconds_to_samples(self.tone_duration, self.sample_rate)
    }

    pub fn silence_samples(&self) -> usize {
        seconds_to_samples(self.silence_duration, self.sample_rate)
    }

    /// Samples occupied by one encoded token (tone plus trailing silence)
    pub fn token_period(&self) -> usize {
        self.tone_samples() + self.silence_samples()
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(AelError::InvalidConfig("sample rate must be positive".into()));
        }
        if !(self.tone_duration > 0.0) || self.tone_samples() == 0 {
            return Err(AelError::InvalidConfig(format!(
                "tone duration {} s is shorter than one sample",
                self.tone_duration
            )));
        }
        if !(self.silence_duration >= 0.0) {
            return Err(AelError::InvalidConfig(format!(
                "silence duration {} s must not be negative",
                self.silence_duration
            )));
        }
        if self.window_size == 0 {
            return Err(AelError::InvalidConfig("window size must be positive".into()));
        }
        if self.fft_size < self.window_size {
            return Err(AelError::InvalidConfig(format!(
                "FFT size {} is smaller than window size {}",
                self.fft_size, self.window_size
            )));
        }
        // Bin centres must land within half a character step of every tone.
        if self.sample_rate as u64 * 2 > self.fft_size as u64 * CHAR_SPACING_HZ as u64 {
            return Err(AelError::InvalidConfig(format!(
                "FFT size {} gives {:.2} Hz bins at {} Hz; text needs at most {} Hz",
                self.fft_size,
                self.bin_width_hz(),
                self.sample_rate,
                CHAR_SPACING_HZ / 2
            )));
        }
        if !(self.min_peak_amplitude >= 0.0) {
            return Err(AelError::InvalidConfig(
                "minimum peak amplitude must not be negative".into(),
            ));
        }
        self.band.validate()?;
        if self.sample_rate / 2 <= self.band.text_high {
            return Err(AelError::InvalidConfig(format!(
                "Nyquist frequency {} Hz does not cover the text band up to {} Hz",
                self.sample_rate / 2,
                self.band.text_high
            )));
        }
        Ok(())
    }
}

/// Zero-padded FFT length for a window: `DEFAULT_FFT_OVERSAMPLING` times the
/// window, and never coarser than a quarter of the character spacing per bin.
pub fn analysis_fft_size(window_size: usize, sample_rate: u32) -> usize {
    let finest = (sample_rate as usize * 4).div_ceil(CHAR_SPACING_HZ as usize);
    (window_size * DEFAULT_FFT_OVERSAMPLING).max(finest)
}

pub(crate) fn seconds_to_samples(seconds: f32, sample_rate: u32) -> usize {
    if !(seconds > 0.0) {
        return 0;
    }
    (seconds as f64 * sample_rate as f64).round() as usize
}
