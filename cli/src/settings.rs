//! JSON config file layered over the protocol defaults
//!
//! Precedence, lowest first: built-in defaults, the `--config` file, then the
//! `--tone-duration` / `--window-size` flags. Timing-derived values (window and
//! FFT size) are recomputed from the effective timing unless set explicitly.

use crate::error::{CliError, Result};
use aelwave_core::{AelConfig, DEFAULT_SAMPLE_RATE, DEFAULT_TONE_DURATION_SECS};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub sample_rate: Option<u32>,
    pub tone_duration: Option<f32>,
    pub silence_duration: Option<f32>,
    pub window_size: Option<usize>,
    pub fft_size: Option<usize>,
    pub min_peak_amplitude: Option<f32>,
    #[serde(default)]
    pub band: BandFile,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BandFile {
    pub silence_ceiling: Option<u32>,
    pub command_ceiling: Option<u32>,
    pub text_low: Option<u32>,
    pub text_high: Option<u32>,
    pub tolerance_floor_hz: Option<u32>,
    pub tolerance_percent: Option<u32>,
}

/// Values given on the command line
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub tone_duration: Option<f32>,
    pub window_size: Option<usize>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|source| CliError::ConfigFile {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Effective protocol config; validation is left to the encoder and decoder
    pub fn resolve(&self, overrides: Overrides) -> AelConfig {
        let sample_rate = self.sample_rate.unwrap_or(DEFAULT_SAMPLE_RATE);
        let tone_duration = overrides
            .tone_duration
            .or(self.tone_duration)
            .unwrap_or(DEFAULT_TONE_DURATION_SECS);
        let silence_duration = self.silence_duration.unwrap_or(tone_duration / 100.0);

        let mut config = AelConfig::with_timing(sample_rate, tone_duration, silence_duration);

        if let Some(window_size) = overrides.window_size.or(self.window_size) {
            config = config.with_window_size(window_size);
        }
        if let Some(fft_size) = self.fft_size {
            config.fft_size = fft_size;
        }
        if let Some(amplitude) = self.min_peak_amplitude {
            config.min_peak_amplitude = amplitude;
        }

        let band = &mut config.band;
        let file = &self.band;
        band.silence_ceiling = file.silence_ceiling.unwrap_or(band.silence_ceiling);
        band.command_ceiling = file.command_ceiling.unwrap_or(band.command_ceiling);
        band.text_low = file.text_low.unwrap_or(band.text_low);
        band.text_high = file.text_high.unwrap_or(band.text_high);
        band.tolerance_floor_hz = file.tolerance_floor_hz.unwrap_or(band.tolerance_floor_hz);
        band.tolerance_percent = file.tolerance_percent.unwrap_or(band.tolerance_percent);

        config
    }
}
