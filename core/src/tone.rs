use crate::config::{seconds_to_samples, AelConfig};
use crate::{CHAR_SPACING_HZ, MAX_CHAR_CODE, MIN_CHAR_CODE};
use std::f32::consts::PI;

/// Peak level for a single tone; a chord of n tones is scaled by 1/(0.8 n)
const TONE_LEVEL: f32 = 0.5;

/// Headroom factor applied per superimposed tone
const CHORD_HEADROOM: f32 = 0.8;

/// Tone generator for command and character segments
///
/// Segments start at phase zero and carry no edge taper, so a segment of
/// `tone_duration` holds whole-window steady-state tones for the detector.
#[derive(Debug, Clone)]
pub struct ToneSynthesizer {
    sample_rate: u32,
    text_low: u32,
}

impl ToneSynthesizer {
    pub fn new(config: &AelConfig) -> Self {
        Self {
            sample_rate: config.sample_rate,
            text_low: config.band.text_low,
        }
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Sum of unit sines at `frequencies`, `duration` seconds long
    ///
    /// The sum is scaled by `0.5 / (0.8 * n)` so chords never clip. An empty
    /// frequency list yields silence of the same length.
    pub fn synthesize(&self, frequencies: &[u32], duration: f32) -> Vec<f32> {
        let num_samples = seconds_to_samples(duration, self.sample_rate);
        let mut samples = vec![0.0f32; num_samples];
        if frequencies.is_empty() {
            return samples;
        }

        let sample_rate = self.sample_rate as f32;
        for &frequency in frequencies {
            let angular_freq = 2.0 * PI * frequency as f32 / sample_rate;
            for (i, sample) in samples.iter_mut().enumerate() {
                *sample += (angular_freq * i as f32).sin();
            }
        }

        let scale = TONE_LEVEL / (frequencies.len() as f32 * CHORD_HEADROOM);
        for sample in samples.iter_mut() {
            *sample *= scale;
        }

        samples
    }

    /// Zero-amplitude segment
    pub fn silence(&self, duration: f32) -> Vec<f32> {
        vec![0.0f32; seconds_to_samples(duration, self.sample_rate)]
    }

    /// Tone frequency carrying character `ch`: `code * 10 + text_low`
    ///
    /// Returns `None` for characters outside printable ASCII.
    pub fn char_frequency(&self, ch: char) -> Option<u32> {
        let code = ch as u32;
        if !(MIN_CHAR_CODE..=MAX_CHAR_CODE).contains(&code) {
            return None;
        }
        Some(code * CHAR_SPACING_HZ + self.text_low)
    }
}
