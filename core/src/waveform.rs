//! Mono sample buffers and the PCM conversions around them
//!
//! Multi-channel sources are reduced to their first channel, and sources at a
//! foreign sample rate are brought to the analysis rate with linear
//! interpolation.

use crate::PCM16_SCALE;

/// Mono audio at a fixed sample rate
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// 16-bit samples: clamped to [-1.0, 1.0] and scaled by 32767
    pub fn to_pcm16(&self) -> Vec<i16> {
        self.samples
            .iter()
            .map(|&s| (s.clamp(-1.0, 1.0) * PCM16_SCALE) as i16)
            .collect()
    }

    pub fn from_pcm16(samples: &[i16], sample_rate: u32) -> Self {
        Self::new(
            samples.iter().map(|&s| s as f32 / 32768.0).collect(),
            sample_rate,
        )
    }

    /// Same audio at `sample_rate`
    pub fn resampled(&self, sample_rate: u32) -> Self {
        Self::new(
            resample_linear(&self.samples, self.sample_rate, sample_rate),
            sample_rate,
        )
    }
}

/// Channel 0 of interleaved audio
///
/// # Arguments
/// * `interleaved` - Samples ordered `[c0, c1, .., c0, c1, ..]`
/// * `channels` - Channel count; 0 and 1 both return the input unchanged
pub fn first_channel<T: Copy>(interleaved: &[T], channels: usize) -> Vec<T> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    interleaved.iter().step_by(channels).copied().collect()
}

/// Resample audio to a target sample rate using linear interpolation
///
/// # Example
/// ```ignore
/// let audio_48k = resample_linear(&audio_44k, 44100, 48000);
/// ```
pub fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() || from_rate == 0 || to_rate == 0 {
        return samples.to_vec();
    }

    let ratio = to_rate as f64 / from_rate as f64;
    let new_length = (samples.len() as f64 * ratio).ceil() as usize;
    let mut resampled = Vec::with_capacity(new_length);

    for i in 0..new_length {
        let src_idx = i as f64 / ratio;
        let src_idx_floor = src_idx.floor() as usize;
        let fraction = (src_idx - src_idx_floor as f64) as f32;

        let current = samples[src_idx_floor.min(samples.len() - 1)];
        let interpolated = match samples.get(src_idx_floor + 1) {
            Some(&next) => current * (1.0 - fraction) + next * fraction,
            None => current,
        };

        resampled.push(interpolated);
    }

    resampled
}
