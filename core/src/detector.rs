use crate::config::AelConfig;
use crate::error::{AelError, Result};
use realfft::num_complex::Complex;
use realfft::RealFftPlanner;
use std::f32::consts::PI;

/// Onset threshold relative to the loudest sample
const ONSET_FRACTION: f32 = 0.25;

/// Dominant-frequency detector
///
/// Splits a waveform into non-overlapping windows of `window_size` samples
/// (the last one zero-padded), applies a periodic Hann window, zero-pads to
/// `fft_size` and reports the frequency of the strongest bin, rounded to whole
/// Hz. Windows whose peak amplitude stays under `min_peak_amplitude` report
/// 0 Hz. Peak picking only: no phase, no overlap-add.
pub struct FrequencyDetector {
    window_size: usize,
    fft_size: usize,
    min_peak_amplitude: f32,
    window: Vec<f32>,
    window_gain: f32,
}

impl FrequencyDetector {
    pub fn new(config: &AelConfig) -> Result<Self> {
        if config.window_size == 0 || config.fft_size < config.window_size {
            return Err(AelError::InvalidConfig(format!(
                "window size {} and FFT size {} are not usable",
                config.window_size, config.fft_size
            )));
        }

        let window = hann_window(config.window_size);
        let window_gain = window.iter().sum::<f32>();

        Ok(Self {
            window_size: config.window_size,
            fft_size: config.fft_size,
            min_peak_amplitude: config.min_peak_amplitude,
            window,
            window_gain,
        })
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Index of the first sample loud enough to belong to a tone
    ///
    /// The threshold is a quarter of the waveform's peak level, and never below
    /// `min_peak_amplitude`. Returns `None` when nothing reaches it.
    pub fn find_onset(&self, samples: &[f32]) -> Option<usize> {
        let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        let threshold = (peak * ONSET_FRACTION).max(self.min_peak_amplitude);
        if peak < threshold || peak == 0.0 {
            return None;
        }
        samples.iter().position(|&s| s.abs() >= threshold)
    }

    /// One dominant frequency per analysis window
    pub fn detect(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<u32>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        // The planner caches plans internally; one per call keeps the detector Sync
        let mut planner = RealFftPlanner::<f32>::new();
        let r2c = planner.plan_fft_forward(self.fft_size);
        let mut frame = r2c.make_input_vec();
        let mut spectrum = r2c.make_output_vec();
        let bin_hz = sample_rate as f32 / self.fft_size as f32;

        let mut frequencies = Vec::with_capacity(samples.len().div_ceil(self.window_size));
        for chunk in samples.chunks(self.window_size) {
            frame.iter_mut().for_each(|x| *x = 0.0);
            for ((dst, &src), &weight) in frame.iter_mut().zip(chunk).zip(&self.window) {
                *dst = src * weight;
            }

            r2c.process(&mut frame, &mut spectrum)
                .map_err(|e| AelError::FftError(format!("forward FFT failed: {:?}", e)))?;

            let (bin, magnitude) = peak_bin(&spectrum);
            let amplitude = if self.window_gain > 0.0 {
                2.0 * magnitude / self.window_gain
            } else {
                0.0
            };

            let frequency = if bin == 0 || amplitude < self.min_peak_amplitude {
                0
            } else {
                (bin as f32 * bin_hz).round() as u32
            };
            frequencies.push(frequency);
        }

        Ok(frequencies)
    }
}

/// Index and magnitude of the strongest bin; the first one wins ties
fn peak_bin(spectrum: &[Complex<f32>]) -> (usize, f32) {
    let mut best = (0usize, 0.0f32);
    for (i, value) in spectrum.iter().enumerate() {
        let magnitude = value.norm();
        if magnitude > best.1 {
            best = (i, magnitude);
        }
    }
    best
}

/// Periodic Hann window
fn hann_window(len: usize) -> Vec<f32> {
    (0..len)
        .map(|i| {
            let phase = 2.0 * PI * i as f32 / len as f32;
            0.5 - 0.5 * phase.cos()
        })
        .collect()
}
