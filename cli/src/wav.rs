//! WAV container I/O
//!
//! Output is always 16-bit mono PCM at the waveform's rate. Input may be
//! 16/24/32-bit integer or 32-bit float with any channel count; only the first
//! channel is kept and it is resampled to the rate the decoder expects.

use crate::error::{CliError, Result};
use aelwave_core::waveform::first_channel;
use aelwave_core::Waveform;
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use std::fs::File;
use std::io::{BufReader, BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;

fn spec_for(waveform: &Waveform) -> WavSpec {
    WavSpec {
        channels: 1,
        sample_rate: waveform.sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

pub fn write_wav<W: Write + Seek>(waveform: &Waveform, sink: W) -> Result<()> {
    let mut writer = WavWriter::new(sink, spec_for(waveform))?;
    for sample in waveform.to_pcm16() {
        writer.write_sample(sample)?;
    }
    writer.finalize()?;
    Ok(())
}

pub fn write_wav_file(waveform: &Waveform, path: &Path) -> Result<()> {
    let file = BufWriter::new(File::create(path)?);
    write_wav(waveform, file)
}

/// Complete WAV file in memory
pub fn wav_bytes(waveform: &Waveform) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    write_wav(waveform, &mut cursor)?;
    Ok(cursor.into_inner())
}

/// Read a WAV stream as mono audio at `target_rate`
pub fn read_wav<R: Read>(source: R, target_rate: u32) -> Result<Waveform> {
    let mut reader = WavReader::new(source)?;
    let spec = reader.spec();
    let channels = spec.channels as usize;
    tracing::debug!(
        "WAV input: {} Hz, {} channel(s), {}-bit {:?}",
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        spec.sample_format
    );

    let waveform = match (spec.sample_format, spec.bits_per_sample) {
        (SampleFormat::Int, 16) => {
            let interleaved = reader.samples::<i16>().collect::<std::result::Result<Vec<_>, _>>()?;
            Waveform::from_pcm16(&first_channel(&interleaved, channels), spec.sample_rate)
        }
        (SampleFormat::Int, bits @ 17..=32) => {
            let scale = (1i64 << (bits - 1)) as f32;
            let interleaved = reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Waveform::new(first_channel(&interleaved, channels), spec.sample_rate)
        }
        (SampleFormat::Float, 32) => {
            let interleaved = reader.samples::<f32>().collect::<std::result::Result<Vec<_>, _>>()?;
            Waveform::new(first_channel(&interleaved, channels), spec.sample_rate)
        }
        (format, bits) => return Err(CliError::UnsupportedFormat { bits, format }),
    };

    if waveform.sample_rate != target_rate {
        tracing::info!(
            "Resampling {} Hz input to {} Hz",
            waveform.sample_rate,
            target_rate
        );
        return Ok(waveform.resampled(target_rate));
    }
    Ok(waveform)
}

pub fn read_wav_file(path: &Path, target_rate: u32) -> Result<Waveform> {
    let file = BufReader::new(File::open(path)?);
    read_wav(file, target_rate)
}
