//! Audio decoding using Symphonia
//!
//! Decodes a compressed or container audio file into a linear mono
//! sample buffer at the pipeline's target sample rate. Multichannel
//! sources are folded to mono by channel averaging; sources at a
//! different rate are linearly resampled.

use std::fs::File;
use std::path::Path;

use symphonia::core::audio::{AudioBuffer, AudioBufferRef, Signal};
use symphonia::core::codecs::{DecoderOptions, CODEC_TYPE_NULL};
use symphonia::core::conv::FromSample;
use symphonia::core::errors::Error as SymphoniaError;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::sample::Sample;

use crate::error::AnalysisError;

/// Decode an audio file to mono PCM at the target sample rate
///
/// # Arguments
///
/// * `path` - Path to the audio file
/// * `target_sample_rate` - Sample rate the returned buffer is
///   resampled to when the source differs
///
/// # Returns
///
/// Tuple of (mono samples in [-1.0, 1.0], sample rate). The returned
/// rate always equals `target_sample_rate`.
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` for a missing or unreadable
/// file, an unsupported or corrupt stream, or a stream that decodes to
/// zero samples. An empty buffer is never silently substituted.
pub fn load(path: &Path, target_sample_rate: u32) -> Result<(Vec<f32>, u32), AnalysisError> {
    let file = File::open(path)
        .map_err(|e| AnalysisError::DecodingError(format!("Failed to open {:?}: {}", path, e)))?;
    let stream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(
            &hint,
            stream,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .map_err(|e| AnalysisError::DecodingError(format!("Failed to probe format: {}", e)))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::DecodingError("No supported audio tracks found".to_string()))?;

    let track_id = track.id;
    let source_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AnalysisError::DecodingError("Stream reports no sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::DecodingError(format!("Failed to create decoder: {}", e)))?;

    let mut samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(SymphoniaError::IoError(e)) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                break;
            }
            Err(e) => {
                return Err(AnalysisError::DecodingError(format!(
                    "Error reading packet: {}",
                    e
                )))
            }
        };

        if packet.track_id() != track_id {
            continue;
        }

        match decoder.decode(&packet) {
            Ok(decoded) => fold_to_mono(&decoded, &mut samples),
            Err(SymphoniaError::DecodeError(msg)) => {
                // Skip corrupted packets, keep decoding the rest
                log::warn!("Skipping corrupted packet: {}", msg);
                continue;
            }
            Err(e) => {
                return Err(AnalysisError::DecodingError(format!("Decode error: {}", e)))
            }
        }
    }

    if samples.is_empty() {
        return Err(AnalysisError::DecodingError(
            "Stream decoded to zero samples".to_string(),
        ));
    }

    log::debug!(
        "Decoded {:?}: {} samples at {} Hz",
        path,
        samples.len(),
        source_rate
    );

    if source_rate != target_sample_rate {
        samples = resample_linear(&samples, source_rate, target_sample_rate);
        log::debug!(
            "Resampled {} -> {} Hz ({} samples)",
            source_rate,
            target_sample_rate,
            samples.len()
        );
    }

    Ok((samples, target_sample_rate))
}

/// Append the mono fold of one decoded packet to `out`
fn fold_to_mono(decoded: &AudioBufferRef, out: &mut Vec<f32>) {
    match decoded {
        AudioBufferRef::F32(buf) => mix_channels(buf, out),
        AudioBufferRef::F64(buf) => mix_channels(buf, out),
        AudioBufferRef::U8(buf) => mix_channels(buf, out),
        AudioBufferRef::U16(buf) => mix_channels(buf, out),
        AudioBufferRef::U24(buf) => mix_channels(buf, out),
        AudioBufferRef::U32(buf) => mix_channels(buf, out),
        AudioBufferRef::S8(buf) => mix_channels(buf, out),
        AudioBufferRef::S16(buf) => mix_channels(buf, out),
        AudioBufferRef::S24(buf) => mix_channels(buf, out),
        AudioBufferRef::S32(buf) => mix_channels(buf, out),
    }
}

/// Average all channels of a decoded buffer into mono f32
fn mix_channels<S>(buf: &AudioBuffer<S>, out: &mut Vec<f32>)
where
    S: Sample,
    f32: FromSample<S>,
{
    let channels = buf.spec().channels.count();
    let frames = buf.frames();

    if channels == 0 || frames == 0 {
        return;
    }

    if channels == 1 {
        out.extend(buf.chan(0).iter().map(|&s| f32::from_sample(s)));
        return;
    }

    let scale = 1.0 / channels as f32;
    let start = out.len();
    out.resize(start + frames, 0.0);
    for ch in 0..channels {
        for (slot, &sample) in out[start..].iter_mut().zip(buf.chan(ch)) {
            *slot += f32::from_sample(sample) * scale;
        }
    }
}

/// Linear-interpolation resampling
///
/// Adequate for analysis purposes; the feature statistics are broad
/// spectral aggregates and do not depend on a brick-wall resampler.
fn resample_linear(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).round() as usize;

    (0..out_len)
        .map(|i| {
            let position = i as f64 * ratio;
            let index = position.floor() as usize;
            let frac = (position - index as f64) as f32;
            let current = samples[index.min(samples.len() - 1)];
            let next = samples[(index + 1).min(samples.len() - 1)];
            current * (1.0 - frac) + next * frac
        })
        .collect()
}
