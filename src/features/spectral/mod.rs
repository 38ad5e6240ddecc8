//! Spectral shape statistics
//!
//! Per-frame centroid, bandwidth and rolloff over the magnitude
//! spectrum, reduced to arithmetic means across frames. An all-zero
//! frame contributes 0 to every statistic; the guard lives in the
//! per-frame computation so NaN can never reach the aggregate.
//!
//! # Reference
//!
//! Peeters, G. (2004). A large set of audio features for sound
//! description. *CUIDADO project report*.

use crate::error::AnalysisError;
use crate::spectrum::Spectrogram;

const EPSILON: f32 = 1e-10;

/// Frame-averaged spectral shape statistics
#[derive(Debug, Clone, Copy)]
pub struct SpectralShape {
    /// Mean spectral centroid in Hz ("brightness")
    pub centroid: f32,

    /// Mean spectral bandwidth in Hz (spread around the centroid)
    pub bandwidth: f32,

    /// Mean rolloff frequency in Hz (cumulative-energy percentile)
    pub rolloff: f32,
}

/// Compute frame-averaged spectral shape statistics
///
/// # Arguments
///
/// * `spectrogram` - Shared magnitude spectrogram
/// * `rolloff_percentile` - Cumulative-energy fraction for the rolloff
///   frequency (typically 0.85)
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` if the spectrogram holds no
/// frames.
pub fn extract_spectral_shape(
    spectrogram: &Spectrogram,
    rolloff_percentile: f32,
) -> Result<SpectralShape, AnalysisError> {
    let num_frames = spectrogram.num_frames();
    if num_frames == 0 {
        return Err(AnalysisError::ProcessingError(
            "Cannot compute spectral shape from an empty spectrogram".to_string(),
        ));
    }

    let mut centroid_sum = 0.0f32;
    let mut bandwidth_sum = 0.0f32;
    let mut rolloff_sum = 0.0f32;

    for magnitudes in &spectrogram.magnitudes {
        let total: f32 = magnitudes.iter().sum();
        if total < EPSILON {
            continue; // silent frame contributes 0 to every sum
        }

        let centroid = frame_centroid(spectrogram, magnitudes, total);
        centroid_sum += centroid;
        bandwidth_sum += frame_bandwidth(spectrogram, magnitudes, total, centroid);
        rolloff_sum += frame_rolloff(spectrogram, magnitudes, total, rolloff_percentile);
    }

    let shape = SpectralShape {
        centroid: centroid_sum / num_frames as f32,
        bandwidth: bandwidth_sum / num_frames as f32,
        rolloff: rolloff_sum / num_frames as f32,
    };

    log::debug!(
        "Spectral shape: centroid {:.1} Hz, bandwidth {:.1} Hz, rolloff {:.1} Hz",
        shape.centroid,
        shape.bandwidth,
        shape.rolloff
    );

    Ok(shape)
}

/// Energy-weighted mean frequency of one frame
fn frame_centroid(spectrogram: &Spectrogram, magnitudes: &[f32], total: f32) -> f32 {
    let weighted: f32 = magnitudes
        .iter()
        .enumerate()
        .map(|(bin, &mag)| spectrogram.bin_frequency(bin) * mag)
        .sum();
    weighted / total
}

/// Energy-weighted spread around the centroid of one frame
fn frame_bandwidth(
    spectrogram: &Spectrogram,
    magnitudes: &[f32],
    total: f32,
    centroid: f32,
) -> f32 {
    let weighted: f32 = magnitudes
        .iter()
        .enumerate()
        .map(|(bin, &mag)| {
            let delta = spectrogram.bin_frequency(bin) - centroid;
            delta * delta * mag
        })
        .sum();
    (weighted / total).sqrt()
}

/// Smallest frequency holding `percentile` of the frame's cumulative energy
fn frame_rolloff(
    spectrogram: &Spectrogram,
    magnitudes: &[f32],
    total: f32,
    percentile: f32,
) -> f32 {
    let threshold = percentile * total;
    let mut cumulative = 0.0f32;
    for (bin, &mag) in magnitudes.iter().enumerate() {
        cumulative += mag;
        if cumulative >= threshold {
            return spectrogram.bin_frequency(bin);
        }
    }
    spectrogram.nyquist()
}
