//! Median-aggregated spectral flux onset envelope
//!
//! Onset strength per frame is the half-wave-rectified frame-to-frame
//! spectral difference, aggregated across frequency bins with the median
//! rather than the mean. The median discounts isolated noisy bins, so a
//! frame only registers as an onset when a broad swath of the spectrum
//! gains energy at once.
//!
//! # Reference
//!
//! Bello, J. P., Daudet, L., Abdallah, S., Duxbury, C., Davies, M., &
//! Sandler, M. B. (2005). A Tutorial on Onset Detection in Music Signals.
//! *IEEE Transactions on Speech and Audio Processing*, 13(5), 1035-1047.

use crate::error::AnalysisError;
use crate::features::onset::OnsetEnvelope;
use crate::spectrum::Spectrogram;

/// Compute the onset strength envelope from a magnitude spectrogram
///
/// # Arguments
///
/// * `spectrogram` - Shared magnitude spectrogram of the recording
///
/// # Returns
///
/// One onset-strength value per spectrogram frame. Frame 0 has no
/// predecessor and is conventionally 0, so the envelope length equals
/// the frame count.
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` if the spectrogram holds no
/// frames.
pub fn onset_envelope(spectrogram: &Spectrogram) -> Result<OnsetEnvelope, AnalysisError> {
    let num_frames = spectrogram.num_frames();
    if num_frames == 0 {
        return Err(AnalysisError::ProcessingError(
            "Cannot compute onset envelope from an empty spectrogram".to_string(),
        ));
    }

    let frames_per_second = spectrogram.sample_rate as f32 / spectrogram.hop_size as f32;

    let mut strengths = Vec::with_capacity(num_frames);
    strengths.push(0.0);

    let mut rectified = vec![0.0f32; spectrogram.n_bins];

    for t in 1..num_frames {
        let current = &spectrogram.magnitudes[t];
        let previous = &spectrogram.magnitudes[t - 1];

        for (i, slot) in rectified.iter_mut().enumerate() {
            *slot = (current[i] - previous[i]).max(0.0);
        }

        strengths.push(median(&mut rectified));
    }

    log::debug!(
        "Onset envelope: {} frames at {:.2} fps, peak strength {:.6}",
        strengths.len(),
        frames_per_second,
        strengths.iter().copied().fold(0.0f32, f32::max)
    );

    Ok(OnsetEnvelope {
        strengths,
        frames_per_second,
    })
}

/// Median of a scratch buffer (reorders its contents)
fn median(values: &mut [f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mid = values.len() / 2;
    values.select_nth_unstable_by(mid, |a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        // Even length: average the two central order statistics
        let upper = values[mid];
        let lower = values[..mid]
            .iter()
            .copied()
            .fold(f32::NEG_INFINITY, f32::max);
        (lower + upper) / 2.0
    }
}
