//! Chroma extraction
//!
//! Folds per-frame spectral energy into the 12 pitch classes
//! (semitones), independent of octave. The published summary is the
//! mean over every entry of the resulting 12 x frame_count matrix.

pub mod filterbank;

use crate::error::AnalysisError;
use crate::spectrum::Spectrogram;

const EPSILON: f32 = 1e-10;

/// Pitch-class energy profile, one 12-bin column per frame
#[derive(Debug, Clone)]
pub struct ChromaMatrix {
    /// Per-frame pitch-class energies, each normalized to peak 1.0
    /// (all-zero for silent frames)
    pub frames: Vec<[f32; 12]>,
}

impl ChromaMatrix {
    /// Number of frames (matrix columns)
    pub fn num_frames(&self) -> usize {
        self.frames.len()
    }

    /// Mean over all 12 x frame_count entries; 0 for an empty matrix
    pub fn mean(&self) -> f32 {
        if self.frames.is_empty() {
            return 0.0;
        }
        let total: f32 = self.frames.iter().flat_map(|f| f.iter()).sum();
        total / (12 * self.frames.len()) as f32
    }
}

/// Extract the chroma matrix from a magnitude spectrogram
///
/// Each frame's power spectrum is folded modulo 12 over the semitone
/// grid anchored at `tuning_frequency` (A440 by convention), then scaled
/// by the frame's own maximum so every entry lies in [0, 1]. Frames
/// with no energy stay all-zero rather than dividing by a vanishing
/// maximum.
///
/// # Errors
///
/// Returns `AnalysisError::ProcessingError` if the spectrogram holds no
/// frames.
pub fn extract_chroma(
    spectrogram: &Spectrogram,
    tuning_frequency: f32,
) -> Result<ChromaMatrix, AnalysisError> {
    if spectrogram.num_frames() == 0 {
        return Err(AnalysisError::ProcessingError(
            "Cannot extract chroma from an empty spectrogram".to_string(),
        ));
    }

    let class_map = filterbank::pitch_class_map(
        spectrogram.n_bins,
        spectrogram.frame_size,
        spectrogram.sample_rate,
        tuning_frequency,
    );

    let mut frames = Vec::with_capacity(spectrogram.num_frames());

    for magnitudes in &spectrogram.magnitudes {
        let mut classes = [0.0f32; 12];
        for (bin, &class) in class_map.iter().enumerate() {
            if let Some(class) = class {
                let power = magnitudes[bin] * magnitudes[bin];
                classes[class] += power;
            }
        }

        let peak = classes.iter().copied().fold(0.0f32, f32::max);
        if peak > EPSILON {
            for energy in &mut classes {
                *energy /= peak;
            }
        }

        frames.push(classes);
    }

    let matrix = ChromaMatrix { frames };
    log::debug!(
        "Chroma: {} frames, matrix mean {:.4}",
        matrix.num_frames(),
        matrix.mean()
    );

    Ok(matrix)
}
