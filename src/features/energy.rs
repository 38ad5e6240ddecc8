//! Root-mean-square energy
//!
//! Per-frame RMS over the raw (unwindowed) samples on the shared frame
//! grid, reduced to the mean across frames. The zero-padded tail of the
//! final frames counts as silence, so the divisor is always the full
//! frame size.

use crate::spectrum::{frame_count, frame_view};

/// Mean per-frame RMS amplitude of a waveform
///
/// Returns 0.0 for an empty buffer.
pub fn mean_rms(samples: &[f32], frame_size: usize, hop_size: usize) -> f32 {
    let num_frames = frame_count(samples.len(), hop_size);
    if num_frames == 0 {
        return 0.0;
    }

    let mut rms_sum = 0.0f32;
    for frame_idx in 0..num_frames {
        let view = frame_view(samples, frame_idx, frame_size, hop_size);
        let energy: f32 = view.iter().map(|&x| x * x).sum();
        rms_sum += (energy / frame_size as f32).sqrt();
    }

    rms_sum / num_frames as f32
}
