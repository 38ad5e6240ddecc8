//! Zero-crossing rate
//!
//! Per-frame fraction of adjacent sample pairs whose signs differ,
//! reduced to the mean across frames. Correlates with noisiness and
//! percussive content. Samples are split into non-negative and negative
//! so exact zeros do not register as oscillation.

use crate::spectrum::{frame_count, frame_view};

/// Mean per-frame zero-crossing rate of a waveform
///
/// Crossings in each frame are counted over the in-buffer samples and
/// divided by (frame_size - 1), so the implicit zero padding of tail
/// frames counts as silence. The result always lies in [0, 1]. Returns
/// 0.0 for an empty buffer or a one-sample frame size.
pub fn mean_zero_crossing_rate(samples: &[f32], frame_size: usize, hop_size: usize) -> f32 {
    let num_frames = frame_count(samples.len(), hop_size);
    if num_frames == 0 || frame_size < 2 {
        return 0.0;
    }

    let mut rate_sum = 0.0f32;
    for frame_idx in 0..num_frames {
        let view = frame_view(samples, frame_idx, frame_size, hop_size);
        let crossings = view
            .windows(2)
            .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
            .count();
        rate_sum += crossings as f32 / (frame_size - 1) as f32;
    }

    rate_sum / num_frames as f32
}
