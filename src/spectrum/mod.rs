//! Frame windowing and short-time spectral transform plumbing
//!
//! Every extractor slices the waveform with the same frame/hop grid so
//! frame counts stay aligned across the pipeline. Frames start at
//! multiples of the hop size; a frame that runs past the end of the
//! buffer is zero-padded to full length. RMS and zero-crossing work on
//! the raw frames; the spectral extractors consume the Hann-windowed
//! magnitude spectrogram computed once in [`stft`].

pub mod stft;

pub use stft::Spectrogram;

/// Number of analysis frames for a buffer of `n_samples` samples
///
/// One frame per hop-aligned start offset inside the buffer; the tail is
/// zero-padded rather than dropped.
pub fn frame_count(n_samples: usize, hop_size: usize) -> usize {
    if n_samples == 0 || hop_size == 0 {
        return 0;
    }
    (n_samples + hop_size - 1) / hop_size
}

/// Borrow the in-buffer portion of frame `index`
///
/// Returns the slice of up to `frame_size` samples starting at
/// `index * hop_size`; the missing tail (if any) is implicit zero
/// padding and contributes silence to whatever statistic the caller
/// computes.
pub fn frame_view(samples: &[f32], index: usize, frame_size: usize, hop_size: usize) -> &[f32] {
    let start = index * hop_size;
    let end = (start + frame_size).min(samples.len());
    &samples[start..end]
}

/// Periodic Hann window of length `size`
pub fn hann_window(size: usize) -> Vec<f32> {
    if size == 0 {
        return Vec::new();
    }
    (0..size)
        .map(|i| {
            let phase = 2.0 * std::f32::consts::PI * i as f32 / size as f32;
            0.5 * (1.0 - phase.cos())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_covers_tail() {
        // 44100 samples at hop 512: 87 frames, last one starting at 44032
        assert_eq!(frame_count(44100, 512), 87);
        // Exact multiple: no extra padded frame
        assert_eq!(frame_count(1024, 512), 2);
        assert_eq!(frame_count(0, 512), 0);
    }

    #[test]
    fn test_frame_view_truncates_at_buffer_end() {
        let samples = vec![1.0f32; 1000];
        let full = frame_view(&samples, 0, 512, 256);
        assert_eq!(full.len(), 512);

        // Frame 3 starts at 768, only 232 samples remain
        let tail = frame_view(&samples, 3, 512, 256);
        assert_eq!(tail.len(), 232);
    }

    #[test]
    fn test_hann_window_shape() {
        let window = hann_window(2048);
        assert_eq!(window.len(), 2048);
        assert!(window[0].abs() < 1e-6, "Hann window starts at zero");
        assert!((window[1024] - 1.0).abs() < 1e-5, "Hann window peaks at center");
        // Symmetric about the center for the periodic form
        assert!((window[1] - window[2047]).abs() < 1e-5);
    }
}
