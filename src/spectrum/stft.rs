//! Short-time magnitude spectrogram
//!
//! Computes the Hann-windowed magnitude spectrum of every analysis frame
//! in one pass. The result is shared read-only by the onset, chroma and
//! spectral-shape extractors, which keeps intermediate memory at
//! O(frame_count x bins) for the whole pipeline.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::error::AnalysisError;
use crate::spectrum::{frame_count, frame_view, hann_window};

/// Magnitude spectrogram over the shared frame grid
#[derive(Debug, Clone)]
pub struct Spectrogram {
    /// Per-frame magnitude spectra, `frame_count` rows of `n_bins` bins
    pub magnitudes: Vec<Vec<f32>>,

    /// Number of frequency bins per frame (frame_size / 2 + 1)
    pub n_bins: usize,

    /// Frame size in samples
    pub frame_size: usize,

    /// Hop size in samples
    pub hop_size: usize,

    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl Spectrogram {
    /// Number of frames
    pub fn num_frames(&self) -> usize {
        self.magnitudes.len()
    }

    /// Center frequency of bin `bin` in Hz
    pub fn bin_frequency(&self, bin: usize) -> f32 {
        bin as f32 * self.sample_rate as f32 / self.frame_size as f32
    }

    /// Nyquist frequency in Hz
    pub fn nyquist(&self) -> f32 {
        self.sample_rate as f32 / 2.0
    }
}

/// Compute the Hann-windowed magnitude spectrogram of a waveform
///
/// Frames start at multiples of `hop_size`; the final partial frame is
/// zero-padded to `frame_size` before the transform, matching the frame
/// grid used by the time-domain extractors.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz
/// * `frame_size` - Analysis frame size (typically 2048)
/// * `hop_size` - Hop between frame starts (typically 512)
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer or a
/// degenerate frame/hop configuration.
pub fn magnitude_spectrogram(
    samples: &[f32],
    sample_rate: u32,
    frame_size: usize,
    hop_size: usize,
) -> Result<Spectrogram, AnalysisError> {
    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }
    if hop_size == 0 || frame_size < hop_size {
        return Err(AnalysisError::InvalidInput(format!(
            "Invalid frame configuration: frame={}, hop={}",
            frame_size, hop_size
        )));
    }

    let num_frames = frame_count(samples.len(), hop_size);
    let n_bins = frame_size / 2 + 1;

    log::debug!(
        "Computing magnitude spectrogram: {} samples, {} frames, {} bins",
        samples.len(),
        num_frames,
        n_bins
    );

    let window = hann_window(frame_size);
    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(frame_size);

    let mut magnitudes = Vec::with_capacity(num_frames);
    let mut buffer = vec![Complex::new(0.0f32, 0.0f32); frame_size];

    for frame_idx in 0..num_frames {
        let view = frame_view(samples, frame_idx, frame_size, hop_size);

        for (i, slot) in buffer.iter_mut().enumerate() {
            let sample = if i < view.len() { view[i] } else { 0.0 };
            *slot = Complex::new(sample * window[i], 0.0);
        }

        fft.process(&mut buffer);

        let spectrum: Vec<f32> = buffer[..n_bins].iter().map(|c| c.norm()).collect();
        magnitudes.push(spectrum);
    }

    Ok(Spectrogram {
        magnitudes,
        n_bins,
        frame_size,
        hop_size,
        sample_rate,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(frequency: f32, sample_rate: u32, seconds: f32) -> Vec<f32> {
        let n = (sample_rate as f32 * seconds) as usize;
        (0..n)
            .map(|i| {
                (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_spectrogram_dimensions() {
        let samples = vec![0.0f32; 44100];
        let spec = magnitude_spectrogram(&samples, 44100, 2048, 512).unwrap();

        assert_eq!(spec.num_frames(), frame_count(44100, 512));
        assert_eq!(spec.n_bins, 1025);
        for frame in &spec.magnitudes {
            assert_eq!(frame.len(), 1025);
        }
    }

    #[test]
    fn test_sine_peaks_at_expected_bin() {
        // 430.66 Hz sits exactly on bin 20 for 2048-point frames at 44.1 kHz
        let bin_width = 44100.0 / 2048.0;
        let samples = sine(20.0 * bin_width, 44100, 1.0);
        let spec = magnitude_spectrogram(&samples, 44100, 2048, 512).unwrap();

        // Check an interior frame (tail frames are partially padded)
        let frame = &spec.magnitudes[10];
        let peak_bin = frame
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .map(|(i, _)| i)
            .unwrap();
        assert_eq!(peak_bin, 20, "Spectral peak should land on the sine's bin");
    }

    #[test]
    fn test_silence_is_all_zero() {
        let samples = vec![0.0f32; 8192];
        let spec = magnitude_spectrogram(&samples, 44100, 2048, 512).unwrap();
        for frame in &spec.magnitudes {
            for &mag in frame {
                assert!(mag.abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_empty_input_rejected() {
        assert!(magnitude_spectrogram(&[], 44100, 2048, 512).is_err());
    }

    #[test]
    fn test_short_input_is_padded() {
        // Shorter than one frame: still produces a frame grid
        let samples = vec![0.25f32; 300];
        let spec = magnitude_spectrogram(&samples, 44100, 2048, 512).unwrap();
        assert_eq!(spec.num_frames(), 1);
    }
}
