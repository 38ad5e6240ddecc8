//! Autocorrelation-based raw tempo estimation
//!
//! Finds periodicity in the onset envelope using FFT-accelerated
//! autocorrelation. The envelope is cut into fixed-length analysis
//! windows; each window contributes one tempo pick (its strongest lag in
//! the BPM search range, weighted toward the prior tempo to break octave
//! ties), and the raw estimate is the arithmetic mean of the per-window
//! picks. Coarse and noisy for unsteady tempi, but always defined.
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming.
//! *Journal of New Music Research*, 36(1), 51-60.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::config::AnalysisConfig;
use crate::features::onset::OnsetEnvelope;

const EPSILON: f32 = 1e-10;

/// Width of the log-tempo prior in octaves
const PRIOR_OCTAVE_STD: f32 = 1.0;

/// Estimate a raw, global tempo from the onset envelope
///
/// # Arguments
///
/// * `envelope` - Onset strength envelope
/// * `config` - BPM search range, prior center and tempogram window
///
/// # Returns
///
/// Mean of the per-window tempo picks in BPM. A degenerate envelope
/// (all-zero, or too short for any lag in the search range) yields
/// `config.prior_bpm`, so the result is always finite and positive.
pub fn raw_tempo(envelope: &OnsetEnvelope, config: &AnalysisConfig) -> f32 {
    let fps = envelope.frames_per_second;
    if fps <= 0.0 {
        return config.prior_bpm;
    }

    // Lag bounds for the BPM search range: BPM = 60 * fps / lag
    let lag_min = ((60.0 * fps) / config.max_bpm).ceil() as usize;
    let lag_max = ((60.0 * fps) / config.min_bpm).floor() as usize;

    if lag_min == 0 || lag_min > lag_max {
        log::warn!(
            "Empty lag range [{}, {}] for {:.2} fps, using prior",
            lag_min,
            lag_max,
            fps
        );
        return config.prior_bpm;
    }

    let window_len = config.tempogram_window.max(lag_min + 1);
    let mut picks = Vec::new();

    for chunk in envelope.strengths.chunks(window_len) {
        if chunk.len() <= lag_min {
            continue;
        }

        let acf = autocorrelate(chunk);
        let upper = lag_max.min(acf.len() - 1);

        let mut best_lag = 0usize;
        let mut best_score = EPSILON;
        for lag in lag_min..=upper {
            let bpm = (60.0 * fps) / lag as f32;
            let octaves = (bpm / config.prior_bpm).log2();
            let weight = (-0.5 * (octaves / PRIOR_OCTAVE_STD).powi(2)).exp();
            let score = acf[lag] * weight;
            if score > best_score {
                best_score = score;
                best_lag = lag;
            }
        }

        if best_lag > 0 {
            picks.push((60.0 * fps) / best_lag as f32);
        }
    }

    if picks.is_empty() {
        log::debug!("No periodicity found in any tempogram window, using prior");
        return config.prior_bpm;
    }

    let mean = picks.iter().sum::<f32>() / picks.len() as f32;
    log::debug!(
        "Raw tempo: {:.2} BPM from {} tempogram windows",
        mean,
        picks.len()
    );
    mean
}

/// Autocorrelation via the FFT identity `ACF = IFFT(|FFT(signal)|^2)`
///
/// Zero-pads to the next power of two past twice the signal length so
/// the circular correlation does not wrap. O(n log n) instead of O(n^2).
pub(crate) fn autocorrelate(signal: &[f32]) -> Vec<f32> {
    let n = signal.len();
    if n == 0 {
        return Vec::new();
    }

    let fft_size = (2 * n).next_power_of_two();

    let mut buffer: Vec<Complex<f32>> = signal.iter().map(|&x| Complex::new(x, 0.0)).collect();
    buffer.resize(fft_size, Complex::new(0.0, 0.0));

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(fft_size);
    fft.process(&mut buffer);

    for x in &mut buffer {
        *x = *x * x.conj();
    }

    let ifft = planner.plan_fft_inverse(fft_size);
    ifft.process(&mut buffer);

    let scale = 1.0 / fft_size as f32;
    buffer[..n].iter().map(|x| (x.re * scale).max(0.0)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impulse_envelope(n_frames: usize, period: usize, fps: f32) -> OnsetEnvelope {
        let mut strengths = vec![0.0f32; n_frames];
        for spike in strengths.iter_mut().step_by(period) {
            *spike = 1.0;
        }
        OnsetEnvelope {
            strengths,
            frames_per_second: fps,
        }
    }

    #[test]
    fn test_autocorrelate_periodic_signal() {
        let signal = vec![1.0, 0.0, 1.0, 0.0, 1.0, 0.0, 1.0, 0.0];
        let acf = autocorrelate(&signal);

        assert_eq!(acf.len(), signal.len());
        // Lag 0 is the energy, lag 2 matches the period
        assert!(acf[0] > acf[1]);
        assert!(acf[2] > acf[1]);
        assert!(acf[2] > acf[3]);
    }

    #[test]
    fn test_autocorrelate_empty() {
        assert!(autocorrelate(&[]).is_empty());
    }

    #[test]
    fn test_raw_tempo_120_bpm() {
        let fps = 44100.0 / 512.0;
        // 43 frames between impulses: 60 * 86.13 / 43 = 120.2 BPM
        let envelope = impulse_envelope(600, 43, fps);
        let bpm = raw_tempo(&envelope, &AnalysisConfig::default());

        assert!(
            (bpm - 120.0).abs() < 5.0,
            "Expected ~120 BPM, got {:.2}",
            bpm
        );
    }

    #[test]
    fn test_raw_tempo_90_bpm() {
        let fps = 44100.0 / 512.0;
        // 57 frames between impulses: 60 * 86.13 / 57 = 90.7 BPM
        let envelope = impulse_envelope(600, 57, fps);
        let bpm = raw_tempo(&envelope, &AnalysisConfig::default());

        assert!(
            (bpm - 90.7).abs() < 5.0,
            "Expected ~90.7 BPM, got {:.2}",
            bpm
        );
    }

    #[test]
    fn test_raw_tempo_silence_uses_prior() {
        let envelope = OnsetEnvelope {
            strengths: vec![0.0; 500],
            frames_per_second: 44100.0 / 512.0,
        };
        let config = AnalysisConfig::default();
        assert_eq!(raw_tempo(&envelope, &config), config.prior_bpm);
    }

    #[test]
    fn test_raw_tempo_short_envelope_uses_prior() {
        // Shorter than the smallest valid lag: no window can vote
        let envelope = OnsetEnvelope {
            strengths: vec![1.0; 10],
            frames_per_second: 44100.0 / 512.0,
        };
        let config = AnalysisConfig::default();
        assert_eq!(raw_tempo(&envelope, &config), config.prior_bpm);
    }

    #[test]
    fn test_raw_tempo_always_positive_and_finite() {
        let fps = 44100.0 / 512.0;
        let config = AnalysisConfig::default();
        for period in [29usize, 43, 60, 86] {
            let envelope = impulse_envelope(700, period, fps);
            let bpm = raw_tempo(&envelope, &config);
            assert!(bpm.is_finite() && bpm > 0.0, "period {} gave {}", period, bpm);
            assert!(bpm >= config.min_bpm - 1.0 && bpm <= config.max_bpm + 1.0);
        }
    }
}
