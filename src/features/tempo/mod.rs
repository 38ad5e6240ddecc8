//! Tempo estimation
//!
//! Two independent BPM estimates combined by a fixed fallback policy:
//! - Raw estimate: windowed autocorrelation of the onset envelope
//! - Refined estimate: inter-beat intervals from a dynamic-programming
//!   beat tracker
//!
//! The refined estimate wins whenever the tracker finds at least two
//! beats; otherwise the raw estimate is used, which guarantees a finite,
//! positive BPM even for very short or arrhythmic input.

pub mod autocorrelation;
pub mod beat_tracker;

use crate::config::AnalysisConfig;
use crate::features::onset::OnsetEnvelope;

const EPSILON: f32 = 1e-10;

/// Tempo estimate with the beat grid that produced it
#[derive(Debug, Clone)]
pub struct TempoEstimate {
    /// Selected tempo in BPM, always finite and > 0
    pub bpm: f32,

    /// True when the beat-tracking path produced the estimate
    pub refined: bool,

    /// Beat times in seconds, strictly increasing; may hold 0 or 1
    /// entries when no usable grid was found
    pub beat_times: Vec<f32>,
}

/// Estimate tempo from an onset envelope
///
/// Runs both estimation paths unconditionally (matching the reference
/// behavior) and applies the selection policy: the refined inter-beat
/// estimate when the beat grid holds >= 2 entries, the raw
/// autocorrelation estimate otherwise. The mean-interval division is
/// never attempted on fewer than two beats.
pub fn estimate_tempo(envelope: &OnsetEnvelope, config: &AnalysisConfig) -> TempoEstimate {
    let raw_bpm = autocorrelation::raw_tempo(envelope, config);
    let beat_times = beat_tracker::track_beats(envelope, raw_bpm, config.beat_tightness);

    if beat_times.len() >= 2 {
        let intervals: Vec<f32> = beat_times.windows(2).map(|w| w[1] - w[0]).collect();
        let mean_interval = intervals.iter().sum::<f32>() / intervals.len() as f32;

        if mean_interval > EPSILON {
            let refined_bpm = 60.0 / mean_interval;
            log::debug!(
                "Tempo: refined {:.2} BPM from {} beats (raw {:.2} BPM)",
                refined_bpm,
                beat_times.len(),
                raw_bpm
            );
            return TempoEstimate {
                bpm: refined_bpm,
                refined: true,
                beat_times,
            };
        }
    }

    log::debug!(
        "Tempo: raw fallback {:.2} BPM ({} beats tracked)",
        raw_bpm,
        beat_times.len()
    );
    TempoEstimate {
        bpm: raw_bpm,
        refined: false,
        beat_times,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Envelope with unit impulses every `period` frames
    fn impulse_envelope(n_frames: usize, period: usize, frames_per_second: f32) -> OnsetEnvelope {
        let mut strengths = vec![0.0f32; n_frames];
        for spike in strengths.iter_mut().step_by(period) {
            *spike = 1.0;
        }
        OnsetEnvelope {
            strengths,
            frames_per_second,
        }
    }

    #[test]
    fn test_periodic_envelope_selects_refined_path() {
        let fps = 44100.0 / 512.0;
        // 43 frames per beat ~ 120 BPM
        let envelope = impulse_envelope(600, 43, fps);
        let config = AnalysisConfig::default();

        let estimate = estimate_tempo(&envelope, &config);
        assert!(estimate.refined, "Periodic envelope should refine via beats");
        assert!(estimate.beat_times.len() >= 2);
        assert!(
            (estimate.bpm - 120.0).abs() < 5.0,
            "Expected ~120 BPM, got {:.2}",
            estimate.bpm
        );
    }

    #[test]
    fn test_silent_envelope_falls_back_to_raw() {
        let fps = 44100.0 / 512.0;
        let envelope = OnsetEnvelope {
            strengths: vec![0.0; 200],
            frames_per_second: fps,
        };
        let config = AnalysisConfig::default();

        let estimate = estimate_tempo(&envelope, &config);
        assert!(!estimate.refined);
        assert!(estimate.beat_times.len() < 2);
        assert!(estimate.bpm.is_finite() && estimate.bpm > 0.0);
        // Raw fallback for a degenerate envelope is the prior center
        assert!((estimate.bpm - config.prior_bpm).abs() < 1e-6);
    }

    #[test]
    fn test_single_spike_never_divides_intervals() {
        let fps = 44100.0 / 512.0;
        let mut strengths = vec![0.0f32; 100];
        strengths[50] = 1.0;
        let envelope = OnsetEnvelope {
            strengths,
            frames_per_second: fps,
        };
        let config = AnalysisConfig::default();

        let estimate = estimate_tempo(&envelope, &config);
        assert!(!estimate.refined, "A single beat must use the raw path");
        assert_eq!(
            estimate.bpm,
            autocorrelation::raw_tempo(&envelope, &config),
            "Fallback must equal the raw autocorrelation estimate"
        );
    }

    #[test]
    fn test_beat_times_strictly_increasing() {
        let fps = 44100.0 / 512.0;
        let envelope = impulse_envelope(600, 43, fps);
        let estimate = estimate_tempo(&envelope, &AnalysisConfig::default());

        for pair in estimate.beat_times.windows(2) {
            assert!(pair[1] > pair[0], "Beat grid must be strictly increasing");
        }
    }
}
