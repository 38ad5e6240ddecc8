//! Configuration parameters for feature extraction

/// Feature extraction configuration parameters
///
/// All spectral extractors share the same frame/hop configuration so that
/// frame counts agree between the onset envelope and the chroma and
/// spectral-shape pipelines.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    /// Target sample rate in Hz (default: 44100)
    /// The loader resamples any source that differs.
    pub target_sample_rate: u32,

    /// Analysis frame size in samples (default: 2048)
    pub frame_size: usize,

    /// Hop size between frames in samples (default: 512)
    /// Must satisfy frame_size >= hop_size > 0.
    pub hop_size: usize,

    /// Tuning reference for chroma folding in Hz (default: 440.0, A4)
    pub tuning_frequency: f32,

    /// Rolloff percentile in (0, 1] (default: 0.85)
    /// The rolloff frequency is the smallest frequency below which this
    /// fraction of the frame's cumulative spectral energy lies.
    pub rolloff_percentile: f32,

    /// Minimum BPM to consider (default: 60.0)
    pub min_bpm: f32,

    /// Maximum BPM to consider (default: 180.0)
    pub max_bpm: f32,

    /// Tempo prior center in BPM (default: 120.0)
    /// Breaks octave ties in the autocorrelation tempogram and serves as
    /// the fallback value when the onset envelope is degenerate.
    pub prior_bpm: f32,

    /// Tempogram analysis window in onset-envelope frames (default: 384)
    pub tempogram_window: usize,

    /// Beat tracker transition tightness (default: 100.0)
    /// Penalty weight on log-squared deviation from the estimated beat
    /// period; higher values force a more rigid grid.
    pub beat_tightness: f32,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            target_sample_rate: 44100,
            frame_size: 2048,
            hop_size: 512,
            tuning_frequency: 440.0,
            rolloff_percentile: 0.85,
            min_bpm: 60.0,
            max_bpm: 180.0,
            prior_bpm: 120.0,
            tempogram_window: 384,
            beat_tightness: 100.0,
        }
    }
}

impl AnalysisConfig {
    /// Validate parameter invariants
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if any invariant is violated
    /// (zero hop, hop larger than frame, empty BPM range, rolloff
    /// percentile outside (0, 1]).
    pub fn validate(&self) -> Result<(), crate::error::AnalysisError> {
        use crate::error::AnalysisError;

        if self.hop_size == 0 {
            return Err(AnalysisError::InvalidInput(
                "Hop size must be > 0".to_string(),
            ));
        }
        if self.frame_size < self.hop_size {
            return Err(AnalysisError::InvalidInput(format!(
                "Frame size ({}) must be >= hop size ({})",
                self.frame_size, self.hop_size
            )));
        }
        if self.target_sample_rate == 0 {
            return Err(AnalysisError::InvalidInput(
                "Invalid target sample rate: 0".to_string(),
            ));
        }
        if self.min_bpm <= 0.0 || self.max_bpm <= 0.0 || self.min_bpm >= self.max_bpm {
            return Err(AnalysisError::InvalidInput(format!(
                "Invalid BPM range: [{:.1}, {:.1}]",
                self.min_bpm, self.max_bpm
            )));
        }
        if !(self.rolloff_percentile > 0.0 && self.rolloff_percentile <= 1.0) {
            return Err(AnalysisError::InvalidInput(format!(
                "Rolloff percentile must be in (0, 1], got {}",
                self.rolloff_percentile
            )));
        }
        if self.tuning_frequency <= 0.0 {
            return Err(AnalysisError::InvalidInput(format!(
                "Tuning frequency must be > 0, got {}",
                self.tuning_frequency
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AnalysisConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_hop_rejected() {
        let mut config = AnalysisConfig::default();
        config.hop_size = 0;
        assert!(config.validate().is_err());

        config.hop_size = 4096;
        assert!(config.validate().is_err(), "hop larger than frame must be rejected");
    }

    #[test]
    fn test_invalid_bpm_range_rejected() {
        let mut config = AnalysisConfig::default();
        config.min_bpm = 200.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_rolloff_percentile_rejected() {
        let mut config = AnalysisConfig::default();
        config.rolloff_percentile = 1.5;
        assert!(config.validate().is_err());

        config.rolloff_percentile = 0.0;
        assert!(config.validate().is_err());
    }
}
