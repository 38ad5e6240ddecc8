//! # Waveprint
//!
//! An audio feature fingerprint extractor for music classification and
//! recommendation pipelines, producing a compact fixed-schema vector of
//! rhythmic, harmonic, spectral and energetic descriptors per track.
//!
//! ## Features
//!
//! - **Tempo**: autocorrelation raw estimate refined by a
//!   dynamic-programming beat tracker
//! - **Harmony**: 12-bin pitch-class (chroma) energy profile
//! - **Spectral shape**: centroid, bandwidth and rolloff statistics
//! - **Energy**: RMS amplitude and zero-crossing rate
//!
//! ## Quick Start
//!
//! ```no_run
//! use waveprint::{extract_features, AnalysisConfig};
//!
//! // Load audio samples (mono, f32, normalized)
//! let samples: Vec<f32> = vec![]; // Your audio data
//! let sample_rate = 44100;
//!
//! let features = extract_features(&samples, sample_rate, &AnalysisConfig::default())?;
//!
//! println!("{:.2} BPM over {:.2}s", features.tempo_bpm, features.duration_sec);
//! # Ok::<(), waveprint::AnalysisError>(())
//! ```
//!
//! ## Architecture
//!
//! The pipeline is strictly sequential and single-threaded per
//! recording:
//!
//! ```text
//! Samples → Spectrogram → {Onset → Tempo, Chroma, Spectral Shape}
//!         → {RMS, Zero-Crossing} → Feature Vector
//! ```
//!
//! Batch analysis across files is embarrassingly parallel; see the
//! `waveprint-batch` binary.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod spectrum;

// Re-export main types
pub use analysis::result::FeatureVector;
pub use config::AnalysisConfig;
pub use error::AnalysisError;

use analysis::result::round_to;

/// Main feature extraction function
///
/// Runs the full pipeline on one recording and returns the aggregated
/// feature vector: frame windowing, shared magnitude spectrogram, onset
/// envelope, two-path tempo estimation, chroma folding, spectral shape
/// statistics, RMS and zero-crossing rate.
///
/// # Arguments
///
/// * `samples` - Mono audio samples, normalized to [-1.0, 1.0]
/// * `sample_rate` - Sample rate in Hz (typically 44100)
/// * `config` - Extraction configuration parameters
///
/// # Returns
///
/// `FeatureVector` with every field rounded to its documented precision
/// and guaranteed finite.
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer, a zero
/// sample rate or an invalid configuration, and
/// `AnalysisError::NumericalError` if a non-finite aggregate slips past
/// the per-frame degeneracy guards.
///
/// # Example
///
/// ```no_run
/// use waveprint::{extract_features, AnalysisConfig};
///
/// let samples = vec![0.0f32; 44100]; // 1 second of silence
/// let features = extract_features(&samples, 44100, &AnalysisConfig::default())?;
/// assert_eq!(features.duration_sec, 1.0);
/// # Ok::<(), waveprint::AnalysisError>(())
/// ```
pub fn extract_features(
    samples: &[f32],
    sample_rate: u32,
    config: &AnalysisConfig,
) -> Result<FeatureVector, AnalysisError> {
    log::debug!(
        "Starting feature extraction: {} samples at {} Hz",
        samples.len(),
        sample_rate
    );

    if samples.is_empty() {
        return Err(AnalysisError::InvalidInput(
            "Empty audio samples".to_string(),
        ));
    }
    if sample_rate == 0 {
        return Err(AnalysisError::InvalidInput(
            "Invalid sample rate: 0".to_string(),
        ));
    }
    config.validate()?;

    let duration_sec = samples.len() as f64 / sample_rate as f64;

    // One magnitude spectrogram shared by every spectral extractor, so
    // frame counts agree across the pipeline
    let spectrogram = spectrum::stft::magnitude_spectrogram(
        samples,
        sample_rate,
        config.frame_size,
        config.hop_size,
    )?;

    // Rhythm: onset envelope feeds both tempo paths
    let envelope = features::onset::spectral_flux::onset_envelope(&spectrogram)?;
    let tempo = features::tempo::estimate_tempo(&envelope, config);

    // Harmony and spectral shape from the shared spectrogram
    let chroma = features::chroma::extract_chroma(&spectrogram, config.tuning_frequency)?;
    let shape = features::spectral::extract_spectral_shape(&spectrogram, config.rolloff_percentile)?;

    // Time-domain statistics over the same frame grid, raw samples
    let rms = features::energy::mean_rms(samples, config.frame_size, config.hop_size);
    let zcr = features::zcr::mean_zero_crossing_rate(samples, config.frame_size, config.hop_size);

    let features = FeatureVector {
        duration_sec: round_to(duration_sec, 2),
        tempo_bpm: round_to(tempo.bpm as f64, 2),
        chroma_mean: round_to(chroma.mean() as f64, 3),
        rmse_mean: round_to(rms as f64, 3),
        spectral_centroid: round_to(shape.centroid as f64, 2),
        spectral_bandwidth: round_to(shape.bandwidth as f64, 2),
        rolloff: round_to(shape.rolloff as f64, 2),
        zero_crossing_rate: round_to(zcr as f64, 5),
    };
    features.validate()?;

    log::debug!(
        "Feature extraction done: {:.2}s, {:.2} BPM ({})",
        features.duration_sec,
        features.tempo_bpm,
        if tempo.refined { "refined" } else { "raw fallback" }
    );

    Ok(features)
}
