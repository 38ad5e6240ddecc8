//! Aggregated feature vector
//!
//! The terminal artifact of one pipeline invocation: a fixed-schema map
//! of plain floats. Field declaration order fixes the JSON key order.

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Compact numeric fingerprint of one recording
///
/// Every field is a standard finite `f64`, rounded to its documented
/// precision. Created once per invocation and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    /// Recording length in seconds (2 decimals)
    pub duration_sec: f64,

    /// Estimated tempo in BPM (2 decimals), always finite and > 0
    pub tempo_bpm: f64,

    /// Mean over all chroma matrix entries (3 decimals)
    pub chroma_mean: f64,

    /// Mean per-frame RMS amplitude (3 decimals)
    pub rmse_mean: f64,

    /// Mean spectral centroid in Hz (2 decimals)
    pub spectral_centroid: f64,

    /// Mean spectral bandwidth in Hz (2 decimals)
    pub spectral_bandwidth: f64,

    /// Mean rolloff frequency in Hz (2 decimals)
    pub rolloff: f64,

    /// Mean zero-crossing rate in [0, 1] (5 decimals)
    pub zero_crossing_rate: f64,
}

impl FeatureVector {
    /// Reject any non-finite field
    ///
    /// Degenerate inputs are mapped to 0 at the per-frame level, so a
    /// NaN or infinity reaching this point indicates a computation bug;
    /// it must abort the run rather than leak into the JSON output.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::NumericalError` naming the offending
    /// field.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        let fields = [
            ("duration_sec", self.duration_sec),
            ("tempo_bpm", self.tempo_bpm),
            ("chroma_mean", self.chroma_mean),
            ("rmse_mean", self.rmse_mean),
            ("spectral_centroid", self.spectral_centroid),
            ("spectral_bandwidth", self.spectral_bandwidth),
            ("rolloff", self.rolloff),
            ("zero_crossing_rate", self.zero_crossing_rate),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(AnalysisError::NumericalError(format!(
                    "Feature '{}' is not a finite number: {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

/// Round to `decimals` decimal places
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor
}
