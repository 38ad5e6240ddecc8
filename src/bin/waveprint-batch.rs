//! Batch feature extraction across multiple files
//!
//! ```text
//! waveprint-batch <file1> <file2> ...
//! ```
//!
//! Files are analyzed in parallel (file-level parallelism; each
//! analysis is single-threaded). One JSON line per file is printed to
//! stdout in argument order; failures go to stderr and never affect the
//! other files. Exits 0 when every file succeeded, 2 otherwise.

use std::path::Path;
use std::process;

use rayon::prelude::*;
use waveprint::{extract_features, AnalysisConfig, AnalysisError, FeatureVector};

fn main() {
    env_logger::init();

    let paths: Vec<String> = std::env::args().skip(1).collect();
    if paths.is_empty() {
        eprintln!("Usage: waveprint-batch <audio-file>...");
        process::exit(1);
    }

    let config = AnalysisConfig::default();

    let results: Vec<(String, Result<FeatureVector, AnalysisError>)> = paths
        .par_iter()
        .map(|path| (path.clone(), analyze_one(path, &config)))
        .collect();

    let mut failures = 0usize;
    for (path, result) in results {
        match result {
            Ok(features) => match serde_json::to_string(&features) {
                Ok(json) => println!("{{\"file\":{},\"features\":{}}}", json_string(&path), json),
                Err(e) => {
                    eprintln!("{}: JSON serialization failed: {}", path, e);
                    failures += 1;
                }
            },
            Err(e) => {
                eprintln!("{}: {}", path, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        eprintln!("{} of {} files failed", failures, paths.len());
        process::exit(2);
    }
}

fn analyze_one(path: &str, config: &AnalysisConfig) -> Result<FeatureVector, AnalysisError> {
    let (samples, sample_rate) =
        waveprint::io::decoder::load(Path::new(path), config.target_sample_rate)?;
    extract_features(&samples, sample_rate, config)
}

fn json_string(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "\"\"".to_string())
}
