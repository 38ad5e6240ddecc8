//! Command-line entry point
//!
//! Analyzes one audio file and prints its feature vector as JSON:
//!
//! ```text
//! waveprint <audio-file>
//! ```
//!
//! Exit codes: 0 on success, 1 for wrong argument count, 2 for decode
//! or analysis failure.

use std::path::Path;
use std::process;

use waveprint::{extract_features, AnalysisConfig, AnalysisError};

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 2 {
        eprintln!("Usage: waveprint <audio-file>");
        process::exit(1);
    }

    match run(&args[1]) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("error: {}", e);
            process::exit(2);
        }
    }
}

fn run(path: &str) -> Result<String, AnalysisError> {
    let config = AnalysisConfig::default();

    let (samples, sample_rate) =
        waveprint::io::decoder::load(Path::new(path), config.target_sample_rate)?;
    let features = extract_features(&samples, sample_rate, &config)?;

    serde_json::to_string_pretty(&features)
        .map_err(|e| AnalysisError::ProcessingError(format!("JSON serialization failed: {}", e)))
}
