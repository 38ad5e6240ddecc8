//! Audio I/O modules
//!
//! Audio decoding, mono folding and resampling using Symphonia.

pub mod decoder;
