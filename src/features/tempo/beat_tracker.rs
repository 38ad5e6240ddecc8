//! Dynamic-programming beat tracking
//!
//! Aligns a globally consistent beat sequence to the onset envelope:
//! each frame accumulates the best achievable score of any beat chain
//! ending there, where chaining from a previous beat costs the
//! log-squared deviation of the interval from the estimated beat period.
//! Backtracking from the best-scoring frame yields the beat grid.
//!
//! # Reference
//!
//! Ellis, D. P. W. (2007). Beat Tracking by Dynamic Programming.
//! *Journal of New Music Research*, 36(1), 51-60.

use crate::features::onset::OnsetEnvelope;

const EPSILON: f32 = 1e-10;

/// Fraction of the peak local score below which a frame cannot start a
/// beat chain
const CHAIN_START_THRESHOLD: f32 = 0.01;

/// Track beats through the onset envelope
///
/// # Arguments
///
/// * `envelope` - Onset strength envelope
/// * `bpm_estimate` - Tempo seed in BPM (the raw autocorrelation
///   estimate); defines the target inter-beat period
/// * `tightness` - Penalty weight on deviations from the target period
///
/// # Returns
///
/// Beat times in seconds, strictly increasing. Returns an empty grid
/// for a silent or degenerate envelope, and may return a single beat
/// for very short input; the caller is responsible for falling back to
/// the raw tempo estimate in those cases.
pub fn track_beats(envelope: &OnsetEnvelope, bpm_estimate: f32, tightness: f32) -> Vec<f32> {
    let n = envelope.len();
    let fps = envelope.frames_per_second;

    if n == 0 || fps <= 0.0 || bpm_estimate <= 0.0 {
        return Vec::new();
    }
    if envelope.peak() < EPSILON {
        log::debug!("Beat tracking skipped: envelope is silent");
        return Vec::new();
    }

    let period = ((60.0 * fps) / bpm_estimate).max(1.0);

    // Normalize by the envelope's standard deviation so the transition
    // penalty is comparable across recordings
    let mean = envelope.strengths.iter().sum::<f32>() / n as f32;
    let variance = envelope
        .strengths
        .iter()
        .map(|&s| (s - mean).powi(2))
        .sum::<f32>()
        / n as f32;
    let std = variance.sqrt();
    if std < EPSILON {
        return Vec::new();
    }

    let local_score = smoothed_local_score(&envelope.strengths, std, period);
    let max_local = local_score.iter().copied().fold(0.0f32, f32::max);

    // Forward pass: best cumulative score and backlink per frame
    let window_lo = (period * 0.5).round() as usize;
    let window_hi = (period * 2.0).round() as usize;

    let mut cumulative = vec![0.0f32; n];
    let mut backlink = vec![-1isize; n];
    let mut first_beat = true;

    for t in 0..n {
        let mut best_score = f32::NEG_INFINITY;
        let mut best_prev = -1isize;

        if window_lo <= t {
            let lo = t.saturating_sub(window_hi);
            let hi = t - window_lo;
            for prev in lo..=hi {
                let interval = (t - prev) as f32;
                if interval < 1.0 {
                    continue;
                }
                let cost = -tightness * (interval / period).ln().powi(2);
                let score = cumulative[prev] + cost;
                if score > best_score {
                    best_score = score;
                    best_prev = prev as isize;
                }
            }
        }

        cumulative[t] = if best_prev >= 0 {
            local_score[t] + best_score
        } else {
            local_score[t]
        };

        // Frames before the first audible onset never join a chain, so
        // backtracking cannot extend into leading silence
        if first_beat && local_score[t] < CHAIN_START_THRESHOLD * max_local {
            backlink[t] = -1;
        } else {
            backlink[t] = best_prev;
            first_beat = false;
        }
    }

    // Backtrack from the highest-scoring frame
    let best_end = cumulative
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i as isize)
        .unwrap_or(-1);

    let mut beats = Vec::new();
    let mut t = best_end;
    while t >= 0 {
        beats.push(t as usize);
        t = backlink[t as usize];
    }
    beats.reverse();

    log::debug!(
        "Beat tracking: {} beats at period {:.2} frames ({:.2} BPM seed)",
        beats.len(),
        period,
        bpm_estimate
    );

    beats.into_iter().map(|frame| frame as f32 / fps).collect()
}

/// Local score: envelope normalized by its deviation, smoothed with a
/// Gaussian of width proportional to the beat period
fn smoothed_local_score(strengths: &[f32], std: f32, period: f32) -> Vec<f32> {
    let half_width = period.round() as isize;
    let sigma = (period / 32.0).max(1.0);

    let kernel: Vec<f32> = (-half_width..=half_width)
        .map(|i| (-0.5 * (i as f32 / sigma).powi(2)).exp())
        .collect();

    let n = strengths.len() as isize;
    let mut smoothed = vec![0.0f32; strengths.len()];
    for (t, slot) in smoothed.iter_mut().enumerate() {
        let mut acc = 0.0f32;
        for (k, &w) in kernel.iter().enumerate() {
            let src = t as isize + k as isize - half_width;
            if src >= 0 && src < n {
                acc += w * strengths[src as usize] / std;
            }
        }
        *slot = acc;
    }
    smoothed
}
