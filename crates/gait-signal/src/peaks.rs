//! Heel-strike candidate detection on the conditioned vertical axis.
//!
//! A sample is a candidate when it is a strict local maximum above an
//! adaptive amplitude threshold. Candidates closer than the refractory
//! distance to the last accepted peak compete for the same slot: the larger
//! one wins. Every such merge is recorded as a [`PeakDecision`] so the
//! outcome can be audited.

use gait_core::{mean, std_dev};
use serde::{Deserialize, Serialize};

/// Threshold multiplier applied to the signal standard deviation
pub const DEFAULT_THRESHOLD_K: f64 = 0.7;

/// Shortest physiologically plausible step (seconds)
pub const DEFAULT_MIN_STEP_SECS: f64 = 0.35;

/// Outcome of evaluating one candidate peak
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum PeakDecision {
    /// Far enough from the last accepted peak; appended
    Accept { index: usize },
    /// Within the refractory distance and larger; took over the last slot
    Replace { previous: usize, index: usize },
    /// Within the refractory distance and not larger; dropped
    KeepExisting { kept: usize, rejected: usize },
}

/// Adaptive amplitude threshold `mean + k·std` over the analysed segment
pub fn adaptive_threshold(signal: &[f64], k: f64) -> f64 {
    mean(signal) + k * std_dev(signal)
}

/// Refractory distance in samples, `round(min_step_secs·fs)`
pub fn min_distance_samples(sampling_rate_hz: f64, min_step_secs: f64) -> usize {
    (min_step_secs * sampling_rate_hz).round().max(0.0) as usize
}

/// Detect peaks and return the full decision log in evaluation order
pub fn detect_peaks_traced(
    signal: &[f64],
    min_height: f64,
    min_distance: usize,
) -> (Vec<usize>, Vec<PeakDecision>) {
    let mut peaks: Vec<usize> = Vec::new();
    let mut decisions = Vec::new();

    if signal.len() < 3 {
        return (peaks, decisions);
    }

    for i in 1..signal.len() - 1 {
        let is_candidate =
            signal[i] > signal[i - 1] && signal[i] > signal[i + 1] && signal[i] > min_height;
        if !is_candidate {
            continue;
        }

        let decision = match peaks.last() {
            Some(&last) if i - last < min_distance => {
                if signal[i] > signal[last] {
                    PeakDecision::Replace {
                        previous: last,
                        index: i,
                    }
                } else {
                    PeakDecision::KeepExisting {
                        kept: last,
                        rejected: i,
                    }
                }
            }
            _ => PeakDecision::Accept { index: i },
        };

        match decision {
            PeakDecision::Accept { index } => peaks.push(index),
            PeakDecision::Replace { index, .. } => {
                if let Some(slot) = peaks.last_mut() {
                    *slot = index;
                }
            }
            PeakDecision::KeepExisting { .. } => {}
        }

        decisions.push(decision);
    }

    (peaks, decisions)
}

/// Indices of accepted peaks, ascending
pub fn detect_peaks(signal: &[f64], min_height: f64, min_distance: usize) -> Vec<usize> {
    detect_peaks_traced(signal, min_height, min_distance).0
}
