//! Per-axis conditioning of raw accelerometer records.

use gait_core::{ConditionedSample, Error, RawSample, Result};
use serde::{Deserialize, Serialize};

use crate::filtering::low_pass_zero_phase;

/// Minimum number of records accepted for analysis
pub const MIN_SAMPLES: usize = 10;

/// Low-pass cutoff used for gait acceleration (Hz)
pub const DEFAULT_CUTOFF_HZ: f64 = 10.0;

/// Signal conditioner applying the same zero-phase low-pass to ax, ay and az
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConditioner {
    /// Cutoff frequency in Hz
    pub cutoff_hz: f64,

    /// Minimum number of records required
    pub min_samples: usize,
}

impl Default for SignalConditioner {
    fn default() -> Self {
        Self {
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            min_samples: MIN_SAMPLES,
        }
    }
}

impl SignalConditioner {
    pub fn new(cutoff_hz: f64) -> Self {
        Self {
            cutoff_hz,
            ..Default::default()
        }
    }

    pub fn with_min_samples(mut self, min_samples: usize) -> Self {
        self.min_samples = min_samples;
        self
    }

    /// Condition a uniformly sampled record sequence.
    ///
    /// The sampling rate is taken from the first interval,
    /// `fs = 1 / (time[1] - time[0])`.
    pub fn condition(&self, raw: &[RawSample]) -> Result<Vec<ConditionedSample>> {
        if raw.len() < self.min_samples.max(2) {
            return Err(Error::InsufficientData {
                required: self.min_samples.max(2),
                available: raw.len(),
            });
        }

        let fs = sampling_rate(raw)?;

        if !(self.cutoff_hz > 0.0 && self.cutoff_hz < fs / 2.0) {
            return Err(Error::InvalidInput(format!(
                "Cutoff {} Hz must lie in (0, {}) for a {} Hz capture",
                self.cutoff_hz,
                fs / 2.0,
                fs
            )));
        }

        let ax: Vec<f64> = raw.iter().map(|s| s.ax).collect();
        let ay: Vec<f64> = raw.iter().map(|s| s.ay).collect();
        let az: Vec<f64> = raw.iter().map(|s| s.az).collect();

        let ax_filtered = low_pass_zero_phase(&ax, self.cutoff_hz, fs);
        let ay_filtered = low_pass_zero_phase(&ay, self.cutoff_hz, fs);
        let az_filtered = low_pass_zero_phase(&az, self.cutoff_hz, fs);

        tracing::debug!(
            samples = raw.len(),
            sampling_rate_hz = fs,
            cutoff_hz = self.cutoff_hz,
            "Conditioned accelerometer axes"
        );

        Ok(raw
            .iter()
            .enumerate()
            .map(|(i, &sample)| {
                ConditionedSample::new(sample, ax_filtered[i], ay_filtered[i], az_filtered[i])
            })
            .collect())
    }
}

/// Sampling rate implied by the first sampling interval
pub fn sampling_rate(samples: &[RawSample]) -> Result<f64> {
    if samples.len() < 2 {
        return Err(Error::InsufficientData {
            required: 2,
            available: samples.len(),
        });
    }

    let dt = samples[1].time - samples[0].time;
    if !(dt.is_finite() && dt > 0.0) {
        return Err(Error::InvalidInput(format!(
            "Sampling interval must be positive, got {}",
            dt
        )));
    }

    Ok(1.0 / dt)
}
