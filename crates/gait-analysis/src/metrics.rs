//! Scalar gait metrics for one analysis window.

use gait_core::{
    coefficient_of_variation, mean, rms, symmetry_index, Axis, ConditionedSample, GaitMetrics,
    Side, StepInterval,
};

use crate::config::AnalysisConfig;

/// Aggregates step intervals and the analysed segment into [`GaitMetrics`]
#[derive(Debug, Clone)]
pub struct MetricsEngine {
    /// Added to symmetry denominators
    pub symmetry_epsilon: f64,
    /// Per-side vertical RMS when a side has no steps
    pub rms_fallback: f64,
    /// Reported stride count
    pub stride_count: usize,
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl MetricsEngine {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            symmetry_epsilon: config.symmetry_epsilon,
            rms_fallback: config.rms_fallback,
            stride_count: config.stride_count(),
        }
    }

    pub fn compute(&self, steps: &[StepInterval], segment: &[ConditionedSample]) -> GaitMetrics {
        let durations: Vec<f64> = steps.iter().map(|s| s.duration).collect();
        let mean_step_time = mean(&durations);

        let cadence = if mean_step_time > 0.0 {
            60.0 / mean_step_time
        } else {
            0.0
        };

        let side_duration = |side: Side| {
            let values = side_values(steps, side, |s| s.duration);
            if values.is_empty() {
                mean_step_time
            } else {
                mean(&values)
            }
        };
        let side_rms_y = |side: Side| {
            let values = side_values(steps, side, |s| s.rms_y);
            if values.is_empty() {
                self.rms_fallback
            } else {
                mean(&values)
            }
        };

        let axis_rms = |axis: Axis| {
            let values: Vec<f64> = segment.iter().map(|s| s.filtered(axis)).collect();
            rms(&values)
        };
        let (rms_x, rms_y, rms_z) = (axis_rms(Axis::X), axis_rms(Axis::Y), axis_rms(Axis::Z));

        GaitMetrics {
            cadence,
            mean_step_time,
            step_time_cv: coefficient_of_variation(&durations),
            stride_time: mean_step_time * 2.0,
            rms_x,
            rms_y,
            rms_z,
            rms_total: (rms_x * rms_x + rms_y * rms_y + rms_z * rms_z).sqrt(),
            stride_count: self.stride_count,
            symmetry_index: symmetry_index(
                side_duration(Side::Left),
                side_duration(Side::Right),
                self.symmetry_epsilon,
            ),
            rms_symmetry_y: symmetry_index(
                side_rms_y(Side::Left),
                side_rms_y(Side::Right),
                self.symmetry_epsilon,
            ),
        }
    }
}

/// Compute metrics with the engine described by `config`
pub fn compute_metrics(
    steps: &[StepInterval],
    segment: &[ConditionedSample],
    config: &AnalysisConfig,
) -> GaitMetrics {
    MetricsEngine::from_config(config).compute(steps, segment)
}

fn side_values(steps: &[StepInterval], side: Side, f: impl Fn(&StepInterval) -> f64) -> Vec<f64> {
    steps
        .iter()
        .filter(|s| s.physical_side == side)
        .map(f)
        .collect()
}
