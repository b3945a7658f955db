//! Cycle segmentation: analysis window, step intervals and stride windows.

use gait_core::{
    rms, Axis, ConditionedSample, Error, Event, LabelConfig, Result, Side, StepInterval,
};

use crate::config::AnalysisConfig;

/// Samples between two same-side heel-strikes
#[derive(Debug, Clone, Copy)]
pub struct StrideWindow<'a> {
    pub side: Side,
    pub start_time: f64,
    pub end_time: f64,
    pub samples: &'a [ConditionedSample],
}

impl StrideWindow<'_> {
    pub fn values(&self, axis: Axis) -> Vec<f64> {
        self.samples.iter().map(|s| s.filtered(axis)).collect()
    }

    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }
}

/// Cycle segmenter
#[derive(Debug, Clone)]
pub struct CycleSegmenter {
    /// Events per analysis window
    pub window_size: usize,
    /// Minimum samples for a stride window to count
    pub min_cycle_samples: usize,
    /// Minimum samples in the analysed segment
    pub min_segment_samples: usize,
    /// Duration floor for per-step cadence (seconds)
    pub cadence_floor_secs: f64,
    pub labels: LabelConfig,
}

impl Default for CycleSegmenter {
    fn default() -> Self {
        Self::from_config(&AnalysisConfig::default())
    }
}

impl CycleSegmenter {
    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self {
            window_size: config.analysis_window_size,
            min_cycle_samples: config.min_cycle_samples,
            min_segment_samples: config.min_samples,
            cadence_floor_secs: config.cadence_floor_secs,
            labels: config.labels,
        }
    }

    /// Centered window of exactly `window_size` active events.
    ///
    /// `start = floor((N - window_size) / 2)`.
    pub fn select_window<'a>(&self, active: &'a [Event]) -> Result<&'a [Event]> {
        if active.len() < self.window_size {
            return Err(Error::InsufficientEvents {
                required: self.window_size,
                available: active.len(),
            });
        }

        let start = (active.len() - self.window_size) / 2;
        Ok(&active[start..start + self.window_size])
    }

    /// One interval per pair of adjacent events in the window.
    ///
    /// RMS is taken over the samples with `time ∈ [start, end)`.
    pub fn step_intervals(
        &self,
        window: &[Event],
        samples: &[ConditionedSample],
    ) -> Vec<StepInterval> {
        window
            .windows(2)
            .enumerate()
            .map(|(i, pair)| {
                let (start, end) = (&pair[0], &pair[1]);
                let duration = (end.time - start.time).max(0.0);
                let step = half_open(samples, start.time, end.time);

                let axis_rms = |axis: Axis| -> f64 {
                    let values: Vec<f64> = step.iter().map(|s| s.filtered(axis)).collect();
                    rms(&values)
                };

                StepInterval {
                    step_number: i + 1,
                    side_label: self.labels.label(start.side),
                    duration,
                    rms_x: axis_rms(Axis::X),
                    rms_y: axis_rms(Axis::Y),
                    rms_z: axis_rms(Axis::Z),
                    cadence: 60.0 / duration.max(self.cadence_floor_secs),
                    physical_side: start.side,
                }
            })
            .collect()
    }

    /// Samples spanning the window, `time ∈ [first, last]`
    pub fn analysis_segment<'a>(
        &self,
        samples: &'a [ConditionedSample],
        window: &[Event],
    ) -> Result<&'a [ConditionedSample]> {
        let (first, last) = match (window.first(), window.last()) {
            (Some(first), Some(last)) => (first.time, last.time),
            _ => {
                return Err(Error::InsufficientEvents {
                    required: self.window_size,
                    available: 0,
                })
            }
        };

        let segment = closed(samples, first, last);
        if segment.len() < self.min_segment_samples {
            return Err(Error::InsufficientData {
                required: self.min_segment_samples,
                available: segment.len(),
            });
        }
        Ok(segment)
    }

    /// Heel-strike to next same-side heel-strike for every event of `side`.
    ///
    /// Windows holding fewer than `min_cycle_samples` samples are dropped.
    pub fn stride_windows<'a>(
        &self,
        window: &[Event],
        segment: &'a [ConditionedSample],
        side: Side,
    ) -> Vec<StrideWindow<'a>> {
        let mut strides = Vec::new();

        for i in 0..window.len().saturating_sub(2) {
            if window[i].side != side {
                continue;
            }

            let (start_time, end_time) = (window[i].time, window[i + 2].time);
            let samples = closed(segment, start_time, end_time);

            if samples.len() < self.min_cycle_samples {
                tracing::warn!(
                    ?side,
                    start_time,
                    end_time,
                    samples = samples.len(),
                    "Discarding short stride window"
                );
                continue;
            }

            strides.push(StrideWindow {
                side,
                start_time,
                end_time,
                samples,
            });
        }

        strides
    }
}

/// Samples with `from <= time < to`; `samples` must be time-ordered
fn half_open(samples: &[ConditionedSample], from: f64, to: f64) -> &[ConditionedSample] {
    let start = samples.partition_point(|s| s.time() < from);
    let end = samples.partition_point(|s| s.time() < to).max(start);
    &samples[start..end]
}

/// Samples with `from <= time <= to`; `samples` must be time-ordered
fn closed(samples: &[ConditionedSample], from: f64, to: f64) -> &[ConditionedSample] {
    let start = samples.partition_point(|s| s.time() < from);
    let end = samples.partition_point(|s| s.time() <= to).max(start);
    &samples[start..end]
}
