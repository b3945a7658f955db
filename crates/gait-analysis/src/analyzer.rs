//! Gait session: owns one capture and its event set, and runs the analysis.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gait_core::{
    ConditionedSample, Error, Event, EventId, GaitMetrics, LabelConfig, RawSample, Result, Side,
    SideLabels, SidePair, StepInterval,
};
use gait_signal::{
    adaptive_threshold, detect_peaks, min_distance_samples, sampling_rate, SampleSource,
    SignalConditioner,
};

use crate::config::AnalysisConfig;
use crate::metrics::MetricsEngine;
use crate::normalize::{cycle_profiles, CycleProfiles};
use crate::segmentation::CycleSegmenter;
use crate::sides::{active_events, assign_sides};

/// Unique identifier for an analysis result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AnalysisId(pub Uuid);

impl AnalysisId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for AnalysisId {
    fn default() -> Self {
        Self::new()
    }
}

/// Closed time interval in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub start: f64,
    pub end: f64,
}

impl TimeRange {
    pub fn new(start: f64, end: f64) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, time: f64) -> bool {
        time >= self.start && time <= self.end
    }
}

/// Everything derived from one analysis run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub id: AnalysisId,
    pub created_at: DateTime<Utc>,
    /// Session revision the result was computed from
    pub revision: u64,
    pub metrics: GaitMetrics,
    pub steps: Vec<StepInterval>,
    pub cycles: CycleProfiles,
    /// Stride windows that survived the length check, per side
    pub stride_windows: SidePair<usize>,
    /// The analysis window of active events
    pub used_events: Vec<Event>,
    /// Conditioned samples from the first to the last used event
    pub segment: Vec<ConditionedSample>,
    pub labels: SideLabels,
    /// Peak threshold of the last detection, if events were detected
    pub threshold: Option<f64>,
}

/// One analysis attempt over one capture.
///
/// The conditioned series is fixed at construction. Every mutation of the
/// event set or the labeling re-runs side assignment and bumps the revision,
/// so results computed earlier can be recognised as stale.
#[derive(Debug, Clone)]
pub struct GaitSession {
    config: AnalysisConfig,
    samples: Vec<ConditionedSample>,
    sampling_rate_hz: f64,
    events: Vec<Event>,
    start_side: Side,
    threshold: Option<f64>,
    revision: u64,
}

impl GaitSession {
    /// Condition a raw capture
    pub fn from_raw(raw: &[RawSample], config: AnalysisConfig) -> Result<Self> {
        config.validate()?;

        let conditioner =
            SignalConditioner::new(config.cutoff_hz).with_min_samples(config.min_samples);
        let samples = conditioner.condition(raw)?;
        let sampling_rate_hz = sampling_rate(raw)?;

        tracing::debug!(
            samples = samples.len(),
            sampling_rate_hz,
            "Created gait session"
        );

        Ok(Self {
            start_side: Side::from_start_with_left(config.start_with_left),
            config,
            samples,
            sampling_rate_hz,
            events: Vec::new(),
            threshold: None,
            revision: 0,
        })
    }

    /// Read a capture from `source` and condition it
    pub fn from_source(source: &mut dyn SampleSource, config: AnalysisConfig) -> Result<Self> {
        let raw = source.read_samples()?;
        tracing::debug!(source = source.name(), records = raw.len(), "Read capture");
        Self::from_raw(&raw, config)
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn samples(&self) -> &[ConditionedSample] {
        &self.samples
    }

    pub fn sampling_rate_hz(&self) -> f64 {
        self.sampling_rate_hz
    }

    /// All events, excluded ones included, in time order
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn start_side(&self) -> Side {
        self.start_side
    }

    pub fn threshold(&self) -> Option<f64> {
        self.threshold
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Full capture span
    pub fn time_range(&self) -> Option<TimeRange> {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => Some(TimeRange::new(first.time(), last.time())),
            _ => None,
        }
    }

    /// Detect heel-strikes on the vertical axis within `selection` (whole
    /// capture when `None`) and replace the event set with them.
    pub fn detect_events(&mut self, selection: Option<TimeRange>) -> Result<&[Event]> {
        let range = match selection.or_else(|| self.time_range()) {
            Some(range) => range,
            None => {
                return Err(Error::InsufficientData {
                    required: self.config.min_samples,
                    available: 0,
                })
            }
        };
        if !(range.start <= range.end) {
            return Err(Error::InvalidInput(format!(
                "Selection start {} is after end {}",
                range.start, range.end
            )));
        }

        let offset = self.samples.partition_point(|s| s.time() < range.start);
        let end = self
            .samples
            .partition_point(|s| s.time() <= range.end)
            .max(offset);
        let segment = &self.samples[offset..end];

        if segment.len() < self.config.min_samples {
            return Err(Error::InsufficientData {
                required: self.config.min_samples,
                available: segment.len(),
            });
        }

        let vertical: Vec<f64> = segment.iter().map(|s| s.ay_filtered).collect();
        let threshold = adaptive_threshold(&vertical, self.config.threshold_k);
        let min_distance = min_distance_samples(self.sampling_rate_hz, self.config.min_step_secs);
        let peaks = detect_peaks(&vertical, threshold, min_distance);

        let detected: Vec<Event> = peaks
            .iter()
            .map(|&i| Event::detected(segment[i].time(), vertical[i], offset + i))
            .collect();

        tracing::debug!(
            from = range.start,
            to = range.end,
            samples = segment.len(),
            threshold,
            min_distance,
            events = detected.len(),
            "Detected heel-strikes"
        );

        self.threshold = Some(threshold);
        self.replace_events(detected);
        Ok(&self.events)
    }

    /// Choose the side of the first active event
    pub fn set_start_with_left(&mut self, start_with_left: bool) {
        self.start_side = Side::from_start_with_left(start_with_left);
        let events = std::mem::take(&mut self.events);
        self.replace_events(events);
    }

    pub fn set_labels(&mut self, labels: LabelConfig) {
        self.config.labels = labels;
        self.revision += 1;
    }

    /// Add an event by hand; returns its id
    pub fn insert_event(&mut self, time: f64, value: f64) -> Result<EventId> {
        if !(time.is_finite() && value.is_finite()) {
            return Err(Error::InvalidInput(format!(
                "Event time and value must be finite, got ({}, {})",
                time, value
            )));
        }

        let event = Event::manual(time, value);
        let id = event.id;
        let mut events = std::mem::take(&mut self.events);
        events.push(event);
        self.replace_events(events);
        Ok(id)
    }

    pub fn remove_event(&mut self, id: EventId) -> Result<Event> {
        let position = self
            .events
            .iter()
            .position(|e| e.id == id)
            .ok_or(Error::UnknownEvent(id))?;

        let mut events = std::mem::take(&mut self.events);
        let removed = events.remove(position);
        self.replace_events(events);
        Ok(removed)
    }

    /// Drop an event from analysis without deleting it
    pub fn set_excluded(&mut self, id: EventId, excluded: bool) -> Result<()> {
        let event = self
            .events
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(Error::UnknownEvent(id))?;
        event.excluded = excluded;

        let events = std::mem::take(&mut self.events);
        self.replace_events(events);
        Ok(())
    }

    /// Run segmentation, normalization and metrics over the centered window
    pub fn analyze(&self) -> Result<AnalysisResult> {
        let segmenter = CycleSegmenter::from_config(&self.config);

        let active = active_events(&self.events);
        let window = segmenter.select_window(&active)?;
        let segment = segmenter.analysis_segment(&self.samples, window)?;
        let steps = segmenter.step_intervals(window, segment);
        let metrics = MetricsEngine::from_config(&self.config).compute(&steps, segment);

        let cycles = cycle_profiles(
            |side| segmenter.stride_windows(window, segment, side),
            self.config.cycle_points,
        );
        let stride_windows = SidePair::new(cycles.left.window_count, cycles.right.window_count);

        tracing::info!(
            revision = self.revision,
            steps = steps.len(),
            cadence = metrics.cadence,
            step_time_cv = metrics.step_time_cv,
            symmetry_index = metrics.symmetry_index,
            left_strides = stride_windows.left,
            right_strides = stride_windows.right,
            "Gait analysis complete"
        );

        Ok(AnalysisResult {
            id: AnalysisId::new(),
            created_at: Utc::now(),
            revision: self.revision,
            metrics,
            steps,
            cycles,
            stride_windows,
            used_events: window.to_vec(),
            segment: segment.to_vec(),
            labels: self.config.labels.side_labels(),
            threshold: self.threshold,
        })
    }

    /// Whether `result` still reflects the current event set and labeling
    pub fn is_current(&self, result: &AnalysisResult) -> bool {
        result.revision == self.revision
    }

    fn replace_events(&mut self, events: Vec<Event>) {
        self.events = assign_sides(&events, self.start_side);
        self.revision += 1;
    }
}
