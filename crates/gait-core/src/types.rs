//! Fundamental types for the Gait Lab pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// One tri-axial accelerometer record (m/s², seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawSample {
    pub time: f64,
    pub ax: f64,
    pub ay: f64,
    pub az: f64,
}

impl RawSample {
    pub fn new(time: f64, ax: f64, ay: f64, az: f64) -> Self {
        Self { time, ax, ay, az }
    }

    pub fn is_finite(&self) -> bool {
        self.time.is_finite() && self.ax.is_finite() && self.ay.is_finite() && self.az.is_finite()
    }
}

/// Accelerometer axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// Lateral
    X,
    /// Vertical
    Y,
    /// Anterior-posterior
    Z,
}

/// Raw sample plus its low-pass filtered counterpart on every axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConditionedSample {
    pub raw: RawSample,
    pub ax_filtered: f64,
    pub ay_filtered: f64,
    pub az_filtered: f64,
}

impl ConditionedSample {
    pub fn new(raw: RawSample, ax_filtered: f64, ay_filtered: f64, az_filtered: f64) -> Self {
        Self {
            raw,
            ax_filtered,
            ay_filtered,
            az_filtered,
        }
    }

    pub fn time(&self) -> f64 {
        self.raw.time
    }

    pub fn filtered(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.ax_filtered,
            Axis::Y => self.ay_filtered,
            Axis::Z => self.az_filtered,
        }
    }
}

/// Physical body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    pub fn from_start_with_left(start_with_left: bool) -> Self {
        if start_with_left {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "Left"),
            Side::Right => write!(f, "Right"),
        }
    }
}

/// How sides are reported to people
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelMode {
    /// Physical left/right
    #[default]
    Physical,
    /// Dominant/non-dominant relative to the configured dominant side
    Functional,
}

/// Label shown for a side in reports and exports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SideLabel {
    Left,
    Right,
    Dominant,
    NonDominant,
}

impl fmt::Display for SideLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SideLabel::Left => "Left",
            SideLabel::Right => "Right",
            SideLabel::Dominant => "Dominant",
            SideLabel::NonDominant => "NonDominant",
        };
        f.write_str(s)
    }
}

/// Project a physical side onto its display label.
///
/// The physical side stays the grouping key everywhere; this is only used
/// when a label is shown or exported.
pub fn display_label(physical: Side, mode: LabelMode, dominant: Side) -> SideLabel {
    match mode {
        LabelMode::Physical => match physical {
            Side::Left => SideLabel::Left,
            Side::Right => SideLabel::Right,
        },
        LabelMode::Functional if physical == dominant => SideLabel::Dominant,
        LabelMode::Functional => SideLabel::NonDominant,
    }
}

/// Labeling convention for a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelConfig {
    pub mode: LabelMode,
    pub dominant_side: Side,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            mode: LabelMode::Physical,
            dominant_side: Side::Right,
        }
    }
}

impl LabelConfig {
    pub fn label(&self, physical: Side) -> SideLabel {
        display_label(physical, self.mode, self.dominant_side)
    }

    /// Labels for physical Left (`side_a`) and Right (`side_b`)
    pub fn side_labels(&self) -> SideLabels {
        SideLabels {
            side_a: self.label(Side::Left),
            side_b: self.label(Side::Right),
        }
    }
}

/// Active display label pair, Left first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideLabels {
    pub side_a: SideLabel,
    pub side_b: SideLabel,
}

/// Value held once per physical side
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SidePair<T> {
    pub left: T,
    pub right: T,
}

impl<T> SidePair<T> {
    pub fn new(left: T, right: T) -> Self {
        Self { left, right }
    }

    pub fn get(&self, side: Side) -> &T {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    /// Build both sides with the same constructor
    pub fn from_fn(mut f: impl FnMut(Side) -> T) -> Self {
        let left = f(Side::Left);
        let right = f(Side::Right);
        Self { left, right }
    }
}

/// Unique identifier for a gait event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

/// Detected or inserted gait event (heel-strike)
///
/// `time`, `value` and `source_index` never change once created; `side` is
/// recomputed by side assignment whenever the event set or the starting side
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub time: f64,
    pub value: f64,
    /// Index into the conditioned series; `None` for events placed by hand
    pub source_index: Option<usize>,
    pub side: Side,
    pub excluded: bool,
}

impl Event {
    pub fn detected(time: f64, value: f64, source_index: usize) -> Self {
        Self {
            id: EventId::new(),
            time,
            value,
            source_index: Some(source_index),
            side: Side::Left,
            excluded: false,
        }
    }

    pub fn manual(time: f64, value: f64) -> Self {
        Self {
            id: EventId::new(),
            time,
            value,
            source_index: None,
            side: Side::Left,
            excluded: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.excluded
    }
}

/// Span between two chronologically adjacent active events
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepInterval {
    /// 1-based position within the analysis window
    pub step_number: usize,
    pub side_label: SideLabel,
    /// Seconds, never negative
    pub duration: f64,
    pub rms_x: f64,
    pub rms_y: f64,
    pub rms_z: f64,
    /// Steps per minute for this interval alone
    pub cadence: f64,
    /// Physical side of the starting event
    pub physical_side: Side,
}

/// One percent-of-cycle point of a cross-averaged stride
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedCycle {
    pub percent: u32,
    pub mean: f64,
    pub std: f64,
}

/// Scalar summary of one analysis window
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct GaitMetrics {
    /// Steps per minute
    pub cadence: f64,
    /// Seconds
    pub mean_step_time: f64,
    /// Percent
    pub step_time_cv: f64,
    /// Seconds, approximated as two mean steps
    pub stride_time: f64,
    pub rms_x: f64,
    pub rms_y: f64,
    pub rms_z: f64,
    /// Root-sum-square of the three axis RMS values
    pub rms_total: f64,
    pub stride_count: usize,
    /// Step-time left/right parity, 0-100
    pub symmetry_index: f64,
    /// Vertical RMS left/right parity, 0-100
    pub rms_symmetry_y: f64,
}
