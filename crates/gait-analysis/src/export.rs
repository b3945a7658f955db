//! Tabular export records and the in-memory log of finalized trials.
//!
//! Rows serialize with the column names used by downstream spreadsheets;
//! writing bytes is left to the caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use gait_core::{Side, SideLabel};

use crate::analyzer::AnalysisResult;

/// Who was measured, under which condition, and which attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialInfo {
    pub subject_id: String,
    pub condition: String,
    pub trial: String,
}

impl TrialInfo {
    pub fn new(
        subject_id: impl Into<String>,
        condition: impl Into<String>,
        trial: impl Into<String>,
    ) -> Self {
        Self {
            subject_id: subject_id.into(),
            condition: condition.into(),
            trial: trial.into(),
        }
    }

    /// Same subject and condition with the first number in the trial name
    /// incremented (`Trial1` → `Trial2`). Names without a number are kept.
    pub fn next_trial(&self) -> Self {
        Self {
            trial: increment_first_number(&self.trial),
            ..self.clone()
        }
    }
}

fn increment_first_number(name: &str) -> String {
    let start = match name.find(|c: char| c.is_ascii_digit()) {
        Some(start) => start,
        None => return name.to_string(),
    };
    let len = name[start..]
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(name.len() - start);
    let digits = &name[start..start + len];

    match digits.parse::<u64>() {
        Ok(n) => format!(
            "{}{}{}",
            &name[..start],
            n.saturating_add(1),
            &name[start + len..]
        ),
        Err(_) => name.to_string(),
    }
}

/// One row per step interval
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepRow {
    #[serde(rename = "Subject_ID")]
    pub subject_id: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "Trial")]
    pub trial: String,
    #[serde(rename = "Step_No")]
    pub step_number: usize,
    #[serde(rename = "Side")]
    pub side: SideLabel,
    #[serde(rename = "Duration")]
    pub duration: f64,
    #[serde(rename = "RMS_X")]
    pub rms_x: f64,
    #[serde(rename = "RMS_Y")]
    pub rms_y: f64,
    #[serde(rename = "RMS_Z")]
    pub rms_z: f64,
    #[serde(rename = "Cadence")]
    pub cadence: f64,
}

impl StepRow {
    pub const HEADER: [&'static str; 10] = [
        "Subject_ID",
        "Condition",
        "Trial",
        "Step_No",
        "Side",
        "Duration",
        "RMS_X",
        "RMS_Y",
        "RMS_Z",
        "Cadence",
    ];
}

/// One row per percent point per side
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CycleRow {
    #[serde(rename = "Subject_ID")]
    pub subject_id: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "Trial")]
    pub trial: String,
    #[serde(rename = "Side")]
    pub side: SideLabel,
    #[serde(rename = "Percent")]
    pub percent: u32,
    #[serde(rename = "Acc_X_Mean")]
    pub x_mean: f64,
    #[serde(rename = "Acc_Y_Mean")]
    pub y_mean: f64,
    #[serde(rename = "Acc_Z_Mean")]
    pub z_mean: f64,
}

impl CycleRow {
    pub const HEADER: [&'static str; 8] = [
        "Subject_ID",
        "Condition",
        "Trial",
        "Side",
        "Percent",
        "Acc_X_Mean",
        "Acc_Y_Mean",
        "Acc_Z_Mean",
    ];
}

/// One row per trial
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "Subject_ID")]
    pub subject_id: String,
    #[serde(rename = "Condition")]
    pub condition: String,
    #[serde(rename = "Trial")]
    pub trial: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: DateTime<Utc>,
    #[serde(rename = "Cadence")]
    pub cadence: f64,
    #[serde(rename = "StepTime_Avg")]
    pub step_time_avg: f64,
    #[serde(rename = "StrideTime_Avg")]
    pub stride_time_avg: f64,
    #[serde(rename = "StepTime_CV")]
    pub step_time_cv: f64,
    #[serde(rename = "Symmetry_Time")]
    pub symmetry_time: f64,
    #[serde(rename = "RMS_Total")]
    pub rms_total: f64,
    #[serde(rename = "RMS_X")]
    pub rms_x: f64,
    #[serde(rename = "RMS_Y")]
    pub rms_y: f64,
    #[serde(rename = "RMS_Z")]
    pub rms_z: f64,
}

impl SummaryRow {
    pub const HEADER: [&'static str; 13] = [
        "Subject_ID",
        "Condition",
        "Trial",
        "Timestamp",
        "Cadence",
        "StepTime_Avg",
        "StrideTime_Avg",
        "StepTime_CV",
        "Symmetry_Time",
        "RMS_Total",
        "RMS_X",
        "RMS_Y",
        "RMS_Z",
    ];
}

/// Step rows of a single result
pub fn step_rows(info: &TrialInfo, result: &AnalysisResult) -> Vec<StepRow> {
    result
        .steps
        .iter()
        .map(|step| StepRow {
            subject_id: info.subject_id.clone(),
            condition: info.condition.clone(),
            trial: info.trial.clone(),
            step_number: step.step_number,
            side: step.side_label,
            duration: step.duration,
            rms_x: step.rms_x,
            rms_y: step.rms_y,
            rms_z: step.rms_z,
            cadence: step.cadence,
        })
        .collect()
}

/// Cycle rows of a single result, Left then Right
pub fn cycle_rows(info: &TrialInfo, result: &AnalysisResult) -> Vec<CycleRow> {
    let mut rows = Vec::new();

    for side in [Side::Left, Side::Right] {
        let label = match side {
            Side::Left => result.labels.side_a,
            Side::Right => result.labels.side_b,
        };
        let cycles = result.cycles.get(side);

        for ((x, y), z) in cycles.x.iter().zip(&cycles.y).zip(&cycles.z) {
            rows.push(CycleRow {
                subject_id: info.subject_id.clone(),
                condition: info.condition.clone(),
                trial: info.trial.clone(),
                side: label,
                percent: x.percent,
                x_mean: x.mean,
                y_mean: y.mean,
                z_mean: z.mean,
            });
        }
    }

    rows
}

/// Summary row of a single result
pub fn summary_row(
    info: &TrialInfo,
    result: &AnalysisResult,
    timestamp: DateTime<Utc>,
) -> SummaryRow {
    let m = &result.metrics;
    SummaryRow {
        subject_id: info.subject_id.clone(),
        condition: info.condition.clone(),
        trial: info.trial.clone(),
        timestamp,
        cadence: m.cadence,
        step_time_avg: m.mean_step_time,
        stride_time_avg: m.stride_time,
        step_time_cv: m.step_time_cv,
        symmetry_time: m.symmetry_index,
        rms_total: m.rms_total,
        rms_x: m.rms_x,
        rms_y: m.rms_y,
        rms_z: m.rms_z,
    }
}

/// A finalized analysis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedTrial {
    pub id: Uuid,
    pub info: TrialInfo,
    pub result: AnalysisResult,
    pub saved_at: DateTime<Utc>,
}

/// Finalized trials of one working session, in save order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrialLog {
    trials: Vec<SavedTrial>,
}

impl TrialLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a result; returns the info for the next attempt
    pub fn save(&mut self, info: TrialInfo, result: AnalysisResult) -> TrialInfo {
        let next = info.next_trial();
        tracing::info!(
            subject = %info.subject_id,
            condition = %info.condition,
            trial = %info.trial,
            analysis = %result.id.0,
            "Saved trial"
        );

        self.trials.push(SavedTrial {
            id: Uuid::new_v4(),
            info,
            result,
            saved_at: Utc::now(),
        });
        next
    }

    pub fn remove(&mut self, id: Uuid) -> Option<SavedTrial> {
        let position = self.trials.iter().position(|t| t.id == id)?;
        Some(self.trials.remove(position))
    }

    pub fn clear(&mut self) {
        self.trials.clear();
    }

    pub fn trials(&self) -> &[SavedTrial] {
        &self.trials
    }

    pub fn len(&self) -> usize {
        self.trials.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trials.is_empty()
    }

    pub fn summary_rows(&self) -> Vec<SummaryRow> {
        self.trials
            .iter()
            .map(|t| summary_row(&t.info, &t.result, t.saved_at))
            .collect()
    }

    pub fn step_rows(&self) -> Vec<StepRow> {
        self.trials
            .iter()
            .flat_map(|t| step_rows(&t.info, &t.result))
            .collect()
    }

    pub fn cycle_rows(&self) -> Vec<CycleRow> {
        self.trials
            .iter()
            .flat_map(|t| cycle_rows(&t.info, &t.result))
            .collect()
    }
}
