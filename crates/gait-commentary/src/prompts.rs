//! Prompt templates for commentary generators.

use gait_core::{GaitMetrics, SideLabels};

/// Typical step-time coefficient of variation for healthy adults (percent)
pub const REFERENCE_STEP_TIME_CV: f64 = 3.0;

/// System prompt for gait commentary
pub const GAIT_SYSTEM_PROMPT: &str = r#"You are a gait analysis instructor teaching physiotherapy and ergonomics students. You explain accelerometer-derived walking metrics in precise but approachable language.

You will receive:
1. Temporal metrics (cadence, step time, stride time, step-time variability)
2. Acceleration magnitude (RMS per axis and combined)
3. Left/right balance scores for timing and vertical acceleration

Your task is to:
- Relate step-time variability to walking stability
- Infer the walking strategy from stride time and cadence
- Pose a question to the student about the side-to-side difference
- Offer three concrete suggestions for improvement

Keep an educational, encouraging tone."#;

/// User prompt for one analysis
pub fn format_gait_prompt(subject_id: &str, labels: &SideLabels, m: &GaitMetrics) -> String {
    format!(
        r#"=== GAIT ANALYSIS ===

Subject: {subject}
Comparison: {a} vs {b}

Temporal Metrics:
- Cadence: {cadence:.1} steps/min
- Mean step time: {step:.3} s
- Mean stride time: {stride:.3} s
- Step-time CV: {cv:.2} % (stability indicator)

Acceleration:
- Combined RMS: {total:.3} m/s² (walking vigor)
- Vertical RMS: {y:.3}
- Lateral RMS: {x:.3}

Left/Right Balance:
- Time symmetry: {sym:.1} %
- Vertical RMS symmetry: {rms_sym:.1} %

Points to cover:
1. Compare the step-time CV with the typical reference of about {reference:.0}% and explain what it says about stability.
2. From stride time and cadence, discuss the walking strategy (hurried, cautious, ...).
3. Ask the student what physical traits or habits could explain the difference between {a} and {b}.
4. Give three concrete suggestions for improvement."#,
        subject = subject_id,
        a = labels.side_a,
        b = labels.side_b,
        cadence = m.cadence,
        step = m.mean_step_time,
        stride = m.stride_time,
        cv = m.step_time_cv,
        total = m.rms_total,
        y = m.rms_y,
        x = m.rms_x,
        sym = m.symmetry_index,
        rms_sym = m.rms_symmetry_y,
        reference = REFERENCE_STEP_TIME_CV,
    )
}
