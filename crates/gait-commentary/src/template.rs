//! Offline commentary built from fixed templates.

use async_trait::async_trait;

use gait_core::GaitMetrics;

use crate::agent::{CommentaryGenerator, CommentaryInput, CommentaryResult};
use crate::prompts::REFERENCE_STEP_TIME_CV;

/// Walking strategy read from cadence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkingStrategy {
    Cautious,
    Comfortable,
    Hurried,
}

impl WalkingStrategy {
    pub fn from_cadence(cadence: f64) -> Self {
        if cadence < 90.0 {
            WalkingStrategy::Cautious
        } else if cadence > 125.0 {
            WalkingStrategy::Hurried
        } else {
            WalkingStrategy::Comfortable
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            WalkingStrategy::Cautious => "a slow, cautious pattern with long steps in time",
            WalkingStrategy::Comfortable => "a comfortable self-selected pace",
            WalkingStrategy::Hurried => "a brisk pattern, possibly trading stability for speed",
        }
    }
}

/// Generator that needs no external service
pub struct TemplateCommentator {
    name: String,
}

impl Default for TemplateCommentator {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateCommentator {
    pub fn new() -> Self {
        Self {
            name: "Template".to_string(),
        }
    }

    pub fn compose(&self, input: &CommentaryInput) -> String {
        let m = &input.metrics;
        let (a, b) = (input.labels.side_a, input.labels.side_b);

        let mut sections = vec![format!("Gait summary for {}.", input.subject_id)];
        sections.push(stability_paragraph(m));
        sections.push(format!(
            "A cadence of {:.1} steps/min with a stride time of {:.3} s suggests {}.",
            m.cadence,
            m.stride_time,
            WalkingStrategy::from_cadence(m.cadence).describe()
        ));
        sections.push(format!(
            "Time symmetry between {} and {} is {:.1}% and vertical RMS symmetry is {:.1}%. \
             What physical traits or habits could explain the difference between {} and {}?",
            a, b, m.symmetry_index, m.rms_symmetry_y, a, b
        ));
        sections.push(suggestions(m).join("\n"));

        sections.join("\n\n")
    }
}

fn stability_paragraph(m: &GaitMetrics) -> String {
    let verdict = if m.step_time_cv <= REFERENCE_STEP_TIME_CV {
        "within the typical range, indicating a stable rhythm"
    } else if m.step_time_cv <= 2.0 * REFERENCE_STEP_TIME_CV {
        "above the typical range, indicating a somewhat irregular rhythm"
    } else {
        "well above the typical range, indicating an unstable rhythm"
    };
    format!(
        "Step-time CV is {:.2}% against a reference of about {:.0}%: {}.",
        m.step_time_cv, REFERENCE_STEP_TIME_CV, verdict
    )
}

fn suggestions(m: &GaitMetrics) -> Vec<String> {
    let mut tips = Vec::new();

    if m.step_time_cv > REFERENCE_STEP_TIME_CV {
        tips.push("Practise walking to a metronome to steady the step rhythm.");
    } else {
        tips.push("Keep the current rhythm and retest under a dual-task condition.");
    }
    if m.symmetry_index < 95.0 || m.rms_symmetry_y < 90.0 {
        tips.push("Add single-leg balance and strength work for the weaker side.");
    } else {
        tips.push("Maintain balanced loading with alternating single-leg drills.");
    }
    match WalkingStrategy::from_cadence(m.cadence) {
        WalkingStrategy::Cautious => {
            tips.push("Gradually increase cadence during daily walks.");
        }
        WalkingStrategy::Hurried => {
            tips.push("Slow down slightly and focus on a full heel-to-toe roll.");
        }
        WalkingStrategy::Comfortable => {
            tips.push("Extend walking duration while holding this pace.");
        }
    }

    tips.iter()
        .enumerate()
        .map(|(i, tip)| format!("{}. {}", i + 1, tip))
        .collect()
}

#[async_trait]
impl CommentaryGenerator for TemplateCommentator {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, input: &CommentaryInput) -> CommentaryResult<String> {
        self.validate_input(input)?;
        Ok(self.compose(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gait_core::{SideLabel, SideLabels};

    fn input(cadence: f64, cv: f64, symmetry: f64) -> CommentaryInput {
        CommentaryInput::new(
            "S01",
            GaitMetrics {
                cadence,
                mean_step_time: 60.0 / cadence,
                stride_time: 120.0 / cadence,
                step_time_cv: cv,
                symmetry_index: symmetry,
                rms_symmetry_y: symmetry,
                ..Default::default()
            },
            SideLabels {
                side_a: SideLabel::Dominant,
                side_b: SideLabel::NonDominant,
            },
        )
    }

    #[test]
    fn test_strategy_from_cadence() {
        assert_eq!(WalkingStrategy::from_cadence(80.0), WalkingStrategy::Cautious);
        assert_eq!(WalkingStrategy::from_cadence(110.0), WalkingStrategy::Comfortable);
        assert_eq!(WalkingStrategy::from_cadence(130.0), WalkingStrategy::Hurried);
    }

    #[test]
    fn test_stable_walk() {
        let text = TemplateCommentator::new().compose(&input(110.0, 2.0, 98.0));

        assert!(text.contains("S01"));
        assert!(text.contains("within the typical range"));
        assert!(text.contains("Dominant and NonDominant"));
        assert!(text.contains("3. "));
    }

    #[test]
    fn test_irregular_walk() {
        let text = TemplateCommentator::new().compose(&input(80.0, 7.5, 85.0));

        assert!(text.contains("well above the typical range"));
        assert!(text.contains("metronome"));
        assert!(text.contains("single-leg balance"));
        assert!(text.contains("increase cadence"));
    }

    #[tokio::test]
    async fn test_generate_validates() {
        let commentator = TemplateCommentator::new();
        assert!(commentator.generate(&input(110.0, 2.0, 98.0)).await.is_ok());
        assert!(commentator
            .generate(&input(110.0, f64::NAN, 98.0))
            .await
            .is_err());
    }
}
