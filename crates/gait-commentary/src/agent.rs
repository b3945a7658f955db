//! Commentary generator trait and common types.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use gait_core::{GaitMetrics, SideLabels};

use crate::prompts::format_gait_prompt;

/// Result type for commentary operations
pub type CommentaryResult<T> = Result<T, CommentaryError>;

/// Commentary error types
#[derive(Debug, thiserror::Error)]
pub enum CommentaryError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Generator unavailable")]
    Unavailable,
}

/// Everything a narrative generator may see about an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommentaryInput {
    pub subject_id: String,
    pub metrics: GaitMetrics,
    pub labels: SideLabels,
}

impl CommentaryInput {
    pub fn new(subject_id: impl Into<String>, metrics: GaitMetrics, labels: SideLabels) -> Self {
        Self {
            subject_id: subject_id.into(),
            metrics,
            labels,
        }
    }

    /// User prompt for a text-generation service
    pub fn prompt(&self) -> String {
        format_gait_prompt(&self.subject_id, &self.labels, &self.metrics)
    }
}

/// Narrative commentary generator
#[async_trait]
pub trait CommentaryGenerator: Send + Sync {
    /// Generator name/identifier
    fn name(&self) -> &str;

    /// Produce commentary for one analysis
    async fn generate(&self, input: &CommentaryInput) -> CommentaryResult<String>;

    /// Reject inputs no generator can say anything sensible about
    fn validate_input(&self, input: &CommentaryInput) -> CommentaryResult<()> {
        let m = &input.metrics;
        let values = [
            m.cadence,
            m.mean_step_time,
            m.step_time_cv,
            m.stride_time,
            m.rms_total,
            m.symmetry_index,
            m.rms_symmetry_y,
        ];
        if values.iter().all(|v| v.is_finite()) {
            Ok(())
        } else {
            Err(CommentaryError::InvalidInput(
                "Metrics contain non-finite values".to_string(),
            ))
        }
    }
}

/// Commentary configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentaryConfig {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Text returned when generation fails
    pub fallback_message: String,
}

impl Default for CommentaryConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            fallback_message: FALLBACK_MESSAGE.to_string(),
        }
    }
}

/// Returned in place of commentary when the generator fails
pub const FALLBACK_MESSAGE: &str = "Commentary is currently unavailable.";
