//! Analysis configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use gait_core::{Error, LabelConfig, Result};
use gait_signal::{DEFAULT_CUTOFF_HZ, DEFAULT_MIN_STEP_SECS, DEFAULT_THRESHOLD_K, MIN_SAMPLES};

/// Complete analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Low-pass cutoff (Hz)
    pub cutoff_hz: f64,

    /// Peak threshold is `mean + threshold_k·std` of the segment
    pub threshold_k: f64,

    /// Refractory distance between peaks (seconds)
    pub min_step_secs: f64,

    /// Minimum samples in a capture or analysed segment
    pub min_samples: usize,

    /// Number of events in the analysis window
    pub analysis_window_size: usize,

    /// Points on the normalized cycle grid
    pub cycle_points: usize,

    /// Stride windows with fewer samples are discarded
    pub min_cycle_samples: usize,

    /// Duration floor for per-step cadence (seconds)
    pub cadence_floor_secs: f64,

    /// Added to symmetry denominators
    pub symmetry_epsilon: f64,

    /// Per-side vertical RMS used when a side has no steps
    pub rms_fallback: f64,

    /// Whether the first event is a left heel-strike
    pub start_with_left: bool,

    /// Display labeling
    pub labels: LabelConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            cutoff_hz: DEFAULT_CUTOFF_HZ,
            threshold_k: DEFAULT_THRESHOLD_K,
            min_step_secs: DEFAULT_MIN_STEP_SECS,
            min_samples: MIN_SAMPLES,
            analysis_window_size: 21,
            cycle_points: 100,
            min_cycle_samples: 6,
            cadence_floor_secs: 0.5,
            symmetry_epsilon: 1e-4,
            rms_fallback: 0.1,
            start_with_left: true,
            labels: LabelConfig::default(),
        }
    }
}

impl AnalysisConfig {
    /// Load configuration from file, with `GAIT_` environment overrides
    ///
    /// Nested keys use a double underscore, e.g. `GAIT_LABELS__MODE=functional`.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path.as_ref()))
            .add_source(
                config::Environment::with_prefix("GAIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("GAIT")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.cutoff_hz > 0.0) {
            return Err(Error::Config(format!(
                "cutoff_hz must be positive, got {}",
                self.cutoff_hz
            )));
        }
        if self.analysis_window_size < 3 {
            return Err(Error::Config(format!(
                "analysis_window_size must be at least 3, got {}",
                self.analysis_window_size
            )));
        }
        if self.cycle_points < 2 {
            return Err(Error::Config(format!(
                "cycle_points must be at least 2, got {}",
                self.cycle_points
            )));
        }
        if self.cadence_floor_secs <= 0.0 || self.symmetry_epsilon <= 0.0 {
            return Err(Error::Config(
                "cadence_floor_secs and symmetry_epsilon must be positive".into(),
            ));
        }
        Ok(())
    }

    /// Stride pairs implied by the window design (10 for a 21-event window)
    pub fn stride_count(&self) -> usize {
        self.analysis_window_size.saturating_sub(1) / 2
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gait_core::{LabelMode, Side};

    #[test]
    fn test_default_config() {
        let config = AnalysisConfig::default();
        assert_eq!(config.analysis_window_size, 21);
        assert_eq!(config.cycle_points, 100);
        assert_eq!(config.stride_count(), 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_stride_count_of_empty_window() {
        let config = AnalysisConfig {
            analysis_window_size: 0,
            ..Default::default()
        };
        assert_eq!(config.stride_count(), 0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_small_window() {
        let config = AnalysisConfig {
            analysis_window_size: 2,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_from_file_partial() {
        let path = std::env::temp_dir().join(format!("gait-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"cutoff_hz": 8.0, "labels": {"mode": "functional", "dominant_side": "Left"}}"#,
        )
        .unwrap();

        let config = AnalysisConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.cutoff_hz, 8.0);
        assert_eq!(config.labels.mode, LabelMode::Functional);
        assert_eq!(config.labels.dominant_side, Side::Left);
        assert_eq!(config.analysis_window_size, 21);
    }
}
