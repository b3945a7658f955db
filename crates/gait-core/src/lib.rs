//! # Gait-Core
//!
//! Core types and utilities for the Gait Lab tri-axial acceleration
//! gait analysis pipeline.
//!
//! Every stage of the pipeline produces new immutable data from the output
//! of the previous one:
//!
//! ```text
//! RawSample → ConditionedSample → Event → StepInterval / stride window
//!                                       → NormalizedCycle, GaitMetrics
//! ```

pub mod error;
pub mod stats;
pub mod types;

pub use error::{Error, Result};
pub use stats::*;
pub use types::*;
