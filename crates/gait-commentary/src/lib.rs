//! # Gait-Commentary
//!
//! Narrative commentary for completed gait analyses.
//!
//! The numeric pipeline never depends on this crate. A generator only sees
//! the [`GaitMetrics`](gait_core::GaitMetrics) of a result plus the active
//! side-label pair, and is asked at most once per result.
//!
//! ```text
//! AnalysisResult ──→ CommentaryInput { subject, metrics, labels }
//!                        ↓
//!                  [CommentaryService]  cache hit? → cached text
//!                        ↓
//!                  [CommentaryGenerator]  (template or remote service)
//!                        ↓ error / timeout
//!                  fallback message
//! ```

pub mod agent;
pub mod prompts;
pub mod service;
pub mod template;

pub use agent::*;
pub use prompts::*;
pub use service::*;
pub use template::*;
