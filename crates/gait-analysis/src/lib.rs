//! # Gait-Analysis
//!
//! Turns conditioned accelerometer samples and detected heel-strikes into
//! step, stride and symmetry measures.
//!
//! ## Stages
//!
//! 1. **Side Assignment** - Alternate Left/Right labels over the time-ordered events
//! 2. **Cycle Segmentation** - Centered 21-event window, 20 step intervals,
//!    same-side stride windows
//! 3. **Normalization** - Resample each stride to a 0-99 percent grid and
//!    average per side and axis
//! 4. **Metrics** - Cadence, step-time variability, left/right symmetry, RMS magnitude
//!
//! ## Window Design
//!
//! ```text
//! events:  e0  e1  e2  e3 ... e19 e20
//! steps:     s1  s2  s3  ...    s20        (e[i-1] → e[i])
//! strides: e0 ────→ e2                     (same side, e[i] → e[i+2])
//!              e1 ────→ e3
//! ```
//!
//! [`GaitSession`] drives all stages for one capture and keeps the event set
//! consistent across edits.

pub mod analyzer;
pub mod config;
pub mod export;
pub mod metrics;
pub mod normalize;
pub mod segmentation;
pub mod sides;

pub use analyzer::*;
pub use config::*;
pub use export::*;
pub use metrics::*;
pub use normalize::*;
pub use segmentation::*;
pub use sides::*;
