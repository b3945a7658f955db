//! # Gait-Signal
//!
//! Signal stages of the gait pipeline, from raw accelerometer records to
//! candidate heel-strike indices.
//!
//! ## Pipeline Stages
//!
//! 1. **Ingestion**: Read `{time, ax, ay, az}` records from CSV text or a synthetic walk
//! 2. **Conditioning**: Zero-phase Butterworth low-pass on each axis independently
//! 3. **Event Detection**: Adaptive-threshold peak picking on the vertical axis
//!    with a physiological refractory distance
//!
//! ## Zero-Phase Filtering
//!
//! A 2nd-order Butterworth section is run forward and then backward over the
//! same coefficients. The backward pass cancels the phase delay of the forward
//! pass, so peaks stay where they are in time, and the magnitude response is
//! squared: the cascade behaves as a 4th-order filter rolling off at
//! -24 dB/octave past the cutoff.

pub mod conditioner;
pub mod filtering;
pub mod ingest;
pub mod peaks;

pub use conditioner::*;
pub use filtering::*;
pub use ingest::*;
pub use peaks::*;
