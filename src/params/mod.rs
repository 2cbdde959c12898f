//! Parameter definitions with physical units and documented semantics.
//!
//! Tunable numbers live here with:
//! - Physical units (seconds, Hz, dBFS)
//! - Documented ranges and meanings
//! - `validate()` guards run once before the per-frame hot path

mod analysis;
mod driver;
mod reactor;
mod render;

// Re-export all types
pub use analysis::{default_bands, AnalysisConfig};
pub use driver::DriverConfig;
pub use reactor::{PulseParams, TriggerParams, WaveParams};
pub use render::Timeline;
