//! Floor/ceiling linear remap used by band extraction and reactors.

use serde::{Deserialize, Serialize};

/// Gate thresholds for a linear 0..1 remap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Values at or below this map to 0
    pub floor: f64,

    /// Values at or above this map to 1
    #[serde(default = "default_ceiling")]
    pub ceiling: f64,
}

fn default_ceiling() -> f64 {
    1.0
}

impl GateConfig {
    pub fn new(floor: f64, ceiling: f64) -> Self {
        Self { floor, ceiling }
    }

    pub fn apply(&self, value: f64) -> f64 {
        gate(value, self.floor, self.ceiling)
    }
}

/// Remap `value` linearly from `[floor, ceiling]` onto `[0, 1]`, clamping outside.
///
/// Callers guarantee `floor < ceiling`.
pub fn gate(value: f64, floor: f64, ceiling: f64) -> f64 {
    if value <= floor {
        0.0
    } else if value >= ceiling {
        1.0
    } else {
        (value - floor) / (ceiling - floor)
    }
}
