//! Reactor tunables.
//!
//! Decay curves and thresholds are look-and-feel settings, not fixed
//! constants; every driver can carry its own set.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Envelope follower settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PulseParams {
    /// Linear decay knob in [0, 1]. 0 = no memory, near 1 = near-permanent memory.
    pub decay: f64,

    /// Accumulate input over time instead of following it
    pub additive: bool,

    /// Upper bound of the accumulated value (additive mode)
    pub ceiling: f64,

    /// Input gain per second of accumulation (additive mode)
    pub add_rate: f64,
}

impl Default for PulseParams {
    fn default() -> Self {
        Self {
            decay: 0.85,
            additive: false,
            ceiling: 1.0,
            add_rate: 1.0,
        }
    }
}

/// Rising-edge trigger settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerParams {
    /// Input must exceed this to count as "above"
    pub threshold: f64,

    /// Seconds for one trigger to decay from 1 to 0
    pub decay_duration_s: f64,

    /// Stack overlapping triggers instead of restarting the decay
    pub additive: bool,

    /// Maximum stacked intensity (additive mode)
    pub ceiling: f64,
}

impl Default for TriggerParams {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            decay_duration_s: 0.3,
            additive: false,
            ceiling: 3.0,
        }
    }
}

/// Multi-wave pool settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveParams {
    /// Input must exceed this to spawn a wave
    pub threshold: f64,

    /// Seconds a wave stays active
    pub max_age_s: f64,

    /// Concurrent waves kept; the oldest is evicted first
    pub max_count: usize,
}

impl Default for WaveParams {
    fn default() -> Self {
        Self {
            threshold: 0.6,
            max_age_s: 2.0,
            max_count: 8,
        }
    }
}

impl PulseParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.decay) {
            return Err(Error::InvalidConfig(format!(
                "pulse decay must be in [0, 1], got {}",
                self.decay
            )));
        }
        if self.additive && self.ceiling <= 0.0 {
            return Err(Error::InvalidConfig(
                "additive pulse ceiling must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

impl TriggerParams {
    pub fn validate(&self) -> Result<()> {
        if self.decay_duration_s <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "trigger decay_duration_s must be > 0, got {}",
                self.decay_duration_s
            )));
        }
        Ok(())
    }
}

impl WaveParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_count == 0 {
            return Err(Error::InvalidConfig(
                "wave max_count must be > 0".to_string(),
            ));
        }
        if self.max_age_s <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "wave max_age_s must be > 0, got {}",
                self.max_age_s
            )));
        }
        Ok(())
    }
}
