//! Top-level driver configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::{AnalysisConfig, PulseParams, Timeline, TriggerParams, WaveParams};
use crate::error::{Error, Result};

/// Everything needed to turn a track into per-frame animation drivers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    pub analysis: AnalysisConfig,
    pub timeline: Timeline,

    /// Envelope follower applied to every band
    pub pulse: PulseParams,

    /// Rising-edge trigger fed from `trigger_band`'s fill value
    pub trigger: TriggerParams,

    /// Wave pool fed from `trigger_band`'s fill value
    pub waves: WaveParams,

    /// Band whose fill value drives the trigger and the wave pool
    pub trigger_band: String,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            timeline: Timeline::default(),
            pulse: PulseParams::default(),
            trigger: TriggerParams::default(),
            waves: WaveParams::default(),
            trigger_band: "bass".to_string(),
        }
    }
}

impl DriverConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        self.analysis.validate()?;
        self.timeline.validate()?;
        self.pulse.validate()?;
        self.trigger.validate()?;
        self.waves.validate()?;
        if self.analysis.band(&self.trigger_band).is_none() {
            return Err(Error::UnknownBand(self.trigger_band.clone()));
        }
        Ok(())
    }
}
