//! High-level driver set: per-frame analysis -> reactor outputs.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::audio::AnalysisResult;
use crate::error::{Error, Result};
use crate::params::DriverConfig;
use crate::reactor::{PulseReactor, TriggerOutput, TriggerReactor, WavePool, WavePoolOutput};

/// Animation drivers for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameDrivers {
    /// Frame timestamp (seconds)
    pub time: f64,

    /// Aggregate band energy
    pub energy: f64,

    /// Raw averaged band values
    pub bands: BTreeMap<String, f64>,

    /// Envelope-followed band values
    pub pulses: BTreeMap<String, f64>,

    /// Hit detector on the trigger band's fill
    pub trigger: TriggerOutput,

    /// Wave pool on the trigger band's fill
    pub waves: WavePoolOutput,
}

/// Reactor instances for one render stream.
///
/// Owns one pulse per band plus a trigger and a wave pool on the configured
/// trigger band. Not shared between workers: give each worker its own set.
#[derive(Debug, Clone)]
pub struct DriverSet {
    config: DriverConfig,
    pulses: Vec<(String, PulseReactor)>,
    trigger: TriggerReactor,
    waves: WavePool,
}

impl DriverSet {
    pub fn new(config: DriverConfig) -> Result<Self> {
        config.validate()?;
        let pulses = config
            .analysis
            .bands
            .iter()
            .map(|band| (band.name.clone(), PulseReactor::new()))
            .collect();

        Ok(Self {
            config,
            pulses,
            trigger: TriggerReactor::new(),
            waves: WavePool::new(),
        })
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    /// Feed one frame's analysis at `time` seconds
    pub fn update(&mut self, time: f64, analysis: &AnalysisResult) -> FrameDrivers {
        let pulses = self
            .pulses
            .iter_mut()
            .map(|(name, pulse)| {
                let value = pulse.evaluate(analysis.band(name), time, &self.config.pulse);
                (name.clone(), value)
            })
            .collect();

        let hit = analysis.fill(&self.config.trigger_band);
        let trigger = self.trigger.evaluate(hit, time, &self.config.trigger);
        let waves = self.waves.evaluate(hit, time, &self.config.waves);

        FrameDrivers {
            time,
            energy: analysis.energy,
            bands: analysis.bands.clone(),
            pulses,
            trigger,
            waves,
        }
    }

    /// Envelope value of a band's pulse without advancing it
    pub fn pulse_value(&self, band: &str) -> Result<f64> {
        self.pulses
            .iter()
            .find(|(name, _)| name == band)
            .map(|(_, pulse)| pulse.value())
            .ok_or_else(|| Error::UnknownBand(band.to_string()))
    }
}
