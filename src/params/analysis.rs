//! Spectral analysis configuration.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::audio::fft::{DEFAULT_MAX_DECIBELS, DEFAULT_MIN_DECIBELS};
use crate::audio::{FftBackend, FrequencyBand, GateConfig};
use crate::error::{Error, Result};

/// FFT analysis configuration with frequency band mappings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Audio sample rate (Hz). Overridden by the decoded track in the CLI.
    pub sample_rate_hz: u32,

    /// FFT window size (must be power of 2)
    pub fft_size: usize,

    /// Magnitudes at or below this level normalize to 0 (dBFS)
    pub min_decibels: f64,

    /// Magnitudes at or above this level normalize to 1 (dBFS)
    pub max_decibels: f64,

    /// Named bands reported in every `AnalysisResult`
    pub bands: Vec<FrequencyBand>,

    /// Optional remap of averaged band energy
    pub average_gate: Option<GateConfig>,

    /// Remap of per-band peak into the fill signal
    pub fill_gate: GateConfig,

    /// Transform implementation
    pub backend: FftBackend,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 2048,
            min_decibels: DEFAULT_MIN_DECIBELS,
            max_decibels: DEFAULT_MAX_DECIBELS,
            bands: default_bands(),
            average_gate: None,
            fill_gate: GateConfig::new(0.2, 0.6),
            backend: FftBackend::Radix2,
        }
    }
}

/// Five-band layout covering kick fundamentals through cymbal shimmer
pub fn default_bands() -> Vec<FrequencyBand> {
    vec![
        FrequencyBand::new("sub", 20.0, 60.0),
        FrequencyBand::new("bass", 60.0, 250.0),
        FrequencyBand::new("low_mid", 250.0, 1000.0),
        FrequencyBand::new("high_mid", 1000.0, 4000.0),
        FrequencyBand::new("treble", 4000.0, 16000.0),
    ]
}

impl AnalysisConfig {
    /// Width of one FFT bin (Hz)
    pub fn hz_per_bin(&self) -> f64 {
        self.sample_rate_hz as f64 / self.fft_size as f64
    }

    /// Number of positive-frequency bins produced per analysis
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    pub fn band(&self, name: &str) -> Option<&FrequencyBand> {
        self.bands.iter().find(|b| b.name == name)
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<()> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(Error::InvalidConfig(format!(
                "FFT size must be a power of 2 (>= 2), got {}",
                self.fft_size
            )));
        }
        if self.sample_rate_hz == 0 {
            return Err(Error::InvalidConfig("sample rate must be > 0".to_string()));
        }
        if self.min_decibels >= self.max_decibels {
            return Err(Error::InvalidConfig(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.min_decibels, self.max_decibels
            )));
        }
        validate_gate("fill_gate", &self.fill_gate)?;
        if let Some(gate) = &self.average_gate {
            validate_gate("average_gate", gate)?;
        }

        let mut seen = HashSet::new();
        for band in &self.bands {
            if !seen.insert(band.name.as_str()) {
                return Err(Error::InvalidConfig(format!(
                    "duplicate band name '{}'",
                    band.name
                )));
            }
        }
        Ok(())
    }
}

fn validate_gate(label: &str, gate: &GateConfig) -> Result<()> {
    if gate.floor >= gate.ceiling {
        return Err(Error::InvalidConfig(format!(
            "{}: floor ({}) must be below ceiling ({})",
            label, gate.floor, gate.ceiling
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bin_count(), 1024);
    }

    #[test]
    fn test_default_band_bins() {
        let config = AnalysisConfig::default();

        // 44100 / 2048 ~ 21.53 Hz per bin
        assert!((config.hz_per_bin() - 21.533).abs() < 1e-3);
        let bass = config.band("bass").unwrap();
        assert_eq!(bass.bin_range(config.hz_per_bin(), config.bin_count()), Some(2..=12));
    }

    #[test]
    fn test_rejects_non_power_of_two() {
        let config = AnalysisConfig {
            fft_size: 1000,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_inverted_decibels() {
        let config = AnalysisConfig {
            min_decibels: -20.0,
            max_decibels: -30.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_gate() {
        let config = AnalysisConfig {
            average_gate: Some(GateConfig::new(0.5, 0.5)),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_duplicate_bands() {
        let mut config = AnalysisConfig::default();
        config.bands.push(FrequencyBand::new("bass", 80.0, 120.0));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_band_lookup() {
        let config = AnalysisConfig::default();
        assert_eq!(config.band("bass").map(|b| b.max_hz), Some(250.0));
        assert!(config.band("missing").is_none());
    }
}
