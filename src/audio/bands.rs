//! Band extraction: magnitude spectrum -> per-band energy, fill and aggregate energy.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

use super::gate::GateConfig;

/// Named contiguous frequency range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyBand {
    /// Unique key used in [`AnalysisResult`] maps
    pub name: String,

    /// Lower edge (Hz)
    pub min_hz: f64,

    /// Upper edge (Hz)
    pub max_hz: f64,
}

impl FrequencyBand {
    pub fn new(name: impl Into<String>, min_hz: f64, max_hz: f64) -> Self {
        Self {
            name: name.into(),
            min_hz,
            max_hz,
        }
    }

    /// Inclusive bin range covered by this band, or `None` when the range is
    /// empty (band outside the spectrum or inverted).
    ///
    /// `hz_per_bin = sample_rate / fft_size`; `bin_count` is the spectrum
    /// length (`fft_size / 2`).
    pub fn bin_range(&self, hz_per_bin: f64, bin_count: usize) -> Option<RangeInclusive<usize>> {
        if bin_count == 0 || hz_per_bin <= 0.0 {
            return None;
        }

        let start = (self.min_hz / hz_per_bin).floor().max(0.0);
        let end = (self.max_hz / hz_per_bin).ceil().min((bin_count - 1) as f64);
        if start > end {
            return None;
        }

        Some(start as usize..=end as usize)
    }
}

/// Per-frame analysis output. Recomputed every call, never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisResult {
    /// Averaged band energy in `[0, 1]` (after the optional average gate)
    pub bands: BTreeMap<String, f64>,

    /// Peak-based gated band value in `[0, 1]`
    pub fill: BTreeMap<String, f64>,

    /// Mean of the normalized band averages in `[0, 1]`
    pub energy: f64,
}

impl AnalysisResult {
    /// Band energy by name (0 for unknown names)
    pub fn band(&self, name: &str) -> f64 {
        self.bands.get(name).copied().unwrap_or(0.0)
    }

    /// Fill value by name (0 for unknown names)
    pub fn fill(&self, name: &str) -> f64 {
        self.fill.get(name).copied().unwrap_or(0.0)
    }
}

/// Raw statistics of one band before gating
#[derive(Debug, Clone, Copy)]
struct BandStats {
    peak: f64,
    normalized: f64,
}

fn band_stats(spectrum: &[f64], range: RangeInclusive<usize>) -> Option<BandStats> {
    let bins = spectrum.get(range)?;
    if bins.is_empty() {
        return None;
    }

    let peak = bins.iter().copied().fold(0.0f64, f64::max);

    // sqrt lifts quiet bins so they are not crushed toward zero
    let average = bins.iter().map(|m| m.sqrt()).sum::<f64>() / bins.len() as f64;

    Some(BandStats {
        peak,
        normalized: (average * 2.0).min(1.0),
    })
}

/// Reduce a normalized magnitude spectrum to per-band values.
///
/// `spectrum` is the output of the FFT engine (`fft_size / 2` bins).
/// Degenerate bands report 0 and still count toward the energy average.
pub fn extract_bands(
    spectrum: &[f64],
    sample_rate_hz: f64,
    bands: &[FrequencyBand],
    average_gate: Option<GateConfig>,
    fill_gate: GateConfig,
) -> AnalysisResult {
    let bin_count = spectrum.len();
    let hz_per_bin = sample_rate_hz / (bin_count * 2) as f64;

    let mut result = AnalysisResult::default();
    let mut normalized_sum = 0.0;

    for band in bands {
        let stats = band
            .bin_range(hz_per_bin, bin_count)
            .and_then(|range| band_stats(spectrum, range));

        let (value, fill) = match stats {
            Some(stats) => {
                normalized_sum += stats.normalized;
                let value = match average_gate {
                    Some(gate) => gate.apply(stats.normalized),
                    None => stats.normalized,
                };
                (value, fill_gate.apply(stats.peak))
            }
            None => (0.0, 0.0),
        };

        result.bands.insert(band.name.clone(), value);
        result.fill.insert(band.name.clone(), fill);
    }

    if !bands.is_empty() {
        result.energy = normalized_sum / bands.len() as f64;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RATE: f64 = 44100.0;
    const FFT_SIZE: usize = 2048;

    fn fill_gate() -> GateConfig {
        GateConfig::new(0.2, 0.6)
    }

    #[test]
    fn test_bin_range() {
        let hz_per_bin = SAMPLE_RATE / FFT_SIZE as f64; // ~21.53 Hz
        let band = FrequencyBand::new("bass", 60.0, 250.0);
        assert_eq!(band.bin_range(hz_per_bin, 1024), Some(2..=12));

        let full = FrequencyBand::new("all", 0.0, SAMPLE_RATE / 2.0);
        assert_eq!(full.bin_range(hz_per_bin, 1024), Some(0..=1023));
    }

    #[test]
    fn test_band_above_nyquist_is_degenerate() {
        let hz_per_bin = SAMPLE_RATE / FFT_SIZE as f64;
        let band = FrequencyBand::new("ultra", 30000.0, 40000.0);
        assert_eq!(band.bin_range(hz_per_bin, 1024), None);

        let spectrum = vec![0.8; 1024];
        let result = extract_bands(&spectrum, SAMPLE_RATE, &[band], None, fill_gate());
        assert_eq!(result.band("ultra"), 0.0);
        assert_eq!(result.fill("ultra"), 0.0);
        assert_eq!(result.energy, 0.0);
    }

    #[test]
    fn test_degenerate_band_counts_toward_energy() {
        let spectrum = vec![0.25; 1024]; // sqrt = 0.5 -> normalized 1.0
        let bands = [
            FrequencyBand::new("full", 0.0, 22050.0),
            FrequencyBand::new("inverted", 5000.0, 100.0),
        ];
        let result = extract_bands(&spectrum, SAMPLE_RATE, &bands, None, fill_gate());
        assert_eq!(result.band("full"), 1.0);
        assert_eq!(result.band("inverted"), 0.0);
        assert!((result.energy - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_full_range_fill_scenario() {
        let mut spectrum = vec![0.1; FFT_SIZE / 2];
        spectrum[100] = 0.9;
        let bands = [FrequencyBand::new("all", 0.0, SAMPLE_RATE / 2.0)];

        let result = extract_bands(&spectrum, SAMPLE_RATE, &bands, None, fill_gate());
        assert_eq!(result.fill("all"), 1.0);
    }

    #[test]
    fn test_fill_is_independent_of_average() {
        let mut spectrum = vec![0.0; FFT_SIZE / 2];
        spectrum[50] = 0.9;
        let bands = [FrequencyBand::new("wide", 0.0, 5000.0)];

        let result = extract_bands(&spectrum, SAMPLE_RATE, &bands, None, fill_gate());
        assert_eq!(result.fill("wide"), 1.0);
        assert!(result.band("wide") < 0.3, "average was {}", result.band("wide"));
    }

    #[test]
    fn test_average_gate_applies_to_band_not_energy() {
        let spectrum = vec![0.04; 1024]; // sqrt = 0.2 -> normalized 0.4
        let bands = [FrequencyBand::new("all", 0.0, 22050.0)];

        let result = extract_bands(
            &spectrum,
            SAMPLE_RATE,
            &bands,
            Some(GateConfig::new(0.2, 0.6)),
            fill_gate(),
        );
        assert!((result.band("all") - 0.5).abs() < 1e-12);
        assert!((result.energy - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_empty_band_list() {
        let result = extract_bands(&[0.5; 16], SAMPLE_RATE, &[], None, fill_gate());
        assert!(result.bands.is_empty());
        assert_eq!(result.energy, 0.0);
    }
}
