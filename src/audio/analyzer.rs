//! Per-frame analysis facade: frame index -> sample window -> spectrum -> bands.

use log::warn;

use super::bands::{extract_bands, AnalysisResult};
use super::fft::SpectrumAnalyzer;
use super::source::SampleBuffer;
use crate::error::Result;
use crate::params::AnalysisConfig;

/// Validated analysis pipeline for one configuration.
///
/// Holds no per-frame state; `analyze_frame` takes `&self` and can be called
/// concurrently from several render workers.
#[derive(Clone)]
pub struct FrameAnalyzer {
    config: AnalysisConfig,
    spectrum: SpectrumAnalyzer,
}

impl FrameAnalyzer {
    /// Validate `config` and precompute the FFT window/plan
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        for band in &config.bands {
            if band.bin_range(config.hz_per_bin(), config.bin_count()).is_none() {
                warn!(
                    "Band '{}' ({}-{} Hz) covers no FFT bins and will always read 0",
                    band.name, band.min_hz, band.max_hz
                );
            }
        }
        let spectrum = SpectrumAnalyzer::new(
            config.fft_size,
            config.backend,
            config.min_decibels,
            config.max_decibels,
        );
        Ok(Self { config, spectrum })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Band analysis of a raw sample window, zero-padded or cut to `fft_size`
    pub fn analyze_window(&self, samples: &[f64]) -> AnalysisResult {
        let spectrum = self.spectrum.analyze(samples);
        extract_bands(
            &spectrum,
            self.config.sample_rate_hz as f64,
            &self.config.bands,
            self.config.average_gate,
            self.config.fill_gate,
        )
    }

    /// Band analysis of video frame `frame` at `fps`
    pub fn analyze_frame(&self, buffer: &SampleBuffer, frame: u64, fps: f64) -> AnalysisResult {
        let window = buffer.window_for_frame(frame, fps, self.config.fft_size);
        self.analyze_window(&window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{FftBackend, FrequencyBand};
    use std::f64::consts::PI;

    fn tone(freq_hz: f64, sample_rate: u32, secs: f64) -> SampleBuffer {
        let len = (sample_rate as f64 * secs) as usize;
        let samples = (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate as f64).sin() * 0.5)
            .collect();
        SampleBuffer::new(samples, sample_rate)
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = AnalysisConfig {
            fft_size: 3000,
            ..Default::default()
        };
        assert!(FrameAnalyzer::new(config).is_err());
    }

    #[test]
    fn test_tone_lights_its_band() {
        let analyzer = FrameAnalyzer::new(AnalysisConfig::default()).unwrap();
        let buffer = tone(100.0, 44100, 1.0);

        let result = analyzer.analyze_frame(&buffer, 5, 30.0);
        assert!(result.band("bass") > result.band("treble"));
        assert_eq!(result.fill("bass"), 1.0);
        assert!(result.energy > 0.0);
    }

    #[test]
    fn test_frames_past_end_are_silent() {
        let analyzer = FrameAnalyzer::new(AnalysisConfig::default()).unwrap();
        let buffer = tone(440.0, 44100, 0.5);

        let result = analyzer.analyze_frame(&buffer, 1000, 30.0);
        assert_eq!(result.energy, 0.0);
        assert!(result.fill.values().all(|&f| f == 0.0));
        assert!(result.bands.values().all(|&b| b == 0.0));
    }

    #[test]
    fn test_short_window_is_zero_padded() {
        let samples: Vec<f64> = (0..1000)
            .map(|i| (2.0 * PI * 100.0 * i as f64 / 44100.0).sin() * 0.5)
            .collect();
        let mut padded = samples.clone();
        padded.resize(2048, 0.0);

        for backend in [FftBackend::Radix2, FftBackend::Planned] {
            let config = AnalysisConfig {
                backend,
                ..Default::default()
            };
            let analyzer = FrameAnalyzer::new(config).unwrap();
            let result = analyzer.analyze_window(&samples);
            assert_eq!(result, analyzer.analyze_window(&padded));
            assert!(result.band("bass") > 0.0);
        }
    }

    #[test]
    fn test_long_window_is_cut() {
        let analyzer = FrameAnalyzer::new(AnalysisConfig::default()).unwrap();
        let samples: Vec<f64> = (0..3000)
            .map(|i| (2.0 * PI * 440.0 * i as f64 / 44100.0).sin() * 0.5)
            .collect();

        assert_eq!(
            analyzer.analyze_window(&samples),
            analyzer.analyze_window(&samples[..2048])
        );
    }

    #[test]
    fn test_empty_window_is_silent() {
        let analyzer = FrameAnalyzer::new(AnalysisConfig::default()).unwrap();
        let result = analyzer.analyze_window(&[]);
        assert_eq!(result.energy, 0.0);
        assert!(result.fill.values().all(|&f| f == 0.0));
    }

    #[test]
    fn test_frame_order_does_not_matter() {
        let analyzer = FrameAnalyzer::new(AnalysisConfig::default()).unwrap();
        let buffer = tone(880.0, 44100, 2.0);

        let forward: Vec<AnalysisResult> = (0..40)
            .map(|f| analyzer.analyze_frame(&buffer, f, 24.0))
            .collect();
        let mut backward: Vec<AnalysisResult> = (0..40)
            .rev()
            .map(|f| analyzer.analyze_frame(&buffer, f, 24.0))
            .collect();
        backward.reverse();

        assert_eq!(forward, backward);
    }

    #[test]
    fn test_shared_across_threads() {
        let config = AnalysisConfig {
            backend: FftBackend::Planned,
            bands: vec![FrequencyBand::new("all", 0.0, 22050.0)],
            ..Default::default()
        };
        let analyzer = FrameAnalyzer::new(config).unwrap();
        let buffer = tone(220.0, 44100, 1.0);
        let expected = analyzer.analyze_frame(&buffer, 7, 30.0);

        std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| analyzer.analyze_frame(&buffer, 7, 30.0)))
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), expected);
            }
        });
    }
}
