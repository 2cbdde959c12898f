//! Windowed FFT engine: sample window -> normalized magnitude spectrum.
//!
//! Everything here is pure. Identical input samples always produce
//! bit-identical output for a given backend, so frames may be analyzed in any
//! order, on any thread, any number of times.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::f64::consts::PI;
use std::sync::Arc;

use super::source::SampleWindow;

/// Default lower bound of the decibel normalization range
pub const DEFAULT_MIN_DECIBELS: f64 = -100.0;

/// Default upper bound of the decibel normalization range
pub const DEFAULT_MAX_DECIBELS: f64 = -30.0;

/// Added to magnitudes before taking the log to avoid log10(0)
const MAGNITUDE_EPSILON: f64 = 1e-10;

/// Transform implementation used by [`SpectrumAnalyzer`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FftBackend {
    /// In-place iterative radix-2 Cooley-Tukey (bit-reproducible reference)
    #[default]
    Radix2,

    /// rustfft planned transform
    Planned,
}

/// Three-term Blackman window coefficient
pub fn blackman_window(index: usize, size: usize) -> f64 {
    if size < 2 {
        return 1.0;
    }
    let denom = size as f64 - 1.0;
    let i = index as f64;
    0.42 - 0.5 * (2.0 * PI * i / denom).cos() + 0.08 * (4.0 * PI * i / denom).cos()
}

fn blackman_table(size: usize) -> Vec<f64> {
    (0..size).map(|i| blackman_window(i, size)).collect()
}

/// In-place radix-2 Cooley-Tukey FFT (forward, unnormalized).
///
/// `buffer.len()` must be a power of two. This is not checked here; validate
/// the FFT size once up front (see `AnalysisConfig::validate`).
pub fn fft_in_place(buffer: &mut [Complex<f64>]) {
    let n = buffer.len();
    if n < 2 {
        return;
    }

    // Bit-reversal permutation
    let mut j = 0usize;
    for i in 1..n {
        let mut bit = n >> 1;
        while j & bit != 0 {
            j ^= bit;
            bit >>= 1;
        }
        j ^= bit;
        if i < j {
            buffer.swap(i, j);
        }
    }

    // Butterfly stages
    let mut len = 2;
    while len <= n {
        let angle = -2.0 * PI / len as f64;
        let step = Complex::new(angle.cos(), angle.sin());
        let half = len / 2;
        for start in (0..n).step_by(len) {
            let mut w = Complex::new(1.0, 0.0);
            for k in 0..half {
                let even = buffer[start + k];
                let odd = buffer[start + k + half] * w;
                buffer[start + k] = even + odd;
                buffer[start + k + half] = even - odd;
                w *= step;
            }
        }
        len <<= 1;
    }
}

/// Convert the positive-frequency half of a raw FFT into 0..1 values on a
/// decibel scale between `min_decibels` and `max_decibels`.
fn normalized_magnitudes(bins: &[Complex<f64>], min_decibels: f64, max_decibels: f64) -> Vec<f64> {
    let n = bins.len() as f64;
    let range = max_decibels - min_decibels;
    bins[..bins.len() / 2]
        .iter()
        .map(|c| {
            let magnitude = c.norm() / n;
            let db = 20.0 * (magnitude + MAGNITUDE_EPSILON).log10();
            ((db - min_decibels) / range).clamp(0.0, 1.0)
        })
        .collect()
}

fn windowed(samples: &[f64], window: &[f64]) -> Vec<Complex<f64>> {
    samples
        .iter()
        .zip(window)
        .map(|(s, w)| Complex::new(s * w, 0.0))
        .collect()
}

/// Analyze one sample window with the radix-2 engine.
///
/// Returns `samples.len() / 2` normalized magnitudes in `[0, 1]`.
/// `samples.len()` must be a power of two.
pub fn analyze_spectrum(samples: &[f64], min_decibels: f64, max_decibels: f64) -> Vec<f64> {
    let window = blackman_table(samples.len());
    let mut buffer = windowed(samples, &window);
    fft_in_place(&mut buffer);
    normalized_magnitudes(&buffer, min_decibels, max_decibels)
}

/// Reusable spectrum analyzer with a precomputed window (and plan, for the
/// rustfft backend).
///
/// Immutable after construction, so one instance can be shared by reference
/// across render workers.
#[derive(Clone)]
pub struct SpectrumAnalyzer {
    fft_size: usize,
    min_decibels: f64,
    max_decibels: f64,
    window: Vec<f64>,
    plan: Option<Arc<dyn Fft<f64>>>,
}

impl SpectrumAnalyzer {
    /// Create an analyzer for a power-of-two `fft_size`
    pub fn new(fft_size: usize, backend: FftBackend, min_decibels: f64, max_decibels: f64) -> Self {
        let plan = match backend {
            FftBackend::Radix2 => None,
            FftBackend::Planned => {
                let mut planner = FftPlanner::new();
                Some(planner.plan_fft_forward(fft_size))
            }
        };

        Self {
            fft_size,
            min_decibels,
            max_decibels,
            window: blackman_table(fft_size),
            plan,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    pub fn backend(&self) -> FftBackend {
        if self.plan.is_some() {
            FftBackend::Planned
        } else {
            FftBackend::Radix2
        }
    }

    /// Normalized magnitude spectrum of `samples` (`fft_size / 2` bins).
    ///
    /// Input shorter than `fft_size` is zero-padded, longer input is cut to
    /// its first `fft_size` samples.
    pub fn analyze(&self, samples: &[f64]) -> Vec<f64> {
        let samples = if samples.len() == self.fft_size {
            Cow::Borrowed(samples)
        } else {
            Cow::Owned(SampleWindow::read(samples, 0, self.fft_size).into_inner())
        };

        let mut buffer = windowed(&samples, &self.window);
        match &self.plan {
            Some(plan) => plan.process(&mut buffer),
            None => fft_in_place(&mut buffer),
        }
        normalized_magnitudes(&buffer, self.min_decibels, self.max_decibels)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn sine(freq_hz: f64, sample_rate: f64, amplitude: f64, len: usize) -> Vec<f64> {
        (0..len)
            .map(|i| (2.0 * PI * freq_hz * i as f64 / sample_rate).sin() * amplitude)
            .collect()
    }

    fn argmax(values: &[f64]) -> usize {
        values
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }

    #[test]
    fn test_blackman_window() {
        let size = 1024;

        // Blackman window is 0 at the edges and 1 at the center
        assert!(blackman_window(0, size).abs() < 1e-12);
        assert!(blackman_window(size - 1, size).abs() < 1e-12);
        assert!((blackman_window(size / 2, size) - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_fft_of_impulse_is_flat() {
        let mut buf = vec![Complex::new(0.0, 0.0); 8];
        buf[0] = Complex::new(1.0, 0.0);
        fft_in_place(&mut buf);
        for c in &buf {
            assert!((c.re - 1.0).abs() < 1e-12);
            assert!(c.im.abs() < 1e-12);
        }
    }

    #[test]
    fn test_fft_of_constant_is_dc_only() {
        let mut buf = vec![Complex::new(1.0, 0.0); 16];
        fft_in_place(&mut buf);
        assert!((buf[0].re - 16.0).abs() < 1e-12);
        for c in &buf[1..] {
            assert!(c.norm() < 1e-9);
        }
    }

    #[test]
    fn test_silence_is_zero() {
        let spectrum = analyze_spectrum(&vec![0.0; 2048], DEFAULT_MIN_DECIBELS, DEFAULT_MAX_DECIBELS);
        assert_eq!(spectrum.len(), 1024);
        assert!(spectrum.iter().all(|&m| m == 0.0));
    }

    #[test]
    fn test_analysis_is_deterministic() {
        let samples = sine(440.0, 44100.0, 0.5, 2048);
        let a = analyze_spectrum(&samples, DEFAULT_MIN_DECIBELS, DEFAULT_MAX_DECIBELS);
        let b = analyze_spectrum(&samples, DEFAULT_MIN_DECIBELS, DEFAULT_MAX_DECIBELS);
        assert_eq!(a, b);
    }

    #[test]
    fn test_sine_peak_lands_in_expected_bin() {
        // 1 kHz at 44.1 kHz / 2048 -> bin 46.4
        let samples = sine(1000.0, 44100.0, 0.5, 2048);
        let spectrum = analyze_spectrum(&samples, -160.0, 0.0);
        let peak = argmax(&spectrum);
        assert!((45..=47).contains(&peak), "peak bin was {}", peak);
    }

    #[test]
    fn test_analyzer_matches_free_function() {
        let samples = sine(220.0, 44100.0, 0.3, 1024);
        let analyzer = SpectrumAnalyzer::new(
            1024,
            FftBackend::Radix2,
            DEFAULT_MIN_DECIBELS,
            DEFAULT_MAX_DECIBELS,
        );
        assert_eq!(
            analyzer.analyze(&samples),
            analyze_spectrum(&samples, DEFAULT_MIN_DECIBELS, DEFAULT_MAX_DECIBELS)
        );
    }

    #[test]
    fn test_backends_agree() {
        let samples: Vec<f64> = sine(330.0, 44100.0, 0.4, 2048)
            .iter()
            .zip(sine(5000.0, 44100.0, 0.1, 2048))
            .map(|(a, b)| a + b)
            .collect();

        let radix2 = SpectrumAnalyzer::new(2048, FftBackend::Radix2, -160.0, 0.0);
        let planned = SpectrumAnalyzer::new(2048, FftBackend::Planned, -160.0, 0.0);
        assert_eq!(planned.backend(), FftBackend::Planned);

        for (a, b) in radix2.analyze(&samples).iter().zip(planned.analyze(&samples)) {
            assert!((a - b).abs() < 1e-6, "radix2={} planned={}", a, b);
        }
    }

    proptest! {
        #[test]
        fn prop_spectrum_in_unit_range(samples in proptest::collection::vec(-1.0f64..1.0, 256)) {
            let spectrum = analyze_spectrum(&samples, DEFAULT_MIN_DECIBELS, DEFAULT_MAX_DECIBELS);
            prop_assert_eq!(spectrum.len(), 128);
            prop_assert!(spectrum.iter().all(|m| (0.0..=1.0).contains(m)));
        }
    }
}
