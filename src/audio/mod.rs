//! Spectral analysis: sample windows -> per-band energy.
//!
//! The whole layer is pure. Nothing here keeps state between calls, so frames
//! can be analyzed from any thread in any order.

mod analyzer;
mod bands;
pub mod fft;
mod gate;
mod source;

// Re-export public types
pub use analyzer::FrameAnalyzer;
pub use bands::{extract_bands, AnalysisResult, FrequencyBand};
pub use fft::{analyze_spectrum, FftBackend, SpectrumAnalyzer};
pub use gate::{gate, GateConfig};
pub use source::{SampleBuffer, SampleWindow};
