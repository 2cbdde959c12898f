//! Spectral pulse library - Audio-reactive signal core
//!
//! Turns a decoded music track into per-frame animation drivers:
//! - `audio`: pure spectral analysis (windowed FFT, band extraction, gates)
//! - `reactor`: stateful envelope, trigger and wave-pool reactors that stay
//!   consistent when frames are evaluated out of order
//! - `drivers`: a ready-made reactor set fed from per-frame analysis

pub mod audio;
pub mod cli;
pub mod drivers;
pub mod error;
pub mod params;
pub mod reactor;

pub use error::{Error, Result};
