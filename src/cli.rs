//! Command-line argument parsing and per-frame output formatting.

use clap::{Parser, ValueEnum};
use log::{info, warn};
use serde::Serialize;
use std::io::Write;
use std::ops::Range;
use std::path::PathBuf;

use crate::audio::FftBackend;
use crate::drivers::FrameDrivers;
use crate::error::Result;
use crate::params::DriverConfig;

/// Per-frame output encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One comma-separated row per frame, with a header
    Csv,
    /// One JSON object per line
    Json,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "spectral-pulse")]
#[command(about = "Compute audio-reactive animation drivers for every video frame of a track", long_about = None)]
pub struct Args {
    /// Input track (WAV)
    #[arg(long, short, value_name = "WAV")]
    pub input: PathBuf,

    /// Driver configuration (TOML); built-in defaults when omitted
    #[arg(long, short, value_name = "TOML")]
    pub config: Option<PathBuf>,

    /// Video frame rate (overrides the config)
    #[arg(long, value_name = "FPS")]
    pub fps: Option<f64>,

    /// First frame to evaluate
    #[arg(long, value_name = "FRAME", default_value_t = 0)]
    pub start_frame: u64,

    /// Number of frames to evaluate (defaults to the rest of the track)
    #[arg(long, value_name = "COUNT")]
    pub frames: Option<u64>,

    /// Output encoding
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// FFT implementation (overrides the config)
    #[arg(long, value_enum)]
    pub backend: Option<FftBackend>,

    /// Evaluate frames last-to-first
    #[arg(long)]
    pub reverse: bool,
}

impl Args {
    /// Load the driver config and apply command-line overrides
    pub fn load_config(&self) -> Result<DriverConfig> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Config: {}", path.display());
                DriverConfig::from_toml_file(path)?
            }
            None => DriverConfig::default(),
        };

        if let Some(fps) = self.fps {
            config.timeline.fps = fps;
        }
        if let Some(backend) = self.backend {
            config.analysis.backend = backend;
        }
        config.validate()?;
        Ok(config)
    }

    /// Frames to evaluate given the track length in frames
    pub fn frame_range(&self, total_frames: u64) -> Range<u64> {
        let start = self.start_frame;
        let end = match self.frames {
            Some(count) => start.saturating_add(count),
            None => total_frames.max(start),
        };
        if end > total_frames {
            warn!(
                "Frames {}..{} run past the end of the track ({} frames); tail is silent",
                start, end, total_frames
            );
        }
        start..end
    }
}

#[derive(Serialize)]
struct FrameRecord<'a> {
    frame: u64,
    #[serde(flatten)]
    drivers: &'a FrameDrivers,
}

/// Writes [`FrameDrivers`] rows in the selected format
pub struct FrameWriter<W: Write> {
    out: W,
    format: OutputFormat,
    band_names: Vec<String>,
}

impl<W: Write> FrameWriter<W> {
    pub fn new(out: W, format: OutputFormat, band_names: Vec<String>) -> Self {
        Self {
            out,
            format,
            band_names,
        }
    }

    /// Column header (CSV only)
    pub fn write_header(&mut self) -> Result<()> {
        if self.format != OutputFormat::Csv {
            return Ok(());
        }

        let mut columns = vec!["frame".to_string(), "time".to_string(), "energy".to_string()];
        columns.extend(self.band_names.iter().cloned());
        columns.extend(self.band_names.iter().map(|name| format!("{}_pulse", name)));
        columns.extend(
            ["hit", "hit_triggered", "waves", "newest_wave_age"]
                .iter()
                .map(|c| c.to_string()),
        );
        writeln!(self.out, "{}", columns.join(","))?;
        Ok(())
    }

    pub fn write_frame(&mut self, frame: u64, drivers: &FrameDrivers) -> Result<()> {
        match self.format {
            OutputFormat::Json => {
                serde_json::to_writer(&mut self.out, &FrameRecord { frame, drivers })?;
                writeln!(self.out)?;
            }
            OutputFormat::Csv => {
                let mut row = vec![
                    frame.to_string(),
                    format!("{:.4}", drivers.time),
                    format!("{:.4}", drivers.energy),
                ];
                for name in &self.band_names {
                    row.push(format!("{:.4}", drivers.bands.get(name).copied().unwrap_or(0.0)));
                }
                for name in &self.band_names {
                    row.push(format!("{:.4}", drivers.pulses.get(name).copied().unwrap_or(0.0)));
                }
                row.push(format!("{:.4}", drivers.trigger.intensity));
                row.push(u8::from(drivers.trigger.just_triggered).to_string());
                row.push(drivers.waves.waves.len().to_string());
                row.push(match drivers.waves.ages.last() {
                    Some(age) => format!("{:.4}", age),
                    None => String::new(),
                });
                writeln!(self.out, "{}", row.join(","))?;
            }
        }
        Ok(())
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
