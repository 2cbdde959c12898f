//! Frame timeline configuration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Video frame timeline used to map frame indices onto audio time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeline {
    /// Frame rate (FPS)
    pub fps: f64,

    /// Duration to render (seconds)
    pub duration_secs: f64,
}

impl Default for Timeline {
    fn default() -> Self {
        Self {
            fps: 30.0,
            duration_secs: 0.0,
        }
    }
}

impl Timeline {
    pub fn new(fps: f64, duration_secs: f64) -> Self {
        Self { fps, duration_secs }
    }

    /// Total number of frames to render
    pub fn total_frames(&self) -> u64 {
        (self.duration_secs * self.fps).ceil().max(0.0) as u64
    }

    /// Timestamp (seconds) of the start of `frame`
    pub fn frame_time(&self, frame: u64) -> f64 {
        frame as f64 / self.fps
    }

    pub fn validate(&self) -> Result<()> {
        if self.fps.is_nan() || self.fps <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "fps must be > 0, got {}",
                self.fps
            )));
        }
        Ok(())
    }
}
