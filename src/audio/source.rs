//! Mono PCM sample buffer and per-frame analysis windows.

use log::{info, warn};
use std::io::Read;
use std::ops::Deref;
use std::path::Path;

use crate::error::Result;

/// Fixed-length window of mono samples (length = FFT size), zero-padded past
/// the end of the source buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleWindow(Vec<f64>);

impl SampleWindow {
    /// Copy `len` samples starting at `start`, zero-padding past the end
    pub fn read(samples: &[f64], start: usize, len: usize) -> Self {
        let mut window = vec![0.0; len];
        if start < samples.len() {
            let available = (samples.len() - start).min(len);
            window[..available].copy_from_slice(&samples[start..start + available]);
        }
        Self(window)
    }

    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Deref for SampleWindow {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

/// Decoded mono audio track
#[derive(Debug, Clone, PartialEq)]
pub struct SampleBuffer {
    samples: Vec<f64>,
    sample_rate_hz: u32,
}

impl SampleBuffer {
    pub fn new(samples: Vec<f64>, sample_rate_hz: u32) -> Self {
        Self {
            samples,
            sample_rate_hz,
        }
    }

    /// Decode a WAV file, downmixing to mono
    pub fn from_wav_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let reader = hound::WavReader::open(path)?;
        let buffer = Self::from_wav(reader)?;
        info!(
            "Loaded {}: {} samples @ {}Hz ({:.2}s)",
            path.display(),
            buffer.samples.len(),
            buffer.sample_rate_hz,
            buffer.duration_secs()
        );
        Ok(buffer)
    }

    /// Decode WAV data from any reader, downmixing to mono
    pub fn from_wav_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_wav(hound::WavReader::new(reader)?)
    }

    fn from_wav<R: Read>(mut reader: hound::WavReader<R>) -> Result<Self> {
        let spec = reader.spec();
        let interleaved: Vec<f64> = match spec.sample_format {
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map(f64::from))
                .collect::<std::result::Result<_, _>>()?,
            hound::SampleFormat::Int => {
                // Full-scale for the declared bit depth
                let scale = (1i64 << (spec.bits_per_sample.saturating_sub(1))) as f64;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f64 / scale))
                    .collect::<std::result::Result<_, _>>()?
            }
        };

        let channels = spec.channels.max(1) as usize;
        let samples = if channels == 1 {
            interleaved
        } else {
            warn!("Downmixing {} channels to mono", channels);
            interleaved
                .chunks(channels)
                .map(|frame| frame.iter().sum::<f64>() / channels as f64)
                .collect()
        };

        Ok(Self::new(samples, spec.sample_rate))
    }

    pub fn samples(&self) -> &[f64] {
        &self.samples
    }

    pub fn sample_rate_hz(&self) -> u32 {
        self.sample_rate_hz
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate_hz == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / self.sample_rate_hz as f64
    }

    /// First sample of video frame `frame` at `fps`
    pub fn frame_offset(&self, frame: u64, fps: f64) -> usize {
        let samples_per_frame = self.sample_rate_hz as f64 / fps;
        (frame as f64 * samples_per_frame).floor() as usize
    }

    /// `fft_size`-sample window starting at the first sample of `frame`
    pub fn window_for_frame(&self, frame: u64, fps: f64, fft_size: usize) -> SampleWindow {
        SampleWindow::read(&self.samples, self.frame_offset(frame, fps), fft_size)
    }
}
