//! Spectral pulse - offline audio-reactive driver renderer
//!
//! Decodes a track, analyzes the audio under every video frame and prints
//! the resulting animation drivers, one line per frame.

use clap::Parser;
use log::info;
use std::io::{self, BufWriter};

use spectral_pulse::audio::{FrameAnalyzer, SampleBuffer};
use spectral_pulse::cli::{Args, FrameWriter};
use spectral_pulse::drivers::DriverSet;
use spectral_pulse::params::Timeline;
use spectral_pulse::Result;

fn run(args: Args) -> Result<()> {
    let mut config = args.load_config()?;

    let buffer = SampleBuffer::from_wav_path(&args.input)?;
    config.analysis.sample_rate_hz = buffer.sample_rate_hz();
    config.timeline = Timeline::new(config.timeline.fps, buffer.duration_secs());

    let analyzer = FrameAnalyzer::new(config.analysis.clone())?;
    let mut drivers = DriverSet::new(config.clone())?;

    let range = args.frame_range(config.timeline.total_frames());
    info!(
        "Rendering frames {}..{} @ {} fps ({:?} FFT, size {}){}",
        range.start,
        range.end,
        config.timeline.fps,
        config.analysis.backend,
        config.analysis.fft_size,
        if args.reverse { " in reverse" } else { "" }
    );
    let frames: Vec<u64> = if args.reverse {
        range.rev().collect()
    } else {
        range.collect()
    };

    let band_names = config.analysis.bands.iter().map(|b| b.name.clone()).collect();
    let stdout = io::stdout();
    let mut writer = FrameWriter::new(BufWriter::new(stdout.lock()), args.format, band_names);
    writer.write_header()?;

    for frame in frames {
        let time = config.timeline.frame_time(frame);
        let analysis = analyzer.analyze_frame(&buffer, frame, config.timeline.fps);
        let frame_drivers = drivers.update(time, &analysis);
        writer.write_frame(frame, &frame_drivers)?;
    }

    writer.finish()?;
    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(e) = run(Args::parse()) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
