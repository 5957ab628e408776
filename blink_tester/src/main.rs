mod annotator;
mod video_source;

use anyhow::{Context, Result};
use blink_vision::core_modules::frequency_analyzer::FrequencyReport;
use blink_vision::core_modules::region::SizeRateRange;
use blink_vision::pipeline::{
    BlinkPipeline, CancellationToken, FrameSink, PipelineConfig,
};
use clap::Parser;
use std::path::PathBuf;
use tracing::{Level, info, warn};

use crate::annotator::AnnotatedVideoWriter;
use crate::video_source::{VideoFrame, VideoFrameSource};

/// Detect blinking hotspots in thermal camera footage and report their frequencies.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the thermal camera footage (any container OpenCV can decode)
    video_path: PathBuf,

    /// Accepted region "frequency" range, LO HI (equivalent diameter / fps, inclusive)
    #[arg(
        long,
        alias = "frequency_range",
        num_args = 2,
        value_names = ["LO", "HI"],
        default_values_t = [0.0, 1.0]
    )]
    frequency_range: Vec<f64>,

    /// Smoothed intensities strictly above this value are foreground
    #[arg(long, default_value_t = 100)]
    threshold: u8,

    /// Frame rate assumed for the analysis
    #[arg(long, default_value_t = 30)]
    fps: u32,

    /// Spread of the Gaussian smoothing applied before thresholding
    #[arg(long, default_value_t = 1.5)]
    sigma: f64,

    /// Write the frames, with a box around each kept region, to this video file
    #[arg(long)]
    annotated_output: Option<PathBuf>,

    /// Log per-frame details
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            frequency_range: SizeRateRange::new(self.frequency_range[0], self.frequency_range[1]),
            threshold: self.threshold,
            fps: self.fps,
            sigma: self.sigma,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    let mut pipeline =
        BlinkPipeline::new(args.pipeline_config()).context("invalid analysis settings")?;
    let mut source = VideoFrameSource::open(&args.video_path)?;
    if (source.stream_fps() - args.fps as f64).abs() > 0.5 {
        warn!(
            stream_fps = source.stream_fps(),
            assumed_fps = args.fps,
            "video frame rate differs from the assumed frame rate"
        );
    }

    let mut annotator = match &args.annotated_output {
        Some(path) => Some(AnnotatedVideoWriter::create(
            path,
            source.stream_fps(),
            source.frame_size(),
        )?),
        None => None,
    };

    let cancel = CancellationToken::new();
    let handler_token = cancel.clone();
    ctrlc::set_handler(move || handler_token.cancel())
        .context("failed to install the Ctrl-C handler")?;

    info!(video = %args.video_path.display(), "analysing");
    let sink = annotator
        .as_mut()
        .map(|a| a as &mut dyn FrameSink<VideoFrame>);
    let report = pipeline.run(&mut source, sink, &cancel)?;
    drop(source);

    print_report(&report);
    Ok(())
}

fn print_report(report: &FrequencyReport) {
    if report.cancelled {
        info!(
            frames = report.frames_analyzed,
            "stopped early, results cover the frames read so far"
        );
    }
    for (label, count) in report.histogram.bins().filter(|(_, count)| *count > 0) {
        info!(bin = label, frames = count, "histogram");
    }
    println!("Frequency peaks (Hz): {:?}", report.frequencies());
}
