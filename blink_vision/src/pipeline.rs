// THEORY:
// The `pipeline` module is the top-level API of the library. It wires the two stages
// together behind one struct, `BlinkPipeline`, and owns the only state that lives
// longer than a frame: the growing Frame Region Set.
//
// The driving loop is deliberately plain: pull a frame, check the cancellation token,
// segment, optionally hand the frame to a sink, repeat. When the source runs dry (the
// normal end) or the token is set (an early stop), whatever was collected is analysed.
// Video decoding and annotation are collaborators behind the `FrameSource` and
// `FrameSink` traits, so the library never depends on a particular video backend.

use crate::core_modules::frequency_analyzer::{FrequencyAnalyzer, FrequencyReport};
use crate::core_modules::intensity::IntensityFrame;
use crate::core_modules::region::{FrameRegionSet, Region, SizeRateRange};
use crate::core_modules::segmenter::{FrameSegmenter, SegmenterConfig};
use crate::error::{BlinkError, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info};

// Re-export key data structures for the public API.
pub use crate::core_modules::frequency_analyzer::{FrequencyHistogram, Peak};
pub use crate::core_modules::intensity::BgrFrame;
pub use crate::core_modules::region::BoundingBox;

/// Configuration for the BlinkPipeline. The defaults are the values the analysis was
/// tuned with: threshold 100, 30 fps, size-rate range [0, 1], sigma 1.5.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Inclusive range of accepted size rates (equivalent diameter / fps).
    pub frequency_range: SizeRateRange,
    pub threshold: u8,
    /// Frame rate assumed for the video. Also fixes the number of histogram bins.
    pub fps: u32,
    /// Gaussian smoothing spread applied before thresholding.
    pub sigma: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let segmenter = SegmenterConfig::default();
        Self {
            frequency_range: segmenter.size_rate_range,
            threshold: segmenter.threshold,
            fps: segmenter.fps,
            sigma: segmenter.sigma,
        }
    }
}

impl PipelineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.fps == 0 {
            return Err(BlinkError::InvalidConfig("fps must be positive".into()));
        }
        let SizeRateRange { lo, hi } = self.frequency_range;
        if !lo.is_finite() || !hi.is_finite() {
            return Err(BlinkError::InvalidConfig(format!(
                "frequency range must be finite, got [{lo}, {hi}]"
            )));
        }
        if lo > hi {
            return Err(BlinkError::InvalidConfig(format!(
                "frequency range is inverted: [{lo}, {hi}]"
            )));
        }
        if !self.sigma.is_finite() {
            return Err(BlinkError::InvalidConfig(format!(
                "sigma must be finite, got {}",
                self.sigma
            )));
        }
        Ok(())
    }

    fn segmenter_config(&self) -> SegmenterConfig {
        SegmenterConfig {
            size_rate_range: self.frequency_range,
            threshold: self.threshold,
            fps: self.fps,
            sigma: self.sigma,
        }
    }
}

/// Shared flag checked once per frame. Cloning hands out another handle to the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// An ordered, finite sequence of frames. `Ok(None)` marks the end of the stream.
pub trait FrameSource {
    type Frame: IntensityFrame;

    fn next_frame(&mut self) -> Result<Option<Self::Frame>>;
}

/// Receives every frame together with the regions kept for it, e.g. to draw them.
pub trait FrameSink<F> {
    fn accept(&mut self, frame: F, regions: &[Region]) -> Result<()>;
}

/// A frame source over frames already held in memory.
pub struct VecFrameSource<F> {
    frames: std::vec::IntoIter<F>,
}

impl<F> VecFrameSource<F> {
    pub fn new(frames: Vec<F>) -> Self {
        Self {
            frames: frames.into_iter(),
        }
    }
}

impl<F: IntensityFrame> FrameSource for VecFrameSource<F> {
    type Frame = F;

    fn next_frame(&mut self) -> Result<Option<F>> {
        Ok(self.frames.next())
    }
}

/// The main, top-level struct of the analysis.
pub struct BlinkPipeline {
    segmenter: FrameSegmenter,
    analyzer: FrequencyAnalyzer,
    config: PipelineConfig,
    frame_regions: FrameRegionSet,
}

impl BlinkPipeline {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            segmenter: FrameSegmenter::new(config.segmenter_config()),
            analyzer: FrequencyAnalyzer::new(config.fps),
            config,
            frame_regions: Vec::new(),
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Stage 1 for a single frame: segments it and appends the kept regions.
    pub fn process_frame<F: IntensityFrame>(&mut self, frame: &F) -> Result<&[Region]> {
        let intensity = frame.to_intensity()?;
        let kept = self.segmenter.segment(&intensity);
        debug!(
            frame = self.frame_regions.len(),
            kept = kept.len(),
            "frame segmented"
        );
        self.frame_regions.push(kept);
        Ok(self.last_regions())
    }

    /// Drains `source` through stage 1, then runs stage 2 on everything collected.
    pub fn run<S: FrameSource>(
        &mut self,
        source: &mut S,
        mut sink: Option<&mut dyn FrameSink<S::Frame>>,
        cancel: &CancellationToken,
    ) -> Result<FrequencyReport> {
        let mut cancelled = false;
        loop {
            if cancel.is_cancelled() {
                info!(
                    frames = self.frame_regions.len(),
                    "cancelled, analysing partial results"
                );
                cancelled = true;
                break;
            }

            let Some(frame) = source.next_frame()? else {
                break;
            };

            self.process_frame(&frame)?;
            if let Some(sink) = sink.as_deref_mut() {
                sink.accept(frame, self.last_regions())?;
            }
        }

        let mut report = self.report();
        report.cancelled = cancelled;
        info!(
            frames = report.frames_analyzed,
            peaks = report.peaks.len(),
            cancelled,
            "analysis complete"
        );
        Ok(report)
    }

    /// Stage 2 over the frames processed so far.
    pub fn report(&self) -> FrequencyReport {
        self.analyzer.analyze(&self.frame_regions)
    }

    pub fn frame_regions(&self) -> &FrameRegionSet {
        &self.frame_regions
    }

    /// Hands over the collected Frame Region Set, leaving the pipeline empty.
    pub fn take_frame_regions(&mut self) -> FrameRegionSet {
        std::mem::take(&mut self.frame_regions)
    }

    fn last_regions(&self) -> &[Region] {
        self.frame_regions.last().map(Vec::as_slice).unwrap_or(&[])
    }
}
