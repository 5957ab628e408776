use crate::video_source::VideoFrame;
use anyhow::{Context, Result, bail};
use blink_vision::core_modules::region::Region;
use blink_vision::error::BlinkError;
use blink_vision::pipeline::FrameSink;
use opencv::{
    core::{Rect, Scalar, Size},
    imgproc,
    prelude::*,
    videoio::VideoWriter,
};
use std::path::Path;
use tracing::info;

const BOX_THICKNESS: i32 = 2;

/// Writes every frame to a video file with a green box around each kept region.
pub struct AnnotatedVideoWriter {
    writer: VideoWriter,
    frames_written: u64,
}

impl AnnotatedVideoWriter {
    pub fn create(path: &Path, fps: f64, frame_size: Size) -> Result<Self> {
        let path_str = path
            .to_str()
            .with_context(|| format!("output path is not valid UTF-8: {}", path.display()))?;
        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let writer = VideoWriter::new(path_str, fourcc, fps, frame_size, true)
            .with_context(|| format!("failed to create output video: {}", path.display()))?;
        if !writer.is_opened()? {
            bail!("failed to create output video: {}", path.display());
        }

        Ok(Self {
            writer,
            frames_written: 0,
        })
    }

    fn draw_and_write(&mut self, frame: &mut VideoFrame, regions: &[Region]) -> opencv::Result<()> {
        let green = Scalar::new(0.0, 255.0, 0.0, 0.0);
        for region in regions {
            let bbox = region.bounding_box;
            // The box's far corner sits one pixel past the region, around it rather than on it.
            let rect = Rect::new(
                bbox.min_col as i32,
                bbox.min_row as i32,
                bbox.width() as i32 + 1,
                bbox.height() as i32 + 1,
            );
            imgproc::rectangle(&mut frame.mat, rect, green, BOX_THICKNESS, imgproc::LINE_8, 0)?;
        }
        self.writer.write(&frame.mat)?;
        self.frames_written += 1;
        Ok(())
    }
}

impl FrameSink<VideoFrame> for AnnotatedVideoWriter {
    fn accept(&mut self, mut frame: VideoFrame, regions: &[Region]) -> blink_vision::Result<()> {
        self.draw_and_write(&mut frame, regions)
            .map_err(|e| BlinkError::FrameSink(Box::new(e)))
    }
}

impl Drop for AnnotatedVideoWriter {
    fn drop(&mut self) {
        // Best effort: flush the container trailer.
        let _ = self.writer.release();
        info!(frames = self.frames_written, "annotated video closed");
    }
}
