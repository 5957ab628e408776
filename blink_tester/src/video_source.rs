use anyhow::{Context, Result, anyhow, bail};
use blink_vision::core_modules::intensity::{IntensityFrame, bgr_to_intensity};
use blink_vision::error::BlinkError;
use blink_vision::pipeline::FrameSource;
use image::GrayImage;
use opencv::{
    core::{Mat, Size},
    imgproc,
    prelude::*,
    videoio::{self, VideoCapture},
};
use std::path::Path;
use tracing::{debug, info};

/// One decoded BGR frame and its position in the stream.
pub struct VideoFrame {
    pub index: u64,
    pub mat: Mat,
}

impl IntensityFrame for VideoFrame {
    fn to_intensity(&self) -> blink_vision::Result<GrayImage> {
        let bgr = to_packed_bgr(&self.mat).map_err(|e| BlinkError::FrameSource(Box::new(e)))?;
        let bytes = bgr
            .data_bytes()
            .map_err(|e| BlinkError::FrameSource(Box::new(e)))?;
        bgr_to_intensity(bgr.cols() as u32, bgr.rows() as u32, bytes)
    }
}

/// Brings any 8-bit frame to a continuous 3-channel BGR matrix.
fn to_packed_bgr(mat: &Mat) -> opencv::Result<Mat> {
    let code = match mat.channels() {
        1 => Some(imgproc::COLOR_GRAY2BGR),
        4 => Some(imgproc::COLOR_BGRA2BGR),
        _ => None,
    };
    let mut bgr = match code {
        Some(code) => {
            let mut converted = Mat::default();
            imgproc::cvt_color(mat, &mut converted, code, 0)?;
            converted
        }
        None => mat.try_clone()?,
    };
    if !bgr.is_continuous() {
        bgr = bgr.try_clone()?;
    }
    Ok(bgr)
}

/// Frame source backed by an OpenCV `VideoCapture`. The capture is released when the
/// source is dropped.
pub struct VideoFrameSource {
    capture: VideoCapture,
    frame_size: Size,
    stream_fps: f64,
    next_index: u64,
}

impl VideoFrameSource {
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            bail!("video file not found: {}", path.display());
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| anyhow!("video path is not valid UTF-8: {}", path.display()))?;

        let capture = VideoCapture::from_file(path_str, videoio::CAP_ANY)
            .with_context(|| format!("failed to open video file: {}", path.display()))?;
        if !capture.is_opened()? {
            bail!("failed to open video file: {}", path.display());
        }

        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as i32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as i32;
        let stream_fps = capture.get(videoio::CAP_PROP_FPS)?;
        info!(
            path = %path.display(),
            width,
            height,
            stream_fps,
            "video opened"
        );

        Ok(Self {
            capture,
            frame_size: Size::new(width, height),
            stream_fps,
            next_index: 0,
        })
    }

    pub fn frame_size(&self) -> Size {
        self.frame_size
    }

    /// Frame rate reported by the container. Falls back to 30 when unknown.
    pub fn stream_fps(&self) -> f64 {
        if self.stream_fps > 0.0 {
            self.stream_fps
        } else {
            30.0
        }
    }
}

impl FrameSource for VideoFrameSource {
    type Frame = VideoFrame;

    fn next_frame(&mut self) -> blink_vision::Result<Option<VideoFrame>> {
        let mut mat = Mat::default();
        let got_frame = self
            .capture
            .read(&mut mat)
            .map_err(|e| BlinkError::FrameSource(Box::new(e)))?;

        if !got_frame || mat.empty() {
            debug!(frames = self.next_index, "end of video");
            return Ok(None);
        }

        let frame = VideoFrame {
            index: self.next_index,
            mat,
        };
        self.next_index += 1;
        Ok(Some(frame))
    }
}
