// THEORY:
// The `intensity` module is the bridge between whatever a frame source produces and
// the single-channel grid the segmenter works on. Sources differ (a decoded OpenCV
// matrix, a raw BGR buffer, an already-gray image in a test), so the conversion is a
// trait, `IntensityFrame`, implemented once per frame representation. The rest of the
// pipeline never sees colour.

use crate::core_modules::pixel::pixel::{BgrPixel, CHANNELS};
use crate::error::{BlinkError, Result};
use image::GrayImage;

/// Anything that can be reduced to an 8-bit intensity grid.
pub trait IntensityFrame {
    fn to_intensity(&self) -> Result<GrayImage>;
}

impl IntensityFrame for GrayImage {
    fn to_intensity(&self) -> Result<GrayImage> {
        Ok(self.clone())
    }
}

/// An interleaved BGR frame as it comes out of most video decoders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BgrFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl BgrFrame {
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        check_shape(width, height, data.len())?;
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame with every pixel set to the same colour.
    pub fn filled(width: u32, height: u32, pixel: BgrPixel) -> Self {
        let count = (width * height) as usize;
        let mut data = Vec::with_capacity(count * CHANNELS);
        for _ in 0..count {
            data.extend_from_slice(&[pixel.blue, pixel.green, pixel.red]);
        }
        Self {
            width,
            height,
            data,
        }
    }
}

impl IntensityFrame for BgrFrame {
    fn to_intensity(&self) -> Result<GrayImage> {
        bgr_to_intensity(self.width, self.height, &self.data)
    }
}

/// Converts a tightly packed BGR buffer into a gray image.
pub fn bgr_to_intensity(width: u32, height: u32, bgr: &[u8]) -> Result<GrayImage> {
    check_shape(width, height, bgr.len())?;

    let luma: Vec<u8> = bgr
        .chunks_exact(CHANNELS)
        .map(|c| BgrPixel::new(c[0], c[1], c[2]).luminance())
        .collect();

    GrayImage::from_raw(width, height, luma).ok_or(BlinkError::FrameShape {
        width,
        height,
        expected: (width * height) as usize,
        actual: bgr.len() / CHANNELS,
    })
}

fn check_shape(width: u32, height: u32, actual: usize) -> Result<()> {
    let expected = width as usize * height as usize * CHANNELS;
    if actual != expected {
        return Err(BlinkError::FrameShape {
            width,
            height,
            expected,
            actual,
        });
    }
    Ok(())
}
