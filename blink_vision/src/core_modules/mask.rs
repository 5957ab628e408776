// THEORY:
// The `ForegroundMask` is the binarised view of a frame: a fixed, global threshold
// splits every pixel into foreground (strictly brighter than the threshold) or
// background. It is a stateless data container consumed by the component extractor.

use image::GrayImage;

/// A binary grid where `true` marks a foreground pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForegroundMask {
    pub width: u32,
    pub height: u32,
    cells: Vec<bool>,
}

impl ForegroundMask {
    /// Marks every pixel with an intensity strictly above `threshold` as foreground.
    pub fn from_threshold(image: &GrayImage, threshold: u8) -> Self {
        let (width, height) = image.dimensions();
        let cells = image.pixels().map(|p| p.0[0] > threshold).collect();
        Self {
            width,
            height,
            cells,
        }
    }

    /// Builds a mask from rows of booleans. Used to describe shapes directly in tests
    /// and by callers that already segmented their frames.
    pub fn from_rows(rows: &[Vec<bool>]) -> Self {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.len()) as u32;
        let mut cells = Vec::with_capacity((width * height) as usize);
        for row in rows {
            for x in 0..width as usize {
                cells.push(row.get(x).copied().unwrap_or(false));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    #[inline]
    pub fn is_foreground(&self, row: u32, col: u32) -> bool {
        row < self.height && col < self.width && self.cells[(row * self.width + col) as usize]
    }

    pub fn foreground_count(&self) -> usize {
        self.cells.iter().filter(|c| **c).count()
    }
}
