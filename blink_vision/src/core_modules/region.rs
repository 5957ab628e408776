// THEORY:
// A `Region` is one connected patch of foreground in a single frame: a candidate
// hotspot. Like a blob in a motion detector, it is a stateless summary. It knows its
// extent, area and centre, and nothing about other frames.
//
// The one derived quantity that matters downstream is the size rate: the region's
// equivalent diameter divided by the frame rate. It is the filter the segmenter
// applies and it is reported to users as a "frequency", but it is a size heuristic.
// It does not observe the region over time and does not measure periodicity.

use std::f64::consts::PI;

/// Inclusive pixel extent of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BoundingBox {
    pub min_row: u32,
    pub min_col: u32,
    pub max_row: u32,
    pub max_col: u32,
}

impl BoundingBox {
    pub fn width(&self) -> u32 {
        self.max_col - self.min_col + 1
    }

    pub fn height(&self) -> u32 {
        self.max_row - self.min_row + 1
    }
}

/// A maximal 4-connected set of foreground pixels in one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// 1-based label, assigned in raster order of the region's first pixel. Per frame only.
    pub label: u32,
    pub bounding_box: BoundingBox,
    /// Number of pixels in the region.
    pub area: usize,
    /// Mean (row, col) of the region's pixels.
    pub centroid: (f64, f64),
}

impl Region {
    /// Diameter of the circle with the same area as the region.
    pub fn equivalent_diameter(&self) -> f64 {
        (4.0 * self.area as f64 / PI).sqrt()
    }

    /// Equivalent diameter divided by the frame rate.
    pub fn size_rate(&self, fps: u32) -> f64 {
        self.equivalent_diameter() / fps as f64
    }
}

/// The kept regions of every frame, one entry per frame in source order.
pub type FrameRegionSet = Vec<Vec<Region>>;

/// Inclusive `[lo, hi]` range of accepted size rates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeRateRange {
    pub lo: f64,
    pub hi: f64,
}

impl SizeRateRange {
    pub fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, rate: f64) -> bool {
        self.lo <= rate && rate <= self.hi
    }
}

impl Default for SizeRateRange {
    fn default() -> Self {
        Self { lo: 0.0, hi: 1.0 }
    }
}
