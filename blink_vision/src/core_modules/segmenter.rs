// THEORY:
// The `FrameSegmenter` is the per-frame half of the system. It owns no history; each
// call takes one intensity frame through the fixed chain
//
//     smooth -> binarise -> label 4-connected regions -> filter by size rate
//
// and returns the regions that survived. Keeping the segmenter stateless means the
// same frames with the same settings always produce the same regions, which is what
// makes the temporal stage reproducible.

use crate::core_modules::component_extractor::component_extractor;
use crate::core_modules::gaussian::gaussian;
use crate::core_modules::mask::ForegroundMask;
use crate::core_modules::region::{Region, SizeRateRange};
use image::GrayImage;
use tracing::trace;

/// Settings for a single segmentation pass.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmenterConfig {
    /// Regions whose size rate falls outside this inclusive range are discarded.
    pub size_rate_range: SizeRateRange,
    /// Smoothed intensities strictly above this value are foreground.
    pub threshold: u8,
    /// Frame rate used to turn a region's diameter into its size rate.
    pub fps: u32,
    /// Spread of the Gaussian smoothing kernel. Non-positive disables smoothing.
    pub sigma: f64,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            size_rate_range: SizeRateRange::default(),
            threshold: 100,
            fps: 30,
            sigma: gaussian::DEFAULT_SIGMA,
        }
    }
}

pub struct FrameSegmenter {
    config: SegmenterConfig,
}

impl FrameSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SegmenterConfig {
        &self.config
    }

    /// Runs the full segmentation chain and returns the regions inside the size-rate range.
    pub fn segment(&self, frame: &GrayImage) -> Vec<Region> {
        let smoothed = gaussian::smooth(frame, self.config.sigma);
        let mask = ForegroundMask::from_threshold(&smoothed, self.config.threshold);
        let regions = component_extractor::find_regions(&mask);
        let found = regions.len();

        let kept = self.filter_regions(regions);
        trace!(found, kept = kept.len(), "segmented frame");
        kept
    }

    /// Keeps regions whose size rate lies within the configured range.
    pub fn filter_regions(&self, regions: Vec<Region>) -> Vec<Region> {
        regions
            .into_iter()
            .filter(|r| {
                self.config
                    .size_rate_range
                    .contains(r.size_rate(self.config.fps))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::region::BoundingBox;
    use image::Luma;

    fn frame_with_blocks(width: u32, height: u32, blocks: &[(u32, u32, u32)]) -> GrayImage {
        let mut frame = GrayImage::new(width, height);
        for &(top, left, side) in blocks {
            for y in top..top + side {
                for x in left..left + side {
                    frame.put_pixel(x, y, Luma([255]));
                }
            }
        }
        frame
    }

    #[test]
    fn black_frame_yields_no_regions() {
        let segmenter = FrameSegmenter::new(SegmenterConfig::default());
        assert!(segmenter.segment(&GrayImage::new(64, 48)).is_empty());
    }

    #[test]
    fn isolated_block_yields_matching_region() {
        let segmenter = FrameSegmenter::new(SegmenterConfig::default());
        let frame = frame_with_blocks(30, 30, &[(10, 10, 10)]);

        let regions = segmenter.segment(&frame);
        assert_eq!(regions.len(), 1);

        let region = &regions[0];
        assert_eq!(
            region.bounding_box,
            BoundingBox {
                min_row: 10,
                min_col: 10,
                max_row: 19,
                max_col: 19
            }
        );
        assert_eq!(region.area, 100);
        assert_eq!(region.size_rate(30), region.equivalent_diameter() / 30.0);
    }

    #[test]
    fn unsmoothed_block_keeps_exact_area() {
        let config = SegmenterConfig {
            sigma: 0.0,
            ..SegmenterConfig::default()
        };
        let segmenter = FrameSegmenter::new(config);
        let frame = frame_with_blocks(20, 20, &[(2, 3, 4), (12, 12, 5)]);

        let regions = segmenter.segment(&frame);
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[0].area, 16);
        assert_eq!(regions[1].area, 25);
    }

    #[test]
    fn segmentation_is_deterministic() {
        let segmenter = FrameSegmenter::new(SegmenterConfig::default());
        let frame = frame_with_blocks(48, 48, &[(2, 2, 8), (20, 25, 12), (35, 5, 9)]);

        assert_eq!(segmenter.segment(&frame), segmenter.segment(&frame));
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let frame = frame_with_blocks(30, 30, &[(10, 10, 10)]);
        let probe = FrameSegmenter::new(SegmenterConfig::default());
        let rate = probe.segment(&frame)[0].size_rate(30);

        let keep_at = |lo: f64, hi: f64| {
            let config = SegmenterConfig {
                size_rate_range: SizeRateRange::new(lo, hi),
                ..SegmenterConfig::default()
            };
            FrameSegmenter::new(config).segment(&frame).len()
        };

        assert_eq!(keep_at(rate, 1.0), 1);
        assert_eq!(keep_at(0.0, rate), 1);
        assert_eq!(keep_at(rate + 1e-9, 1.0), 0);
        assert_eq!(keep_at(0.0, rate - 1e-9), 0);
    }

    #[test]
    fn large_regions_fall_outside_default_range() {
        // A 40x40 block has an equivalent diameter of ~45 px, i.e. a size rate of
        // ~1.5 at 30 fps, above the default upper bound of 1.
        let segmenter = FrameSegmenter::new(SegmenterConfig::default());
        let frame = frame_with_blocks(60, 60, &[(10, 10, 40)]);
        assert!(segmenter.segment(&frame).is_empty());
    }
}
