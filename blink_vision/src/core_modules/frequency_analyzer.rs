// THEORY:
// The `FrequencyAnalyzer` is the temporal half of the system. It never looks at pixels;
// it only sees how many regions survived in each frame.
//
// Key architectural principles:
// 1.  **Count Histogram**: one bin per integer label from 1 to floor(fps / 2). Bin `k`
//     counts the frames in which exactly `k` regions survived. The bin label is then
//     reported in Hz, i.e. a region count is read as a blink frequency. That reading is
//     a heuristic carried over as-is.
// 2.  **Checked Binning**: a frame with zero regions, or more regions than there are
//     bins, has no bin. Such frames are tallied separately instead of being indexed
//     into the histogram, so no input can fault the analysis.
// 3.  **Peak Extraction**: local maxima of the histogram (no height constraint) are the
//     dominant frequencies, reported in ascending order.
// 4.  **Pure Transform**: the analyzer holds only the frame rate. The same region set
//     always produces the same report.

use crate::core_modules::peak_detector::peak_detector;
use crate::core_modules::region::FrameRegionSet;
use tracing::{debug, warn};

/// Where a frame's region count landed in the histogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinSlot {
    /// Counted in the bin with this label.
    Counted(u32),
    /// No regions survived; there is no bin 0.
    Empty,
    /// More regions than the highest bin label.
    Overflow,
}

/// Frame counts per region-count bin, labelled 1..=floor(fps / 2).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyHistogram {
    /// `counts[i]` holds bin label `i + 1`.
    counts: Vec<u32>,
    pub empty_frames: u32,
    pub overflow_frames: u32,
}

impl FrequencyHistogram {
    pub fn new(fps: u32) -> Self {
        Self {
            counts: vec![0; (fps / 2) as usize],
            empty_frames: 0,
            overflow_frames: 0,
        }
    }

    /// Highest bin label.
    pub fn max_bin(&self) -> u32 {
        self.counts.len() as u32
    }

    pub fn slot_for(&self, region_count: usize) -> BinSlot {
        if region_count == 0 {
            BinSlot::Empty
        } else if region_count > self.counts.len() {
            BinSlot::Overflow
        } else {
            BinSlot::Counted(region_count as u32)
        }
    }

    pub fn record(&mut self, region_count: usize) -> BinSlot {
        let slot = self.slot_for(region_count);
        match slot {
            BinSlot::Counted(label) => self.counts[label as usize - 1] += 1,
            BinSlot::Empty => self.empty_frames += 1,
            BinSlot::Overflow => self.overflow_frames += 1,
        }
        slot
    }

    /// Frames counted in bin `label`; zero for labels outside the histogram.
    pub fn count(&self, label: u32) -> u32 {
        if label == 0 {
            return 0;
        }
        self.counts.get(label as usize - 1).copied().unwrap_or(0)
    }

    /// Bin heights in label order.
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// `(label, count)` pairs in label order.
    pub fn bins(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.counts
            .iter()
            .enumerate()
            .map(|(i, count)| (i as u32 + 1, *count))
    }
}

/// One dominant frequency and the number of frames that voted for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Peak {
    pub frequency_hz: u32,
    pub frames: u32,
}

/// Result of the temporal analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrequencyReport {
    /// Peaks in ascending frequency order.
    pub peaks: Vec<Peak>,
    pub histogram: FrequencyHistogram,
    pub frames_analyzed: usize,
    /// Set when iteration stopped early and the report covers a partial video.
    pub cancelled: bool,
}

impl FrequencyReport {
    pub fn frequencies(&self) -> Vec<u32> {
        self.peaks.iter().map(|p| p.frequency_hz).collect()
    }
}

pub struct FrequencyAnalyzer {
    fps: u32,
}

impl FrequencyAnalyzer {
    pub fn new(fps: u32) -> Self {
        Self { fps }
    }

    pub fn build_histogram(&self, frame_regions: &FrameRegionSet) -> FrequencyHistogram {
        let mut histogram = FrequencyHistogram::new(self.fps);
        for regions in frame_regions {
            histogram.record(regions.len());
        }
        histogram
    }

    pub fn analyze(&self, frame_regions: &FrameRegionSet) -> FrequencyReport {
        let histogram = self.build_histogram(frame_regions);

        if histogram.empty_frames > 0 || histogram.overflow_frames > 0 {
            warn!(
                empty_frames = histogram.empty_frames,
                overflow_frames = histogram.overflow_frames,
                max_bin = histogram.max_bin(),
                "frames without a histogram bin were left out of the analysis"
            );
        }

        let peaks: Vec<Peak> = peak_detector::find_peaks(histogram.counts())
            .into_iter()
            .map(|i| Peak {
                frequency_hz: i as u32 + 1,
                frames: histogram.counts()[i],
            })
            .collect();

        debug!(bins = ?histogram.counts(), peaks = peaks.len(), "histogram analysed");

        FrequencyReport {
            peaks,
            histogram,
            frames_analyzed: frame_regions.len(),
            cancelled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::region::{BoundingBox, Region};

    fn regions(count: usize) -> Vec<Region> {
        (0..count)
            .map(|i| Region {
                label: i as u32 + 1,
                bounding_box: BoundingBox {
                    min_row: 0,
                    min_col: i as u32 * 2,
                    max_row: 0,
                    max_col: i as u32 * 2,
                },
                area: 1,
                centroid: (0.0, i as f64 * 2.0),
            })
            .collect()
    }

    fn region_set(counts: &[usize]) -> FrameRegionSet {
        counts.iter().map(|&n| regions(n)).collect()
    }

    #[test]
    fn histogram_has_one_bin_per_label_up_to_half_fps() {
        assert_eq!(FrequencyHistogram::new(30).max_bin(), 15);
        assert_eq!(FrequencyHistogram::new(25).max_bin(), 12);
        assert_eq!(FrequencyHistogram::new(1).max_bin(), 0);
    }

    #[test]
    fn empty_region_set_has_no_peaks() {
        let report = FrequencyAnalyzer::new(30).analyze(&Vec::new());
        assert!(report.peaks.is_empty());
        assert_eq!(report.frames_analyzed, 0);
        assert!(report.histogram.counts().iter().all(|c| *c == 0));
    }

    #[test]
    fn constant_count_fills_a_single_bin() {
        let analyzer = FrequencyAnalyzer::new(30);
        let report = analyzer.analyze(&region_set(&[4; 12]));

        for (label, count) in report.histogram.bins() {
            if label == 4 {
                assert_eq!(count, 12);
            } else {
                assert_eq!(count, 0);
            }
        }
        assert_eq!(
            report.peaks,
            vec![Peak {
                frequency_hz: 4,
                frames: 12
            }]
        );
    }

    #[test]
    fn single_bin_at_histogram_edges_is_not_a_peak() {
        let analyzer = FrequencyAnalyzer::new(30);

        let low = analyzer.analyze(&region_set(&[1; 6]));
        assert_eq!(low.histogram.count(1), 6);
        assert!(low.peaks.is_empty());

        let high = analyzer.analyze(&region_set(&[15; 6]));
        assert_eq!(high.histogram.count(15), 6);
        assert!(high.peaks.is_empty());
    }

    #[test]
    fn alternating_two_and_three_forms_a_plateau_peak() {
        let counts: Vec<usize> = (0..10).map(|i| if i % 2 == 0 { 2 } else { 3 }).collect();
        let report = FrequencyAnalyzer::new(30).analyze(&region_set(&counts));

        assert_eq!(report.histogram.count(2), 5);
        assert_eq!(report.histogram.count(3), 5);
        assert_eq!(report.frequencies(), vec![2]);
        assert_eq!(report.frames_analyzed, 10);
    }

    #[test]
    fn uneven_split_peaks_at_the_taller_bin() {
        let report = FrequencyAnalyzer::new(30).analyze(&region_set(&[2, 3, 3, 2, 3, 3, 3]));
        assert_eq!(report.frequencies(), vec![3]);
        assert_eq!(report.peaks[0].frames, 5);
    }

    #[test]
    fn out_of_range_counts_are_tallied_not_indexed() {
        let analyzer = FrequencyAnalyzer::new(10);
        let report = analyzer.analyze(&region_set(&[0, 0, 6, 40, 2, 2]));

        assert_eq!(report.histogram.empty_frames, 2);
        assert_eq!(report.histogram.overflow_frames, 2);
        assert_eq!(report.histogram.counts(), &[0, 2, 0, 0, 0]);
        assert_eq!(report.frequencies(), vec![2]);
        assert_eq!(report.frames_analyzed, 6);
    }

    #[test]
    fn slots_are_checked() {
        let histogram = FrequencyHistogram::new(6);
        assert_eq!(histogram.slot_for(0), BinSlot::Empty);
        assert_eq!(histogram.slot_for(1), BinSlot::Counted(1));
        assert_eq!(histogram.slot_for(3), BinSlot::Counted(3));
        assert_eq!(histogram.slot_for(4), BinSlot::Overflow);
        assert_eq!(histogram.count(0), 0);
        assert_eq!(histogram.count(99), 0);
    }

    #[test]
    fn degenerate_frame_rate_never_panics() {
        let report = FrequencyAnalyzer::new(1).analyze(&region_set(&[0, 1, 2]));
        assert!(report.peaks.is_empty());
        assert_eq!(report.histogram.empty_frames, 1);
        assert_eq!(report.histogram.overflow_frames, 2);
    }
}
