// THEORY:
// This file is the main entry point for the `blink_vision` library crate.
//
// The library finds bright regions that blink on and off in a video (thermal
// hotspots) and estimates their dominant blink frequencies. It is a one-shot, batch
// analysis in two stages:
//
// 1.  **Segmentation** (`core_modules::segmenter`): every frame is smoothed,
//     thresholded and split into 4-connected regions, and each region is kept or
//     dropped according to its size rate.
// 2.  **Temporal Analysis** (`core_modules::frequency_analyzer`): the number of kept
//     regions per frame is histogrammed and the histogram's local maxima are the
//     reported frequencies.
//
// `pipeline::BlinkPipeline` is the intended entry point. Video decoding and drawing are
// left to callers through the `FrameSource` and `FrameSink` traits.

pub mod core_modules;
pub mod error;
pub mod pipeline;

pub use error::{BlinkError, Result};
