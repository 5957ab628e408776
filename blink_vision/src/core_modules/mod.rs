pub mod component_extractor;
pub mod frequency_analyzer;
pub mod gaussian;
pub mod intensity;
pub mod mask;
pub mod peak_detector;
pub mod pixel;
pub mod region;
pub mod segmenter;
