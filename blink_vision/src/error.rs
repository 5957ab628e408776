// THEORY:
// A single error type for the whole library. The numeric stages (smoothing,
// thresholding, labelling, peak finding) are total functions and never fail;
// errors only come from the edges of the system: a bad configuration, a frame
// whose buffer does not match its declared shape, or the external collaborators
// (frame source and frame sink) reporting their own failures.

use thiserror::Error;

/// Boxed error coming from an external collaborator (video decoder, writer, ...).
pub type ExternalError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum BlinkError {
    #[error("invalid pipeline configuration: {0}")]
    InvalidConfig(String),

    #[error("frame buffer holds {actual} bytes, expected {expected} for a {width}x{height} frame")]
    FrameShape {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("frame source failed: {0}")]
    FrameSource(#[source] ExternalError),

    #[error("frame sink failed: {0}")]
    FrameSink(#[source] ExternalError),
}

pub type Result<T> = std::result::Result<T, BlinkError>;
