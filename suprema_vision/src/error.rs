// THEORY:
// Every failure of a pipeline invocation is local to that invocation. Nothing in
// this enum is ever raised for an "empty" outcome: an image with no visible pixels
// or no large-enough regions yields `Report::EmptyResult`, which is a legitimate
// no-op and not an error.

use crate::core_modules::boundary_path::PathParseError;

/// All the ways a single upload / pipeline run can fail.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// The resource is not an image type. Raised before any pixel is touched.
    #[error("input rejected: `{mime_type}` is not an image type")]
    InputRejected { mime_type: String },

    /// The resource could not be read or decoded. No partial output exists.
    #[error("failed to decode image: {0}")]
    DecodeFailed(String),

    /// The RGBA sampling surface could not be built from the decoded image.
    #[error("pixel sampling surface unavailable: {0}")]
    RenderContextUnavailable(String),

    /// A configuration record holds a value outside its accepted range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Path data for a scene element could not be parsed.
    #[error("invalid path data: {0}")]
    PathParse(#[from] PathParseError),
}

impl From<image::ImageError> for PipelineError {
    fn from(err: image::ImageError) -> Self {
        PipelineError::DecodeFailed(err.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::DecodeFailed(err.to_string())
    }
}
