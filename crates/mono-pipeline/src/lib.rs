//! Pipeline orchestration for the monochrome bitmap encoder.
//!
//! Owns the threshold parameter and the artifact set (original image,
//! binarized preview, packed bitmap, hex listing). Threshold changes
//! re-run binarize→pack→format against the retained original without
//! re-decoding; artifact sets are replaced whole, never patched.

pub mod artifacts;
pub mod options;
pub mod pipeline;
pub mod service;

// Re-exports for convenience
pub use artifacts::ArtifactSet;
pub use options::PipelineOptions;
pub use pipeline::Pipeline;
pub use service::{PipelineCommand, PipelineService, PipelineSnapshot};

/// Errors surfaced by pipeline operations.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// A parameter outside its documented range, rejected before any
    /// recompute runs.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Decoding or listing failure from the codec layer.
    #[error(transparent)]
    Codec(#[from] mono_codec::CodecError),

    /// The service worker is no longer accepting commands.
    #[error("pipeline service is not running")]
    ServiceStopped,
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
