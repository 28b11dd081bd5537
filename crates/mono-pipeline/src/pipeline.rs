//! Synchronous pipeline state machine.
//!
//! The pipeline is empty until the first image loads and ready from
//! then on. Threshold updates while ready re-run binarize→pack→format
//! against the retained original; the new artifact set is built in full
//! before it replaces the previous one.

use std::sync::Arc;

use mono_codec::RgbImage;
use tracing::debug;

use crate::artifacts::ArtifactSet;
use crate::options::PipelineOptions;
use crate::{PipelineError, Result};

/// Orchestrates decode→binarize→pack→format over one source image.
#[derive(Debug, Default)]
pub struct Pipeline {
    options: PipelineOptions,
    artifacts: Option<Arc<ArtifactSet>>,
}

impl Pipeline {
    /// Create an empty pipeline with default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty pipeline with the given options.
    pub fn with_options(options: PipelineOptions) -> Self {
        Self {
            options,
            artifacts: None,
        }
    }

    /// Threshold currently in effect.
    pub fn threshold(&self) -> u8 {
        self.options.threshold
    }

    /// The configured options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Latest completed artifact set, or `None` before the first load.
    pub fn artifacts(&self) -> Option<&Arc<ArtifactSet>> {
        self.artifacts.as_ref()
    }

    /// Decode encoded image bytes with the configured dimension bound,
    /// then run the full chain.
    ///
    /// On any decode failure the previous artifact set stays in place.
    pub fn load_encoded(&mut self, bytes: &[u8]) -> Result<Arc<ArtifactSet>> {
        let original = mono_codec::decode_sampled_bytes(bytes, self.options.max_dimension)?;
        Ok(self.load_image(original))
    }

    /// Install an already decoded image and run binarize→pack→format
    /// with the current threshold.
    pub fn load_image(&mut self, original: RgbImage) -> Arc<ArtifactSet> {
        let (width, height) = original.dimensions();
        let set = Arc::new(ArtifactSet::compute(
            Arc::new(original),
            self.options.threshold,
            self.options.bytes_per_line,
        ));
        self.artifacts = Some(Arc::clone(&set));
        debug!(width, height, threshold = self.options.threshold, "Loaded image");
        set
    }

    /// Update the threshold.
    ///
    /// Values outside 0..=255 are rejected and nothing changes. Before
    /// any image has loaded only the stored value updates and `None` is
    /// returned; afterwards the chain re-runs against the retained
    /// original and the fresh artifact set is returned.
    pub fn set_threshold(&mut self, value: i64) -> Result<Option<Arc<ArtifactSet>>> {
        let threshold = u8::try_from(value).map_err(|_| {
            PipelineError::InvalidParameter(format!("threshold {value} is out of range 0-255"))
        })?;
        self.options.threshold = threshold;

        let Some(current) = &self.artifacts else {
            debug!(threshold, "Threshold stored, no image loaded yet");
            return Ok(None);
        };

        let set = Arc::new(ArtifactSet::compute(
            Arc::clone(&current.original),
            threshold,
            self.options.bytes_per_line,
        ));
        self.artifacts = Some(Arc::clone(&set));
        debug!(threshold, "Recomputed artifacts for new threshold");
        Ok(Some(set))
    }
}
