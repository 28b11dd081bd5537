//! Pipeline configuration options.

use mono_codec::{DEFAULT_BYTES_PER_LINE, DEFAULT_MAX_DIMENSION, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};

/// Configuration for a pipeline instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Binarization threshold. Pixels with luminance at or below it are
    /// black.
    pub threshold: u8,

    /// Upper bound handed to the sampled decoder.
    pub max_dimension: u32,

    /// Bytes per line in the formatted listing.
    pub bytes_per_line: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            max_dimension: DEFAULT_MAX_DIMENSION,
            bytes_per_line: DEFAULT_BYTES_PER_LINE,
        }
    }
}

impl PipelineOptions {
    /// Create options with the standard defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set the binarization threshold.
    pub fn with_threshold(mut self, val: u8) -> Self {
        self.threshold = val;
        self
    }

    /// Builder: set the decoder dimension bound.
    ///
    /// # Panics
    /// Panics if `val` is zero.
    pub fn with_max_dimension(mut self, val: u32) -> Self {
        assert!(val > 0, "max_dimension must be positive, got {val}");
        self.max_dimension = val;
        self
    }

    /// Builder: set the listing line width in bytes.
    ///
    /// # Panics
    /// Panics if `val` is zero.
    pub fn with_bytes_per_line(mut self, val: usize) -> Self {
        assert!(val > 0, "bytes_per_line must be positive, got {val}");
        self.bytes_per_line = val;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let opts = PipelineOptions::default();
        assert_eq!(opts.threshold, 128);
        assert_eq!(opts.max_dimension, 1024);
        assert_eq!(opts.bytes_per_line, 16);
    }

    #[test]
    fn test_builder_chain() {
        let opts = PipelineOptions::new()
            .with_threshold(64)
            .with_max_dimension(250)
            .with_bytes_per_line(8);

        assert_eq!(opts.threshold, 64);
        assert_eq!(opts.max_dimension, 250);
        assert_eq!(opts.bytes_per_line, 8);
    }

    #[test]
    #[should_panic(expected = "max_dimension must be positive")]
    fn test_zero_max_dimension_panics() {
        PipelineOptions::new().with_max_dimension(0);
    }

    #[test]
    #[should_panic(expected = "bytes_per_line must be positive")]
    fn test_zero_bytes_per_line_panics() {
        PipelineOptions::new().with_bytes_per_line(0);
    }

    #[test]
    fn test_serde_round_trip() {
        let opts = PipelineOptions::new().with_threshold(200).with_bytes_per_line(12);
        let json = serde_json::to_string(&opts).unwrap();
        let back: PipelineOptions = serde_json::from_str(&json).unwrap();
        assert_eq!(back, opts);
    }
}
