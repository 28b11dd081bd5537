//! The artifact set — one pipeline run's mutually consistent outputs.

use std::sync::Arc;

use mono_codec::{BinaryImage, GrayImage, PackedBitmap, RgbImage};

/// Outputs of one binarize→pack→format run over one source image.
///
/// A set is always published as a whole; readers never see a binary
/// image and a packed bitmap derived from different originals or
/// different thresholds.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    /// The decoded source image the run derived from.
    pub original: Arc<RgbImage>,

    /// Threshold the run used.
    pub threshold: u8,

    /// Black/white classification of `original`.
    pub binary: BinaryImage,

    /// MSB-first packed bits of `binary`.
    pub packed: PackedBitmap,

    /// Hex byte listing of `packed`.
    pub listing: String,
}

impl ArtifactSet {
    /// Run binarize→pack→format over `original` with `threshold`.
    pub(crate) fn compute(original: Arc<RgbImage>, threshold: u8, bytes_per_line: usize) -> Self {
        let binary = mono_codec::binarize(&original, threshold);
        let packed = mono_codec::pack(&binary);
        let listing = mono_codec::format_hex_listing(packed.data(), bytes_per_line);
        Self {
            original,
            threshold,
            binary,
            packed,
            listing,
        }
    }

    /// Grayscale rendering of the binarized image for preview display.
    pub fn preview(&self) -> GrayImage {
        self.binary.to_gray()
    }
}
