//! Monochrome bitmap encoding for small LCD and e-paper modules.
//!
//! Provides sampled decoding (power-of-two pre-scale to bound memory),
//! luminance thresholding, MSB-first 1-bit packing, and hex byte-listing
//! rendering for embedding bitmaps in display driver source.

pub mod binarize;
pub mod decode;
pub mod hex;
pub mod pack;

// Re-exports for convenience
pub use binarize::{BinaryImage, binarize, luminance};
pub use decode::{decode_sampled, decode_sampled_bytes, sample_factor};
pub use hex::{format_hex_listing, parse_hex_listing};
pub use pack::{PackedBitmap, pack};

/// Re-export of the color buffer type produced by the decoder.
pub use image::RgbImage;

/// Re-export of the grayscale buffer type used for binarized previews.
pub use image::GrayImage;

/// Default binarization threshold.
pub const DEFAULT_THRESHOLD: u8 = 128;

/// Default upper bound on decoded image dimensions.
pub const DEFAULT_MAX_DIMENSION: u32 = 1024;

/// Default number of bytes per line in a formatted listing.
pub const DEFAULT_BYTES_PER_LINE: usize = 16;

/// Errors that can occur during decoding or listing operations.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("could not read image stream: {0}")]
    Stream(#[from] std::io::Error),

    #[error("could not parse image header: {0}")]
    Header(image::ImageError),

    #[error("could not decode image pixels: {0}")]
    Pixels(image::ImageError),

    #[error("image is too large to hold in memory")]
    OutOfResources,

    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    #[error("malformed hex listing at entry {index}: {token:?}")]
    Listing { index: usize, token: String },
}

/// Result type alias for codec operations.
pub type Result<T> = std::result::Result<T, CodecError>;
