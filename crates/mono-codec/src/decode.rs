//! Sampled image decoding — a power-of-two pre-scale that bounds memory.
//!
//! The header is read first to learn the native dimensions without
//! touching pixel data. From those a halving factor is chosen, the
//! stream is rewound, and the image is decoded and subsampled in one
//! pass. The factor only bounds memory; it is not the final pipeline
//! resolution.

use std::io::{BufRead, Cursor, Seek, SeekFrom};

use image::imageops::{self, FilterType};
use image::{ImageReader, RgbImage};
use tracing::debug;

use crate::{CodecError, Result};

/// Compute the power-of-two sampling factor for a native image size.
///
/// Starts at 1 and doubles while both halved native dimensions divided
/// by the factor stay at or above `max_dimension`. The decoded size
/// `native / factor` is therefore the smallest power-of-two downscale
/// still at least `max_dimension` on both axes.
///
/// # Panics
/// Panics if `max_dimension` is zero.
pub fn sample_factor(native_width: u32, native_height: u32, max_dimension: u32) -> u32 {
    assert!(max_dimension > 0, "max_dimension must be positive");

    let mut factor = 1u32;
    if native_width > max_dimension || native_height > max_dimension {
        let half_width = native_width / 2;
        let half_height = native_height / 2;
        while half_height / factor >= max_dimension && half_width / factor >= max_dimension {
            factor *= 2;
        }
    }
    factor
}

/// Decode an image from a seekable byte source, downsampling by the
/// factor chosen by [`sample_factor`].
///
/// The reader is consumed: it is read once for the header, rewound, and
/// read again for pixel data, then dropped on every exit path.
pub fn decode_sampled<R: BufRead + Seek>(mut reader: R, max_dimension: u32) -> Result<RgbImage> {
    if max_dimension == 0 {
        return Err(CodecError::InvalidParameter("max_dimension must be positive"));
    }

    // Header pass: dimensions only, no pixel decode.
    let (native_width, native_height) = ImageReader::new(&mut reader)
        .with_guessed_format()
        .map_err(CodecError::Stream)?
        .into_dimensions()
        .map_err(CodecError::Header)?;

    let factor = sample_factor(native_width, native_height, max_dimension);
    let target_width = (native_width / factor).max(1);
    let target_height = (native_height / factor).max(1);

    // The full-resolution decode is the peak allocation. Probe it up
    // front so an oversized image surfaces as an error instead of an
    // allocator abort.
    let native_bytes = (native_width as usize)
        .checked_mul(native_height as usize)
        .and_then(|pixels| pixels.checked_mul(3))
        .ok_or(CodecError::OutOfResources)?;
    let mut probe: Vec<u8> = Vec::new();
    probe
        .try_reserve_exact(native_bytes)
        .map_err(|_| CodecError::OutOfResources)?;
    drop(probe);

    // Pixel pass: rewind and decode in full, then subsample.
    reader.seek(SeekFrom::Start(0)).map_err(CodecError::Stream)?;
    let decoded = ImageReader::new(reader)
        .with_guessed_format()
        .map_err(CodecError::Stream)?
        .decode()
        .map_err(CodecError::Pixels)?
        .into_rgb8();

    let sampled = if factor == 1 {
        decoded
    } else {
        // Nearest-neighbor at native/factor picks every factor-th pixel,
        // matching a subsampled decode.
        imageops::resize(&decoded, target_width, target_height, FilterType::Nearest)
    };

    debug!(
        native_width,
        native_height,
        factor,
        width = sampled.width(),
        height = sampled.height(),
        "Decoded image with sampling"
    );
    Ok(sampled)
}

/// Decode an image held in memory. See [`decode_sampled`].
pub fn decode_sampled_bytes(bytes: &[u8], max_dimension: u32) -> Result<RgbImage> {
    decode_sampled(Cursor::new(bytes), max_dimension)
}
