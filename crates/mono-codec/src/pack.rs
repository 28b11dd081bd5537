//! Packing binary images into row-aligned, MSB-first bitstreams.

use tracing::debug;

use crate::binarize::BinaryImage;

/// A row-major 1-bit-per-pixel bitmap with byte-aligned rows.
///
/// The bit for pixel (x, y) lives in byte `y * bytes_per_row + x / 8`
/// at position `7 - (x % 8)`; a set bit means black. Rows whose width
/// is not a multiple of 8 are padded with zero bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedBitmap {
    width: u32,
    height: u32,
    bytes_per_row: usize,
    data: Vec<u8>,
}

impl PackedBitmap {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of bytes covering one row of pixels.
    pub fn bytes_per_row(&self) -> usize {
        self.bytes_per_row
    }

    /// The packed bytes, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the bitmap and return its packed bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Whether the bit for pixel (x, y) is set.
    ///
    /// # Panics
    /// Panics if (x, y) is outside the bitmap bounds.
    pub fn bit(&self, x: u32, y: u32) -> bool {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} bitmap",
            self.width,
            self.height
        );
        let byte = self.data[y as usize * self.bytes_per_row + x as usize / 8];
        byte & (0x80 >> (x % 8)) != 0
    }
}

/// Pack a binary image into one bit per pixel, rows padded to whole bytes.
///
/// Black pixels set their bit to 1; the buffer starts zeroed, so white
/// pixels and row padding stay 0.
pub fn pack(src: &BinaryImage) -> PackedBitmap {
    let (width, height) = src.dimensions();
    let bytes_per_row = (width as usize).div_ceil(8);
    let mut data = vec![0u8; bytes_per_row * height as usize];

    for y in 0..height {
        for x in 0..width {
            if src.get(x, y) {
                data[y as usize * bytes_per_row + x as usize / 8] |= 0x80 >> (x % 8);
            }
        }
    }

    debug!(width, height, bytes_per_row, "Packed binary image");
    PackedBitmap {
        width,
        height,
        bytes_per_row,
        data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binarize::binarize;
    use image::{Rgb, RgbImage};

    const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
    const BLACK: Rgb<u8> = Rgb([0, 0, 0]);

    /// Binarize a color image with the default threshold and pack it.
    fn pack_image(img: &RgbImage) -> PackedBitmap {
        pack(&binarize(img, 128))
    }

    #[test]
    fn test_checker_2x2() {
        let mut img = RgbImage::from_pixel(2, 2, WHITE);
        img.put_pixel(1, 0, BLACK);
        img.put_pixel(0, 1, BLACK);

        let packed = pack_image(&img);
        assert_eq!(packed.bytes_per_row(), 1);
        assert_eq!(packed.data(), &[0x40, 0x80]);
    }

    #[test]
    fn test_bytes_per_row_rounds_up() {
        for (width, expected) in [(1u32, 1usize), (7, 1), (8, 1), (9, 2), (16, 2), (17, 3)] {
            let img = RgbImage::from_pixel(width, 1, WHITE);
            assert_eq!(
                pack_image(&img).bytes_per_row(),
                expected,
                "width {width}"
            );
        }
    }

    #[test]
    fn test_row_padding_bits_stay_zero() {
        // 10 pixels wide, all black: second byte of each row keeps its
        // six padding bits clear.
        let img = RgbImage::from_pixel(10, 3, BLACK);
        let packed = pack_image(&img);

        assert_eq!(packed.bytes_per_row(), 2);
        for y in 0..3usize {
            assert_eq!(packed.data()[y * 2], 0xFF);
            assert_eq!(packed.data()[y * 2 + 1], 0b1100_0000);
        }
    }

    #[test]
    fn test_all_white_packs_to_zeroes() {
        let img = RgbImage::from_pixel(16, 4, WHITE);
        let packed = pack_image(&img);
        assert!(packed.data().iter().all(|&b| b == 0));
        assert_eq!(packed.data().len(), 8);
    }

    #[test]
    fn test_bit_accessor_matches_source() {
        let mut img = RgbImage::from_pixel(9, 2, WHITE);
        img.put_pixel(0, 0, BLACK);
        img.put_pixel(8, 0, BLACK);
        img.put_pixel(4, 1, BLACK);

        let binary = binarize(&img, 128);
        let packed = pack(&binary);
        for y in 0..2 {
            for x in 0..9 {
                assert_eq!(packed.bit(x, y), binary.get(x, y), "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn test_msb_first_within_byte() {
        let mut img = RgbImage::from_pixel(8, 1, WHITE);
        img.put_pixel(0, 0, BLACK);

        let packed = pack_image(&img);
        assert_eq!(packed.data(), &[0x80]);
    }
}
