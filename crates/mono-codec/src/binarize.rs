//! Luminance thresholding — converting color images to black-and-white.

use image::{GrayImage, RgbImage};
use tracing::debug;

/// A black-and-white image, one value per pixel (`true` = black).
///
/// Pixels are stored row-major; the length always equals width × height.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryImage {
    width: u32,
    height: u32,
    pixels: Vec<bool>,
}

impl BinaryImage {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height) pair.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Whether the pixel at (x, y) is black.
    ///
    /// # Panics
    /// Panics if (x, y) is outside the image bounds.
    pub fn get(&self, x: u32, y: u32) -> bool {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) out of bounds for {}x{} image",
            self.width,
            self.height
        );
        self.pixels[(y * self.width + x) as usize]
    }

    /// Row-major pixel values.
    pub fn pixels(&self) -> &[bool] {
        &self.pixels
    }

    /// Number of black pixels.
    pub fn count_black(&self) -> usize {
        self.pixels.iter().filter(|&&black| black).count()
    }

    /// Render as a grayscale image (black = 0, white = 255) for preview.
    pub fn to_gray(&self) -> GrayImage {
        GrayImage::from_fn(self.width, self.height, |x, y| {
            if self.get(x, y) {
                image::Luma([0])
            } else {
                image::Luma([255])
            }
        })
    }
}

/// Luminance of an RGB triple using ITU-R BT.601 weights, rounded to
/// the nearest integer.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)).round() as u8
}

/// Convert a color image to black-and-white with a luminance threshold.
///
/// A pixel is black when its luminance is at or below `threshold`;
/// strictly brighter pixels are white.
pub fn binarize(src: &RgbImage, threshold: u8) -> BinaryImage {
    let (width, height) = src.dimensions();
    debug!(width, height, threshold, "Binarizing image");

    let pixels = src
        .pixels()
        .map(|p| luminance(p.0[0], p.0[1], p.0[2]) <= threshold)
        .collect();

    BinaryImage {
        width,
        height,
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    /// Create a 16x1 horizontal gray ramp (0, 17, 34, ... 255).
    fn create_ramp_image() -> RgbImage {
        RgbImage::from_fn(16, 1, |x, _| {
            let v = (x * 17) as u8;
            Rgb([v, v, v])
        })
    }

    #[test]
    fn test_luminance_weights() {
        assert_eq!(luminance(255, 0, 0), 76);
        assert_eq!(luminance(0, 255, 0), 150);
        assert_eq!(luminance(0, 0, 255), 29);
        assert_eq!(luminance(255, 255, 255), 255);
        assert_eq!(luminance(0, 0, 0), 0);
        // Gray pixels map to their own value
        assert_eq!(luminance(128, 128, 128), 128);
    }

    #[test]
    fn test_equal_luminance_is_black() {
        let img = RgbImage::from_pixel(1, 1, Rgb([100, 100, 100]));

        // Exactly at the threshold -> black
        assert!(binarize(&img, 100).get(0, 0));
        // One below the pixel value -> white
        assert!(!binarize(&img, 99).get(0, 0));
    }

    #[test]
    fn test_threshold_zero_keeps_only_pure_black() {
        let mut img = RgbImage::from_pixel(3, 1, Rgb([0, 0, 0]));
        img.put_pixel(1, 0, Rgb([1, 1, 1]));
        img.put_pixel(2, 0, Rgb([255, 255, 255]));

        let result = binarize(&img, 0);
        assert!(result.get(0, 0));
        assert!(!result.get(1, 0));
        assert!(!result.get(2, 0));
    }

    #[test]
    fn test_threshold_max_makes_everything_black() {
        let img = create_ramp_image();
        let result = binarize(&img, 255);
        assert_eq!(result.count_black(), 16);
    }

    #[test]
    fn test_black_count_monotonic_in_threshold() {
        let img = create_ramp_image();
        let mut previous = 0usize;
        for threshold in 0..=255u16 {
            let count = binarize(&img, threshold as u8).count_black();
            assert!(
                count >= previous,
                "black count dropped from {previous} to {count} at threshold {threshold}"
            );
            previous = count;
        }
    }

    #[test]
    fn test_binarize_is_pure() {
        let img = create_ramp_image();
        let first = binarize(&img, 128);
        let second = binarize(&img, 128);
        assert_eq!(first, second);
    }

    #[test]
    fn test_binarize_preserves_dimensions() {
        let img = RgbImage::new(7, 3);
        let result = binarize(&img, 128);
        assert_eq!(result.dimensions(), (7, 3));
        assert_eq!(result.pixels().len(), 21);
    }

    #[test]
    fn test_to_gray_inverts_black_flag() {
        let mut img = RgbImage::from_pixel(2, 1, Rgb([255, 255, 255]));
        img.put_pixel(1, 0, Rgb([0, 0, 0]));

        let gray = binarize(&img, 128).to_gray();
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(1, 0).0[0], 0);
    }
}
