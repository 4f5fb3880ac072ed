//! Single-channel intensity for edge detection.

use image::{GrayImage, Luma, RgbImage};

/// Convert an RGB image to 8-bit intensity.
///
/// Uses the luminance formula `0.299*R + 0.587*G + 0.114*B` without gamma
/// correction, rounded to the nearest integer.
#[must_use]
pub fn to_luma(img: &RgbImage) -> GrayImage {
    GrayImage::from_fn(img.width(), img.height(), |x, y| {
        let px = img.get_pixel(x, y);
        let lum = 0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = lum.round().clamp(0.0, 255.0) as u8;
        Luma([value])
    })
}
