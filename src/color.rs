//! HSV color classification of vegetation candidates.
//!
//! Hue uses the half-range scale (`0..=179`, degrees / 2) so the whole
//! triple fits in 8 bits. Saturation and value are on `0..=255`.

use std::ops::RangeInclusive;

use image::{Rgb, RgbImage};

use crate::mask::BinaryMask;

/// A pixel in half-range HSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hsv {
    /// Hue, `0..=179`.
    pub h: u8,
    /// Saturation, `0..=255`.
    pub s: u8,
    /// Value, `0..=255`.
    pub v: u8,
}

/// Inclusive HSV bounds a pixel must fall within to count as vegetation-colored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvRange {
    /// Accepted hue band.
    pub hue: RangeInclusive<u8>,
    /// Accepted saturation band.
    pub saturation: RangeInclusive<u8>,
    /// Accepted value band.
    pub value: RangeInclusive<u8>,
}

impl Default for HsvRange {
    /// Yellow-green through cyan-green, rejecting near-gray and near-black pixels.
    fn default() -> Self {
        Self {
            hue: 25..=90,
            saturation: 50..=255,
            value: 50..=255,
        }
    }
}

impl HsvRange {
    /// Whether `hsv` lies inside all three bands.
    #[must_use]
    pub fn contains(&self, hsv: Hsv) -> bool {
        self.hue.contains(&hsv.h)
            && self.saturation.contains(&hsv.s)
            && self.value.contains(&hsv.v)
    }
}

/// Convert one RGB pixel to half-range HSV.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rgb_to_hsv(px: Rgb<u8>) -> Hsv {
    let [r, g, b] = px.0;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let chroma = f64::from(max - min);

    let s = if max == 0 {
        0.0
    } else {
        (255.0 * chroma / f64::from(max)).round()
    };

    let (r, g, b) = (f64::from(r), f64::from(g), f64::from(b));
    let mut degrees = if max == min {
        0.0
    } else if r >= g && r >= b {
        60.0 * (g - b) / chroma
    } else if g >= b {
        120.0 + 60.0 * (b - r) / chroma
    } else {
        240.0 + 60.0 * (r - g) / chroma
    };
    if degrees < 0.0 {
        degrees += 360.0;
    }
    let mut h = (degrees / 2.0).round();
    if h >= 180.0 {
        h -= 180.0;
    }

    Hsv {
        h: h as u8,
        s: s as u8,
        v: max,
    }
}

/// Threshold `img` into a mask of vegetation-colored pixels.
#[must_use]
pub fn classify(img: &RgbImage, range: &HsvRange) -> BinaryMask {
    BinaryMask::from_fn(img.width(), img.height(), |x, y| {
        range.contains(rgb_to_hsv(*img.get_pixel(x, y)))
    })
}
