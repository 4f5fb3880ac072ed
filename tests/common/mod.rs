//! Synthetic image helpers shared by the integration tests.

#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage};

/// Deterministic xorshift generator so synthetic textures are reproducible.
pub struct XorShift(u64);

impl XorShift {
    pub fn new(seed: u64) -> Self {
        Self(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform value in `lo..=hi`.
    pub fn range(&mut self, lo: u8, hi: u8) -> u8 {
        let span = u64::from(hi - lo) + 1;
        lo + (self.next_u64() % span) as u8
    }
}

/// A leaf-like green pixel: strong green channel, weak red and blue.
pub fn textured_green(rng: &mut XorShift) -> Rgb<u8> {
    Rgb([rng.range(0, 20), rng.range(70, 255), rng.range(0, 20)])
}

/// A pixel of the canonical leaf fixture: green 150-254, red and blue 0-49.
pub fn leaf_green(rng: &mut XorShift) -> Rgb<u8> {
    Rgb([rng.range(0, 49), rng.range(150, 254), rng.range(0, 49)])
}

/// 100x100 image with leaf texture on the top half and black below.
pub fn half_leaf_fixture(seed: u64) -> RgbImage {
    let mut rng = XorShift::new(seed);
    RgbImage::from_fn(100, 100, |_, y| {
        if y < 50 {
            leaf_green(&mut rng)
        } else {
            Rgb([0, 0, 0])
        }
    })
}

pub fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img.clone())
        .write_to(&mut buf, format)
        .unwrap();
    buf.into_inner()
}

pub fn png(img: &RgbImage) -> Vec<u8> {
    encode(img, ImageFormat::Png)
}
