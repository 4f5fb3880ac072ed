//! Binary dilation with square structuring elements.
//!
//! Pixels are treated as foreground when non-zero. Neighbours outside the
//! image are ignored, so dilation never invents foreground from the border.

use crate::error::{Error, Result};
use crate::mask::BinaryMask;

/// Structuring element and repetition count for the edge expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DilationParams {
    /// Side length of the all-ones square kernel. Must be odd.
    pub size: u32,
    /// Number of dilation passes.
    pub iterations: u32,
}

impl Default for DilationParams {
    /// A 5x5 kernel applied twice, wide enough to bridge neighbouring leaf edges.
    fn default() -> Self {
        Self {
            size: 5,
            iterations: 2,
        }
    }
}

impl DilationParams {
    /// Check that the kernel has a centre pixel.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] for zero or even kernel sizes.
    pub fn validate(&self) -> Result<()> {
        if self.size == 0 || self.size % 2 == 0 {
            return Err(Error::InvalidConfig(format!(
                "dilation kernel size must be odd and positive, got {}",
                self.size
            )));
        }
        Ok(())
    }
}

/// Dilate `mask` with a `size` x `size` all-ones kernel, `iterations` times.
///
/// # Errors
///
/// Returns [`Error::InvalidConfig`] if the kernel size is zero or even.
pub fn dilate(mask: &BinaryMask, params: &DilationParams) -> Result<BinaryMask> {
    params.validate()?;
    let radius = (params.size / 2) as usize;
    let (width, height) = mask.dimensions();
    let (w, h) = (width as usize, height as usize);

    let mut current: Vec<bool> = mask.as_raw().iter().map(|&v| v != 0).collect();
    if radius > 0 && w > 0 && h > 0 {
        for _ in 0..params.iterations {
            current = dilate_square(&current, w, h, radius);
        }
    }

    BinaryMask::from_flags(width, height, &current)
}

/// One pass of a square max filter, done as a row pass followed by a column pass.
fn dilate_square(src: &[bool], w: usize, h: usize, r: usize) -> Vec<bool> {
    let mut rows = vec![false; w * h];
    for y in 0..h {
        let row = &src[y * w..(y + 1) * w];
        for x in 0..w {
            let lo = x.saturating_sub(r);
            let hi = (x + r).min(w - 1);
            rows[y * w + x] = row[lo..=hi].iter().any(|&v| v);
        }
    }

    let mut out = vec![false; w * h];
    for y in 0..h {
        let lo = y.saturating_sub(r);
        let hi = (y + r).min(h - 1);
        for x in 0..w {
            out[y * w + x] = (lo..=hi).any(|ny| rows[ny * w + x]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_pixel(w: u32, h: u32, px: u32, py: u32) -> BinaryMask {
        BinaryMask::from_fn(w, h, |x, y| x == px && y == py)
    }

    #[test]
    fn single_pass_grows_to_kernel_square() {
        let mask = single_pixel(11, 11, 5, 5);
        let params = DilationParams {
            size: 5,
            iterations: 1,
        };
        let out = dilate(&mask, &params).unwrap();
        assert_eq!(out.count_nonzero(), 25);
        assert!(out.get(3, 3));
        assert!(out.get(7, 7));
        assert!(!out.get(2, 5));
        assert!(!out.get(8, 5));
    }

    #[test]
    fn two_passes_of_5x5_match_one_9x9() {
        let mask = single_pixel(21, 21, 10, 10);
        let twice = dilate(&mask, &DilationParams::default()).unwrap();
        let once = dilate(
            &mask,
            &DilationParams {
                size: 9,
                iterations: 1,
            },
        )
        .unwrap();
        assert_eq!(twice, once);
        assert_eq!(twice.count_nonzero(), 81);
    }

    #[test]
    fn border_pixels_are_clipped() {
        let mask = single_pixel(10, 10, 0, 0);
        let params = DilationParams {
            size: 5,
            iterations: 1,
        };
        let out = dilate(&mask, &params).unwrap();
        assert_eq!(out.count_nonzero(), 9);
    }

    #[test]
    fn empty_mask_stays_empty() {
        let mask = BinaryMask::new(16, 9);
        let out = dilate(&mask, &DilationParams::default()).unwrap();
        assert_eq!(out.count_nonzero(), 0);
        assert_eq!(out.dimensions(), (16, 9));
    }

    #[test]
    fn identity_cases_copy_input() {
        let mask = BinaryMask::from_fn(6, 6, |x, y| (x + y) % 3 == 0);
        let unit = DilationParams {
            size: 1,
            iterations: 4,
        };
        assert_eq!(dilate(&mask, &unit).unwrap(), mask);
        let none = DilationParams {
            size: 5,
            iterations: 0,
        };
        assert_eq!(dilate(&mask, &none).unwrap(), mask);
    }

    #[test]
    fn even_kernel_is_rejected() {
        let mask = BinaryMask::new(4, 4);
        let params = DilationParams {
            size: 4,
            iterations: 1,
        };
        assert!(matches!(
            dilate(&mask, &params),
            Err(Error::InvalidConfig(_))
        ));
    }
}
