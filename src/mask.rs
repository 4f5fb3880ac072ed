//! Binary masks shared by every pipeline stage.

use image::{GrayImage, Luma};

use crate::error::{Error, Result};

/// Foreground value stored in a mask.
pub const ON: u8 = 255;
/// Background value stored in a mask.
pub const OFF: u8 = 0;

/// A width x height mask whose pixels are either [`ON`] or [`OFF`].
///
/// Masks are produced by pure functions and are not mutated once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryMask {
    inner: GrayImage,
}

impl BinaryMask {
    /// An all-background mask.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            inner: GrayImage::new(width, height),
        }
    }

    /// Build a mask by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> bool) -> Self {
        Self {
            inner: GrayImage::from_fn(width, height, |x, y| {
                Luma([if f(x, y) { ON } else { OFF }])
            }),
        }
    }

    /// Build a mask from row-major foreground flags.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if `flags` does not hold `width * height` entries.
    pub fn from_flags(width: u32, height: u32, flags: &[bool]) -> Result<Self> {
        let data: Vec<u8> = flags.iter().map(|&f| if f { ON } else { OFF }).collect();
        GrayImage::from_raw(width, height, data)
            .map(|inner| Self { inner })
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "{} mask values do not fill a {width}x{height} mask",
                    flags.len()
                ))
            })
    }

    /// Mask width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.inner.width()
    }

    /// Mask height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.inner.height()
    }

    /// `(width, height)`.
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.inner.dimensions()
    }

    /// Whether the pixel at `(x, y)` is foreground. Out-of-bounds reads are background.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.inner
            .get_pixel_checked(x, y)
            .is_some_and(|p| p[0] != OFF)
    }

    /// Row-major raw values.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.inner.as_raw()
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn count_nonzero(&self) -> u64 {
        self.inner.as_raw().iter().filter(|&&v| v != OFF).count() as u64
    }

    /// Pixelwise logical AND.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DimensionMismatch`] if the masks differ in size.
    pub fn and(&self, other: &Self) -> Result<Self> {
        if self.dimensions() != other.dimensions() {
            return Err(Error::DimensionMismatch {
                left: self.dimensions(),
                right: other.dimensions(),
            });
        }
        let (width, height) = self.dimensions();
        Ok(Self::from_fn(width, height, |x, y| {
            self.get(x, y) && other.get(x, y)
        }))
    }

    /// Borrow the mask as a grayscale image (0 / 255).
    #[must_use]
    pub fn as_image(&self) -> &GrayImage {
        &self.inner
    }

    /// Consume the mask, returning the grayscale image (0 / 255).
    #[must_use]
    pub fn into_image(self) -> GrayImage {
        self.inner
    }
}
