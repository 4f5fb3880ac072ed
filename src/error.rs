//! Error types for the hyacinth-coverage crate.

/// Errors that can occur while estimating coverage.
///
/// None of these cross the [`analyze`](crate::analyze) boundary; they exist so
/// callers of [`CoverageEngine::estimate`](crate::CoverageEngine::estimate) can
/// tell "analyzed as zero" apart from "could not analyze".
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input bytes are not a recognizable image encoding.
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    /// The decoded image has no pixels.
    #[error("decoded image is empty")]
    EmptyImage,

    /// The image is too small to carry gradient information.
    #[error("image too small ({width}x{height}), need at least {min}x{min}")]
    ImageTooSmall {
        /// Image width in pixels.
        width: u32,
        /// Image height in pixels.
        height: u32,
        /// Minimum accepted side length.
        min: u32,
    },

    /// Two masks that must be combined have different dimensions.
    #[error("mask dimensions differ: {left:?} vs {right:?}")]
    DimensionMismatch {
        /// `(width, height)` of the left operand.
        left: (u32, u32),
        /// `(width, height)` of the right operand.
        right: (u32, u32),
    },

    /// An analysis option is out of its valid range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An I/O error occurred while reading files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;
