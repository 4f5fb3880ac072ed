//! Decoding of encoded image buffers into RGB pixel grids.

use image::RgbImage;

use crate::error::{Error, Result};

/// Decode a self-describing image buffer (JPEG, PNG, WebP, BMP, ...) into RGB8.
///
/// Alpha is dropped and grayscale is expanded to three channels.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a recognizable encoding and
/// [`Error::EmptyImage`] if the decoded image has no pixels.
pub fn decode(bytes: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(bytes)?.to_rgb8();
    if img.width() == 0 || img.height() == 0 {
        return Err(Error::EmptyImage);
    }
    Ok(img)
}
