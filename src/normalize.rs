//! Width normalization with area-averaging downsampling.
//!
//! Oversized photos are shrunk so the widest side fed to the classifiers is
//! bounded. Each destination pixel is the mean of the source area it covers,
//! with partially covered source pixels weighted by their overlap.

use image::{Rgb, RgbImage};

/// Default maximum width after normalization.
pub const DEFAULT_MAX_WIDTH: u32 = 1000;

/// Target dimensions for an image of `width` x `height` capped at `max_width`.
///
/// Returns the input dimensions when no resize is needed.
#[must_use]
pub fn target_dimensions(width: u32, height: u32, max_width: u32) -> (u32, u32) {
    if width <= max_width || max_width == 0 {
        return (width, height);
    }
    let scale = f64::from(max_width) / f64::from(width);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let new_height = (f64::from(height) * scale).round().max(1.0) as u32;
    (max_width, new_height)
}

/// Cap the width of `img` at `max_width`, preserving aspect ratio.
///
/// Images already within bounds are returned unchanged.
#[must_use]
pub fn normalize(img: RgbImage, max_width: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    let (new_width, new_height) = target_dimensions(width, height, max_width);
    if (new_width, new_height) == (width, height) {
        return img;
    }
    log::debug!("resizing {width}x{height} -> {new_width}x{new_height}");
    resize_area(&img, new_width, new_height)
}

/// Overlap weights of source cells for each destination cell along one axis.
///
/// Entry `d` lists `(source_index, weight)` pairs whose weights sum to the
/// source-per-destination ratio.
fn area_weights(src_len: u32, dst_len: u32) -> Vec<Vec<(usize, f64)>> {
    let ratio = f64::from(src_len) / f64::from(dst_len);
    (0..dst_len)
        .map(|d| {
            let start = f64::from(d) * ratio;
            let end = (start + ratio).min(f64::from(src_len));
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let first = start.floor() as usize;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let last = (end.ceil() as usize).min(src_len as usize);
            (first..last)
                .filter_map(|s| {
                    #[allow(clippy::cast_precision_loss)]
                    let cell = s as f64;
                    let overlap = (cell + 1.0).min(end) - cell.max(start);
                    (overlap > 1e-9).then_some((s, overlap))
                })
                .collect()
        })
        .collect()
}

/// Area-averaging resample of `src` to `dst_width` x `dst_height`.
///
/// Intended for shrinking. Works one output row at a time, so scratch memory
/// is a single row of `dst_width` accumulators.
#[must_use]
pub fn resize_area(src: &RgbImage, dst_width: u32, dst_height: u32) -> RgbImage {
    let (src_width, src_height) = src.dimensions();
    if dst_width == 0 || dst_height == 0 || src_width == 0 || src_height == 0 {
        return RgbImage::new(dst_width, dst_height);
    }

    let x_weights = area_weights(src_width, dst_width);
    let y_weights = area_weights(src_height, dst_height);
    let x_norm = f64::from(src_width) / f64::from(dst_width);
    let y_norm = f64::from(src_height) / f64::from(dst_height);

    // One destination row at a time: only a single accumulator row is live.
    let dw = dst_width as usize;
    let mut dst = RgbImage::new(dst_width, dst_height);
    let mut acc = vec![[0.0_f64; 3]; dw];
    let area = x_norm * y_norm;
    for (dy, weights) in y_weights.iter().enumerate() {
        acc.fill([0.0; 3]);
        for &(sy, wy) in weights {
            #[allow(clippy::cast_possible_truncation)]
            let row_y = sy as u32;
            for (cell, x_cells) in acc.iter_mut().zip(&x_weights) {
                for &(sx, wx) in x_cells {
                    #[allow(clippy::cast_possible_truncation)]
                    let px = src.get_pixel(sx as u32, row_y);
                    for (value, &channel) in cell.iter_mut().zip(px.0.iter()) {
                        *value += wx * wy * f64::from(channel);
                    }
                }
            }
        }
        for (dx, &cell) in acc.iter().enumerate() {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let px = Rgb(cell.map(|a| (a / area).round().clamp(0.0, 255.0) as u8));
            #[allow(clippy::cast_possible_truncation)]
            let (x, y) = (dx as u32, dy as u32);
            dst.put_pixel(x, y, px);
        }
    }
    dst
}
