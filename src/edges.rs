//! Three-stage edge detection on 8-bit intensity images.
//!
//! 1. **Gradient**: 3x3 Sobel derivatives, L1 magnitude `|gx| + |gy|`. The
//!    `[1, 2, 1]` cross-axis weighting of each kernel is the only smoothing;
//!    a separate blur would erase per-pixel leaf texture.
//! 2. **Non-maximum suppression**: ridges thinned to one pixel along the
//!    quantized gradient direction
//! 3. **Hysteresis**: strong pixels seed edges that grow through 8-connected
//!    weak pixels
//!
//! Borders are replicated for filtering. The outermost pixel ring is never
//! reported as an edge.

use image::GrayImage;

use crate::mask::BinaryMask;

/// tan(22.5 deg), boundary between horizontal and diagonal sectors.
const TAN_22_5: f32 = 0.414_213_57;
/// tan(67.5 deg), boundary between diagonal and vertical sectors.
const TAN_67_5: f32 = 2.414_213_7;

/// Hysteresis thresholds on the gradient magnitude scale of 8-bit input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeThresholds {
    /// Magnitudes at or below this are never edges.
    pub low: f32,
    /// Magnitudes above this are always edges.
    pub high: f32,
}

impl Default for EdgeThresholds {
    fn default() -> Self {
        Self {
            low: 50.0,
            high: 150.0,
        }
    }
}

impl EdgeThresholds {
    /// Thresholds with `low <= high`, swapping if needed.
    #[must_use]
    pub fn ordered(self) -> Self {
        if self.high < self.low {
            Self {
                low: self.high,
                high: self.low,
            }
        } else {
            self
        }
    }
}

/// Per-pixel derivatives and their L1 magnitude.
struct Gradients {
    gx: Vec<f32>,
    gy: Vec<f32>,
    mag: Vec<f32>,
}

/// Detect edges in `gray`, returning a one-pixel-wide binary edge map.
#[must_use]
pub fn detect(gray: &GrayImage, thresholds: &EdgeThresholds) -> BinaryMask {
    let (width, height) = gray.dimensions();
    let (w, h) = (width as usize, height as usize);
    if w < 3 || h < 3 {
        return BinaryMask::new(width, height);
    }

    let data: Vec<f32> = gray.as_raw().iter().map(|&v| f32::from(v)).collect();
    let gradients = sobel(&data, w, h);
    let nms = non_max_suppression(&gradients, w, h);
    let t = thresholds.ordered();
    let edges = hysteresis(&nms, w, h, t.low, t.high);

    BinaryMask::from_fn(width, height, |x, y| edges[y as usize * w + x as usize])
}

/// 3x3 Sobel derivatives with replicated borders.
fn sobel(src: &[f32], w: usize, h: usize) -> Gradients {
    let n = w * h;
    let mut gx = vec![0.0_f32; n];
    let mut gy = vec![0.0_f32; n];
    let mut mag = vec![0.0_f32; n];

    for y in 0..h {
        let ym1 = y.saturating_sub(1);
        let yp1 = (y + 1).min(h - 1);
        for x in 0..w {
            let xm1 = x.saturating_sub(1);
            let xp1 = (x + 1).min(w - 1);

            let p00 = src[ym1 * w + xm1];
            let p01 = src[ym1 * w + x];
            let p02 = src[ym1 * w + xp1];
            let p10 = src[y * w + xm1];
            let p12 = src[y * w + xp1];
            let p20 = src[yp1 * w + xm1];
            let p21 = src[yp1 * w + x];
            let p22 = src[yp1 * w + xp1];

            let dx = (p02 + 2.0 * p12 + p22) - (p00 + 2.0 * p10 + p20);
            let dy = (p20 + 2.0 * p21 + p22) - (p00 + 2.0 * p01 + p02);

            let idx = y * w + x;
            gx[idx] = dx;
            gy[idx] = dy;
            mag[idx] = dx.abs() + dy.abs();
        }
    }

    Gradients { gx, gy, mag }
}

/// Keep only magnitudes that are local maxima across the edge.
///
/// Ties are broken toward the lower/left neighbour so a symmetric two-pixel
/// ridge keeps exactly one pixel.
fn non_max_suppression(g: &Gradients, w: usize, h: usize) -> Vec<f32> {
    let mut nms = vec![0.0_f32; w * h];

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let idx = y * w + x;
            let m = g.mag[idx];
            if m <= 0.0 {
                continue;
            }

            let (gxx, gyy) = (g.gx[idx], g.gy[idx]);
            let (ax, ay) = (gxx.abs(), gyy.abs());

            let (before, after) = if ay <= ax * TAN_22_5 {
                (idx - 1, idx + 1)
            } else if ay >= ax * TAN_67_5 {
                (idx - w, idx + w)
            } else if gxx * gyy > 0.0 {
                (idx - w - 1, idx + w + 1)
            } else {
                (idx - w + 1, idx + w - 1)
            };

            if m > g.mag[before] && m >= g.mag[after] {
                nms[idx] = m;
            }
        }
    }

    nms
}

/// Double-threshold edge tracking over 8-connected neighbourhoods.
///
/// Pixels above `high` are edges; pixels above `low` are edges only when
/// connected through such pixels to one above `high`.
fn hysteresis(nms: &[f32], w: usize, h: usize, low: f32, high: f32) -> Vec<bool> {
    let mut edges = vec![false; w * h];
    let mut stack: Vec<usize> = nms
        .iter()
        .enumerate()
        .filter(|&(_, &m)| m > high)
        .map(|(idx, _)| idx)
        .collect();
    for &idx in &stack {
        edges[idx] = true;
    }

    while let Some(idx) = stack.pop() {
        let (x, y) = (idx % w, idx / w);
        for ny in y.saturating_sub(1)..=(y + 1).min(h - 1) {
            for nx in x.saturating_sub(1)..=(x + 1).min(w - 1) {
                let nidx = ny * w + nx;
                if !edges[nidx] && nms[nidx] > low {
                    edges[nidx] = true;
                    stack.push(nidx);
                }
            }
        }
    }

    edges
}
