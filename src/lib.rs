//! Estimate water-hyacinth surface coverage from a single photograph.
//!
//! A pixel counts as plant coverage when it is both vegetation-colored and
//! inside a region with edge evidence. Smooth green surfaces such as algae
//! film, reflections or painted backgrounds match the color band but carry
//! no edges, so they are excluded.
//!
//! # Quick Start
//!
//! ```no_run
//! let bytes = std::fs::read("pond.jpg").unwrap();
//! let percent = hyacinth_coverage::analyze(&bytes);
//! assert!((0.0..=100.0).contains(&percent));
//! ```
//!
//! # Pipeline
//!
//! 1. [`decode`](decode::decode) the buffer into RGB8
//! 2. [`normalize`](normalize::normalize) the width to at most 1000 pixels
//! 3. [`classify`](color::classify) pixels inside the HSV vegetation band
//! 4. reduce to [`luma`](luma::to_luma) and [`detect`](edges::detect) edges
//! 5. [`dilate`](morphology::dilate) the edges into blobs
//! 6. intersect with the color mask and reduce to a [`Coverage`]
//!
//! [`analyze`] never fails: any error collapses to `0.0`. Use
//! [`CoverageEngine::estimate`] to see the error instead.
//!
//! ```no_run
//! use hyacinth_coverage::{AnalysisOptions, CoverageEngine};
//!
//! let engine = CoverageEngine::new(AnalysisOptions::default()).expect("valid options");
//! let bytes = std::fs::read("pond.jpg").unwrap();
//! match engine.estimate(&bytes) {
//!     Ok(report) => println!("coverage: {}", report.coverage),
//!     Err(e) => eprintln!("could not analyze: {e}"),
//! }
//! ```
//!
//! Diagnostics go through the [`log`] facade; install any logger to see them.

#![deny(missing_docs)]

pub mod color;
pub mod coverage;
pub mod decode;
pub mod edges;
mod engine;
pub mod error;
pub mod luma;
pub mod mask;
pub mod morphology;
pub mod normalize;

pub use color::{Hsv, HsvRange};
pub use coverage::{Coverage, FallbackPolicy};
pub use edges::EdgeThresholds;
pub use engine::{
    is_supported_image, AnalysisOptions, CoverageEngine, CoverageReport, FileReport, StageMasks,
    MIN_SIDE,
};
pub use error::{Error, Result};
pub use mask::BinaryMask;
pub use morphology::DilationParams;

/// Estimate the coverage percentage of an encoded image with default options.
///
/// Never panics on malformed input; returns a value in `[0.0, 100.0]`, with
/// `0.0` for anything that cannot be analyzed.
#[must_use]
pub fn analyze(bytes: &[u8]) -> f64 {
    CoverageEngine::default().analyze(bytes)
}
