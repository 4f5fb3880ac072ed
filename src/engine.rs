//! Coverage estimation engine.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use image::RgbImage;

use crate::color::{self, HsvRange};
use crate::coverage::{Coverage, FallbackPolicy};
use crate::decode;
use crate::edges::{self, EdgeThresholds};
use crate::error::{Error, Result};
use crate::luma;
use crate::mask::BinaryMask;
use crate::morphology::{self, DilationParams};
use crate::normalize::{self, DEFAULT_MAX_WIDTH};

/// Smallest side length that can carry a gradient.
pub const MIN_SIDE: u32 = 3;

/// Options controlling the analysis pipeline.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    /// Images wider than this are downsampled before analysis.
    pub max_width: u32,
    /// HSV band counted as vegetation-colored.
    pub hsv: HsvRange,
    /// Hysteresis thresholds for edge detection.
    pub edges: EdgeThresholds,
    /// Expansion applied to the edge map.
    pub dilation: DilationParams,
    /// Value reported by [`CoverageEngine::analyze`] when analysis fails.
    pub fallback: FallbackPolicy,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_WIDTH,
            hsv: HsvRange::default(),
            edges: EdgeThresholds::default(),
            dilation: DilationParams::default(),
            fallback: FallbackPolicy::Zero,
        }
    }
}

impl AnalysisOptions {
    /// Reject option values the pipeline cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] describing the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.max_width < MIN_SIDE {
            return Err(Error::InvalidConfig(format!(
                "max_width must be at least {MIN_SIDE}, got {}",
                self.max_width
            )));
        }
        let EdgeThresholds { low, high } = self.edges;
        if !low.is_finite() || !high.is_finite() || low < 0.0 || high < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "edge thresholds must be finite and non-negative, got low={low} high={high}"
            )));
        }
        if self.hsv.hue.is_empty() || *self.hsv.hue.end() > 179 {
            return Err(Error::InvalidConfig(format!(
                "hue band must be a non-empty range within 0..=179, got {:?}",
                self.hsv.hue
            )));
        }
        self.dilation.validate()
    }
}

/// Outcome of a successful analysis, with per-stage pixel counts.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageReport {
    /// Final coverage percentage.
    pub coverage: Coverage,
    /// Decoded image dimensions `(width, height)`.
    pub original_size: (u32, u32),
    /// Dimensions after normalization; the denominator of the percentage.
    pub analyzed_size: (u32, u32),
    /// Pixels inside the vegetation color band.
    pub color_pixels: u64,
    /// Pixels on detected edges.
    pub edge_pixels: u64,
    /// Pixels inside the expanded edge mask.
    pub expanded_pixels: u64,
    /// Pixels both vegetation-colored and inside the expanded edge mask.
    pub covered_pixels: u64,
}

/// Intermediate masks of one pipeline run.
#[derive(Debug, Clone)]
pub struct StageMasks {
    /// Vegetation-colored pixels.
    pub color: BinaryMask,
    /// Raw edge map.
    pub edges: BinaryMask,
    /// Dilated edge map.
    pub expanded: BinaryMask,
    /// Intersection of `color` and `expanded`.
    pub combined: BinaryMask,
}

/// Result of analyzing a single image file.
#[derive(Debug)]
pub struct FileReport {
    /// Path of the analyzed file.
    pub path: PathBuf,
    /// Whether the pipeline ran to completion.
    pub success: bool,
    /// Reported coverage; the fallback value when `success` is false.
    pub coverage: Coverage,
    /// Human-readable status message.
    pub message: String,
}

/// The coverage engine holding validated analysis options.
///
/// Create once with [`CoverageEngine::new()`] and reuse for multiple images.
/// The engine holds no mutable state and can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct CoverageEngine {
    options: AnalysisOptions,
}

impl CoverageEngine {
    /// Create an engine after validating `options`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidConfig`] if any option is out of range.
    pub fn new(options: AnalysisOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// The options this engine runs with.
    #[must_use]
    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Estimate coverage for an encoded image, reporting every failure.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] or [`Error::EmptyImage`] for unusable input and
    /// [`Error::ImageTooSmall`] when the normalized image is under 3x3.
    pub fn estimate(&self, bytes: &[u8]) -> Result<CoverageReport> {
        let img = decode::decode(bytes)?;
        self.estimate_image(img)
    }

    /// Estimate coverage for an already decoded image.
    ///
    /// # Errors
    ///
    /// See [`CoverageEngine::estimate`].
    pub fn estimate_image(&self, img: RgbImage) -> Result<CoverageReport> {
        let (report, _) = self.run(img)?;
        log::debug!(
            "{}x{} analyzed at {}x{}: {} colored, {} edge, {} expanded, {} covered -> {}",
            report.original_size.0,
            report.original_size.1,
            report.analyzed_size.0,
            report.analyzed_size.1,
            report.color_pixels,
            report.edge_pixels,
            report.expanded_pixels,
            report.covered_pixels,
            report.coverage,
        );
        Ok(report)
    }

    /// Run the pipeline on a decoded image and keep every intermediate mask.
    ///
    /// # Errors
    ///
    /// See [`CoverageEngine::estimate`].
    pub fn stage_masks(&self, img: RgbImage) -> Result<(CoverageReport, StageMasks)> {
        self.run(img)
    }

    fn run(&self, img: RgbImage) -> Result<(CoverageReport, StageMasks)> {
        let original_size = img.dimensions();
        if original_size.0 == 0 || original_size.1 == 0 {
            return Err(Error::EmptyImage);
        }

        let img = normalize::normalize(img, self.options.max_width);
        let (width, height) = img.dimensions();
        if width < MIN_SIDE || height < MIN_SIDE {
            return Err(Error::ImageTooSmall {
                width,
                height,
                min: MIN_SIDE,
            });
        }

        let color = color::classify(&img, &self.options.hsv);
        let gray = luma::to_luma(&img);
        drop(img);
        let edges = edges::detect(&gray, &self.options.edges);
        let expanded = morphology::dilate(&edges, &self.options.dilation)?;
        let combined = color.and(&expanded)?;

        let covered_pixels = combined.count_nonzero();
        let total = u64::from(width) * u64::from(height);
        let coverage = Coverage::from_counts(covered_pixels, total)?;

        let report = CoverageReport {
            coverage,
            original_size,
            analyzed_size: (width, height),
            color_pixels: color.count_nonzero(),
            edge_pixels: edges.count_nonzero(),
            expanded_pixels: expanded.count_nonzero(),
            covered_pixels,
        };
        let masks = StageMasks {
            color,
            edges,
            expanded,
            combined,
        };
        Ok((report, masks))
    }

    /// Estimate coverage, substituting the fallback policy for any failure.
    ///
    /// Always returns a finite value in `[0.0, 100.0]`. A panic inside a
    /// decoder is caught here and treated like any other failure.
    #[must_use]
    pub fn analyze(&self, bytes: &[u8]) -> f64 {
        self.resolve_guarded(|| self.estimate(bytes))
    }

    fn resolve_guarded<F>(&self, estimate: F) -> f64
    where
        F: FnOnce() -> Result<CoverageReport>,
    {
        match panic::catch_unwind(AssertUnwindSafe(estimate)) {
            Ok(Ok(report)) => report.coverage.percent(),
            Ok(Err(e)) => {
                log::warn!("coverage analysis failed: {e}");
                self.options.fallback.resolve().percent()
            }
            Err(_) => {
                log::warn!("coverage analysis panicked");
                self.options.fallback.resolve().percent()
            }
        }
    }

    /// Read and analyze a single image file.
    ///
    /// Returns a [`FileReport`]; failures carry the fallback coverage.
    #[must_use]
    pub fn analyze_file(&self, path: &Path) -> FileReport {
        let mut report = FileReport {
            path: path.to_path_buf(),
            success: false,
            coverage: self.options.fallback.resolve(),
            message: String::new(),
        };

        let outcome = std::fs::read(path)
            .map_err(Error::from)
            .and_then(|bytes| self.estimate(&bytes));

        match outcome {
            Ok(r) => {
                report.success = true;
                report.coverage = r.coverage;
                report.message = format!(
                    "{}x{} analyzed, {} of {} pixels covered",
                    r.analyzed_size.0,
                    r.analyzed_size.1,
                    r.covered_pixels,
                    u64::from(r.analyzed_size.0) * u64::from(r.analyzed_size.1),
                );
            }
            Err(e) => {
                log::warn!("{}: {e}", path.display());
                report.message = format!("Failed to analyze: {e}");
            }
        }

        report
    }

    /// Analyze all supported images in a directory, sorted by path.
    ///
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn analyze_directory(&self, input_dir: &Path) -> Vec<FileReport> {
        let mut paths: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![FileReport {
                    path: input_dir.to_path_buf(),
                    success: false,
                    coverage: self.options.fallback.resolve(),
                    message: format!("Failed to read directory: {e}"),
                }];
            }
        };
        paths.sort();

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            paths.par_iter().map(|p| self.analyze_file(p)).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            paths.iter().map(|p| self.analyze_file(p)).collect()
        }
    }
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp"
        ),
        None => false,
    }
}
