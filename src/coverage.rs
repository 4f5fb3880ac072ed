//! Coverage percentages and the boundary fallback policy.

use std::fmt;

use crate::error::{Error, Result};

/// A coverage percentage in `[0.0, 100.0]`, rounded to two decimals.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Coverage(f64);

impl Coverage {
    /// No coverage.
    pub const ZERO: Self = Self(0.0);

    /// Reduce a pixel count to a percentage of `total` pixels.
    ///
    /// The result is scaled to percent, rounded to two decimals (half away
    /// from zero) and capped at 100.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyImage`] when `total` is zero.
    pub fn from_counts(covered: u64, total: u64) -> Result<Self> {
        if total == 0 {
            return Err(Error::EmptyImage);
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = covered as f64 / total as f64;
        Ok(Self::from_percent(ratio * 100.0))
    }

    /// Round and clamp an arbitrary percentage. Non-finite input becomes zero.
    #[must_use]
    pub fn from_percent(percent: f64) -> Self {
        if !percent.is_finite() {
            return Self::ZERO;
        }
        let rounded = (percent * 100.0).round() / 100.0;
        Self(rounded.clamp(0.0, 100.0))
    }

    /// The percentage value.
    #[must_use]
    pub fn percent(self) -> f64 {
        self.0
    }
}

impl From<Coverage> for f64 {
    fn from(c: Coverage) -> Self {
        c.0
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}%", self.0)
    }
}

/// What [`analyze`](crate::CoverageEngine::analyze) reports when the pipeline fails.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FallbackPolicy {
    /// Report zero coverage.
    #[default]
    Zero,
    /// Report a fixed percentage.
    Constant(Coverage),
}

impl FallbackPolicy {
    /// The coverage to report in place of a failed analysis.
    #[must_use]
    pub fn resolve(&self) -> Coverage {
        match self {
            Self::Zero => Coverage::ZERO,
            Self::Constant(c) => *c,
        }
    }
}
