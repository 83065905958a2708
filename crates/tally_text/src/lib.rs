//! Text measurement and font fitting for Tally
//!
//! This crate provides:
//! - A [`TextMeasurer`] seam for the platform's text measurement
//! - Font-backed measurement via ttf-parser
//! - A binary-search [`FontFitter`] that finds the largest font size for a box

pub mod fit;
pub mod font;
pub mod measure;

pub use fit::{FontFitter, SizeState, WeightedText};
pub use font::{FontFace, FontMetrics};
pub use measure::{FixedAdvanceMeasurer, Size, TextMeasurer};

use thiserror::Error;

/// Text measurement errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("Failed to load font: {0}")]
    FontLoadError(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("String weight must be non-negative, got {0}")]
    InvalidWeight(f32),
}

pub type Result<T> = std::result::Result<T, TextError>;
