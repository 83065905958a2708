//! Font size fitting
//!
//! Binary search for the largest font size at which a list of weighted strings,
//! laid out side by side, fits inside a box. A string with weight `w` is
//! measured at `size * w`, which is how the mantissa of a floating-decimal
//! display is drawn smaller than its integer part.

use smallvec::SmallVec;

use crate::measure::{Size, TextMeasurer};
use crate::{Result, TextError};

/// Smallest font size searched
pub const DEFAULT_MIN_SIZE: f32 = 0.1;
/// Largest font size searched
pub const DEFAULT_MAX_SIZE: f32 = 1_000_000.0;
/// Both the search interval and the "close enough" distance, in points
pub const FIT_TOLERANCE: f32 = 0.1;

const MAX_ITERATIONS: usize = 64;

/// A string and the factor applied to the font size when measuring it
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedText<'a> {
    pub text: &'a str,
    pub weight: f32,
}

impl<'a> WeightedText<'a> {
    pub fn new(text: &'a str, weight: f32) -> Self {
        Self { text, weight }
    }
}

/// How a measured size compares to the target box
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SizeState {
    /// Within tolerance of the width or the height
    Fit,
    /// Exceeds the width or the height
    TooBig,
    TooSmall,
}

impl SizeState {
    /// Classify `measured` against `target`.
    ///
    /// A fit is declared when *either* dimension is within tolerance, even if
    /// the other one still has room.
    pub fn classify(measured: Size, target: Size) -> Self {
        if measured.width > target.width || measured.height > target.height {
            SizeState::TooBig
        } else if (measured.width - target.width).abs() < FIT_TOLERANCE
            || (measured.height - target.height).abs() < FIT_TOLERANCE
        {
            SizeState::Fit
        } else {
            SizeState::TooSmall
        }
    }
}

/// Searches font sizes in `[min_size, max_size]`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FontFitter {
    pub min_size: f32,
    pub max_size: f32,
}

impl Default for FontFitter {
    fn default() -> Self {
        Self {
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
        }
    }
}

impl FontFitter {
    pub fn new(min_size: f32, max_size: f32) -> Self {
        Self { min_size, max_size }
    }

    /// Find the unweighted font size that fits `strings` into `target`.
    ///
    /// Fails with [`TextError::InvalidWeight`] if any weight is negative.
    pub fn fit(
        &self,
        strings: &[WeightedText<'_>],
        measurer: &dyn TextMeasurer,
        target: Size,
    ) -> Result<f32> {
        if let Some(bad) = strings.iter().find(|s| s.weight < 0.0 || s.weight.is_nan()) {
            tracing::warn!(weight = bad.weight, text = bad.text, "Negative string weight");
            return Err(TextError::InvalidWeight(bad.weight));
        }

        let mut low = self.min_size;
        let mut high = self.max_size;

        for _ in 0..MAX_ITERATIONS {
            let mid = (low + high) / 2.0;
            if high - low <= FIT_TOLERANCE {
                return Ok(mid);
            }

            let measured = Self::measure_weighted(strings, measurer, mid);
            match SizeState::classify(measured, target) {
                SizeState::Fit => return Ok(mid),
                SizeState::TooBig => high = mid,
                SizeState::TooSmall => low = mid,
            }
        }

        Ok((low + high) / 2.0)
    }

    /// Total width and tallest height of the strings at `font_size`
    pub fn measure_weighted(
        strings: &[WeightedText<'_>],
        measurer: &dyn TextMeasurer,
        font_size: f32,
    ) -> Size {
        let sizes: SmallVec<[Size; 16]> = strings
            .iter()
            .map(|s| measurer.measure(s.text, font_size * s.weight))
            .collect();

        sizes.iter().fold(Size::ZERO, |total, size| Size {
            width: total.width + size.width,
            height: total.height.max(size.height),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measure::FixedAdvanceMeasurer;

    fn measurer() -> FixedAdvanceMeasurer {
        FixedAdvanceMeasurer::new(0.5, 1.0)
    }

    #[test]
    fn test_width_bound_fit() {
        let strings = [WeightedText::new("1234", 1.0)];
        // 4 chars * 0.5em = 2em wide, so 100pt wide fits 50pt
        let size = FontFitter::default()
            .fit(&strings, &measurer(), Size::new(100.0, 1000.0))
            .unwrap();
        assert!((size - 50.0).abs() < 0.2, "got {size}");
    }

    #[test]
    fn test_height_bound_fit() {
        let strings = [WeightedText::new("1", 1.0)];
        let size = FontFitter::default()
            .fit(&strings, &measurer(), Size::new(1000.0, 40.0))
            .unwrap();
        assert!((size - 40.0).abs() < 0.2, "got {size}");
    }

    #[test]
    fn test_weights_shrink_mantissa() {
        let strings = [
            WeightedText::new("12", 1.0),
            WeightedText::new("34", 0.5),
        ];
        // 2 * 0.5s + 2 * 0.5 * 0.5s = 1.5s
        let size = FontFitter::default()
            .fit(&strings, &measurer(), Size::new(60.0, 1000.0))
            .unwrap();
        assert!((size - 40.0).abs() < 0.2, "got {size}");

        let measured = FontFitter::measure_weighted(&strings, &measurer(), size);
        assert!(measured.width <= 60.0 + FIT_TOLERANCE);
        assert!((measured.height - size).abs() < f32::EPSILON);
    }

    #[test]
    fn test_fit_is_monotonic_in_target() {
        let strings = [
            WeightedText::new("1,234", 1.0),
            WeightedText::new("56", 0.6),
        ];
        let fitter = FontFitter::default();
        let mut previous = 0.0;
        for width in [10.0, 40.0, 100.0, 250.0, 600.0, 2000.0] {
            let size = fitter
                .fit(&strings, &measurer(), Size::new(width, 10_000.0))
                .unwrap();
            assert!(size >= previous, "{size} < {previous} at width {width}");
            previous = size;
        }

        let mut previous = 0.0;
        for height in [5.0, 20.0, 45.0, 120.0] {
            let size = fitter
                .fit(&strings, &measurer(), Size::new(10_000.0, height))
                .unwrap();
            assert!(size >= previous, "{size} < {previous} at height {height}");
            previous = size;
        }
    }

    #[test]
    fn test_negative_weight_rejected() {
        let strings = [WeightedText::new("1", 1.0), WeightedText::new("2", -0.5)];
        let result = FontFitter::default().fit(&strings, &measurer(), Size::new(10.0, 10.0));
        assert!(matches!(result, Err(TextError::InvalidWeight(w)) if w == -0.5));
    }

    #[test]
    fn test_narrow_interval_returns_midpoint() {
        let fitter = FontFitter::new(10.0, 10.05);
        let size = fitter
            .fit(&[WeightedText::new("1", 1.0)], &measurer(), Size::new(1.0, 1.0))
            .unwrap();
        assert!((size - 10.025).abs() < 1e-4, "got {size}");
    }

    #[test]
    fn test_classify() {
        let target = Size::new(100.0, 50.0);
        assert_eq!(SizeState::classify(Size::new(101.0, 10.0), target), SizeState::TooBig);
        assert_eq!(SizeState::classify(Size::new(10.0, 51.0), target), SizeState::TooBig);
        assert_eq!(SizeState::classify(Size::new(99.95, 10.0), target), SizeState::Fit);
        // Height within tolerance is enough, even with spare width
        assert_eq!(SizeState::classify(Size::new(10.0, 49.95), target), SizeState::Fit);
        assert_eq!(SizeState::classify(Size::new(90.0, 40.0), target), SizeState::TooSmall);
    }
}
