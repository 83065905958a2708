//! Text measurement
//!
//! The control never lays out glyphs itself. It asks a [`TextMeasurer`] how
//! large a string is at a given font size, and the host supplies one backed by
//! its text stack (or the font-backed one in [`crate::font`]).

/// Width and height in points
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Measures rendered text
pub trait TextMeasurer {
    /// Size of `text` rendered on one line at `font_size`
    fn measure(&self, text: &str, font_size: f32) -> Size;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        (**self).measure(text, font_size)
    }
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for Box<T> {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        (**self).measure(text, font_size)
    }
}

/// Every character advances by the same fraction of the font size.
///
/// Matches tabular digit fonts closely enough for fitting, and is what tests
/// and headless hosts use.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    /// Advance per character, in ems
    pub advance: f32,
    /// Line height, in ems
    pub line_height: f32,
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self {
            advance: 0.6,
            line_height: 1.2,
        }
    }
}

impl FixedAdvanceMeasurer {
    pub fn new(advance: f32, line_height: f32) -> Self {
        Self {
            advance,
            line_height,
        }
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        let chars = text.chars().count() as f32;
        Size {
            width: chars * self.advance * font_size,
            height: if text.is_empty() {
                0.0
            } else {
                self.line_height * font_size
            },
        }
    }
}
