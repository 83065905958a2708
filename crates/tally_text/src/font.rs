//! Font loading and measurement
//!
//! Provides font parsing via ttf-parser and advance-based string measurement.

use crate::measure::{Size, TextMeasurer};
use crate::{Result, TextError};
use std::sync::Arc;

/// Font metrics in font units (typically 1000 or 2048 units per em)
#[derive(Debug, Clone, Copy)]
pub struct FontMetrics {
    /// Units per em (typically 1000 or 2048)
    pub units_per_em: u16,
    /// Ascender (distance from baseline to top of tallest glyph)
    pub ascender: i16,
    /// Descender (distance from baseline to bottom, typically negative)
    pub descender: i16,
    /// Line gap (additional spacing between lines)
    pub line_gap: i16,
}

impl FontMetrics {
    /// Calculate line height in font units
    pub fn line_height(&self) -> i16 {
        self.ascender - self.descender + self.line_gap
    }

    /// Scale a value from font units to pixels
    pub fn scale(&self, value: f32, font_size: f32) -> f32 {
        value * font_size / self.units_per_em as f32
    }

    /// Get line height in pixels
    pub fn line_height_px(&self, font_size: f32) -> f32 {
        self.scale(self.line_height() as f32, font_size)
    }
}

/// A parsed font face
pub struct FontFace {
    /// Raw font data (kept alive for ttf-parser)
    data: Arc<Vec<u8>>,
    /// Face index within the font file (for TTC files)
    face_index: u32,
    metrics: FontMetrics,
    family_name: String,
}

impl FontFace {
    /// Load a font from raw TTF/OTF data (uses face index 0)
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    /// Load a font from raw TTF/OTF data with a specific face index
    pub fn from_data_with_index(data: Vec<u8>, face_index: u32) -> Result<Self> {
        let data = Arc::new(data);

        let face = ttf_parser::Face::parse(&data, face_index)
            .map_err(|e| TextError::FontParseError(format!("{:?}", e)))?;

        let metrics = FontMetrics {
            units_per_em: face.units_per_em(),
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        };

        let family_name = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::FAMILY)
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| "Unknown".to_string());

        Ok(Self {
            data,
            face_index,
            metrics,
            family_name,
        })
    }

    /// Load a font from a file path
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| TextError::FontLoadError(format!("Failed to read file: {}", e)))?;
        Self::from_data(data)
    }

    pub fn metrics(&self) -> &FontMetrics {
        &self.metrics
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    fn as_ttf_face(&self) -> Option<ttf_parser::Face<'_>> {
        ttf_parser::Face::parse(&self.data, self.face_index).ok()
    }

    /// Horizontal advance of `c` in font units. Missing glyphs advance by half an em.
    fn advance_units(face: &ttf_parser::Face<'_>, c: char) -> f32 {
        face.glyph_index(c)
            .and_then(|id| face.glyph_hor_advance(id))
            .map(f32::from)
            .unwrap_or_else(|| face.units_per_em() as f32 / 2.0)
    }
}

impl TextMeasurer for FontFace {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        if text.is_empty() {
            return Size::ZERO;
        }

        let Some(face) = self.as_ttf_face() else {
            tracing::warn!(family = %self.family_name, "Font data no longer parses");
            return Size::ZERO;
        };

        let advance: f32 = text.chars().map(|c| Self::advance_units(&face, c)).sum();
        Size {
            width: self.metrics.scale(advance, font_size),
            height: self.metrics.line_height_px(font_size),
        }
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family_name", &self.family_name)
            .field("face_index", &self.face_index)
            .finish()
    }
}
