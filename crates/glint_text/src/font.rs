//! Font face loading and metrics

use std::sync::Arc;

use crate::{Result, TextError};

/// Vertical metrics in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FontMetrics {
    /// Distance from the top of the line to the baseline
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line (positive)
    pub descent: f32,
    /// Full line height including line gap
    pub height: f32,
}

/// A parsed font face.
///
/// The face is parsed once on load and kept next to the bytes it borrows
/// from, so shaping and glyph lookups never reparse the tables.
pub struct FontFace {
    /// Borrows from `data`. Declared first so it is dropped first.
    shaper: rustybuzz::Face<'static>,
    data: Arc<Vec<u8>>,
    index: u32,
    family: String,
    weight: u16,
    italic: bool,
    units_per_em: u16,
    ascender: i16,
    descender: i16,
    line_gap: i16,
}

impl FontFace {
    pub fn from_data(data: Vec<u8>) -> Result<Self> {
        Self::from_data_with_index(data, 0)
    }

    pub fn from_data_with_index(data: Vec<u8>, index: u32) -> Result<Self> {
        let data = Arc::new(data);
        // SAFETY: the bytes live on the heap behind `data`, which is stored
        // alongside the face, never mutated, and outlives `shaper`
        let bytes: &'static [u8] =
            unsafe { std::slice::from_raw_parts(data.as_ptr(), data.len()) };
        let face = ttf_parser::Face::parse(bytes, index)
            .map_err(|e| TextError::FontParse(e.to_string()))?;

        let units_per_em = face.units_per_em();
        if units_per_em == 0 {
            return Err(TextError::InvalidFontData);
        }

        let family = face
            .names()
            .into_iter()
            .filter(|name| name.name_id == ttf_parser::name_id::FAMILY)
            .find_map(|name| name.to_string())
            .unwrap_or_default();

        let weight = face.weight().to_number();
        let italic = face.is_italic() || face.is_oblique();
        let (ascender, descender, line_gap) =
            (face.ascender(), face.descender(), face.line_gap());

        Ok(Self {
            shaper: rustybuzz::Face::from_face(face),
            data,
            index,
            family,
            weight,
            italic,
            units_per_em,
            ascender,
            descender,
            line_gap,
        })
    }

    pub fn face_index(&self) -> u32 {
        self.index
    }

    pub fn family_name(&self) -> &str {
        &self.family
    }

    pub fn weight(&self) -> u16 {
        self.weight
    }

    pub fn is_italic(&self) -> bool {
        self.italic
    }

    pub fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    /// The parsed face, for shaping
    pub fn shaper(&self) -> &rustybuzz::Face<'_> {
        &self.shaper
    }

    /// Glyph index for `c`, `None` when the face lacks it
    pub fn glyph_id(&self, c: char) -> Option<u16> {
        self.shaper
            .glyph_index(c)
            .map(|id| id.0)
            .filter(|id| *id != 0)
    }

    pub fn has_glyph(&self, c: char) -> bool {
        self.glyph_id(c).is_some()
    }

    pub fn glyph_count(&self) -> u16 {
        self.shaper.number_of_glyphs()
    }

    /// Metrics scaled to `pixel_size` pixels per em
    pub fn metrics(&self, pixel_size: f32) -> FontMetrics {
        let scale = pixel_size / self.units_per_em as f32;
        let ascent = self.ascender as f32 * scale;
        let descent = -(self.descender as f32) * scale;
        FontMetrics {
            ascent,
            descent,
            height: ascent + descent + self.line_gap as f32 * scale,
        }
    }

    /// Stable identity used for caching across registries
    pub fn cache_key(&self) -> String {
        format!(
            "{}:{}:w{}:{}",
            self.family,
            self.index,
            self.weight,
            if self.italic { "i" } else { "n" }
        )
    }
}

impl std::fmt::Debug for FontFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontFace")
            .field("family", &self.family)
            .field("index", &self.index)
            .field("weight", &self.weight)
            .field("italic", &self.italic)
            .field("bytes", &self.data.len())
            .finish()
    }
}
