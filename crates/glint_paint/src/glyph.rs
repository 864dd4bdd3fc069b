//! Glyph drawing data
//!
//! Fonts are referenced by an opaque [`FontResourceId`]; the text layer hands
//! these out and the backend resolves them back to a face and pixel size.

/// Identifies one font at one exact size/transform.
///
/// This is the granularity at which glyph batches are grouped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontResourceId(pub u64);

/// A glyph index with an absolute (baseline) position in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
#[repr(C)]
pub struct GlyphPosition {
    pub index: u32,
    pub x: f32,
    pub y: f32,
}

impl GlyphPosition {
    pub const fn new(index: u32, x: f32, y: f32) -> Self {
        Self { index, x, y }
    }
}

/// One font's share of a multi-font line
#[derive(Clone, Debug, PartialEq)]
pub struct LineRun {
    pub font: FontResourceId,
    /// Positions relative to the line origin
    pub glyphs: Vec<GlyphPosition>,
}
