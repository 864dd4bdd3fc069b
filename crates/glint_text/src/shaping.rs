//! Shaping seam
//!
//! The glyph plan cache only needs "shape this string and report runs of
//! positioned glyphs, one font per run". [`ShapingContext`] is that
//! capability; [`FontResolver`] turns a configuration key into one.

use std::sync::Arc;

use glint_paint::{FontResourceId, GlyphPosition, LineRun};

use crate::config::FontConfigKey;
use crate::font::FontMetrics;
use crate::Result;

/// The font a run was shaped with
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct RunFont {
    /// Resource used to draw the run
    pub resource: FontResourceId,
    pub family: String,
}

/// One shaped glyph, in pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ShapedGlyph {
    pub glyph_id: u32,
    /// Byte offset of the source cluster in the shaped text
    pub cluster: u32,
    /// Pen position relative to the line origin
    pub x: f32,
    pub x_advance: f32,
    pub x_offset: f32,
    /// Positive values move the glyph down
    pub y_offset: f32,
}

impl ShapedGlyph {
    pub fn is_origin_aligned(&self) -> bool {
        self.x == 0.0 && self.x_offset == 0.0 && self.y_offset == 0.0
    }
}

/// Glyphs that share one font
#[derive(Clone, Debug)]
pub struct GlyphRun {
    pub font: Arc<RunFont>,
    /// Scaled-font resource usable for batched drawing, if the backend can
    /// provide one for this run
    pub scaled: Option<FontResourceId>,
    pub glyphs: Vec<ShapedGlyph>,
}

/// A single shaped line of text
#[derive(Clone, Debug, Default)]
pub struct ShapedLine {
    pub runs: Vec<GlyphRun>,
    /// Logical width in pixels
    pub width: f32,
    /// Logical height in pixels
    pub height: f32,
    /// Baseline offset from the top of the line
    pub baseline: f32,
    /// Glyphs the fonts reported as missing
    pub unknown_glyphs: usize,
}

impl ShapedLine {
    pub fn clear(&mut self) {
        self.runs.clear();
        self.width = 0.0;
        self.height = 0.0;
        self.baseline = 0.0;
        self.unknown_glyphs = 0;
    }

    pub fn glyph_count(&self) -> usize {
        self.runs.iter().map(|run| run.glyphs.len()).sum()
    }

    /// Runs as paint-level glyph positions, relative to the baseline origin
    pub fn to_line_runs(&self) -> Vec<LineRun> {
        self.runs
            .iter()
            .map(|run| LineRun {
                font: run.font.resource,
                glyphs: run
                    .glyphs
                    .iter()
                    .map(|g| GlyphPosition::new(g.glyph_id, g.x + g.x_offset, g.y_offset))
                    .collect(),
            })
            .collect()
    }
}

/// A realized font able to shape text
pub trait ShapingContext {
    /// Shape `text` into `out`, replacing its previous contents
    fn shape(&mut self, text: &str, out: &mut ShapedLine);

    /// Natural metrics of the primary font
    fn metrics(&self) -> FontMetrics;
}

/// Creates shaping contexts for configuration keys
pub trait FontResolver {
    /// Current font configuration generation; part of every key
    fn generation(&self) -> u64;

    fn open(&self, key: &FontConfigKey) -> Result<Box<dyn ShapingContext>>;
}
