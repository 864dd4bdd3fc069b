//! Synthetic glyphs
//!
//! Box drawing, block elements and the legacy-computing mosaics are drawn
//! from cell geometry instead of the font, so they tile without seams and
//! never depend on which fonts happen to be installed.
//!
//! Coverage:
//! - U+2500..U+257F box drawing (always)
//! - U+2580..U+259F block elements (always)
//! - U+25E2..U+25E5 black corner triangles (always)
//! - Symbols for Legacy Computing and its supplement (when enabled):
//!   sextants, wedges, triangles, eighth blocks, medium shades, fills,
//!   octants and separated mosaics
//!
//! With [`TextAttrs::separated_mosaic`] set, block elements, the corner
//! triangles and U+1FB00..U+1FB9F are drawn through a 2x3 separation mask.

mod blocks;
mod box_drawing;
mod mosaic;

use glint_paint::{
    Color, FillRule, LineCap, PaintContext, Path, Pattern, Point, Rect, Stipple, StrokeStyle,
};

use crate::style::TextAttrs;

/// Whether `c` is drawn synthetically
pub fn is_synthetic(c: char, legacy_computing: bool) -> bool {
    match c as u32 {
        0x2500..=0x259F | 0x25E2..=0x25E5 => true,
        _ if !legacy_computing => false,
        0x1FB00..=0x1FB92 | 0x1FB94..=0x1FB9F => true,
        0x1FBCE..=0x1FBCF | 0x1FBE6..=0x1FBE7 => true,
        0x1CD00..=0x1CDE5 => true,
        0x1CEA0 | 0x1CEA3 | 0x1CEA8 | 0x1CEAB => true,
        0x1CC21..=0x1CC2F | 0x1CE51..=0x1CE8F => true,
        _ => false,
    }
}

/// Whether the separated-mosaic attribute applies to `c`
fn is_separable(c: char) -> bool {
    matches!(c as u32, 0x2580..=0x259F | 0x25E2..=0x25E5 | 0x1FB00..=0x1FB9F)
}

/// Where a synthetic glyph goes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlyphBox {
    pub x: i32,
    pub y: i32,
    /// Full width, all columns included
    pub width: i32,
    pub height: i32,
    /// Natural width of one character, letter spacing excluded. Stroke
    /// widths derive from it.
    pub char_width: i32,
}

/// Draw `c` into `bounds`. Returns `false` when `c` is not covered, in
/// which case nothing is recorded.
pub fn draw_synthetic(
    ctx: &mut PaintContext,
    c: char,
    bounds: GlyphBox,
    legacy_computing: bool,
    attrs: TextAttrs,
    color: Color,
) -> bool {
    if !is_synthetic(c, legacy_computing) {
        return false;
    }
    if bounds.width <= 0 || bounds.height <= 0 {
        return true;
    }

    let mut canvas = GlyphCanvas::new(ctx, bounds, color);
    let drawn = if attrs.separated_mosaic && is_separable(c) {
        let gap = canvas.light as f32;
        let mut drawn = false;
        canvas.separated(2, 3, gap, |canvas| drawn = draw_covered(canvas, c));
        drawn
    } else {
        draw_covered(&mut canvas, c)
    };
    if !drawn {
        tracing::warn!("no synthetic drawing for covered U+{:04X}", c as u32);
    }
    drawn
}

fn draw_covered(canvas: &mut GlyphCanvas<'_>, c: char) -> bool {
    match c as u32 {
        0x2500..=0x257F => box_drawing::draw(canvas, c),
        0x2580..=0x259F => blocks::draw_block_element(canvas, c),
        0x25E2..=0x25E5 => blocks::draw_corner_triangle(canvas, c),
        _ => blocks::draw_legacy_block(canvas, c) || mosaic::draw(canvas, c),
    }
}

/// Recording helper working in cell-local pixel coordinates
pub(crate) struct GlyphCanvas<'a> {
    ctx: &'a mut PaintContext,
    x: i32,
    y: i32,
    pub width: i32,
    pub height: i32,
    /// Light stroke width, also the separation gap
    pub light: i32,
    pub color: Color,
}

impl<'a> GlyphCanvas<'a> {
    fn new(ctx: &'a mut PaintContext, bounds: GlyphBox, color: Color) -> Self {
        Self {
            ctx,
            x: bounds.x,
            y: bounds.y,
            width: bounds.width,
            height: bounds.height,
            light: (bounds.char_width / 5).max(1),
            color,
        }
    }

    /// `num / den` of the width, rounded to a pixel edge
    pub fn frac_x(&self, num: i32, den: i32) -> i32 {
        (self.width as f32 * num as f32 / den as f32).round() as i32
    }

    /// `num / den` of the height, rounded to a pixel edge
    pub fn frac_y(&self, num: i32, den: i32) -> i32 {
        (self.height as f32 * num as f32 / den as f32).round() as i32
    }

    pub fn point(&self, x: f32, y: f32) -> Point {
        Point::new(self.x as f32 + x, self.y as f32 + y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(
            self.x as f32,
            self.y as f32,
            self.width as f32,
            self.height as f32,
        )
    }

    /// Fill the half-open pixel box [x0, x1) x [y0, y1)
    pub fn fill(&mut self, x0: i32, y0: i32, x1: i32, y1: i32) {
        let color = self.color;
        self.fill_with(x0, y0, x1, y1, color);
    }

    pub fn fill_with(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        self.ctx.fill_rect(
            (self.x + x0) as f32,
            (self.y + y0) as f32,
            (x1 - x0) as f32,
            (y1 - y0) as f32,
            color,
        );
    }

    /// Fill the cells of a `columns` x `rows` grid whose bit is set in
    /// `mask`. Bit 0 is the top-left cell, counting row by row. Adjacent
    /// cells in a row are merged into one rectangle.
    pub fn fill_mask(&mut self, mask: u8, columns: i32, rows: i32) {
        for row in 0..rows {
            let y0 = self.frac_y(row, rows);
            let y1 = self.frac_y(row + 1, rows);
            let mut col = 0;
            while col < columns {
                if mask & (1 << (row * columns + col)) == 0 {
                    col += 1;
                    continue;
                }
                let start = col;
                while col < columns && mask & (1 << (row * columns + col)) != 0 {
                    col += 1;
                }
                let x0 = self.frac_x(start, columns);
                let x1 = self.frac_x(col, columns);
                self.fill(x0, y0, x1, y1);
            }
        }
    }

    /// Closed polygon from cell-local points
    pub fn polygon(&self, points: &[(f32, f32)]) -> Path {
        let points: Vec<Point> = points.iter().map(|&(x, y)| self.point(x, y)).collect();
        Path::polygon(&points)
    }

    pub fn fill_path(&mut self, path: Path, rule: FillRule) {
        self.ctx.fill_path(path, self.color, rule);
    }

    /// Fill everything outside `points`
    pub fn fill_outside(&mut self, points: &[(f32, f32)]) {
        let bounds = self.bounds();
        let mut path = Path::rect(bounds.x, bounds.y, bounds.width, bounds.height);
        path.extend(&self.polygon(points));
        self.fill_path(path, FillRule::EvenOdd);
    }

    pub fn fill_stipple(&mut self, path: Path, pattern: Stipple) {
        self.ctx
            .fill_pattern(path, Pattern::Stipple(pattern), self.color);
    }

    /// Fill the half-open pixel box with a stipple
    pub fn stipple_box(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, pattern: Stipple) {
        if x1 <= x0 || y1 <= y0 {
            return;
        }
        let path = Path::rect(
            (self.x + x0) as f32,
            (self.y + y0) as f32,
            (x1 - x0) as f32,
            (y1 - y0) as f32,
        );
        self.fill_stipple(path, pattern);
    }

    pub fn stroke(&mut self, path: Path, width: f32) {
        self.ctx.stroke_path(
            path,
            StrokeStyle {
                color: self.color,
                width,
                line_cap: LineCap::Butt,
            },
        );
    }

    /// Draw through a separation mask: whatever `draw` paints only shows
    /// inside the `columns` x `rows` sub-blocks, each inset by `gap`
    pub fn separated(&mut self, columns: u8, rows: u8, gap: f32, draw: impl FnOnce(&mut Self)) {
        self.ctx.push_group();
        draw(self);
        let bounds = self.bounds();
        self.ctx.pop_group_masked(Pattern::Separation {
            bounds,
            columns,
            rows,
            gap,
        });
    }
}
