//! Terminal drawing surface
//!
//! [`TerminalDraw`] owns one terminal's font set and decoration cache.
//! Drawing happens inside a [`DrawFrame`], which borrows a paint context for
//! the duration of one repaint:
//!
//! ```ignore
//! let mut frame = draw.begin(&mut ctx);
//! frame.clip(0, 0, 800, 600);
//! frame.draw_text(&requests, FontStyle::NORMAL, TextAttrs::NONE, fg, 1.0);
//! frame.unclip();
//! ```
//!
//! Characters in the box drawing, block and legacy computing ranges are drawn
//! from cell geometry; everything else goes through the cached glyph plans of
//! the style's font handle. Origin-aligned glyphs from the same font are
//! batched into a single glyph draw call.

use std::rc::Rc;

use glint_paint::{Color, FontResourceId, GlyphPosition, PaintContext, Point, Rect};
use glint_text::{
    FontConfigKey, FontDescription, FontHandle, PlanKind, RenderCounters, SharedFontCache,
};
use smallvec::SmallVec;

use crate::config::{check_scale, RenderConfig, CELL_SCALE_RANGE};
use crate::font_set::{CellMetrics, StyleFontSet};
use crate::graphics::{draw_synthetic, is_synthetic, GlyphBox};
use crate::mirror::mirror_char;
use crate::style::{FontStyle, TextAttrs};
use crate::undercurl::UndercurlCache;

const DEFAULT_LANGUAGE: &str = "en";
const DEFAULT_RESOLUTION: f64 = 96.0;

/// One character to draw at a cell position
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TextRequest {
    pub c: char,
    /// Pixel position of the cell's top-left corner
    pub x: i32,
    pub y: i32,
    /// 1, or 2 for wide characters
    pub columns: i32,
    /// Draw the bidi mirror image of `c`
    pub mirror: bool,
    /// When mirroring, also swap asymmetric box drawing characters
    pub box_mirror: bool,
}

impl TextRequest {
    pub fn new(c: char, x: i32, y: i32) -> Self {
        Self {
            c,
            x,
            y,
            columns: 1,
            mirror: false,
            box_mirror: false,
        }
    }

    pub fn with_columns(mut self, columns: i32) -> Self {
        self.columns = columns;
        self
    }

    pub fn mirrored(mut self, box_mirror: bool) -> Self {
        self.mirror = true;
        self.box_mirror = box_mirror;
        self
    }

    /// The character actually looked up
    fn resolved(&self) -> char {
        if self.mirror {
            mirror_char(self.c, self.box_mirror)
        } else {
            self.c
        }
    }
}

/// Font state and caches for one terminal
pub struct TerminalDraw {
    cache: SharedFontCache,
    counters: Rc<dyn RenderCounters>,
    config: RenderConfig,
    language: String,
    resolution: f64,
    fonts: Option<StyleFontSet>,
    undercurl: UndercurlCache,
}

impl TerminalDraw {
    pub fn new(cache: SharedFontCache, config: RenderConfig) -> Self {
        let counters = cache.borrow().counters();
        Self {
            cache,
            counters,
            config,
            language: DEFAULT_LANGUAGE.to_string(),
            resolution: DEFAULT_RESOLUTION,
            fonts: None,
            undercurl: UndercurlCache::new(),
        }
    }

    /// Language tag used for font selection; takes effect on the next
    /// [`set_font`](Self::set_font)
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Device resolution in dots per inch; takes effect on the next
    /// [`set_font`](Self::set_font)
    pub fn with_resolution(mut self, resolution: f64) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn cache(&self) -> &SharedFontCache {
        &self.cache
    }

    /// The active font set, if a font has been set
    pub fn font_set(&self) -> Option<&StyleFontSet> {
        self.fonts.as_ref()
    }

    /// Switch to `description`, with cells scaled by the given multipliers.
    ///
    /// All four style handles are acquired for the new font before the old
    /// ones are released, so handles the two fonts share are never
    /// scheduled for destruction. On error the previous font stays active.
    pub fn set_font(
        &mut self,
        description: &FontDescription,
        width_scale: f64,
        height_scale: f64,
    ) -> glint_text::Result<()> {
        let width_scale = clamp_scale("cell_width_scale", width_scale);
        let height_scale = clamp_scale("cell_height_scale", height_scale);

        let mut cache = self.cache.borrow_mut();
        let key = FontConfigKey::new(
            description.clone(),
            self.language.clone(),
            self.resolution,
            self.config.antialias_options(),
            cache.generation(),
        );
        let fonts = StyleFontSet::acquire(&mut cache, &key, width_scale, height_scale)?;
        if let Some(old) = self.fonts.replace(fonts) {
            old.release(&mut cache);
        }
        drop(cache);

        self.undercurl.invalidate();
        Ok(())
    }

    /// [`set_font`](Self::set_font) with the configured cell scales
    pub fn set_font_default_scale(&mut self, description: &FontDescription) -> glint_text::Result<()> {
        let (width, height) = (self.config.cell_width_scale, self.config.cell_height_scale);
        self.set_font(description, width, height)
    }

    fn fonts(&self) -> &StyleFontSet {
        self.fonts.as_ref().expect("draw called before set_font")
    }

    pub fn cell_metrics(&self) -> CellMetrics {
        self.fonts().metrics()
    }

    /// Left and right pixel edges of `c` relative to its cell origin.
    ///
    /// The right edge lies past the cell when the glyph overflows it.
    pub fn glyph_edges(&self, c: char, columns: i32, style: FontStyle) -> (i32, i32) {
        let fonts = self.fonts();
        let metrics = fonts.metrics();
        if is_synthetic(c, self.config.legacy_computing) {
            return (0, metrics.cell_width * columns);
        }
        let width = fonts.handle(style).lookup(c).width;
        let left = edge_offset(width, columns, &metrics);
        (left, left + width)
    }

    /// Whether `c` can be drawn without a placeholder glyph
    pub fn has_glyph(&self, c: char, style: FontStyle) -> bool {
        if is_synthetic(c, self.config.legacy_computing) {
            return true;
        }
        self.fonts().handle(style).has_glyph(c)
    }

    pub fn has_bold(&self, style: FontStyle) -> bool {
        self.fonts().has_bold(style)
    }

    /// Start drawing into `ctx`
    pub fn begin<'a>(&'a mut self, ctx: &'a mut PaintContext) -> DrawFrame<'a> {
        DrawFrame {
            draw: self,
            ctx,
            clips: 0,
        }
    }
}

impl Drop for TerminalDraw {
    fn drop(&mut self) {
        let Some(fonts) = self.fonts.take() else {
            return;
        };
        match self.cache.try_borrow_mut() {
            Ok(mut cache) => fonts.release(&mut cache),
            Err(_) => tracing::warn!("font cache busy while dropping a terminal; handles leaked"),
        }
    }
}

fn clamp_scale(name: &'static str, value: f64) -> f64 {
    match check_scale(name, value) {
        Ok(()) => value,
        Err(err) => {
            tracing::warn!("{}, clamping", err);
            if value.is_nan() {
                *CELL_SCALE_RANGE.start()
            } else {
                value.clamp(*CELL_SCALE_RANGE.start(), *CELL_SCALE_RANGE.end())
            }
        }
    }
}

/// Horizontal offset of a glyph `width` pixels wide inside its cell(s).
///
/// Glyphs no wider than the natural character width sit after the leading
/// spacing inset, glyphs that fit the padded cell are centered, and wider
/// ones start at the cell edge and overflow to the right.
fn edge_offset(width: i32, columns: i32, metrics: &CellMetrics) -> i32 {
    if width <= metrics.char_width * columns {
        if columns > 1 {
            metrics.insets.left + metrics.insets.right
        } else {
            metrics.insets.left
        }
    } else if width <= metrics.cell_width * columns {
        (metrics.cell_width * columns - width) / 2
    } else {
        0
    }
}

/// Consecutive origin-aligned glyphs sharing one font
struct GlyphBatch<'a> {
    font: Option<FontResourceId>,
    glyphs: SmallVec<[GlyphPosition; 32]>,
    limit: usize,
    counters: &'a dyn RenderCounters,
}

impl<'a> GlyphBatch<'a> {
    fn new(limit: usize, counters: &'a dyn RenderCounters) -> Self {
        Self {
            font: None,
            glyphs: SmallVec::new(),
            limit: limit.max(1),
            counters,
        }
    }

    fn push(&mut self, ctx: &mut PaintContext, font: FontResourceId, glyph: GlyphPosition, color: Color) {
        if self.font != Some(font) || self.glyphs.len() >= self.limit {
            self.flush(ctx, color);
            self.font = Some(font);
        }
        self.glyphs.push(glyph);
    }

    fn flush(&mut self, ctx: &mut PaintContext, color: Color) {
        let Some(font) = self.font.take() else {
            return;
        };
        if self.glyphs.is_empty() {
            return;
        }
        self.counters.batch_flushed(self.glyphs.len());
        ctx.show_glyphs(font, std::mem::take(&mut self.glyphs).into_vec(), color);
    }
}

/// One repaint of a terminal into a paint context.
///
/// Clips still pushed when the frame is dropped are popped.
pub struct DrawFrame<'a> {
    draw: &'a mut TerminalDraw,
    ctx: &'a mut PaintContext,
    clips: usize,
}

impl DrawFrame<'_> {
    pub fn cell_metrics(&self) -> CellMetrics {
        self.draw.cell_metrics()
    }

    pub fn has_bold(&self, style: FontStyle) -> bool {
        self.draw.has_bold(style)
    }

    /// Restrict drawing to a rectangle until the matching [`unclip`](Self::unclip)
    pub fn clip(&mut self, x: i32, y: i32, width: i32, height: i32) {
        self.ctx.push_clip(int_rect(x, y, width, height));
        self.clips += 1;
    }

    pub fn unclip(&mut self) {
        assert!(self.clips > 0, "unclip without clip");
        self.clips -= 1;
        self.ctx.pop_clip();
    }

    /// Replace a region with `color`, alpha included
    pub fn clear(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color, alpha: f32) {
        self.ctx
            .clear_rect(int_rect(x, y, width, height), color.fade(alpha));
    }

    /// Draw a row of characters in one style.
    ///
    /// Without a real bold face, bold text is drawn a second time one pixel
    /// to the right. `attrs` only affects synthetic glyphs.
    pub fn draw_text(
        &mut self,
        requests: &[TextRequest],
        style: FontStyle,
        attrs: TextAttrs,
        color: Color,
        alpha: f32,
    ) {
        if requests.is_empty() {
            return;
        }
        let color = color.fade(alpha);
        self.draw_pass(requests, style, attrs, color, 0);
        if style.bold && !self.draw.has_bold(style) {
            self.draw_pass(requests, style, attrs, color, 1);
        }
    }

    fn draw_pass(
        &mut self,
        requests: &[TextRequest],
        style: FontStyle,
        attrs: TextAttrs,
        color: Color,
        shift: i32,
    ) {
        let draw = &*self.draw;
        let ctx = &mut *self.ctx;
        let fonts = draw.fonts();
        let metrics = fonts.metrics();
        let handle: &FontHandle = fonts.handle(style);
        let legacy = draw.config.legacy_computing;
        let mut batch = GlyphBatch::new(draw.config.glyph_batch_limit, &*draw.counters);

        for request in requests {
            let c = request.resolved();
            let x = request.x + shift;

            if is_synthetic(c, legacy) {
                batch.flush(ctx, color);
                let bounds = GlyphBox {
                    x,
                    y: request.y,
                    width: metrics.cell_width * request.columns,
                    height: metrics.cell_height,
                    char_width: metrics.char_width,
                };
                if draw_synthetic(ctx, c, bounds, legacy, attrs, color) {
                    continue;
                }
            }

            let plan = handle.lookup(c);
            let left = (x + edge_offset(plan.width, request.columns, &metrics)) as f32;
            // Every style sits on the normal face's baseline
            let baseline = (request.y + metrics.insets.top + metrics.char_ascent) as f32;

            match &plan.kind {
                PlanKind::Glyph { font, glyph } => {
                    batch.push(ctx, *font, GlyphPosition::new(*glyph as u32, left, baseline), color);
                }
                PlanKind::Run { font, glyphs } => {
                    batch.flush(ctx, color);
                    let positions = glyphs
                        .iter()
                        .map(|g| GlyphPosition::new(g.glyph_id, left + g.x + g.x_offset, baseline + g.y_offset))
                        .collect();
                    ctx.show_glyphs(font.resource, positions, color);
                }
                PlanKind::Line(line) => {
                    batch.flush(ctx, color);
                    ctx.show_line(Point::new(left, baseline), line.to_line_runs(), color);
                }
            }
        }
        batch.flush(ctx, color);
    }

    /// Stroke a 1px outline just inside the rectangle
    pub fn draw_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color, alpha: f32) {
        let rect = Rect::new(
            x as f32 + 0.5,
            y as f32 + 0.5,
            (width - 1) as f32,
            (height - 1) as f32,
        );
        self.ctx.stroke_rect(rect, color.fade(alpha), 1.0);
    }

    pub fn fill_rectangle(&mut self, x: i32, y: i32, width: i32, height: i32, color: Color, alpha: f32) {
        self.ctx.fill_rect(
            x as f32,
            y as f32,
            width as f32,
            height as f32,
            color.fade(alpha),
        );
    }

    /// A horizontal or vertical line from (x, y) to (xp, yp), both ends
    /// inclusive, at least `width` pixels thick
    #[allow(clippy::too_many_arguments)]
    pub fn draw_line(&mut self, x: i32, y: i32, xp: i32, yp: i32, width: i32, color: Color, alpha: f32) {
        let w = width.max(xp - x + 1);
        let h = width.max(yp - y + 1);
        self.fill_rectangle(x, y, w, h, color, alpha);
    }

    /// Curly underline across `count` cells starting at (x, y)
    pub fn draw_undercurl(&mut self, x: i32, y: f64, line_width: f64, count: usize, color: Color, alpha: f32) {
        let cell_width = self.draw.cell_metrics().cell_width;
        self.draw.undercurl.draw(
            self.ctx,
            cell_width,
            x as f64,
            y,
            line_width,
            count,
            color.fade(alpha),
        );
    }
}

impl Drop for DrawFrame<'_> {
    fn drop(&mut self) {
        if self.clips > 0 {
            tracing::warn!("frame ended with {} clip(s) still pushed", self.clips);
        }
        while self.clips > 0 {
            self.clips -= 1;
            self.ctx.pop_clip();
        }
    }
}

fn int_rect(x: i32, y: i32, width: i32, height: i32) -> Rect {
    Rect::new(x as f32, y as f32, width as f32, height as f32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glint_paint::PaintCommand;
    use glint_text::testing::{FakeResolver, FAKE_FALLBACK_MARK};
    use glint_text::FontHandleCache;

    fn terminal(resolver: FakeResolver, config: RenderConfig) -> TerminalDraw {
        let cache = FontHandleCache::new(Rc::new(resolver)).shared();
        let mut draw = TerminalDraw::new(cache, config);
        draw.set_font(&FontDescription::new("Fake Mono", 10.0), 1.0, 1.0)
            .unwrap();
        draw
    }

    fn render(draw: &mut TerminalDraw, text: &str, style: FontStyle) -> Vec<PaintCommand> {
        let requests: Vec<_> = text
            .chars()
            .enumerate()
            .map(|(i, c)| TextRequest::new(c, i as i32 * 10, 0))
            .collect();
        let mut ctx = PaintContext::new();
        draw.begin(&mut ctx)
            .draw_text(&requests, style, TextAttrs::NONE, Color::WHITE, 1.0);
        ctx.take_commands()
    }

    fn glyph_batches(commands: &[PaintCommand]) -> Vec<Vec<GlyphPosition>> {
        commands
            .iter()
            .filter_map(|cmd| match cmd {
                PaintCommand::ShowGlyphs { glyphs, .. } => Some(glyphs.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_light_horizontal_is_one_centered_bar() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        assert_eq!(
            render(&mut draw, "─", FontStyle::NORMAL),
            vec![PaintCommand::FillRect {
                rect: Rect::new(0.0, 9.0, 10.0, 2.0),
                color: Color::WHITE,
            }]
        );
    }

    #[test]
    fn test_full_block_and_light_shade() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        assert_eq!(
            render(&mut draw, "█", FontStyle::NORMAL),
            vec![PaintCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 10.0, 20.0),
                color: Color::WHITE,
            }]
        );
        assert_eq!(
            render(&mut draw, "░", FontStyle::NORMAL),
            vec![PaintCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 10.0, 20.0),
                color: Color::WHITE.with_alpha(0.25),
            }]
        );
    }

    #[test]
    fn test_legacy_range_follows_config() {
        let config = RenderConfig {
            legacy_computing: false,
            ..Default::default()
        };
        let mut draw = terminal(FakeResolver::new(), config);
        let commands = render(&mut draw, "\u{1FB00}", FontStyle::NORMAL);
        assert!(matches!(commands.as_slice(), [PaintCommand::ShowGlyphs { .. }]));
        assert!(draw.has_glyph('\u{2500}', FontStyle::NORMAL));
    }

    #[test]
    fn test_ascii_is_one_batch_on_the_baseline() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let batches = glyph_batches(&render(&mut draw, "ls -la", FontStyle::NORMAL));
        assert_eq!(batches.len(), 1);
        let xs: Vec<f32> = batches[0].iter().map(|g| g.x).collect();
        assert_eq!(xs, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
        assert!(batches[0].iter().all(|g| g.y == 16.0));
        assert_eq!(batches[0][0].index, 'l' as u32);
    }

    #[test]
    fn test_batch_limit_splits_draw_calls() {
        let config = RenderConfig {
            glyph_batch_limit: 3,
            ..Default::default()
        };
        let mut draw = terminal(FakeResolver::new(), config);
        let sizes: Vec<usize> = glyph_batches(&render(&mut draw, "abcdefg", FontStyle::NORMAL))
            .iter()
            .map(Vec::len)
            .collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn test_slow_plans_break_the_batch() {
        let resolver = FakeResolver::new()
            .with_multi_glyph(['ж'])
            .with_fallback_chars(['ą']);
        let mut draw = terminal(resolver, RenderConfig::default());
        let commands = render(&mut draw, "aжbąc", FontStyle::NORMAL);

        assert_eq!(commands.len(), 5);
        match &commands[1] {
            PaintCommand::ShowGlyphs { glyphs, .. } => {
                assert_eq!(glyphs.len(), 2);
                assert_eq!(glyphs[0].x, 10.0);
                assert_eq!(glyphs[1].x, 15.0);
            }
            other => panic!("expected a glyph run, got {other:?}"),
        }
        match &commands[3] {
            PaintCommand::ShowLine { origin, runs, .. } => {
                assert_eq!(*origin, Point::new(30.0, 16.0));
                assert_eq!(runs.len(), 2);
                assert_eq!(runs[1].glyphs[0].index, FAKE_FALLBACK_MARK);
            }
            other => panic!("expected a shaped line, got {other:?}"),
        }
        assert!(matches!(commands[4], PaintCommand::ShowGlyphs { ref glyphs, .. } if glyphs.len() == 1));
    }

    #[test]
    fn test_synthetic_glyph_flushes_pending_batch() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let commands = render(&mut draw, "a│b", FontStyle::NORMAL);
        assert!(matches!(commands[0], PaintCommand::ShowGlyphs { .. }));
        assert!(matches!(commands[1], PaintCommand::FillRect { .. }));
        assert!(matches!(commands[2], PaintCommand::ShowGlyphs { .. }));
    }

    #[test]
    fn test_edge_alignment_thresholds() {
        // char 10px, cell 15px, insets 2 left and 3 right
        let resolver = FakeResolver::new()
            .with_char_advance('é', 10.0)
            .with_char_advance('ñ', 13.0)
            .with_char_advance('ü', 15.0)
            .with_char_advance('ö', 16.0);
        let cache = FontHandleCache::new(Rc::new(resolver)).shared();
        let mut draw = TerminalDraw::new(cache, RenderConfig::default());
        draw.set_font(&FontDescription::new("Fake Mono", 10.0), 1.5, 1.0)
            .unwrap();
        assert_eq!(draw.cell_metrics().cell_width, 15);

        assert_eq!(draw.glyph_edges('é', 1, FontStyle::NORMAL), (2, 12));
        assert_eq!(draw.glyph_edges('ñ', 1, FontStyle::NORMAL), (1, 14));
        assert_eq!(draw.glyph_edges('ü', 1, FontStyle::NORMAL), (0, 15));
        assert_eq!(draw.glyph_edges('ö', 1, FontStyle::NORMAL), (0, 16));
        // Wide cells take the whole inset
        assert_eq!(draw.glyph_edges('é', 2, FontStyle::NORMAL), (5, 15));
        assert_eq!(draw.glyph_edges('─', 2, FontStyle::NORMAL), (0, 30));
    }

    #[test]
    fn test_styles_share_the_normal_baseline() {
        let cache = FontHandleCache::new(Rc::new(FakeResolver::new())).shared();
        let mut draw = TerminalDraw::new(cache, RenderConfig::default());
        draw.set_font(&FontDescription::new("Fake Mono", 10.0), 1.0, 1.5)
            .unwrap();
        // 30px cell, 5px top inset, ascent 16
        for style in FontStyle::ALL {
            let batches = glyph_batches(&render(&mut draw, "x", style));
            assert_eq!(batches[0][0].y, 21.0, "{style:?}");
        }
    }

    #[test]
    fn test_fake_bold_draws_twice() {
        let mut draw = terminal(
            FakeResolver::new().with_style_advance(true, false, 13.0),
            RenderConfig::default(),
        );
        assert!(!draw.has_bold(FontStyle::BOLD));
        let batches = glyph_batches(&render(&mut draw, "ab", FontStyle::BOLD));
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0][0].x, 0.0);
        assert_eq!(batches[1][0].x, 1.0);
    }

    #[test]
    fn test_real_bold_draws_once() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        assert!(draw.has_bold(FontStyle::BOLD));
        assert_eq!(glyph_batches(&render(&mut draw, "ab", FontStyle::BOLD)).len(), 1);
    }

    #[test]
    fn test_mirroring_happens_before_lookup() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let mut ctx = PaintContext::new();
        draw.begin(&mut ctx).draw_text(
            &[
                TextRequest::new('(', 0, 0).mirrored(false),
                TextRequest::new('┌', 10, 0).mirrored(false),
            ],
            FontStyle::NORMAL,
            TextAttrs::NONE,
            Color::WHITE,
            1.0,
        );
        let mirrored_box = {
            let mut ctx = PaintContext::new();
            draw.begin(&mut ctx).draw_text(
                &[TextRequest::new('┌', 10, 0).mirrored(true)],
                FontStyle::NORMAL,
                TextAttrs::NONE,
                Color::WHITE,
                1.0,
            );
            ctx.take_commands()
        };
        let unmirrored_box = render_at(&mut draw, '┐', 10);

        let commands = ctx.take_commands();
        assert_eq!(glyph_batches(&commands)[0][0].index, ')' as u32);
        assert_ne!(commands[1..], unmirrored_box[..]);
        assert_eq!(mirrored_box, unmirrored_box);
    }

    fn render_at(draw: &mut TerminalDraw, c: char, x: i32) -> Vec<PaintCommand> {
        let mut ctx = PaintContext::new();
        draw.begin(&mut ctx)
            .draw_text(
                &[TextRequest::new(c, x, 0)],
                FontStyle::NORMAL,
                TextAttrs::NONE,
                Color::WHITE,
                1.0,
            );
        ctx.take_commands()
    }

    #[test]
    fn test_alpha_scales_color() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let mut ctx = PaintContext::new();
        draw.begin(&mut ctx)
            .draw_text(
                &[TextRequest::new('a', 0, 0)],
                FontStyle::NORMAL,
                TextAttrs::NONE,
                Color::WHITE,
                0.5,
            );
        match &ctx.commands()[0] {
            PaintCommand::ShowGlyphs { color, .. } => assert_eq!(color.a, 0.5),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_has_glyph() {
        let mut draw = terminal(FakeResolver::new().with_missing(['ø']), RenderConfig::default());
        assert!(draw.has_glyph('a', FontStyle::NORMAL));
        assert!(!draw.has_glyph('ø', FontStyle::NORMAL));
        assert!(draw.has_glyph('▒', FontStyle::ITALIC));
        // Missing glyphs still draw a placeholder
        assert_eq!(glyph_batches(&render(&mut draw, "ø", FontStyle::NORMAL))[0][0].index, 0);
    }

    #[test]
    fn test_rectangles_and_lines() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let mut ctx = PaintContext::new();
        {
            let mut frame = draw.begin(&mut ctx);
            frame.draw_rectangle(10, 20, 30, 40, Color::WHITE, 1.0);
            frame.fill_rectangle(1, 2, 3, 4, Color::WHITE, 1.0);
            frame.draw_line(0, 5, 9, 5, 2, Color::WHITE, 1.0);
            frame.draw_line(3, 0, 3, 19, 1, Color::WHITE, 1.0);
        }
        let commands = ctx.take_commands();
        assert_eq!(
            commands[0],
            PaintCommand::StrokeRect {
                rect: Rect::new(10.5, 20.5, 29.0, 39.0),
                style: glint_paint::StrokeStyle {
                    color: Color::WHITE,
                    width: 1.0,
                    ..Default::default()
                },
            }
        );
        let fills: Vec<Rect> = commands[1..]
            .iter()
            .map(|cmd| match cmd {
                PaintCommand::FillRect { rect, .. } => *rect,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(
            fills,
            vec![
                Rect::new(1.0, 2.0, 3.0, 4.0),
                Rect::new(0.0, 5.0, 10.0, 2.0),
                Rect::new(3.0, 0.0, 1.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_clear_replaces() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let mut ctx = PaintContext::new();
        draw.begin(&mut ctx)
            .clear(0, 0, 80, 40, Color::BLACK, 1.0);
        assert_eq!(
            ctx.commands(),
            [PaintCommand::Clear {
                rect: Rect::new(0.0, 0.0, 80.0, 40.0),
                color: Color::BLACK,
            }]
        );
    }

    #[test]
    fn test_frame_pops_leftover_clips() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let mut ctx = PaintContext::new();
        {
            let mut frame = draw.begin(&mut ctx);
            frame.clip(0, 0, 100, 100);
            frame.clip(10, 10, 20, 20);
            frame.unclip();
            frame.clip(10, 10, 20, 20);
        }
        assert!(ctx.is_balanced());
    }

    #[test]
    #[should_panic(expected = "unclip without clip")]
    fn test_unbalanced_unclip_panics() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let mut ctx = PaintContext::new();
        draw.begin(&mut ctx).unclip();
    }

    #[test]
    #[should_panic(expected = "draw called before set_font")]
    fn test_drawing_without_a_font_panics() {
        let cache = FontHandleCache::new(Rc::new(FakeResolver::new())).shared();
        let mut draw = TerminalDraw::new(cache, RenderConfig::default());
        let mut ctx = PaintContext::new();
        draw.begin(&mut ctx)
            .draw_text(
                &[TextRequest::new('a', 0, 0)],
                FontStyle::NORMAL,
                TextAttrs::NONE,
                Color::WHITE,
                1.0,
            );
    }

    #[test]
    fn test_font_change_invalidates_undercurl() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let mut ctx = PaintContext::new();
        draw.begin(&mut ctx)
            .draw_undercurl(0, 18.0, 1.0, 4, Color::WHITE, 1.0);
        assert!(draw.undercurl.is_cached());
        assert_eq!(ctx.commands().len(), 4);

        draw.set_font(&FontDescription::new("Fake Mono", 12.0), 1.0, 1.0)
            .unwrap();
        assert!(!draw.undercurl.is_cached());
    }

    #[test]
    fn test_scale_is_clamped() {
        let cache = FontHandleCache::new(Rc::new(FakeResolver::new())).shared();
        let mut draw = TerminalDraw::new(cache, RenderConfig::default());
        draw.set_font(&FontDescription::new("Fake Mono", 10.0), 3.0, 0.5)
            .unwrap();
        let metrics = draw.cell_metrics();
        assert_eq!(metrics.cell_width, 20);
        assert_eq!(metrics.cell_height, 20);
    }

    #[test]
    fn test_wide_cells_keep_the_natural_stroke() {
        let cache = FontHandleCache::new(Rc::new(FakeResolver::new())).shared();
        let mut draw = TerminalDraw::new(cache, RenderConfig::default());
        draw.set_font(&FontDescription::new("Fake Mono", 10.0), 2.0, 1.0)
            .unwrap();
        assert_eq!(draw.cell_metrics().char_width, 10);

        match &render_at(&mut draw, '─', 0)[..] {
            [PaintCommand::FillRect { rect, .. }] => {
                assert_eq!(rect.width, 20.0);
                assert_eq!(rect.height, 2.0);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_separated_mosaic_attribute() {
        let mut draw = terminal(FakeResolver::new(), RenderConfig::default());
        let draw_with = |draw: &mut TerminalDraw, attrs: TextAttrs| {
            let requests = [TextRequest::new('a', 0, 0), TextRequest::new('▚', 10, 0)];
            let mut ctx = PaintContext::new();
            draw.begin(&mut ctx)
                .draw_text(&requests, FontStyle::NORMAL, attrs, Color::WHITE, 1.0);
            ctx.take_commands()
        };

        let plain = draw_with(&mut draw, TextAttrs::NONE);
        let separated = draw_with(&mut draw, TextAttrs::SEPARATED_MOSAIC);
        assert!(!plain
            .iter()
            .any(|cmd| matches!(cmd, PaintCommand::PushGroup)));
        assert_eq!(glyph_batches(&plain), glyph_batches(&separated));
        assert!(matches!(separated[1], PaintCommand::PushGroup));
        match separated.last() {
            Some(PaintCommand::PopGroupMasked { mask }) => {
                let blocks = mask.separation_blocks();
                assert_eq!(blocks.len(), 6);
                assert_eq!(blocks[0], Rect::new(12.0, 0.0, 3.0, 5.0));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_failed_font_change_keeps_old_font() {
        let cache = FontHandleCache::new(Rc::new(FakeResolver::new().with_unavailable_family("Nope")))
            .shared();
        let mut draw = TerminalDraw::new(cache, RenderConfig::default());
        draw.set_font(&FontDescription::new("Fake Mono", 10.0), 1.0, 1.0)
            .unwrap();
        assert!(draw
            .set_font(&FontDescription::new("Nope", 10.0), 1.0, 1.0)
            .is_err());
        assert_eq!(draw.cell_metrics().cell_width, 10);
    }

    #[test]
    fn test_drop_releases_handles() {
        let draw = terminal(FakeResolver::new(), RenderConfig::default());
        let normal = Rc::clone(draw.font_set().unwrap().handle(FontStyle::NORMAL));
        assert_eq!(normal.refcount(), 1);
        drop(draw);
        assert_eq!(normal.refcount(), 0);
        assert!(normal.is_pending_destroy());
    }
}
