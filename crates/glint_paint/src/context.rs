//! Paint context - the recording drawing API

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::color::Color;
use crate::glyph::{FontResourceId, GlyphPosition, LineRun};
use crate::path::{Path, Point};
use crate::pattern::Pattern;
use crate::primitives::Rect;

/// Global mask surface ID counter
static NEXT_SURFACE_ID: AtomicU64 = AtomicU64::new(1);

/// Fill rule for paths
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke style
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
    pub line_cap: LineCap,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
            line_cap: LineCap::Butt,
        }
    }
}

/// An alpha-only offscreen surface.
///
/// Recorded once, then composited any number of times through
/// [`PaintCommand::MaskSurface`] with the caller's color.
#[derive(Debug, PartialEq)]
pub struct MaskSurface {
    id: u64,
    width: u32,
    height: u32,
    commands: Vec<PaintCommand>,
}

impl MaskSurface {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Commands that produce the mask coverage, in surface-local space
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }
}

/// A paint command for the renderer
#[derive(Clone, Debug, PartialEq)]
pub enum PaintCommand {
    FillRect {
        rect: Rect,
        color: Color,
    },
    StrokeRect {
        rect: Rect,
        style: StrokeStyle,
    },
    FillPath {
        path: Path,
        color: Color,
        rule: FillRule,
    },
    StrokePath {
        path: Path,
        style: StrokeStyle,
    },
    /// Fill `path` with `color` through a pattern's coverage
    FillPattern {
        path: Path,
        pattern: Pattern,
        color: Color,
    },
    /// Replace (source operator) the pixels of `rect` with `color`
    Clear {
        rect: Rect,
        color: Color,
    },
    /// Positioned glyphs from one scaled font, in a single call
    ShowGlyphs {
        font: FontResourceId,
        glyphs: Vec<GlyphPosition>,
        color: Color,
    },
    /// A shaped line spanning several fonts
    ShowLine {
        origin: Point,
        runs: Vec<LineRun>,
        color: Color,
    },
    PushClip {
        rect: Rect,
    },
    PopClip,
    /// Redirect drawing into an offscreen group
    PushGroup,
    /// Composite the current group through `mask`
    PopGroupMasked {
        mask: Pattern,
    },
    /// Paint `color` through a mask surface placed at (x, y)
    MaskSurface {
        surface: Arc<MaskSurface>,
        x: f32,
        y: f32,
        color: Color,
    },
}

/// The paint context used for cell drawing
pub struct PaintContext {
    commands: Vec<PaintCommand>,
    clip_stack: Vec<Rect>,
    group_depth: usize,
}

impl PaintContext {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            clip_stack: Vec::new(),
            group_depth: 0,
        }
    }

    /// Get all recorded commands
    pub fn commands(&self) -> &[PaintCommand] {
        &self.commands
    }

    /// Take ownership of recorded commands
    pub fn take_commands(&mut self) -> Vec<PaintCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Whether every pushed clip and group has been popped
    pub fn is_balanced(&self) -> bool {
        self.clip_stack.is_empty() && self.group_depth == 0
    }

    /// The innermost active clip rectangle
    pub fn current_clip(&self) -> Option<Rect> {
        self.clip_stack.last().copied()
    }

    // === Shape drawing ===

    pub fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: Color) {
        self.commands.push(PaintCommand::FillRect {
            rect: Rect::new(x, y, width, height),
            color,
        });
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, line_width: f32) {
        self.commands.push(PaintCommand::StrokeRect {
            rect,
            style: StrokeStyle {
                color,
                width: line_width,
                ..Default::default()
            },
        });
    }

    pub fn clear_rect(&mut self, rect: Rect, color: Color) {
        self.commands.push(PaintCommand::Clear { rect, color });
    }

    // === Path drawing ===

    pub fn fill_path(&mut self, path: Path, color: Color, rule: FillRule) {
        self.commands.push(PaintCommand::FillPath { path, color, rule });
    }

    pub fn stroke_path(&mut self, path: Path, style: StrokeStyle) {
        self.commands.push(PaintCommand::StrokePath { path, style });
    }

    // === Patterns ===

    pub fn fill_pattern(&mut self, path: Path, pattern: Pattern, color: Color) {
        self.commands
            .push(PaintCommand::FillPattern { path, pattern, color });
    }

    // === Glyphs ===

    pub fn show_glyphs(&mut self, font: FontResourceId, glyphs: Vec<GlyphPosition>, color: Color) {
        if glyphs.is_empty() {
            return;
        }
        self.commands
            .push(PaintCommand::ShowGlyphs { font, glyphs, color });
    }

    pub fn show_line(&mut self, origin: Point, runs: Vec<LineRun>, color: Color) {
        self.commands
            .push(PaintCommand::ShowLine { origin, runs, color });
    }

    // === Clipping ===

    pub fn push_clip(&mut self, rect: Rect) {
        self.clip_stack.push(rect);
        self.commands.push(PaintCommand::PushClip { rect });
    }

    pub fn pop_clip(&mut self) {
        assert!(self.clip_stack.pop().is_some(), "pop_clip without push_clip");
        self.commands.push(PaintCommand::PopClip);
    }

    // === Groups and masks ===

    pub fn push_group(&mut self) {
        self.group_depth += 1;
        self.commands.push(PaintCommand::PushGroup);
    }

    pub fn pop_group_masked(&mut self, mask: Pattern) {
        assert!(self.group_depth > 0, "pop_group_masked without push_group");
        self.group_depth -= 1;
        self.commands.push(PaintCommand::PopGroupMasked { mask });
    }

    /// Record an alpha-only surface of `width` x `height` pixels.
    ///
    /// The closure draws into a fresh context whose origin is the surface's
    /// top-left corner. Colors drawn there only contribute their alpha.
    pub fn new_mask(
        width: u32,
        height: u32,
        draw: impl FnOnce(&mut PaintContext),
    ) -> Arc<MaskSurface> {
        let mut ctx = PaintContext::new();
        draw(&mut ctx);
        debug_assert!(ctx.is_balanced(), "unbalanced clip/group in mask surface");
        Arc::new(MaskSurface {
            id: NEXT_SURFACE_ID.fetch_add(1, Ordering::Relaxed),
            width,
            height,
            commands: ctx.take_commands(),
        })
    }

    pub fn paint_mask(&mut self, surface: &Arc<MaskSurface>, x: f32, y: f32, color: Color) {
        self.commands.push(PaintCommand::MaskSurface {
            surface: Arc::clone(surface),
            x,
            y,
            color,
        });
    }
}

impl Default for PaintContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_order() {
        let mut ctx = PaintContext::new();
        ctx.push_clip(Rect::new(0.0, 0.0, 10.0, 10.0));
        ctx.fill_rect(1.0, 2.0, 3.0, 4.0, Color::WHITE);
        ctx.pop_clip();

        let cmds = ctx.commands();
        assert_eq!(cmds.len(), 3);
        assert!(matches!(cmds[0], PaintCommand::PushClip { .. }));
        assert_eq!(
            cmds[1],
            PaintCommand::FillRect {
                rect: Rect::new(1.0, 2.0, 3.0, 4.0),
                color: Color::WHITE
            }
        );
        assert!(ctx.is_balanced());
    }

    #[test]
    #[should_panic(expected = "pop_clip without push_clip")]
    fn test_unbalanced_pop_clip_panics() {
        PaintContext::new().pop_clip();
    }

    #[test]
    fn test_empty_glyph_batch_is_dropped() {
        let mut ctx = PaintContext::new();
        ctx.show_glyphs(FontResourceId(1), Vec::new(), Color::WHITE);
        assert!(ctx.commands().is_empty());
    }

    #[test]
    fn test_mask_surfaces_get_unique_ids() {
        let a = PaintContext::new_mask(4, 4, |ctx| ctx.fill_rect(0.0, 0.0, 4.0, 4.0, Color::WHITE));
        let b = PaintContext::new_mask(4, 4, |_| {});
        assert_ne!(a.id(), b.id());
        assert_eq!(a.commands().len(), 1);

        let mut ctx = PaintContext::new();
        ctx.paint_mask(&a, 2.0, 3.0, Color::BLACK);
        ctx.paint_mask(&a, 12.0, 3.0, Color::BLACK);
        match (&ctx.commands()[0], &ctx.commands()[1]) {
            (
                PaintCommand::MaskSurface { surface: s1, .. },
                PaintCommand::MaskSurface { surface: s2, .. },
            ) => assert!(Arc::ptr_eq(s1, s2)),
            _ => panic!("expected mask commands"),
        }
    }
}
