//! Curly underline
//!
//! One cell's worth of the wave is recorded once into an alpha mask and then
//! composited once per cell. The mask bakes in the sub-pixel part of the
//! vertical position and the stroke width, so it is rebuilt when either
//! changes and dropped whenever the font changes.

use std::f64::consts::{FRAC_PI_4, PI, SQRT_2};
use std::sync::Arc;

use glint_paint::{Color, LineCap, MaskSurface, PaintContext, PathBuilder, StrokeStyle};

/// Radius of the two quarter circles making up one wave
pub fn undercurl_radius(cell_width: i32) -> f64 {
    cell_width as f64 / 2.0 / SQRT_2
}

/// How far one quarter circle rises above its chord
fn arc_height(cell_width: i32) -> f64 {
    undercurl_radius(cell_width) * (1.0 - SQRT_2 / 2.0)
}

/// Total height of the wave, stroke included
pub fn undercurl_height(cell_width: i32, line_width: f64) -> f64 {
    2.0 * arc_height(cell_width) + line_width
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct MaskKey {
    y_fraction: u64,
    line_width: u64,
    cell_width: i32,
}

impl MaskKey {
    fn new(y: f64, line_width: f64, cell_width: i32) -> Self {
        Self {
            y_fraction: (y - y.floor()).to_bits(),
            line_width: line_width.to_bits(),
            cell_width,
        }
    }
}

/// The cached wave mask
#[derive(Default)]
pub struct UndercurlCache {
    mask: Option<(MaskKey, Arc<MaskSurface>)>,
}

impl UndercurlCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the mask; the next draw re-records it
    pub fn invalidate(&mut self) {
        self.mask = None;
    }

    pub fn is_cached(&self) -> bool {
        self.mask.is_some()
    }

    /// Horizontal overflow into the neighbouring cells
    fn padding(line_width: f64) -> i32 {
        (line_width + 1.0) as i32
    }

    fn surface(&mut self, cell_width: i32, y: f64, line_width: f64) -> Arc<MaskSurface> {
        let key = MaskKey::new(y, line_width, cell_width);
        if let Some((cached, surface)) = &self.mask {
            if *cached == key {
                return Arc::clone(surface);
            }
        }

        let padding = Self::padding(line_width);
        let top = y.floor();
        let bottom = y + undercurl_height(cell_width, line_width);
        let centre = (y + bottom) / 2.0 - top;
        let width = (cell_width + 2 * padding).max(1) as u32;
        let height = ((bottom + 1.0).floor() - top).max(1.0) as u32;

        let quarter = cell_width as f64 / 4.0;
        let radius = undercurl_radius(cell_width);
        let left = padding as f64;
        // Left half of a tilde, then the right half
        let path = PathBuilder::new()
            .arc(
                (left + quarter) as f32,
                (centre + quarter) as f32,
                radius as f32,
                (PI * 5.0 / 4.0) as f32,
                (PI * 7.0 / 4.0) as f32,
            )
            .arc_negative(
                (left + quarter * 3.0) as f32,
                (centre - quarter) as f32,
                radius as f32,
                (PI * 3.0 / 4.0) as f32,
                FRAC_PI_4 as f32,
            )
            .build();

        let surface = PaintContext::new_mask(width, height, |ctx| {
            ctx.stroke_path(
                path,
                StrokeStyle {
                    color: Color::WHITE,
                    width: line_width as f32,
                    line_cap: LineCap::Butt,
                },
            );
        });
        tracing::trace!(
            "recorded undercurl mask {}x{} (line width {})",
            width,
            height,
            line_width
        );
        self.mask = Some((key, Arc::clone(&surface)));
        surface
    }

    /// Paint `count` cells of undercurl starting at (x, y)
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &mut self,
        ctx: &mut PaintContext,
        cell_width: i32,
        x: f64,
        y: f64,
        line_width: f64,
        count: usize,
        color: Color,
    ) {
        if count == 0 || cell_width <= 0 {
            return;
        }
        let surface = self.surface(cell_width, y, line_width);
        let origin_x = x - Self::padding(line_width) as f64;
        let top = y.floor();
        for i in 0..count {
            ctx.paint_mask(
                &surface,
                (origin_x + (i as i32 * cell_width) as f64) as f32,
                top as f32,
                color,
            );
        }
    }
}
