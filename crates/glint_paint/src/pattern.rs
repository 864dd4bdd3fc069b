//! Pattern sources
//!
//! Patterns paint the current color through a coverage function instead of
//! covering the whole shape.

use crate::primitives::Rect;

/// A repeating 1-bit tile, at most 8x8 device pixels.
///
/// Row `y` bit `x` (LSB first) set means the pixel is painted. The tile is
/// anchored at the device origin so adjacent cells line up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stipple {
    pub width: u8,
    pub height: u8,
    pub rows: [u8; 8],
}

impl Stipple {
    /// 50% checkerboard, one pixel per square
    pub const CHECKER: Stipple = Stipple::new(2, 2, [0b01, 0b10, 0, 0, 0, 0, 0, 0]);
    /// Complement of [`Stipple::CHECKER`]
    pub const CHECKER_INVERSE: Stipple = Stipple::new(2, 2, [0b10, 0b01, 0, 0, 0, 0, 0, 0]);
    /// Diagonal hatching falling from upper left to lower right
    pub const DIAGONAL_DOWN: Stipple =
        Stipple::new(4, 4, [0b0011, 0b0110, 0b1100, 0b1001, 0, 0, 0, 0]);
    /// Diagonal hatching rising from lower left to upper right
    pub const DIAGONAL_UP: Stipple =
        Stipple::new(4, 4, [0b1100, 0b0110, 0b0011, 0b1001, 0, 0, 0, 0]);

    pub const fn new(width: u8, height: u8, rows: [u8; 8]) -> Self {
        Self {
            width,
            height,
            rows,
        }
    }

    /// Whether device pixel (x, y) is painted
    pub fn covers(&self, x: i64, y: i64) -> bool {
        let tx = x.rem_euclid(self.width as i64) as u32;
        let ty = y.rem_euclid(self.height as i64) as usize;
        self.rows[ty] & (1 << tx) != 0
    }

    /// Fraction of the tile that is painted
    pub fn density(&self) -> f32 {
        let mut set = 0u32;
        for row in &self.rows[..self.height as usize] {
            let mask = (1u16 << self.width) - 1;
            set += (*row as u16 & mask).count_ones();
        }
        set as f32 / (self.width as f32 * self.height as f32)
    }
}

/// A coverage source for fills and group masks
#[derive(Clone, Debug, PartialEq)]
pub enum Pattern {
    /// Repeating bitmap texture
    Stipple(Stipple),
    /// Opaque sub-blocks on a `columns` x `rows` grid over `bounds`, each
    /// blanked by `gap` pixels along its left and bottom edges. Sub-block
    /// edges are rounded to whole pixels.
    Separation {
        bounds: Rect,
        columns: u8,
        rows: u8,
        gap: f32,
    },
}

impl Pattern {
    /// The opaque sub-blocks a [`Pattern::Separation`] is made of.
    ///
    /// Returns an empty list for other patterns, and for bounds too small
    /// to hold one `gap` per sub-block, which mask everything out.
    pub fn separation_blocks(&self) -> Vec<Rect> {
        let Pattern::Separation {
            bounds,
            columns,
            rows,
            gap,
        } = self
        else {
            return Vec::new();
        };

        if bounds.width <= *columns as f32 * gap || bounds.height <= *rows as f32 * gap {
            return Vec::new();
        }

        let mut blocks = Vec::with_capacity(*columns as usize * *rows as usize);
        for row in 0..*rows {
            let top = bounds.y + (bounds.height * row as f32 / *rows as f32).round();
            let bottom = bounds.y + (bounds.height * (row + 1) as f32 / *rows as f32).round();
            for col in 0..*columns {
                let left = bounds.x + (bounds.width * col as f32 / *columns as f32).round();
                let right = bounds.x + (bounds.width * (col + 1) as f32 / *columns as f32).round();
                blocks.push(Rect::from_ltrb(
                    left + gap,
                    top,
                    right.max(left + gap),
                    (bottom - gap).max(top),
                ));
            }
        }
        blocks
    }
}
