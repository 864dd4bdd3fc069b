//! Block elements (U+2580..U+259F), the black corner triangles and the
//! eighth-block family of the legacy computing symbols

use glint_paint::FillRule;

use super::GlyphCanvas;

/// Quadrant masks for U+2596..U+259F. Bit 0 upper left, 1 upper right,
/// 2 lower left, 3 lower right.
const QUADRANTS: [u8; 10] = [
    0b0100, // ▖
    0b1000, // ▗
    0b0001, // ▘
    0b1101, // ▙
    0b1001, // ▚
    0b0111, // ▛
    0b1011, // ▜
    0b0010, // ▝
    0b0110, // ▞
    0b1110, // ▟
];

/// Eighths covered by U+1FB82..U+1FB86 (upper) and U+1FB87..U+1FB8B (right)
const PARTIAL_EIGHTHS: [i32; 5] = [2, 3, 5, 6, 7];

pub(super) fn draw_block_element(canvas: &mut GlyphCanvas<'_>, c: char) -> bool {
    let (w, h) = (canvas.width, canvas.height);
    match c as u32 {
        0x2580 => canvas.fill(0, 0, w, canvas.frac_y(1, 2)),
        // Lower one eighth through lower seven eighths
        0x2581..=0x2587 => {
            let eighths = (c as u32 - 0x2580) as i32;
            canvas.fill(0, h - canvas.frac_y(eighths, 8), w, h);
        }
        0x2588 => canvas.fill(0, 0, w, h),
        // Left seven eighths down to left one eighth
        0x2589..=0x258F => {
            let eighths = (0x2590 - c as u32) as i32;
            canvas.fill(0, 0, canvas.frac_x(eighths, 8), h);
        }
        0x2590 => canvas.fill(canvas.frac_x(1, 2), 0, w, h),
        // Light, medium and dark shade
        0x2591..=0x2593 => {
            let alpha = (c as u32 - 0x2590) as f32 / 4.0;
            let color = canvas.color.fade(alpha);
            canvas.fill_with(0, 0, w, h, color);
        }
        0x2594 => canvas.fill(0, 0, w, canvas.frac_y(1, 8)),
        0x2595 => canvas.fill(w - canvas.frac_x(1, 8), 0, w, h),
        0x2596..=0x259F => canvas.fill_mask(QUADRANTS[(c as u32 - 0x2596) as usize], 2, 2),
        _ => return false,
    }
    true
}

/// ◢ ◣ ◤ ◥, each filling half the cell up to the diagonal
pub(super) fn draw_corner_triangle(canvas: &mut GlyphCanvas<'_>, c: char) -> bool {
    let (w, h) = (canvas.width as f32, canvas.height as f32);
    let points = match c as u32 {
        0x25E2 => [(w, 0.0), (w, h), (0.0, h)],
        0x25E3 => [(0.0, 0.0), (w, h), (0.0, h)],
        0x25E4 => [(0.0, 0.0), (w, 0.0), (0.0, h)],
        0x25E5 => [(0.0, 0.0), (w, 0.0), (w, h)],
        _ => return false,
    };
    let path = canvas.polygon(&points);
    canvas.fill_path(path, FillRule::NonZero);
    true
}

/// Eighth blocks, thirds and quarter blocks from the legacy computing
/// ranges. Returns `false` for anything else.
pub(super) fn draw_legacy_block(canvas: &mut GlyphCanvas<'_>, c: char) -> bool {
    let (w, h) = (canvas.width, canvas.height);
    match c as u32 {
        // Vertical one eighth block-2 through -7
        0x1FB70..=0x1FB75 => {
            let column = (c as u32 - 0x1FB70) as i32 + 1;
            canvas.fill(canvas.frac_x(column, 8), 0, canvas.frac_x(column + 1, 8), h);
        }
        // Horizontal one eighth block-2 through -7
        0x1FB76..=0x1FB7B => {
            let row = (c as u32 - 0x1FB76) as i32 + 1;
            canvas.fill(0, canvas.frac_y(row, 8), w, canvas.frac_y(row + 1, 8));
        }
        // Corners built from one-eighth edges
        0x1FB7C..=0x1FB7F => {
            let (edge_x, edge_y) = (canvas.frac_x(1, 8), canvas.frac_y(1, 8));
            let (left, top) = match c as u32 {
                0x1FB7C => (true, false),
                0x1FB7D => (true, true),
                0x1FB7E => (false, true),
                _ => (false, false),
            };
            if left {
                canvas.fill(0, 0, edge_x, h);
            } else {
                canvas.fill(w - edge_x, 0, w, h);
            }
            if top {
                canvas.fill(0, 0, w, edge_y);
            } else {
                canvas.fill(0, h - edge_y, w, h);
            }
        }
        0x1FB80 => {
            let edge = canvas.frac_y(1, 8);
            canvas.fill(0, 0, w, edge);
            canvas.fill(0, h - edge, w, h);
        }
        // Horizontal one eighth block-1358
        0x1FB81 => {
            for row in [0, 2, 4, 7] {
                canvas.fill(0, canvas.frac_y(row, 8), w, canvas.frac_y(row + 1, 8));
            }
        }
        0x1FB82..=0x1FB86 => {
            let eighths = PARTIAL_EIGHTHS[(c as u32 - 0x1FB82) as usize];
            canvas.fill(0, 0, w, canvas.frac_y(eighths, 8));
        }
        0x1FB87..=0x1FB8B => {
            let eighths = PARTIAL_EIGHTHS[(c as u32 - 0x1FB87) as usize];
            canvas.fill(w - canvas.frac_x(eighths, 8), 0, w, h);
        }
        0x1FBCE => canvas.fill(0, 0, canvas.frac_x(2, 3), h),
        0x1FBCF => canvas.fill(0, 0, canvas.frac_x(1, 3), h),
        // Middle left and middle right one quarter
        0x1FBE6 => canvas.fill(0, canvas.frac_y(1, 4), canvas.frac_x(1, 2), canvas.frac_y(3, 4)),
        0x1FBE7 => canvas.fill(canvas.frac_x(1, 2), canvas.frac_y(1, 4), w, canvas.frac_y(3, 4)),
        _ => return false,
    }
    true
}
