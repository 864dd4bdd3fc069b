//! Box drawing (U+2500..U+257F)
//!
//! Straight lines are laid out on a 5x5 grid. Column and row boundaries
//! put the light stroke in the middle band and the heavy stroke across the
//! three middle bands, so every junction lines up with its neighbours.
//! In the double-line block the heavy width is three light widths and the
//! two outer bands carry the pair of thin lines.

use std::f32::consts::{FRAC_PI_2, PI};

use glint_paint::{Path, PathBuilder};
use smallvec::SmallVec;

use super::GlyphCanvas;

const NONE: u8 = 0;
const LIGHT: u8 = 1;
const HEAVY: u8 = 2;

/// [left, right, up, down] stroke weights for U+2500..U+254F and the
/// half lines at U+2574..U+257F. Dashes reuse their solid counterparts.
#[rustfmt::skip]
const SEGMENTS: [[u8; 4]; 80] = [
    [1,1,0,0], [2,2,0,0], [0,0,1,1], [0,0,2,2], // ─ ━ │ ┃
    [1,1,0,0], [2,2,0,0], [0,0,1,1], [0,0,2,2], // ┄ ┅ ┆ ┇
    [1,1,0,0], [2,2,0,0], [0,0,1,1], [0,0,2,2], // ┈ ┉ ┊ ┋
    [0,1,0,1], [0,2,0,1], [0,1,0,2], [0,2,0,2], // ┌ ┍ ┎ ┏
    [1,0,0,1], [2,0,0,1], [1,0,0,2], [2,0,0,2], // ┐ ┑ ┒ ┓
    [0,1,1,0], [0,2,1,0], [0,1,2,0], [0,2,2,0], // └ ┕ ┖ ┗
    [1,0,1,0], [2,0,1,0], [1,0,2,0], [2,0,2,0], // ┘ ┙ ┚ ┛
    [0,1,1,1], [0,2,1,1], [0,1,2,1], [0,1,1,2], // ├ ┝ ┞ ┟
    [0,1,2,2], [0,2,2,1], [0,2,1,2], [0,2,2,2], // ┠ ┡ ┢ ┣
    [1,0,1,1], [2,0,1,1], [1,0,2,1], [1,0,1,2], // ┤ ┥ ┦ ┧
    [1,0,2,2], [2,0,2,1], [2,0,1,2], [2,0,2,2], // ┨ ┩ ┪ ┫
    [1,1,0,1], [2,1,0,1], [1,2,0,1], [2,2,0,1], // ┬ ┭ ┮ ┯
    [1,1,0,2], [2,1,0,2], [1,2,0,2], [2,2,0,2], // ┰ ┱ ┲ ┳
    [1,1,1,0], [2,1,1,0], [1,2,1,0], [2,2,1,0], // ┴ ┵ ┶ ┷
    [1,1,2,0], [2,1,2,0], [1,2,2,0], [2,2,2,0], // ┸ ┹ ┺ ┻
    [1,1,1,1], [2,1,1,1], [1,2,1,1], [2,2,1,1], // ┼ ┽ ┾ ┿
    [1,1,2,1], [1,1,1,2], [1,1,2,2], [2,1,2,1], // ╀ ╁ ╂ ╃
    [1,2,2,1], [2,1,1,2], [1,2,1,2], [2,2,2,1], // ╄ ╅ ╆ ╇
    [2,2,1,2], [2,1,2,2], [1,2,2,2], [2,2,2,2], // ╈ ╉ ╊ ╋
    [1,1,0,0], [2,2,0,0], [0,0,1,1], [0,0,2,2], // ╌ ╍ ╎ ╏
];

#[rustfmt::skip]
const HALF_LINES: [[u8; 4]; 12] = [
    [1,0,0,0], [0,0,1,0], [0,1,0,0], [0,0,0,1], // ╴ ╵ ╶ ╷
    [2,0,0,0], [0,0,2,0], [0,2,0,0], [0,0,0,2], // ╸ ╹ ╺ ╻
    [1,2,0,0], [0,0,1,2], [2,1,0,0], [0,0,2,1], // ╼ ╽ ╾ ╿
];

/// Grids for U+2550..U+256C, one 5-bit row per entry, MSB is column 0
#[rustfmt::skip]
const DOUBLE_LINES: [[u8; 5]; 29] = [
    [0b00000, 0b11111, 0b00000, 0b11111, 0b00000], // ═
    [0b01010, 0b01010, 0b01010, 0b01010, 0b01010], // ║
    [0b00000, 0b00111, 0b00100, 0b00111, 0b00100], // ╒
    [0b00000, 0b00000, 0b01111, 0b01010, 0b01010], // ╓
    [0b00000, 0b01111, 0b01000, 0b01011, 0b01010], // ╔
    [0b00000, 0b11100, 0b00100, 0b11100, 0b00100], // ╕
    [0b00000, 0b00000, 0b11110, 0b01010, 0b01010], // ╖
    [0b00000, 0b11110, 0b00010, 0b11010, 0b01010], // ╗
    [0b00100, 0b00111, 0b00100, 0b00111, 0b00000], // ╘
    [0b01010, 0b01010, 0b01111, 0b00000, 0b00000], // ╙
    [0b01010, 0b01011, 0b01000, 0b01111, 0b00000], // ╚
    [0b00100, 0b11100, 0b00100, 0b11100, 0b00000], // ╛
    [0b01010, 0b01010, 0b11110, 0b00000, 0b00000], // ╜
    [0b01010, 0b11010, 0b00010, 0b11110, 0b00000], // ╝
    [0b00100, 0b00111, 0b00100, 0b00111, 0b00100], // ╞
    [0b01010, 0b01010, 0b01011, 0b01010, 0b01010], // ╟
    [0b01010, 0b01011, 0b01000, 0b01011, 0b01010], // ╠
    [0b00100, 0b11100, 0b00100, 0b11100, 0b00100], // ╡
    [0b01010, 0b01010, 0b11010, 0b01010, 0b01010], // ╢
    [0b01010, 0b11010, 0b00010, 0b11010, 0b01010], // ╣
    [0b00000, 0b11111, 0b00000, 0b11111, 0b00100], // ╤
    [0b00000, 0b00000, 0b11111, 0b01010, 0b01010], // ╥
    [0b00000, 0b11111, 0b00000, 0b11011, 0b01010], // ╦
    [0b00100, 0b11111, 0b00000, 0b11111, 0b00000], // ╧
    [0b01010, 0b01010, 0b11111, 0b00000, 0b00000], // ╨
    [0b01010, 0b11011, 0b00000, 0b11111, 0b00000], // ╩
    [0b00100, 0b11111, 0b00100, 0b11111, 0b00100], // ╪
    [0b01010, 0b01010, 0b11111, 0b01010, 0b01010], // ╫
    [0b01010, 0b11011, 0b00000, 0b11011, 0b01010], // ╬
];

pub(super) fn draw(canvas: &mut GlyphCanvas<'_>, c: char) -> bool {
    let index = c as u32 - 0x2500;
    let light = canvas.light;
    match c as u32 {
        0x2504..=0x250B => {
            let variant = (c as u32 - 0x2504) % 4;
            let dashes = if c as u32 <= 0x2507 { 3 } else { 4 };
            dashed(canvas, dashes, variant < 2, weight_of(variant), light + 2);
        }
        0x254C..=0x254F => {
            let variant = c as u32 - 0x254C;
            dashed(canvas, 2, variant < 2, weight_of(variant), light + 2);
        }
        0x2500..=0x254F => {
            let rows = segment_grid(SEGMENTS[index as usize]);
            fill_grid(canvas, &rows, light + 2);
        }
        0x2550..=0x256C => {
            fill_grid(canvas, &DOUBLE_LINES[(c as u32 - 0x2550) as usize], light * 3);
        }
        0x256D..=0x2570 => arc_corner(canvas, c),
        0x2571..=0x2573 => diagonal(canvas, c),
        0x2574..=0x257F => {
            let rows = segment_grid(HALF_LINES[(c as u32 - 0x2574) as usize]);
            fill_grid(canvas, &rows, light + 2);
        }
        _ => return false,
    }
    true
}

fn weight_of(variant: u32) -> u8 {
    if variant % 2 == 1 {
        HEAVY
    } else {
        LIGHT
    }
}

/// Grid bands a stroke of `weight` occupies
fn band(weight: u8) -> (usize, usize) {
    match weight {
        HEAVY => (1, 3),
        _ => (2, 2),
    }
}

/// Build the 5x5 grid for a junction of light and heavy arms.
///
/// An arm runs from the cell edge through the crossing stroke so corners
/// close without notches. Without a crossing stroke it ends flush with its
/// own thickness past the centre.
fn segment_grid([left, right, up, down]: [u8; 4]) -> [u8; 5] {
    let mut rows = [0u8; 5];
    let mut set = |row: usize, col: usize| rows[row] |= 0b10000 >> col;

    let horizontal = left.max(right);
    let vertical = up.max(down);

    if left != NONE {
        let (top, bottom) = band(left);
        let end = if vertical != NONE { band(vertical).1 } else { bottom };
        for row in top..=bottom {
            for col in 0..=end {
                set(row, col);
            }
        }
    }
    if right != NONE {
        let (top, bottom) = band(right);
        let start = if vertical != NONE { band(vertical).0 } else { top };
        for row in top..=bottom {
            for col in start..5 {
                set(row, col);
            }
        }
    }
    if up != NONE {
        let (first, last) = band(up);
        let end = if horizontal != NONE { band(horizontal).1 } else { last };
        for col in first..=last {
            for row in 0..=end {
                set(row, col);
            }
        }
    }
    if down != NONE {
        let (first, last) = band(down);
        let start = if horizontal != NONE { band(horizontal).0 } else { first };
        for col in first..=last {
            for row in start..5 {
                set(row, col);
            }
        }
    }
    rows
}

/// Band edges along one axis of `size` pixels
fn boundaries(size: i32, light: i32, heavy: i32) -> [i32; 6] {
    let half = size / 2;
    let mut edges = [
        0,
        half - heavy / 2,
        half - light / 2,
        half - light / 2 + light,
        half - heavy / 2 + heavy,
        size,
    ];
    for i in 1..edges.len() {
        edges[i] = edges[i].clamp(edges[i - 1], size);
    }
    edges
}

/// Fill a 5x5 grid, merging each row's runs and then identical runs in
/// consecutive rows
fn fill_grid(canvas: &mut GlyphCanvas<'_>, rows: &[u8; 5], heavy: i32) {
    let xs = boundaries(canvas.width, canvas.light, heavy);
    let ys = boundaries(canvas.height, canvas.light, heavy);

    // (x0, x1, y0, y1)
    let mut rects: SmallVec<[(i32, i32, i32, i32); 8]> = SmallVec::new();
    for (row, bits) in rows.iter().enumerate() {
        let mut col = 0;
        while col < 5 {
            if bits & (0b10000 >> col) == 0 {
                col += 1;
                continue;
            }
            let start = col;
            while col < 5 && bits & (0b10000 >> col) != 0 {
                col += 1;
            }
            let (x0, x1, y0, y1) = (xs[start], xs[col], ys[row], ys[row + 1]);
            if let Some(prev) = rects
                .iter_mut()
                .find(|r| r.0 == x0 && r.1 == x1 && r.3 == y0)
            {
                prev.3 = y1;
            } else {
                rects.push((x0, x1, y0, y1));
            }
        }
    }

    for (x0, x1, y0, y1) in rects {
        canvas.fill(x0, y0, x1, y1);
    }
}

/// Evenly spaced dashes with half a gap at either end so they tile
fn dashed(canvas: &mut GlyphCanvas<'_>, dashes: i32, horizontal: bool, weight: u8, heavy: i32) {
    let (first, last) = band(weight);
    let length = if horizontal { canvas.width } else { canvas.height };
    let across = if horizontal {
        boundaries(canvas.height, canvas.light, heavy)
    } else {
        boundaries(canvas.width, canvas.light, heavy)
    };
    let (a0, a1) = (across[first], across[last + 1]);

    let step = length as f32 / dashes as f32;
    for i in 0..dashes {
        let start = (step * i as f32 + step / 4.0).round() as i32;
        let end = (step * (i + 1) as f32 - step / 4.0).round() as i32;
        if horizontal {
            canvas.fill(start, a0, end, a1);
        } else {
            canvas.fill(a0, start, a1, end);
        }
    }
}

/// ╭ ╮ ╯ ╰: a quarter circle joining two straight stubs
fn arc_corner(canvas: &mut GlyphCanvas<'_>, c: char) {
    let light = canvas.light;
    let xs = boundaries(canvas.width, light, light + 2);
    let ys = boundaries(canvas.height, light, light + 2);
    let cx = (xs[2] + xs[3]) as f32 / 2.0;
    let cy = (ys[2] + ys[3]) as f32 / 2.0;
    let (w, h) = (canvas.width as f32, canvas.height as f32);
    let radius = (((canvas.width + 2) / 3).max(light + 2) as f32)
        .min(cx)
        .min(cy);

    let path = match c {
        // Down and right
        '\u{256D}' => {
            let start = canvas.point(cx, h);
            let center = canvas.point(cx + radius, cy + radius);
            let end = canvas.point(w, cy);
            PathBuilder::new()
                .move_to(start.x, start.y)
                .arc(center.x, center.y, radius, PI, PI + FRAC_PI_2)
                .line_to(end.x, end.y)
        }
        // Down and left
        '\u{256E}' => {
            let start = canvas.point(cx, h);
            let center = canvas.point(cx - radius, cy + radius);
            let end = canvas.point(0.0, cy);
            PathBuilder::new()
                .move_to(start.x, start.y)
                .arc_negative(center.x, center.y, radius, 0.0, -FRAC_PI_2)
                .line_to(end.x, end.y)
        }
        // Up and left
        '\u{256F}' => {
            let start = canvas.point(cx, 0.0);
            let center = canvas.point(cx - radius, cy - radius);
            let end = canvas.point(0.0, cy);
            PathBuilder::new()
                .move_to(start.x, start.y)
                .arc(center.x, center.y, radius, 0.0, FRAC_PI_2)
                .line_to(end.x, end.y)
        }
        // Up and right
        _ => {
            let start = canvas.point(cx, 0.0);
            let center = canvas.point(cx + radius, cy - radius);
            let end = canvas.point(w, cy);
            PathBuilder::new()
                .move_to(start.x, start.y)
                .arc_negative(center.x, center.y, radius, PI, FRAC_PI_2)
                .line_to(end.x, end.y)
        }
    };
    canvas.stroke(path.build(), light as f32);
}

/// ╱ ╲ ╳ corner to corner
fn diagonal(canvas: &mut GlyphCanvas<'_>, c: char) {
    let (w, h) = (canvas.width as f32, canvas.height as f32);
    let mut path = Path::new();
    if c != '\u{2572}' {
        let (a, b) = (canvas.point(w, 0.0), canvas.point(0.0, h));
        path.extend(&PathBuilder::new().move_to(a.x, a.y).line_to(b.x, b.y).build());
    }
    if c != '\u{2571}' {
        let (a, b) = (canvas.point(0.0, 0.0), canvas.point(w, h));
        path.extend(&PathBuilder::new().move_to(a.x, a.y).line_to(b.x, b.y).build());
    }
    canvas.stroke(path, canvas.light as f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: [&str; 5]) -> [u8; 5] {
        rows.map(|row| row.bytes().fold(0u8, |acc, b| (acc << 1) | (b == b'#') as u8))
    }

    #[test]
    fn test_light_cross() {
        assert_eq!(
            segment_grid([1, 1, 1, 1]),
            grid(["..#..", "..#..", "#####", "..#..", "..#.."])
        );
    }

    #[test]
    fn test_mixed_corner_has_no_notch() {
        // ┍ down light and right heavy
        assert_eq!(
            segment_grid([0, 2, 0, 1]),
            grid([".....", "..###", "..###", "..###", "..#.."])
        );
    }

    #[test]
    fn test_heavy_half_line_ends_past_centre() {
        // ╸
        assert_eq!(
            segment_grid([2, 0, 0, 0]),
            grid([".....", "####.", "####.", "####.", "....."])
        );
    }

    #[test]
    fn test_boundaries_centre_the_strokes() {
        assert_eq!(boundaries(20, 2, 4), [0, 8, 9, 11, 12, 20]);
        assert_eq!(boundaries(10, 2, 6), [0, 2, 4, 6, 8, 10]);
    }

    #[test]
    fn test_boundaries_stay_ordered_in_tiny_cells() {
        let edges = boundaries(1, 1, 3);
        assert!(edges.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(edges[5], 1);
    }

    #[test]
    fn test_double_table_is_symmetric_where_the_glyph_is() {
        // ═ ║ ╬ are their own mirror image
        for index in [0usize, 1, 28] {
            for row in DOUBLE_LINES[index] {
                let mirrored = (0..5).fold(0u8, |acc, col| acc | (((row >> col) & 1) << (4 - col)));
                assert_eq!(row, mirrored);
            }
        }
    }
}
