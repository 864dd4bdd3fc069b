//! Mosaics from Symbols for Legacy Computing and its supplement
//!
//! Sextants and octants are enumerated in mask order with the masks that
//! duplicate an older block character left out. Wedges are polygons on a
//! 2x3 grid; the upper-variant wedges are the exact complements of the
//! lower ones.

use glint_paint::{FillRule, Stipple};

use super::GlyphCanvas;

/// Sextant masks with an existing block character (empty, ▌, ▐)
const SEXTANT_SKIPS: [u8; 3] = [0x00, 0x15, 0x2A];

/// Octant masks with an existing block or quadrant character
const OCTANT_SKIPS: [u8; 26] = [
    0x00, 0x01, 0x02, 0x03, 0x05, 0x0A, 0x0F, 0x14, 0x28, 0x3F, 0x40, 0x50, 0x55, 0x5A, 0x5F,
    0x80, 0xA0, 0xA5, 0xAA, 0xAF, 0xC0, 0xF0, 0xF5, 0xFA, 0xFC, 0xFF,
];

/// Wedge outlines for U+1FB3C..U+1FB51 in (half-width, third-height) units
#[rustfmt::skip]
const WEDGES: [&[(u8, u8)]; 22] = [
    &[(0, 2), (1, 3), (0, 3)],
    &[(0, 2), (2, 3), (0, 3)],
    &[(0, 1), (1, 3), (0, 3)],
    &[(0, 1), (2, 3), (0, 3)],
    &[(0, 0), (1, 3), (0, 3)],
    &[(0, 1), (1, 0), (2, 0), (2, 3), (0, 3)],
    &[(0, 1), (2, 0), (2, 3), (0, 3)],
    &[(0, 2), (1, 0), (2, 0), (2, 3), (0, 3)],
    &[(0, 2), (2, 0), (2, 3), (0, 3)],
    &[(0, 3), (1, 0), (2, 0), (2, 3)],
    &[(0, 2), (2, 1), (2, 3), (0, 3)],
    &[(1, 3), (2, 2), (2, 3)],
    &[(0, 3), (2, 2), (2, 3)],
    &[(1, 3), (2, 1), (2, 3)],
    &[(0, 3), (2, 1), (2, 3)],
    &[(1, 3), (2, 0), (2, 3)],
    &[(0, 0), (1, 0), (2, 1), (2, 3), (0, 3)],
    &[(0, 0), (2, 1), (2, 3), (0, 3)],
    &[(0, 0), (1, 0), (2, 2), (2, 3), (0, 3)],
    &[(0, 0), (2, 2), (2, 3), (0, 3)],
    &[(0, 0), (1, 0), (2, 3), (0, 3)],
    &[(0, 1), (2, 2), (2, 3), (0, 3)],
];

/// Nth mask in ascending order that is not in `skips` (sorted)
fn nth_mask(index: u32, skips: &[u8]) -> u8 {
    let mut mask = index;
    for &skip in skips {
        if mask >= skip as u32 {
            mask += 1;
        }
    }
    mask as u8
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Upper,
    Right,
    Lower,
}

pub(super) fn draw(canvas: &mut GlyphCanvas<'_>, c: char) -> bool {
    let cp = c as u32;
    match cp {
        0x1FB00..=0x1FB3B => canvas.fill_mask(nth_mask(cp - 0x1FB00, &SEXTANT_SKIPS), 2, 3),
        0x1FB3C..=0x1FB51 => {
            let points = wedge_points(canvas, WEDGES[(cp - 0x1FB3C) as usize]);
            let path = canvas.polygon(&points);
            canvas.fill_path(path, FillRule::NonZero);
        }
        0x1FB52..=0x1FB67 => {
            let points = wedge_points(canvas, WEDGES[(cp - 0x1FB52) as usize]);
            canvas.fill_outside(&points);
        }
        // Three-quarter blocks missing one triangle
        0x1FB68..=0x1FB6B => {
            let side = [Side::Left, Side::Upper, Side::Right, Side::Lower][(cp - 0x1FB68) as usize];
            let points = triangle(canvas, side);
            canvas.fill_outside(&points);
        }
        0x1FB6C..=0x1FB6F => {
            let side = [Side::Left, Side::Upper, Side::Right, Side::Lower][(cp - 0x1FB6C) as usize];
            let path = canvas.polygon(&triangle(canvas, side));
            canvas.fill_path(path, FillRule::NonZero);
        }
        0x1FB8C..=0x1FB94 => medium_shade(canvas, cp),
        // Checker board fill and its inverse, on a 4x4 grid
        0x1FB95 | 0x1FB96 => {
            let phase = (cp - 0x1FB95) as i32;
            for row in 0..4 {
                for col in 0..4 {
                    if (row + col + phase) % 2 == 0 {
                        let (x0, x1) = (canvas.frac_x(col, 4), canvas.frac_x(col + 1, 4));
                        let (y0, y1) = (canvas.frac_y(row, 4), canvas.frac_y(row + 1, 4));
                        canvas.fill(x0, y0, x1, y1);
                    }
                }
            }
        }
        // Heavy horizontal fill
        0x1FB97 => {
            let w = canvas.width;
            let (quarter, half, three_quarters) =
                (canvas.frac_y(1, 4), canvas.frac_y(2, 4), canvas.frac_y(3, 4));
            canvas.fill(0, quarter, w, half);
            canvas.fill(0, three_quarters, w, canvas.height);
        }
        0x1FB98 => {
            let (w, h) = (canvas.width, canvas.height);
            canvas.stipple_box(0, 0, w, h, Stipple::DIAGONAL_DOWN);
        }
        0x1FB99 => {
            let (w, h) = (canvas.width, canvas.height);
            canvas.stipple_box(0, 0, w, h, Stipple::DIAGONAL_UP);
        }
        // Upper and lower, left and right triangular half blocks
        0x1FB9A | 0x1FB9B => {
            let sides = if cp == 0x1FB9A {
                [Side::Upper, Side::Lower]
            } else {
                [Side::Left, Side::Right]
            };
            for side in sides {
                let path = canvas.polygon(&triangle(canvas, side));
                canvas.fill_path(path, FillRule::NonZero);
            }
        }
        // Corner triangles in medium shade
        0x1FB9C..=0x1FB9F => {
            let (w, h) = (canvas.width as f32, canvas.height as f32);
            let points = match cp {
                0x1FB9C => [(0.0, 0.0), (w, 0.0), (0.0, h)],
                0x1FB9D => [(0.0, 0.0), (w, 0.0), (w, h)],
                0x1FB9E => [(w, 0.0), (w, h), (0.0, h)],
                _ => [(0.0, 0.0), (w, h), (0.0, h)],
            };
            let path = canvas.polygon(&points);
            canvas.fill_stipple(path, Stipple::CHECKER);
        }
        0x1CD00..=0x1CDE5 => canvas.fill_mask(nth_mask(cp - 0x1CD00, &OCTANT_SKIPS), 2, 4),
        // Single octants 8, 7, 1 and 2
        0x1CEA0 => canvas.fill_mask(0x80, 2, 4),
        0x1CEA3 => canvas.fill_mask(0x40, 2, 4),
        0x1CEA8 => canvas.fill_mask(0x01, 2, 4),
        0x1CEAB => canvas.fill_mask(0x02, 2, 4),
        // Separated quadrants and sextants
        0x1CC21..=0x1CC2F => {
            let mask = (cp - 0x1CC20) as u8;
            separated(canvas, mask, 2);
        }
        0x1CE51..=0x1CE8F => {
            let mask = (cp - 0x1CE50) as u8;
            separated(canvas, mask, 3);
        }
        _ => return false,
    }
    true
}

fn wedge_points(canvas: &GlyphCanvas<'_>, outline: &[(u8, u8)]) -> Vec<(f32, f32)> {
    outline
        .iter()
        .map(|&(x, y)| {
            (
                canvas.frac_x(x as i32, 2) as f32,
                canvas.frac_y(y as i32, 3) as f32,
            )
        })
        .collect()
}

/// Triangle from one side of the cell to its centre
fn triangle(canvas: &GlyphCanvas<'_>, side: Side) -> [(f32, f32); 3] {
    let (w, h) = (canvas.width as f32, canvas.height as f32);
    let centre = (w / 2.0, h / 2.0);
    match side {
        Side::Left => [(0.0, 0.0), centre, (0.0, h)],
        Side::Upper => [(0.0, 0.0), (w, 0.0), centre],
        Side::Right => [(w, 0.0), (w, h), centre],
        Side::Lower => [(0.0, h), (w, h), centre],
    }
}

/// Half-cell medium shades, optionally next to a solid half
fn medium_shade(canvas: &mut GlyphCanvas<'_>, cp: u32) {
    let (w, h) = (canvas.width, canvas.height);
    let (mid_x, mid_y) = (canvas.frac_x(1, 2), canvas.frac_y(1, 2));
    match cp {
        0x1FB8C => canvas.stipple_box(0, 0, mid_x, h, Stipple::CHECKER),
        0x1FB8D => canvas.stipple_box(mid_x, 0, w, h, Stipple::CHECKER),
        0x1FB8E => canvas.stipple_box(0, 0, w, mid_y, Stipple::CHECKER),
        0x1FB8F => canvas.stipple_box(0, mid_y, w, h, Stipple::CHECKER),
        0x1FB90 => canvas.stipple_box(0, 0, w, h, Stipple::CHECKER_INVERSE),
        0x1FB91 => {
            canvas.fill(0, 0, w, mid_y);
            canvas.stipple_box(0, mid_y, w, h, Stipple::CHECKER_INVERSE);
        }
        0x1FB92 => {
            canvas.stipple_box(0, 0, w, mid_y, Stipple::CHECKER_INVERSE);
            canvas.fill(0, mid_y, w, h);
        }
        // U+1FB94, left half inverse medium shade and right half block
        _ => {
            canvas.stipple_box(0, 0, mid_x, h, Stipple::CHECKER_INVERSE);
            canvas.fill(mid_x, 0, w, h);
        }
    }
}

/// Solid sub-blocks seen through a separation mask that blanks one light
/// stroke along the left and bottom of each sub-block
fn separated(canvas: &mut GlyphCanvas<'_>, mask: u8, rows: u8) {
    let gap = canvas.light as f32;
    canvas.separated(2, rows, gap, |canvas| {
        canvas.fill_mask(mask, 2, rows as i32);
    });
}
