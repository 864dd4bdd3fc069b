//! Glyph substitution for right-to-left cells
//!
//! Mirroring is applied to the character before glyph lookup.

/// Bidi-mirrored pairs
const BIDI_PAIRS: &[(char, char)] = &[
    ('(', ')'),
    ('<', '>'),
    ('[', ']'),
    ('{', '}'),
    ('\u{00AB}', '\u{00BB}'), // « »
    ('\u{2039}', '\u{203A}'), // ‹ ›
    ('\u{2045}', '\u{2046}'),
    ('\u{207D}', '\u{207E}'),
    ('\u{208D}', '\u{208E}'),
    ('\u{2208}', '\u{220B}'), // ∈ ∋
    ('\u{2264}', '\u{2265}'), // ≤ ≥
    ('\u{226A}', '\u{226B}'),
    ('\u{227A}', '\u{227B}'),
    ('\u{2282}', '\u{2283}'), // ⊂ ⊃
    ('\u{2286}', '\u{2287}'),
    ('\u{228F}', '\u{2290}'),
    ('\u{2291}', '\u{2292}'),
    ('\u{22A2}', '\u{22A3}'),
    ('\u{2308}', '\u{2309}'),
    ('\u{230A}', '\u{230B}'),
    ('\u{27E6}', '\u{27E7}'),
    ('\u{27E8}', '\u{27E9}'), // ⟨ ⟩
    ('\u{2983}', '\u{2984}'),
    ('\u{3008}', '\u{3009}'),
    ('\u{300A}', '\u{300B}'),
    ('\u{300C}', '\u{300D}'),
    ('\u{300E}', '\u{300F}'),
    ('\u{3010}', '\u{3011}'),
];

/// Horizontally asymmetric box-drawing and block characters
const BOX_PAIRS: &[(char, char)] = &[
    ('┌', '┐'),
    ('┍', '┑'),
    ('┎', '┒'),
    ('┏', '┓'),
    ('└', '┘'),
    ('┕', '┙'),
    ('┖', '┚'),
    ('┗', '┛'),
    ('├', '┤'),
    ('┝', '┥'),
    ('┞', '┦'),
    ('┟', '┧'),
    ('┠', '┨'),
    ('┡', '┩'),
    ('┢', '┪'),
    ('┣', '┫'),
    ('┭', '┮'),
    ('┵', '┶'),
    ('┽', '┾'),
    ('╃', '╄'),
    ('╅', '╆'),
    ('╉', '╊'),
    ('╒', '╕'),
    ('╓', '╖'),
    ('╔', '╗'),
    ('╘', '╛'),
    ('╙', '╜'),
    ('╚', '╝'),
    ('╞', '╡'),
    ('╟', '╢'),
    ('╠', '╣'),
    ('╭', '╮'),
    ('╰', '╯'),
    ('╱', '╲'),
    ('╴', '╶'),
    ('╸', '╺'),
    ('╼', '╾'),
    ('▌', '▐'),
    ('▖', '▗'),
    ('▘', '▝'),
    ('▙', '▟'),
    ('▚', '▞'),
    ('▛', '▜'),
];

fn lookup(pairs: &[(char, char)], c: char) -> Option<char> {
    pairs.iter().find_map(|&(a, b)| {
        if a == c {
            Some(b)
        } else if b == c {
            Some(a)
        } else {
            None
        }
    })
}

/// The character to draw in place of `c` in a mirrored cell
pub fn mirror_char(c: char, box_mirror: bool) -> char {
    if let Some(m) = lookup(BIDI_PAIRS, c) {
        return m;
    }
    if box_mirror {
        if let Some(m) = lookup(BOX_PAIRS, c) {
            return m;
        }
    }
    c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brackets_swap_both_ways() {
        assert_eq!(mirror_char('(', false), ')');
        assert_eq!(mirror_char(')', false), '(');
        assert_eq!(mirror_char('≤', false), '≥');
        assert_eq!(mirror_char('a', true), 'a');
    }

    #[test]
    fn test_box_chars_need_box_mirror() {
        assert_eq!(mirror_char('┌', false), '┌');
        assert_eq!(mirror_char('┌', true), '┐');
        assert_eq!(mirror_char('▐', true), '▌');
        // Symmetric characters stay put
        assert_eq!(mirror_char('─', true), '─');
    }

    #[test]
    fn test_tables_are_involutions() {
        for table in [BIDI_PAIRS, BOX_PAIRS] {
            for &(a, b) in table {
                assert_eq!(lookup(table, lookup(table, a).unwrap()), Some(a));
                assert_ne!(a, b);
            }
        }
    }
}
