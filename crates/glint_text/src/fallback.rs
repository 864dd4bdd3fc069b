//! Script buckets for per-character fallback face caching.
//!
//! Scanning every installed face for a character is expensive, and scripts
//! like Hangul or Han have many distinct code points. Code points are grouped
//! into coarse "script-ish" buckets so one scan serves the whole bucket; use
//! sites still verify that the cached face covers the exact character.

/// Returns a cache bucket key for the given codepoint.
///
/// Not a 1:1 mapping to Unicode Script. Unbucketed code points map to
/// themselves, which is always below the bucket range.
pub fn fallback_bucket_key(c: char) -> u32 {
    let cp = c as u32;

    match cp {
        // Hangul (Korean)
        0x1100..=0x11FF | 0x3130..=0x318F | 0xA960..=0xA97F | 0xAC00..=0xD7A3 | 0xD7B0..=0xD7FF => {
            0x11_0000
        }

        // Hiragana/Katakana (Japanese)
        0x3040..=0x309F | 0x30A0..=0x30FF | 0x31F0..=0x31FF | 0xFF66..=0xFF9D => 0x11_0001,

        // Han ideographs (CJK)
        0x3400..=0x4DBF | 0x4E00..=0x9FFF | 0x20000..=0x2EBEF => 0x11_0002,

        // Arabic
        0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF | 0xFB50..=0xFDFF | 0xFE70..=0xFEFF => {
            0x11_0003
        }

        // Devanagari
        0x0900..=0x097F | 0xA8E0..=0xA8FF => 0x11_0004,

        // Thai
        0x0E00..=0x0E7F => 0x11_0005,

        // Hebrew
        0x0590..=0x05FF => 0x11_0006,

        // Cyrillic
        0x0400..=0x052F => 0x11_0007,

        // Greek
        0x0370..=0x03FF => 0x11_0008,

        // Combining diacritics
        0x0300..=0x036F | 0x1AB0..=0x1AFF | 0x1DC0..=0x1DFF | 0x20D0..=0x20FF => 0x11_0009,

        _ => cp,
    }
}
