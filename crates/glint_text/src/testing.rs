//! Deterministic test doubles
//!
//! [`FakeResolver`] opens [`FakeContext`]s that shape text with fixed
//! metrics: every character advances 10px, lines are 20px tall with the
//! baseline at 16px. Glyph ids equal the code point. Builders tweak
//! individual characters to exercise each glyph plan representation.

use std::cell::Cell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

use glint_paint::FontResourceId;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::cache::Clock;
use crate::config::FontConfigKey;
use crate::font::FontMetrics;
use crate::shaping::{FontResolver, GlyphRun, RunFont, ShapedGlyph, ShapedLine, ShapingContext};
use crate::{Result, TextError};

pub const FAKE_ADVANCE: f32 = 10.0;
pub const FAKE_HEIGHT: f32 = 20.0;
pub const FAKE_ASCENT: f32 = 16.0;

/// Glyph id used for the mark a fallback font contributes
pub const FAKE_FALLBACK_MARK: u32 = 0x0328;

#[derive(Clone, Default)]
struct FakeSettings {
    /// (bold, italic) -> advance
    style_advance: FxHashMap<(bool, bool), f32>,
    char_advance: FxHashMap<char, f32>,
    missing: FxHashSet<char>,
    fallback: FxHashSet<char>,
    multi_glyph: FxHashSet<char>,
    unavailable_families: FxHashSet<String>,
    scaled_unavailable: bool,
}

/// Resolver producing [`FakeContext`]s
pub struct FakeResolver {
    settings: FakeSettings,
    generation: Cell<u64>,
    opened: Cell<usize>,
    next_resource: Cell<u64>,
    shape_calls: Rc<Cell<usize>>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self {
            settings: FakeSettings::default(),
            generation: Cell::new(1),
            opened: Cell::new(0),
            next_resource: Cell::new(1),
            shape_calls: Rc::new(Cell::new(0)),
        }
    }

    /// Advance for every character of one style
    pub fn with_style_advance(mut self, bold: bool, italic: bool, advance: f32) -> Self {
        self.settings.style_advance.insert((bold, italic), advance);
        self
    }

    /// Advance for one character in every style
    pub fn with_char_advance(mut self, c: char, advance: f32) -> Self {
        self.settings.char_advance.insert(c, advance);
        self
    }

    /// Characters the font lacks (shaped to glyph 0)
    pub fn with_missing(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.settings.missing.extend(chars);
        self
    }

    /// Characters that need a second font: the base glyph comes from the
    /// primary font and a mark from a fallback font
    pub fn with_fallback_chars(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.settings.fallback.extend(chars);
        self
    }

    /// Characters that shape to two glyphs
    pub fn with_multi_glyph(mut self, chars: impl IntoIterator<Item = char>) -> Self {
        self.settings.multi_glyph.extend(chars);
        self
    }

    /// Families whose `open` fails
    pub fn with_unavailable_family(mut self, family: impl Into<String>) -> Self {
        self.settings.unavailable_families.insert(family.into());
        self
    }

    /// Runs report no scaled-font resource
    pub fn without_scaled_fonts(mut self) -> Self {
        self.settings.scaled_unavailable = true;
        self
    }

    /// Simulate a font configuration reload
    pub fn bump_generation(&self) {
        self.generation.set(self.generation.get() + 1);
    }

    /// Contexts opened so far
    pub fn opened(&self) -> usize {
        self.opened.get()
    }

    /// Shaping calls across all contexts
    pub fn shape_calls(&self) -> usize {
        self.shape_calls.get()
    }
}

impl Default for FakeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver for FakeResolver {
    fn generation(&self) -> u64 {
        self.generation.get()
    }

    fn open(&self, key: &FontConfigKey) -> Result<Box<dyn ShapingContext>> {
        let family = &key.description.family;
        if self.settings.unavailable_families.contains(family) {
            return Err(TextError::FontNotFound(family.clone()));
        }

        self.opened.set(self.opened.get() + 1);
        let id = self.next_resource.get();
        self.next_resource.set(id + 2);

        let bold = key.description.weight >= 600;
        let italic = key.description.italic;
        let advance = self
            .settings
            .style_advance
            .get(&(bold, italic))
            .copied()
            .unwrap_or(FAKE_ADVANCE);

        Ok(Box::new(FakeContext {
            settings: self.settings.clone(),
            advance,
            primary: Arc::new(RunFont {
                resource: FontResourceId(id),
                family: family.clone(),
            }),
            fallback: Arc::new(RunFont {
                resource: FontResourceId(id + 1),
                family: "Fake Fallback".into(),
            }),
            shape_calls: Rc::clone(&self.shape_calls),
        }))
    }
}

/// Deterministic shaping context
pub struct FakeContext {
    settings: FakeSettings,
    advance: f32,
    primary: Arc<RunFont>,
    fallback: Arc<RunFont>,
    shape_calls: Rc<Cell<usize>>,
}

impl FakeContext {
    fn advance_for(&self, c: char) -> f32 {
        let base = self
            .settings
            .char_advance
            .get(&c)
            .copied()
            .unwrap_or(self.advance);
        if is_wide(c) {
            base * 2.0
        } else {
            base
        }
    }

    fn push(&self, out: &mut ShapedLine, font: &Arc<RunFont>, glyph: ShapedGlyph) {
        match out.runs.last_mut() {
            Some(run) if Arc::ptr_eq(&run.font, font) => run.glyphs.push(glyph),
            _ => out.runs.push(GlyphRun {
                font: Arc::clone(font),
                scaled: (!self.settings.scaled_unavailable).then_some(font.resource),
                glyphs: vec![glyph],
            }),
        }
    }
}

impl ShapingContext for FakeContext {
    fn shape(&mut self, text: &str, out: &mut ShapedLine) {
        self.shape_calls.set(self.shape_calls.get() + 1);
        out.clear();

        let mut pen = 0.0;
        for (offset, c) in text.char_indices() {
            let cluster = offset as u32;
            let advance = self.advance_for(c);
            let glyph = |glyph_id: u32, x: f32, x_advance: f32| ShapedGlyph {
                glyph_id,
                cluster,
                x,
                x_advance,
                ..Default::default()
            };

            if self.settings.missing.contains(&c) {
                out.unknown_glyphs += 1;
                self.push(out, &self.primary.clone(), glyph(0, pen, advance));
            } else if self.settings.fallback.contains(&c) {
                let primary = self.primary.clone();
                let fallback = self.fallback.clone();
                self.push(out, &primary, glyph(c as u32, pen, advance));
                self.push(
                    out,
                    &fallback,
                    ShapedGlyph {
                        y_offset: 2.0,
                        ..glyph(FAKE_FALLBACK_MARK, pen, 0.0)
                    },
                );
            } else if self.settings.multi_glyph.contains(&c) {
                let primary = self.primary.clone();
                let half = advance / 2.0;
                self.push(out, &primary, glyph(c as u32, pen, half));
                self.push(out, &primary, glyph(c as u32 + 1, pen + half, half));
            } else if is_combining(c) {
                let primary = self.primary.clone();
                self.push(
                    out,
                    &primary,
                    ShapedGlyph {
                        x_offset: -self.advance / 2.0,
                        ..glyph(c as u32, pen, 0.0)
                    },
                );
                continue;
            } else {
                let primary = self.primary.clone();
                self.push(out, &primary, glyph(c as u32, pen, advance));
            }
            pen += advance;
        }

        out.width = pen;
        out.height = FAKE_HEIGHT;
        out.baseline = FAKE_ASCENT;
    }

    fn metrics(&self) -> FontMetrics {
        FontMetrics {
            ascent: FAKE_ASCENT,
            descent: FAKE_HEIGHT - FAKE_ASCENT,
            height: FAKE_HEIGHT,
        }
    }
}

fn is_combining(c: char) -> bool {
    matches!(c as u32, 0x0300..=0x036F)
}

fn is_wide(c: char) -> bool {
    matches!(
        c as u32,
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFF00..=0xFF60
    )
}

/// Clock advanced by hand
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AntialiasOptions, FontDescription};

    fn open(resolver: &FakeResolver) -> Box<dyn ShapingContext> {
        let key = FontConfigKey::new(
            FontDescription::new("Fake", 10.0),
            "",
            96.0,
            AntialiasOptions::default(),
            resolver.generation(),
        );
        resolver.open(&key).unwrap()
    }

    #[test]
    fn test_plain_text_is_one_run() {
        let resolver = FakeResolver::new();
        let mut ctx = open(&resolver);
        let mut line = ShapedLine::default();
        ctx.shape("ab", &mut line);
        assert_eq!(line.runs.len(), 1);
        assert_eq!(line.glyph_count(), 2);
        assert_eq!(line.width, 20.0);
        assert_eq!(line.runs[0].glyphs[1].x, 10.0);
        assert_eq!(line.runs[0].glyphs[1].cluster, 1);
    }

    #[test]
    fn test_wide_chars_double_advance() {
        let resolver = FakeResolver::new();
        let mut ctx = open(&resolver);
        let mut line = ShapedLine::default();
        ctx.shape("中", &mut line);
        assert_eq!(line.width, 20.0);
    }

    #[test]
    fn test_unavailable_family_fails() {
        let resolver = FakeResolver::new().with_unavailable_family("Fake");
        let key = FontConfigKey::new(
            FontDescription::new("Fake", 10.0),
            "",
            96.0,
            AntialiasOptions::default(),
            1,
        );
        assert!(matches!(
            resolver.open(&key),
            Err(TextError::FontNotFound(_))
        ));
    }
}
