//! System shaping backend: fontdb discovery, rustybuzz shaping

use std::cell::RefCell;
use std::ops::Range;
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use rustybuzz::UnicodeBuffer;
use smallvec::SmallVec;

use crate::config::FontConfigKey;
use crate::font::{FontFace, FontMetrics};
use crate::registry::FontRegistry;
use crate::shaping::{FontResolver, GlyphRun, RunFont, ShapedGlyph, ShapedLine, ShapingContext};
use crate::Result;

/// Opens [`BuzzContext`]s against a shared [`FontRegistry`]
pub struct SystemFontResolver {
    registry: Rc<RefCell<FontRegistry>>,
}

impl SystemFontResolver {
    /// Resolver over the installed system fonts
    pub fn new() -> Self {
        Self::with_registry(Rc::new(RefCell::new(FontRegistry::new())))
    }

    pub fn with_registry(registry: Rc<RefCell<FontRegistry>>) -> Self {
        Self { registry }
    }

    /// Registry used to resolve resource ids when replaying glyph commands
    pub fn registry(&self) -> &Rc<RefCell<FontRegistry>> {
        &self.registry
    }

    /// Rescan installed fonts; keys built afterwards use a new generation
    pub fn reload(&self) {
        self.registry.borrow_mut().reload();
    }
}

impl Default for SystemFontResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl FontResolver for SystemFontResolver {
    fn generation(&self) -> u64 {
        self.registry.borrow().generation()
    }

    fn open(&self, key: &FontConfigKey) -> Result<Box<dyn ShapingContext>> {
        let desc = &key.description;
        let face = self
            .registry
            .borrow_mut()
            .load_with_fallback(&desc.family, desc.weight, desc.italic)?;

        tracing::debug!(
            "opened '{}' as {} (weight {}, italic {}) at {:.1}px",
            desc.family,
            face.family_name(),
            face.weight(),
            face.is_italic(),
            key.pixel_size()
        );

        Ok(Box::new(BuzzContext::new(
            Rc::clone(&self.registry),
            face,
            key.pixel_size() as f32,
            desc.weight,
            desc.italic,
        )))
    }
}

/// Shapes with rustybuzz, splitting text into runs by face coverage
pub struct BuzzContext {
    registry: Rc<RefCell<FontRegistry>>,
    primary: Arc<FontFace>,
    pixel_size: f32,
    weight: u16,
    italic: bool,
    run_fonts: FxHashMap<String, Arc<RunFont>>,
    buffer: Option<UnicodeBuffer>,
}

impl BuzzContext {
    pub fn new(
        registry: Rc<RefCell<FontRegistry>>,
        primary: Arc<FontFace>,
        pixel_size: f32,
        weight: u16,
        italic: bool,
    ) -> Self {
        Self {
            registry,
            primary,
            pixel_size,
            weight,
            italic,
            run_fonts: FxHashMap::default(),
            buffer: None,
        }
    }

    fn face_for(&mut self, c: char) -> Arc<FontFace> {
        if c.is_control() || c.is_whitespace() || self.primary.has_glyph(c) {
            return Arc::clone(&self.primary);
        }
        self.registry
            .borrow_mut()
            .fallback_for_char(c, self.weight, self.italic)
            .unwrap_or_else(|| Arc::clone(&self.primary))
    }

    fn run_font(&mut self, face: &Arc<FontFace>) -> Arc<RunFont> {
        let key = face.cache_key();
        if let Some(font) = self.run_fonts.get(&key) {
            return Arc::clone(font);
        }
        let resource = self.registry.borrow_mut().resource_id(face, self.pixel_size);
        let font = Arc::new(RunFont {
            resource,
            family: face.family_name().to_string(),
        });
        self.run_fonts.insert(key, Arc::clone(&font));
        font
    }
}

impl ShapingContext for BuzzContext {
    fn shape(&mut self, text: &str, out: &mut ShapedLine) {
        out.clear();

        let primary = self.primary.metrics(self.pixel_size);
        let mut height = primary.height;
        let mut baseline = primary.ascent;
        let mut pen = 0.0;

        let mut segments: SmallVec<[(Range<usize>, Arc<FontFace>); 4]> = SmallVec::new();
        for (start, c) in text.char_indices() {
            let face = self.face_for(c);
            let end = start + c.len_utf8();
            match segments.last_mut() {
                Some((range, current)) if Arc::ptr_eq(current, &face) => range.end = end,
                _ => segments.push((start..end, face)),
            }
        }

        for (range, face) in segments {
            let scale = self.pixel_size / face.units_per_em() as f32;

            let mut buffer = self.buffer.take().unwrap_or_else(UnicodeBuffer::new);
            buffer.push_str(&text[range.clone()]);
            buffer.guess_segment_properties();
            let shaped = rustybuzz::shape(face.shaper(), &[], buffer);

            let mut glyphs = Vec::with_capacity(shaped.len());
            for (info, pos) in shaped.glyph_infos().iter().zip(shaped.glyph_positions()) {
                if info.glyph_id == 0 {
                    out.unknown_glyphs += 1;
                }
                let x_advance = pos.x_advance as f32 * scale;
                glyphs.push(ShapedGlyph {
                    glyph_id: info.glyph_id,
                    cluster: info.cluster + range.start as u32,
                    x: pen,
                    x_advance,
                    x_offset: pos.x_offset as f32 * scale,
                    // rustybuzz offsets grow upward
                    y_offset: -(pos.y_offset as f32) * scale,
                });
                pen += x_advance;
            }
            self.buffer = Some(shaped.clear());

            let metrics = face.metrics(self.pixel_size);
            height = height.max(metrics.height);
            baseline = baseline.max(metrics.ascent);

            let font = self.run_font(&face);
            out.runs.push(GlyphRun {
                scaled: Some(font.resource),
                font,
                glyphs,
            });
        }

        out.width = pen;
        out.height = height;
        out.baseline = baseline;
    }

    fn metrics(&self) -> FontMetrics {
        self.primary.metrics(self.pixel_size)
    }
}
