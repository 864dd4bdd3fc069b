//! The four style variants of one terminal font
//!
//! Bold and italic faces are only used when their natural width stays
//! within 10% of the face they derive from. A rejected variant shares the
//! handle of its base style instead, and bold text falls back to drawing
//! twice with a 1px offset.

use std::rc::Rc;

use glint_text::{FontConfigKey, FontHandle, FontHandleCache};

use crate::style::FontStyle;

/// Maximum width difference, in percent, between a variant and its base
const MAX_WIDTH_DEVIATION: i32 = 10;

/// Empty space around the glyph inside a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellInsets {
    pub left: i32,
    pub right: i32,
    pub top: i32,
    pub bottom: i32,
}

/// Pixel geometry of one terminal cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CellMetrics {
    pub cell_width: i32,
    pub cell_height: i32,
    /// Natural character width of the normal face
    pub char_width: i32,
    pub char_height: i32,
    pub char_ascent: i32,
    pub char_descent: i32,
    pub insets: CellInsets,
}

impl CellMetrics {
    fn new(char_width: i32, char_height: i32, ascent: i32, width_scale: f64, height_scale: f64) -> Self {
        let cell_width = (char_width as f64 * width_scale) as i32;
        let cell_height = (char_height as f64 * height_scale) as i32;
        let pad_x = cell_width - char_width;
        let pad_y = cell_height - char_height;
        Self {
            cell_width,
            cell_height,
            char_width,
            char_height,
            char_ascent: ascent,
            char_descent: char_height - ascent,
            insets: CellInsets {
                left: pad_x / 2,
                right: pad_x - pad_x / 2,
                top: pad_y / 2,
                bottom: pad_y - pad_y / 2,
            },
        }
    }
}

/// Handles for normal, bold, italic and bold-italic, indexed by
/// [`FontStyle::index`]. Slots may share a handle; each slot holds its own
/// cache reference.
pub struct StyleFontSet {
    handles: [Rc<FontHandle>; 4],
    metrics: CellMetrics,
}

impl StyleFontSet {
    /// Acquire all four variants of `key` from `cache`.
    ///
    /// Only the normal face is required. A variant that fails to load, or
    /// whose width strays too far, reuses its base style's handle.
    pub fn acquire(
        cache: &mut FontHandleCache,
        key: &FontConfigKey,
        width_scale: f64,
        height_scale: f64,
    ) -> glint_text::Result<Self> {
        let normal = cache.acquire(key)?;
        let description = &key.description;

        let variant = |cache: &mut FontHandleCache, style: FontStyle| {
            let mut desc = description.clone();
            if style.bold {
                desc = desc.bolder();
            }
            if style.italic {
                desc = desc.italicized();
            }
            match cache.acquire(&key.with_description(desc)) {
                Ok(handle) => handle,
                Err(err) => {
                    tracing::warn!("{:?} variant of {} unavailable: {}", style, description.family, err);
                    cache.retain(&normal)
                }
            }
        };

        let bold = variant(cache, FontStyle::BOLD);
        let italic = variant(cache, FontStyle::ITALIC);
        let bold_italic = variant(cache, FontStyle::BOLD_ITALIC);
        let mut handles = [Rc::clone(&normal), bold, italic, bold_italic];

        // Each variant against the face it derives from
        for (base, derived) in [
            (FontStyle::NORMAL, FontStyle::BOLD),
            (FontStyle::ITALIC, FontStyle::BOLD_ITALIC),
            (FontStyle::NORMAL, FontStyle::ITALIC),
            (FontStyle::BOLD, FontStyle::BOLD_ITALIC),
        ] {
            let base_width = handles[base.index()].metrics().width;
            let derived_width = handles[derived.index()].metrics().width;
            if !within_tolerance(base_width, derived_width) {
                tracing::warn!(
                    "{:?} face of {} is {}px wide against {}px, using {:?}",
                    derived,
                    key.description.family,
                    derived_width,
                    base_width,
                    base
                );
                let replacement = cache.retain(&handles[base.index()]);
                let rejected = std::mem::replace(&mut handles[derived.index()], replacement);
                cache.release(&rejected);
            }
        }

        let m = normal.metrics();
        let metrics = CellMetrics::new(m.width, m.height, m.ascent, width_scale, height_scale);
        tracing::debug!(
            "cell {}x{} for {} {}pt (char {}x{})",
            metrics.cell_width,
            metrics.cell_height,
            key.description.family,
            key.description.points,
            metrics.char_width,
            metrics.char_height
        );

        Ok(Self { handles, metrics })
    }

    /// Return every slot's reference to the cache
    pub fn release(self, cache: &mut FontHandleCache) {
        for handle in &self.handles {
            cache.release(handle);
        }
    }

    pub fn handle(&self, style: FontStyle) -> &Rc<FontHandle> {
        &self.handles[style.index()]
    }

    /// Whether `style` with bold set draws from a real bold face
    pub fn has_bold(&self, style: FontStyle) -> bool {
        let bold = FontStyle::new(true, style.italic);
        let regular = FontStyle::new(false, style.italic);
        !Rc::ptr_eq(self.handle(bold), self.handle(regular))
    }

    pub fn metrics(&self) -> CellMetrics {
        self.metrics
    }
}

fn within_tolerance(base: i32, derived: i32) -> bool {
    if base <= 0 {
        return true;
    }
    (derived * 100 / base - 100).abs() <= MAX_WIDTH_DEVIATION
}
