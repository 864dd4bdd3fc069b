//! Font registry for system font discovery and caching
//!
//! Uses fontdb to discover and load system fonts by name or generic category,
//! and hands out [`FontResourceId`]s for (face, pixel size) pairs so a paint
//! backend can map glyph draw commands back to a face.

use std::sync::Arc;

use fontdb::{Database, Family, Query, Source, Stretch, Style, Weight};
use glint_paint::FontResourceId;
use rustc_hash::FxHashMap;

use crate::fallback::fallback_bucket_key;
use crate::font::FontFace;
use crate::{Result, TextError};

/// Generic font category for fallback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GenericFont {
    /// Monospace font, the terminal default
    #[default]
    Monospace,
    SansSerif,
    Serif,
}

/// Font registry that discovers and caches system fonts
pub struct FontRegistry {
    /// fontdb database containing all known fonts
    db: Database,
    /// Cached FontFace instances (Some = found, None = not found)
    faces: FxHashMap<String, Option<Arc<FontFace>>>,
    /// Per-character fallback faces keyed by script bucket
    fallbacks: FxHashMap<u32, Option<Arc<FontFace>>>,
    /// (face cache key, pixel size bits) -> resource id
    resource_ids: FxHashMap<(String, u32), FontResourceId>,
    resources: FxHashMap<FontResourceId, (Arc<FontFace>, f32)>,
    next_resource: u64,
    generation: u64,
}

impl FontRegistry {
    /// Create a new font registry and load system fonts
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        Self::with_database(db)
    }

    /// Registry with no fonts; populate with [`FontRegistry::load_font_data`]
    pub fn empty() -> Self {
        Self::with_database(Database::new())
    }

    fn with_database(db: Database) -> Self {
        Self {
            db,
            faces: FxHashMap::default(),
            fallbacks: FxHashMap::default(),
            resource_ids: FxHashMap::default(),
            resources: FxHashMap::default(),
            next_resource: 1,
            generation: 1,
        }
    }

    /// Add in-memory font data
    pub fn load_font_data(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        self.invalidate();
    }

    /// Rescan system fonts, starting a new generation.
    ///
    /// Keys built against the previous generation no longer match, so the
    /// handle cache misses and rebuilds naturally.
    pub fn reload(&mut self) {
        let mut db = Database::new();
        db.load_system_fonts();
        self.db = db;
        self.invalidate();
    }

    fn invalidate(&mut self) {
        self.faces.clear();
        self.fallbacks.clear();
        self.resource_ids.clear();
        self.resources.clear();
        self.generation += 1;
        tracing::debug!("font registry generation {}", self.generation);
    }

    /// Monotonic counter bumped whenever the font set changes
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Load a font by family name with specific weight and italic style
    ///
    /// Italic requests fall back to an oblique face when no italic exists.
    pub fn load_font_with_style(
        &mut self,
        name: &str,
        weight: u16,
        italic: bool,
    ) -> Result<Arc<FontFace>> {
        self.load_family(Family::Name(name), name, weight, italic)
    }

    /// Load a generic font category with specific weight and italic style
    pub fn load_generic_with_style(
        &mut self,
        generic: GenericFont,
        weight: u16,
        italic: bool,
    ) -> Result<Arc<FontFace>> {
        let family = match generic {
            GenericFont::Monospace => Family::Monospace,
            GenericFont::SansSerif => Family::SansSerif,
            GenericFont::Serif => Family::Serif,
        };
        let label = format!("__generic_{:?}", generic);
        self.load_family(family, &label, weight, italic)
    }

    fn load_family(
        &mut self,
        family: Family<'_>,
        label: &str,
        weight: u16,
        italic: bool,
    ) -> Result<Arc<FontFace>> {
        let cache_key = format!("{}:w{}:{}", label, weight, if italic { "i" } else { "n" });

        // Check cache first (includes failed lookups as None)
        if let Some(cached) = self.faces.get(&cache_key) {
            return cached
                .clone()
                .ok_or_else(|| TextError::FontNotFound(cache_key.clone()));
        }

        let families = [family];
        let mut query = Query {
            families: &families,
            weight: Weight(weight.min(900)),
            style: if italic { Style::Italic } else { Style::Normal },
            stretch: Stretch::Normal,
        };

        let mut id = self.db.query(&query);
        if id.is_none() && italic {
            query.style = Style::Oblique;
            id = self.db.query(&query);
        }

        let Some(id) = id else {
            self.faces.insert(cache_key.clone(), None);
            return Err(TextError::FontNotFound(cache_key));
        };

        let face = Arc::new(self.load_face_by_id(id)?);
        self.faces.insert(cache_key, Some(Arc::clone(&face)));
        Ok(face)
    }

    /// Load a font face by fontdb ID
    fn load_face_by_id(&self, id: fontdb::ID) -> Result<FontFace> {
        let (src, face_index) = self
            .db
            .face_source(id)
            .ok_or_else(|| TextError::FontLoad("Font source not found".to_string()))?;

        let data = match src {
            Source::File(path) => std::fs::read(&path).map_err(|e| {
                TextError::FontLoad(format!("Failed to read font file {:?}: {}", path, e))
            })?,
            Source::Binary(arc) => arc.as_ref().as_ref().to_vec(),
            Source::SharedFile(_path, data) => data.as_ref().as_ref().to_vec(),
        };

        FontFace::from_data_with_index(data, face_index)
    }

    /// Load a family, falling back to the generic monospace face
    pub fn load_with_fallback(
        &mut self,
        name: &str,
        weight: u16,
        italic: bool,
    ) -> Result<Arc<FontFace>> {
        if !name.is_empty() {
            let already_tried = self
                .faces
                .contains_key(&format!("{}:w{}:{}", name, weight, if italic { "i" } else { "n" }));

            if let Ok(face) = self.load_font_with_style(name, weight, italic) {
                return Ok(face);
            }

            // Only warn on the first failure for this font
            if !already_tried {
                tracing::warn!(
                    "Font '{}' (weight={}, italic={}) not found, falling back to monospace",
                    name,
                    weight,
                    italic
                );
            }
        }

        self.load_generic_with_style(GenericFont::Monospace, weight, italic)
            .or_else(|_| self.load_generic_with_style(GenericFont::Monospace, 400, false))
            .or_else(|_| self.load_generic_with_style(GenericFont::SansSerif, 400, false))
    }

    /// A face that covers `c`, searched across all known fonts.
    ///
    /// Results are cached per script bucket and revalidated against the
    /// exact character.
    pub fn fallback_for_char(&mut self, c: char, weight: u16, italic: bool) -> Option<Arc<FontFace>> {
        let bucket = fallback_bucket_key(c);
        if let Some(Some(face)) = self.fallbacks.get(&bucket) {
            if face.has_glyph(c) {
                return Some(Arc::clone(face));
            }
        }

        let found = self.scan_for_char(c, weight, italic);
        self.fallbacks.insert(bucket, found.clone());
        found
    }

    fn scan_for_char(&mut self, c: char, weight: u16, italic: bool) -> Option<Arc<FontFace>> {
        // Prefer faces close to the requested style
        let mut candidates: Vec<_> = self
            .db
            .faces()
            .map(|info| {
                let style_penalty = match (italic, info.style) {
                    (false, Style::Normal) | (true, Style::Italic | Style::Oblique) => 0,
                    _ => 1000,
                };
                let weight_penalty = (info.weight.0 as i32 - weight as i32).unsigned_abs();
                (info.id, style_penalty + weight_penalty)
            })
            .collect();
        candidates.sort_by_key(|(_, penalty)| *penalty);

        for (id, _) in candidates {
            let Ok(face) = self.load_face_by_id(id) else {
                continue;
            };
            if face.has_glyph(c) {
                tracing::trace!("fallback for U+{:04X}: {}", c as u32, face.family_name());
                return Some(Arc::new(face));
            }
        }
        None
    }

    /// Resource id for `face` at `pixel_size`, assigned on first use
    pub fn resource_id(&mut self, face: &Arc<FontFace>, pixel_size: f32) -> FontResourceId {
        let key = (face.cache_key(), pixel_size.to_bits());
        if let Some(id) = self.resource_ids.get(&key) {
            return *id;
        }
        let id = FontResourceId(self.next_resource);
        self.next_resource += 1;
        self.resource_ids.insert(key, id);
        self.resources.insert(id, (Arc::clone(face), pixel_size));
        id
    }

    /// Resolve a resource id back to its face and pixel size
    pub fn resource(&self, id: FontResourceId) -> Option<(Arc<FontFace>, f32)> {
        self.resources.get(&id).cloned()
    }

    /// List available font families
    pub fn list_families(&self) -> Vec<String> {
        let mut families: Vec<String> = self
            .db
            .faces()
            .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
            .collect();

        families.sort();
        families.dedup();
        families
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_registry_reports_not_found() {
        let mut registry = FontRegistry::empty();
        let err = registry.load_font_with_style("Nope", 400, false).unwrap_err();
        assert!(matches!(err, TextError::FontNotFound(_)));
        // Cached miss reports the same error
        assert!(registry.load_font_with_style("Nope", 400, false).is_err());
        assert!(registry.load_with_fallback("Nope", 400, false).is_err());
    }

    #[test]
    fn test_reload_bumps_generation() {
        let mut registry = FontRegistry::empty();
        let before = registry.generation();
        registry.load_font_data(Vec::new());
        assert!(registry.generation() > before);
    }

    #[test]
    fn test_system_monospace_resource_ids() {
        let mut registry = FontRegistry::new();

        let face = match registry.load_with_fallback("", 400, false) {
            Ok(face) => face,
            Err(_) => {
                println!("No fonts available - skipping test (CI environment)");
                return;
            }
        };

        let a = registry.resource_id(&face, 16.0);
        let b = registry.resource_id(&face, 16.0);
        let c = registry.resource_id(&face, 18.0);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let (resolved, size) = registry.resource(a).expect("resource registered");
        assert_eq!(resolved.family_name(), face.family_name());
        assert_eq!(size, 16.0);
    }
}
