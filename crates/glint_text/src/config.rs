//! Font configuration keys
//!
//! A [`FontConfigKey`] names one fully realized font. Two keys are
//! interchangeable only when every field matches exactly; floating point
//! fields compare by bit pattern.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// Weight added to a description to derive its bold variant
pub const BOLD_WEIGHT_DELTA: u16 = 300;
pub const MIN_WEIGHT: u16 = 100;
pub const MAX_WEIGHT: u16 = 1000;
pub const NORMAL_WEIGHT: u16 = 400;

/// Nominal font description as the user configured it
#[derive(Clone, Debug)]
pub struct FontDescription {
    pub family: String,
    /// Size in typographic points
    pub points: f64,
    /// CSS-style weight, 100..=1000
    pub weight: u16,
    pub italic: bool,
}

impl FontDescription {
    pub fn new(family: impl Into<String>, points: f64) -> Self {
        Self {
            family: family.into(),
            points,
            weight: NORMAL_WEIGHT,
            italic: false,
        }
    }

    pub fn with_weight(mut self, weight: u16) -> Self {
        self.weight = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
        self
    }

    pub fn with_italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    /// The bold variant: weight raised by 300, clamped to 1000
    pub fn bolder(&self) -> Self {
        let weight = self
            .weight
            .saturating_add(BOLD_WEIGHT_DELTA)
            .min(MAX_WEIGHT);
        self.clone().with_weight(weight)
    }

    /// The italic variant
    pub fn italicized(&self) -> Self {
        self.clone().with_italic(true)
    }

    /// Pixel size at `resolution` dots per inch
    pub fn pixel_size(&self, resolution: f64) -> f64 {
        self.points * resolution / 72.0
    }
}

impl PartialEq for FontDescription {
    fn eq(&self, other: &Self) -> bool {
        self.family == other.family
            && self.points.to_bits() == other.points.to_bits()
            && self.weight == other.weight
            && self.italic == other.italic
    }
}

impl Eq for FontDescription {}

impl Hash for FontDescription {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.family.hash(state);
        self.points.to_bits().hash(state);
        self.weight.hash(state);
        self.italic.hash(state);
    }
}

/// Anti-aliasing mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Antialias {
    #[default]
    Default,
    None,
    Gray,
    Subpixel,
}

/// Outline hinting strength
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hinting {
    #[default]
    Default,
    None,
    Slight,
    Medium,
    Full,
}

/// Rasterization options carried in the key
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct AntialiasOptions {
    pub antialias: Antialias,
    pub hinting: Hinting,
}

/// Identity of one realized font
#[derive(Clone, Debug)]
pub struct FontConfigKey {
    pub description: FontDescription,
    /// BCP 47 language tag used for script decisions, may be empty
    pub language: String,
    /// Device resolution in dots per inch
    pub resolution: f64,
    pub options: AntialiasOptions,
    /// Font configuration generation the key was resolved against
    pub generation: u64,
}

impl FontConfigKey {
    pub fn new(
        description: FontDescription,
        language: impl Into<String>,
        resolution: f64,
        options: AntialiasOptions,
        generation: u64,
    ) -> Self {
        Self {
            description,
            language: language.into(),
            resolution,
            options,
            generation,
        }
    }

    /// Same configuration with a different description
    pub fn with_description(&self, description: FontDescription) -> Self {
        Self {
            description,
            ..self.clone()
        }
    }

    pub fn pixel_size(&self) -> f64 {
        self.description.pixel_size(self.resolution)
    }
}

impl PartialEq for FontConfigKey {
    fn eq(&self, other: &Self) -> bool {
        self.description == other.description
            && self.language == other.language
            && self.resolution.to_bits() == other.resolution.to_bits()
            && self.options == other.options
            && self.generation == other.generation
    }
}

impl Eq for FontConfigKey {}

impl Hash for FontConfigKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.description.hash(state);
        self.language.hash(state);
        self.resolution.to_bits().hash(state);
        self.options.hash(state);
        self.generation.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rustc_hash::FxHashSet;

    fn key(resolution: f64, generation: u64) -> FontConfigKey {
        FontConfigKey::new(
            FontDescription::new("Monospace", 10.0),
            "en",
            resolution,
            AntialiasOptions::default(),
            generation,
        )
    }

    #[test]
    fn test_equal_fields_collapse() {
        let mut set = FxHashSet::default();
        set.insert(key(96.0, 1));
        set.insert(key(96.0, 1));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_any_field_change_is_distinct() {
        assert_ne!(key(96.0, 1), key(96.000001, 1));
        assert_ne!(key(96.0, 1), key(96.0, 2));
        let mut other = key(96.0, 1);
        other.options.hinting = Hinting::Full;
        assert_ne!(key(96.0, 1), other);
    }

    #[test]
    fn test_bolder_clamps() {
        let desc = FontDescription::new("Mono", 12.0);
        assert_eq!(desc.bolder().weight, 700);
        assert_eq!(desc.with_weight(900).bolder().weight, 1000);
    }

    #[test]
    fn test_pixel_size() {
        let desc = FontDescription::new("Mono", 12.0);
        assert_eq!(desc.pixel_size(96.0), 16.0);
    }
}
