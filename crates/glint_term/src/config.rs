//! Renderer configuration

use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

use glint_text::{Antialias, AntialiasOptions, CacheConfig, Hinting};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Allowed range for the cell width/height multipliers
pub const CELL_SCALE_RANGE: RangeInclusive<f64> = 1.0..=2.0;

/// Glyphs per batched draw call before the batch is flushed
pub const DEFAULT_GLYPH_BATCH_LIMIT: usize = 100;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Failed to parse renderer config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{name} must be within 1.0..=2.0, got {value}")]
    ScaleOutOfRange { name: &'static str, value: f64 },

    #[error("glyph_batch_limit must be at least 1")]
    EmptyBatch,
}

/// Terminal renderer settings
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Multiplier applied to the natural character width
    pub cell_width_scale: f64,
    /// Multiplier applied to the natural character height
    pub cell_height_scale: f64,
    /// Draw "Symbols for Legacy Computing" mosaics synthetically
    pub legacy_computing: bool,
    pub glyph_batch_limit: usize,
    /// Grace period before an unused font is destroyed
    pub font_release_delay_ms: u64,
    pub antialias: Antialias,
    pub hinting: Hinting,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cell_width_scale: 1.0,
            cell_height_scale: 1.0,
            legacy_computing: true,
            glyph_batch_limit: DEFAULT_GLYPH_BATCH_LIMIT,
            font_release_delay_ms: 30_000,
            antialias: Antialias::Default,
            hinting: Hinting::Default,
        }
    }
}

impl RenderConfig {
    /// Parse and validate TOML
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        check_scale("cell_width_scale", self.cell_width_scale)?;
        check_scale("cell_height_scale", self.cell_height_scale)?;
        if self.glyph_batch_limit == 0 {
            return Err(ConfigError::EmptyBatch);
        }
        Ok(())
    }

    pub fn antialias_options(&self) -> AntialiasOptions {
        AntialiasOptions {
            antialias: self.antialias,
            hinting: self.hinting,
        }
    }

    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            release_delay: Duration::from_millis(self.font_release_delay_ms),
        }
    }
}

pub(crate) fn check_scale(name: &'static str, value: f64) -> Result<(), ConfigError> {
    if CELL_SCALE_RANGE.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ScaleOutOfRange { name, value })
    }
}
