//! Font handles and per-character glyph plans for Glint
//!
//! This crate provides:
//! - Font configuration keys (description, language, resolution, options, generation)
//! - A process-wide, reference-counted font handle cache with deferred destruction
//! - Memoized per-character glyph plans with an ASCII pre-cache
//! - A system shaping backend (fontdb discovery, ttf-parser, rustybuzz)
//! - Pluggable script policy and instrumentation counters

pub mod cache;
pub mod config;
pub mod counters;
pub mod fallback;
pub mod font;
pub mod handle;
pub mod plan;
pub mod registry;
pub mod script;
pub mod shaping;
pub mod system;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use cache::{
    CacheConfig, Clock, FontHandleCache, SharedFontCache, SystemClock, TimerId,
    DEFAULT_RELEASE_DELAY,
};
pub use config::{Antialias, AntialiasOptions, FontConfigKey, FontDescription, Hinting};
pub use counters::{CountingRenderCounters, NoopCounters, PlanTag, RenderCounters};
pub use font::{FontFace, FontMetrics};
pub use handle::{FontHandle, HandleMetrics};
pub use plan::{GlyphPlan, PlanKind};
pub use registry::{FontRegistry, GenericFont};
pub use script::{LatinScriptPolicy, ScriptPolicy};
pub use shaping::{FontResolver, GlyphRun, RunFont, ShapedGlyph, ShapedLine, ShapingContext};
pub use system::{BuzzContext, SystemFontResolver};

use thiserror::Error;

/// Font and shaping errors
#[derive(Error, Debug)]
pub enum TextError {
    #[error("No font found for '{0}'")]
    FontNotFound(String),

    #[error("Failed to load font: {0}")]
    FontLoad(String),

    #[error("Failed to parse font: {0}")]
    FontParse(String),

    #[error("Invalid font data")]
    InvalidFontData,
}

pub type Result<T> = std::result::Result<T, TextError>;
