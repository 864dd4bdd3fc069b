//! Glint terminal cell rasterizer
//!
//! Draws a fixed grid of terminal cells through [`glint_paint`]:
//!
//! - Four-style font sets sharing handles through the [`glint_text`] cache
//! - Cell metrics with configurable width/height scaling
//! - Batched glyph drawing from memoized glyph plans
//! - Box drawing, block elements and legacy computing mosaics drawn from
//!   cell geometry
//! - A cached, tileable undercurl mask
//!
//! # Example
//!
//! ```ignore
//! use glint_term::{FontStyle, RenderConfig, TerminalDraw, TextAttrs, TextRequest};
//! use glint_text::{FontDescription, FontHandleCache, SystemFontResolver};
//!
//! let cache = FontHandleCache::new(Rc::new(SystemFontResolver::new())).shared();
//! let mut term = TerminalDraw::new(cache, RenderConfig::default());
//! term.set_font(&FontDescription::new("monospace", 11.0), 1.0, 1.0)?;
//!
//! let mut frame = term.begin(&mut ctx);
//! frame.draw_text(&[TextRequest::new('$', 0, 0)], FontStyle::NORMAL, TextAttrs::NONE, fg, 1.0);
//! ```

pub mod config;
pub mod draw;
pub mod font_set;
pub mod graphics;
pub mod mirror;
pub mod style;
pub mod undercurl;

pub use config::{ConfigError, RenderConfig, CELL_SCALE_RANGE, DEFAULT_GLYPH_BATCH_LIMIT};
pub use draw::{DrawFrame, TerminalDraw, TextRequest};
pub use font_set::{CellInsets, CellMetrics, StyleFontSet};
pub use graphics::{draw_synthetic, is_synthetic, GlyphBox};
pub use mirror::mirror_char;
pub use style::{FontStyle, TextAttrs};
pub use undercurl::{undercurl_height, undercurl_radius, UndercurlCache};
