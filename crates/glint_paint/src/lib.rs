//! Glint Paint API
//!
//! A recorded 2D drawing API sized for what a terminal cell renderer needs.
//! Nothing here rasterizes: a [`PaintContext`] records [`PaintCommand`]s that a
//! backend (GPU, software, test harness) replays in order.
//!
//! # Features
//!
//! - Rectangle and path fills/strokes (lines, arcs)
//! - Positioned glyph drawing keyed by an opaque font resource id
//! - Repeating stipple patterns and procedural separation stencils
//! - Offscreen groups composited through a mask
//! - Alpha-only mask surfaces that can be replayed many times
//! - Nestable clipping

pub mod color;
pub mod context;
pub mod glyph;
pub mod path;
pub mod pattern;
pub mod primitives;

pub use color::Color;
pub use context::{FillRule, LineCap, MaskSurface, PaintCommand, PaintContext, StrokeStyle};
pub use glyph::{FontResourceId, GlyphPosition, LineRun};
pub use path::{Path, PathBuilder, PathCommand, Point};
pub use pattern::{Pattern, Stipple};
pub use primitives::{Rect, Size};
