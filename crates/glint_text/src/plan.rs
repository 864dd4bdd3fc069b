//! Glyph plans: the cached rendering recipe for one character

use std::sync::Arc;

use glint_paint::FontResourceId;

use crate::counters::PlanTag;
use crate::shaping::{RunFont, ShapedGlyph, ShapedLine};

/// How a character is drawn, fastest last
#[derive(Debug)]
pub enum PlanKind {
    /// Needs more than one font; owns the shaped line outright
    Line(ShapedLine),
    /// One font, but several glyphs or a positioned glyph
    Run {
        font: Arc<RunFont>,
        glyphs: Vec<ShapedGlyph>,
    },
    /// One glyph at the origin; batchable
    Glyph { font: FontResourceId, glyph: u16 },
}

impl PlanKind {
    pub fn tag(&self) -> PlanTag {
        match self {
            PlanKind::Line(_) => PlanTag::Line,
            PlanKind::Run { .. } => PlanTag::Run,
            PlanKind::Glyph { .. } => PlanTag::Glyph,
        }
    }
}

/// Memoized plan for one (font handle, character) pair.
///
/// Immutable once built.
#[derive(Debug)]
pub struct GlyphPlan {
    pub kind: PlanKind,
    /// Advance width in whole pixels, rounded up
    pub width: i32,
    /// Logical height in whole pixels, rounded up
    pub height: i32,
    pub has_unknown_glyphs: bool,
}

impl GlyphPlan {
    /// Classify the result of shaping a single character.
    ///
    /// A multi-font result takes the line out of `shaped`, leaving it empty;
    /// otherwise the glyphs are copied and `shaped` stays reusable.
    pub fn classify(shaped: &mut ShapedLine) -> Self {
        let width = shaped.width.ceil() as i32;
        let height = shaped.height.ceil() as i32;
        let has_unknown_glyphs = shaped.unknown_glyphs > 0;

        let kind = match shaped.runs.as_slice() {
            [run] => match (run.glyphs.as_slice(), run.scaled) {
                ([glyph], Some(font))
                    if glyph.is_origin_aligned() && glyph.glyph_id <= u16::MAX as u32 =>
                {
                    PlanKind::Glyph {
                        font,
                        glyph: glyph.glyph_id as u16,
                    }
                }
                _ => PlanKind::Run {
                    font: Arc::clone(&run.font),
                    glyphs: run.glyphs.clone(),
                },
            },
            _ => PlanKind::Line(std::mem::take(shaped)),
        };

        Self {
            kind,
            width,
            height,
            has_unknown_glyphs,
        }
    }

    /// Fast-path plan for a glyph taken from a pre-shaped sample
    pub fn glyph(font: FontResourceId, glyph: u16, width: i32, height: i32) -> Self {
        Self {
            kind: PlanKind::Glyph { font, glyph },
            width,
            height,
            has_unknown_glyphs: false,
        }
    }

    pub fn is_fast_path(&self) -> bool {
        matches!(self.kind, PlanKind::Glyph { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shaping::GlyphRun;

    fn run(resource: u64, scaled: bool, glyphs: Vec<ShapedGlyph>) -> GlyphRun {
        GlyphRun {
            font: Arc::new(RunFont {
                resource: FontResourceId(resource),
                family: "Test".into(),
            }),
            scaled: scaled.then_some(FontResourceId(resource)),
            glyphs,
        }
    }

    fn glyph(id: u32, x_offset: f32) -> ShapedGlyph {
        ShapedGlyph {
            glyph_id: id,
            x_advance: 10.0,
            x_offset,
            ..Default::default()
        }
    }

    fn line(runs: Vec<GlyphRun>) -> ShapedLine {
        ShapedLine {
            runs,
            width: 9.2,
            height: 20.0,
            baseline: 16.0,
            unknown_glyphs: 0,
        }
    }

    #[test]
    fn test_single_aligned_glyph_is_fast_path() {
        let mut shaped = line(vec![run(3, true, vec![glyph(42, 0.0)])]);
        let plan = GlyphPlan::classify(&mut shaped);
        assert!(matches!(
            plan.kind,
            PlanKind::Glyph {
                font: FontResourceId(3),
                glyph: 42
            }
        ));
        assert_eq!(plan.width, 10);
        assert_eq!(shaped.runs.len(), 1, "workspace untouched");
    }

    #[test]
    fn test_offset_glyph_is_run() {
        let mut shaped = line(vec![run(3, true, vec![glyph(42, 1.5)])]);
        let plan = GlyphPlan::classify(&mut shaped);
        assert_eq!(plan.kind.tag(), PlanTag::Run);
    }

    #[test]
    fn test_wide_glyph_index_is_run() {
        let mut shaped = line(vec![run(3, true, vec![glyph(70_000, 0.0)])]);
        assert_eq!(GlyphPlan::classify(&mut shaped).kind.tag(), PlanTag::Run);
    }

    #[test]
    fn test_missing_scaled_font_falls_through() {
        let mut shaped = line(vec![run(3, false, vec![glyph(42, 0.0)])]);
        assert_eq!(GlyphPlan::classify(&mut shaped).kind.tag(), PlanTag::Run);
    }

    #[test]
    fn test_multi_font_takes_line() {
        let mut shaped = line(vec![
            run(3, true, vec![glyph(1, 0.0)]),
            run(4, true, vec![glyph(2, 0.0)]),
        ]);
        let plan = GlyphPlan::classify(&mut shaped);
        match &plan.kind {
            PlanKind::Line(owned) => assert_eq!(owned.runs.len(), 2),
            other => panic!("expected line plan, got {:?}", other),
        }
        assert!(shaped.runs.is_empty(), "line moved out of workspace");
    }
}
