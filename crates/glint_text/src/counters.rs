//! Optional render instrumentation

use std::cell::Cell;

/// Glyph plan representation, for counting
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlanTag {
    Line,
    Run,
    Glyph,
}

/// Observability hooks; every method defaults to a no-op
pub trait RenderCounters {
    fn plan_classified(&self, _tag: PlanTag) {}
    fn plan_precached(&self) {}
    fn text_shaped(&self) {}
    fn batch_flushed(&self, _glyphs: usize) {}
}

/// Counters that record nothing
#[derive(Debug, Default)]
pub struct NoopCounters;

impl RenderCounters for NoopCounters {}

/// Counters that keep running totals
#[derive(Debug, Default)]
pub struct CountingRenderCounters {
    pub lines: Cell<u64>,
    pub runs: Cell<u64>,
    pub glyphs: Cell<u64>,
    pub precached: Cell<u64>,
    pub shaped: Cell<u64>,
    pub batches: Cell<u64>,
    pub batched_glyphs: Cell<u64>,
}

impl CountingRenderCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn bump(cell: &Cell<u64>, by: u64) {
        cell.set(cell.get() + by);
    }
}

impl RenderCounters for CountingRenderCounters {
    fn plan_classified(&self, tag: PlanTag) {
        match tag {
            PlanTag::Line => Self::bump(&self.lines, 1),
            PlanTag::Run => Self::bump(&self.runs, 1),
            PlanTag::Glyph => Self::bump(&self.glyphs, 1),
        }
    }

    fn plan_precached(&self) {
        Self::bump(&self.precached, 1);
    }

    fn text_shaped(&self) {
        Self::bump(&self.shaped, 1);
    }

    fn batch_flushed(&self, glyphs: usize) {
        Self::bump(&self.batches, 1);
        Self::bump(&self.batched_glyphs, glyphs as u64);
    }
}
