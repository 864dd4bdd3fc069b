//! Font handles: one realized font plus its per-character plan store

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::cache::TimerId;
use crate::config::FontConfigKey;
use crate::counters::RenderCounters;
use crate::plan::GlyphPlan;
use crate::script::ScriptPolicy;
use crate::shaping::{ShapedLine, ShapingContext};

/// Printable ASCII, shaped once per handle to seed the plan store
pub const ASCII_SAMPLE: &str = " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

const ASCII_PLANS: usize = 128;

/// Measured character metrics in whole pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HandleMetrics {
    /// Widest printable ASCII character
    pub width: i32,
    /// Tallest printable ASCII character
    pub height: i32,
    /// Baseline offset from the top of the cell
    pub ascent: i32,
}

impl HandleMetrics {
    pub fn descent(&self) -> i32 {
        self.height - self.ascent
    }
}

/// Shaping context plus the buffers it shapes into, reused across lookups
struct Workspace {
    context: Box<dyn ShapingContext>,
    text: String,
    line: ShapedLine,
}

#[derive(Clone, Copy)]
struct SampleExtents {
    width: f32,
    height: f32,
    baseline: f32,
}

/// One fully realized drawable font at one configuration.
///
/// Handles are owned by the [`FontHandleCache`](crate::FontHandleCache) and
/// shared as `Rc`; the reference count tracked here is the cache's logical
/// acquire/release count, not the `Rc` strong count.
pub struct FontHandle {
    key: FontConfigKey,
    refcount: Cell<usize>,
    pending_destroy: Cell<Option<TimerId>>,
    ascii: RefCell<[Option<Rc<GlyphPlan>>; ASCII_PLANS]>,
    others: RefCell<Option<FxHashMap<char, Rc<GlyphPlan>>>>,
    workspace: RefCell<Workspace>,
    metrics: HandleMetrics,
    counters: Rc<dyn RenderCounters>,
}

impl FontHandle {
    /// Build a handle, pre-caching ASCII plans and measuring the font
    pub fn new(
        key: FontConfigKey,
        context: Box<dyn ShapingContext>,
        policy: &dyn ScriptPolicy,
        counters: Rc<dyn RenderCounters>,
    ) -> Self {
        let fallback = context.metrics();
        let mut handle = Self {
            key,
            refcount: Cell::new(0),
            pending_destroy: Cell::new(None),
            ascii: RefCell::new(std::array::from_fn(|_| None)),
            others: RefCell::new(None),
            workspace: RefCell::new(Workspace {
                context,
                text: String::new(),
                line: ShapedLine::default(),
            }),
            metrics: HandleMetrics::default(),
            counters,
        };

        let sample = handle.precache_ascii(policy);

        let mut metrics = HandleMetrics::default();
        for c in '!'..='~' {
            let plan = handle.lookup(c);
            metrics.width = metrics.width.max(plan.width);
            metrics.height = metrics.height.max(plan.height);
        }
        if metrics.width == 0 {
            metrics.width = (sample.width / ASCII_SAMPLE.len() as f32).ceil() as i32;
        }
        if metrics.height == 0 {
            metrics.height = sample.height.ceil() as i32;
        }
        if metrics.height == 0 {
            metrics.height = fallback.height.ceil() as i32;
        }
        metrics.ascent = sample.baseline.ceil() as i32;
        if metrics.ascent == 0 {
            metrics.ascent = fallback.ascent.ceil() as i32;
        }
        handle.metrics = metrics;

        tracing::debug!(
            "font handle {} {}pt: {}x{} ascent {}",
            handle.key.description.family,
            handle.key.description.points,
            metrics.width,
            metrics.height,
            metrics.ascent
        );

        handle
    }

    /// Shape printable ASCII in one pass and seed fast-path plans from it
    fn precache_ascii(&self, policy: &dyn ScriptPolicy) -> SampleExtents {
        let mut guard = self.workspace.borrow_mut();
        let ws = &mut *guard;

        ws.text.clear();
        ws.text.push_str(ASCII_SAMPLE);
        ws.context.shape(&ws.text, &mut ws.line);
        self.counters.text_shaped();

        let extents = SampleExtents {
            width: ws.line.width,
            height: ws.line.height,
            baseline: ws.line.baseline,
        };

        let skip_common = !policy.language_includes_latin(&self.key.language);
        let sample = ASCII_SAMPLE.as_bytes();
        let mut seeded = 0;

        if let ([run], 0) = (ws.line.runs.as_slice(), ws.line.unknown_glyphs) {
            if let Some(font) = run.scaled {
                let height = ws.line.height.ceil() as i32;
                let mut ascii = self.ascii.borrow_mut();
                let glyphs = &run.glyphs;

                let mut i = 0;
                while i < glyphs.len() {
                    let cluster = glyphs[i].cluster;
                    let mut j = i + 1;
                    while j < glyphs.len() && glyphs[j].cluster == cluster {
                        j += 1;
                    }

                    // One glyph for this cluster, and the cluster is one byte
                    let next = glyphs.get(j).map_or(sample.len() as u32, |g| g.cluster);
                    let glyph = &glyphs[i];
                    if j - i == 1
                        && next == cluster + 1
                        && (cluster as usize) < sample.len()
                        && glyph.x_offset == 0.0
                        && glyph.y_offset == 0.0
                        && glyph.glyph_id <= u16::MAX as u32
                    {
                        let c = sample[cluster as usize] as char;
                        if !(skip_common && policy.is_common_script(c)) {
                            ascii[c as usize] = Some(Rc::new(GlyphPlan::glyph(
                                font,
                                glyph.glyph_id as u16,
                                glyph.x_advance.ceil() as i32,
                                height,
                            )));
                            self.counters.plan_precached();
                            seeded += 1;
                        }
                    }
                    i = j;
                }
            }
        }

        tracing::trace!("pre-cached {} ASCII plans", seeded);

        ws.line.clear();
        ws.text.clear();
        extents
    }

    /// The plan for `c`, classified on first use and memoized
    pub fn lookup(&self, c: char) -> Rc<GlyphPlan> {
        let index = c as usize;
        if index < ASCII_PLANS {
            if let Some(plan) = &self.ascii.borrow()[index] {
                return Rc::clone(plan);
            }
        } else if let Some(plan) = self.others.borrow().as_ref().and_then(|m| m.get(&c)) {
            return Rc::clone(plan);
        }

        let plan = Rc::new(self.classify(c));
        if index < ASCII_PLANS {
            self.ascii.borrow_mut()[index] = Some(Rc::clone(&plan));
        } else {
            self.others
                .borrow_mut()
                .get_or_insert_with(FxHashMap::default)
                .insert(c, Rc::clone(&plan));
        }
        plan
    }

    fn classify(&self, c: char) -> GlyphPlan {
        let mut guard = self.workspace.borrow_mut();
        let ws = &mut *guard;

        ws.text.clear();
        ws.text.push(c);
        ws.context.shape(&ws.text, &mut ws.line);
        self.counters.text_shaped();

        let plan = GlyphPlan::classify(&mut ws.line);
        if matches!(plan.kind, crate::plan::PlanKind::Line(_)) {
            // The line now belongs to the plan
            ws.text.clear();
        }

        tracing::trace!(
            "classified U+{:04X} as {:?} (width {}, unknown {})",
            c as u32,
            plan.kind.tag(),
            plan.width,
            plan.has_unknown_glyphs
        );
        self.counters.plan_classified(plan.kind.tag());
        plan
    }

    /// Whether the font has a real glyph for `c`
    pub fn has_glyph(&self, c: char) -> bool {
        !self.lookup(c).has_unknown_glyphs
    }

    pub fn key(&self) -> &FontConfigKey {
        &self.key
    }

    pub fn metrics(&self) -> HandleMetrics {
        self.metrics
    }

    /// Logical acquire count held by the cache
    pub fn refcount(&self) -> usize {
        self.refcount.get()
    }

    /// Whether destruction is scheduled
    pub fn is_pending_destroy(&self) -> bool {
        self.pending_destroy.get().is_some()
    }

    /// Number of memoized plans
    pub fn cached_plans(&self) -> usize {
        let ascii = self.ascii.borrow().iter().filter(|p| p.is_some()).count();
        ascii + self.others.borrow().as_ref().map_or(0, |m| m.len())
    }

    pub(crate) fn increment(&self) -> usize {
        let count = self.refcount.get() + 1;
        self.refcount.set(count);
        count
    }

    pub(crate) fn decrement(&self) -> usize {
        let count = self.refcount.get();
        assert!(count > 0, "font handle released more often than acquired");
        self.refcount.set(count - 1);
        count - 1
    }

    pub(crate) fn pending_destroy(&self) -> Option<TimerId> {
        self.pending_destroy.get()
    }

    pub(crate) fn set_pending_destroy(&self, timer: Option<TimerId>) {
        self.pending_destroy.set(timer);
    }
}

impl std::fmt::Debug for FontHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontHandle")
            .field("key", &self.key)
            .field("refcount", &self.refcount.get())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AntialiasOptions, FontDescription};
    use crate::counters::{CountingRenderCounters, NoopCounters, PlanTag};
    use crate::plan::PlanKind;
    use crate::script::LatinScriptPolicy;
    use crate::shaping::FontResolver;
    use crate::testing::FakeResolver;

    fn key(language: &str) -> FontConfigKey {
        FontConfigKey::new(
            FontDescription::new("Fake Mono", 10.0),
            language,
            96.0,
            AntialiasOptions::default(),
            1,
        )
    }

    fn handle_with(resolver: &FakeResolver, language: &str) -> FontHandle {
        let key = key(language);
        let ctx = resolver.open(&key).expect("fake resolver opens");
        FontHandle::new(key, ctx, &LatinScriptPolicy, Rc::new(NoopCounters))
    }

    #[test]
    fn test_ascii_fast_path_needs_one_shape() {
        let resolver = FakeResolver::new();
        let handle = handle_with(&resolver, "en");
        assert_eq!(resolver.shape_calls(), 1);

        for c in ('A'..='Z').chain('a'..='z').chain('0'..='9') {
            assert!(handle.lookup(c).is_fast_path(), "{c} should be fast path");
        }
        assert_eq!(resolver.shape_calls(), 1);
    }

    #[test]
    fn test_lookup_is_memoized() {
        let resolver = FakeResolver::new();
        let handle = handle_with(&resolver, "en");

        let first = handle.lookup('é');
        let calls = resolver.shape_calls();
        let second = handle.lookup('é');
        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(resolver.shape_calls(), calls);
    }

    #[test]
    fn test_metrics_from_widest_ascii() {
        let resolver = FakeResolver::new().with_char_advance('W', 12.0);
        let handle = handle_with(&resolver, "en");
        let metrics = handle.metrics();
        assert_eq!(metrics.width, 12);
        assert_eq!(metrics.height, 20);
        assert_eq!(metrics.ascent, 16);
        assert_eq!(metrics.descent(), 4);
    }

    #[test]
    fn test_non_latin_language_skips_common_script() {
        let resolver = FakeResolver::new();
        let counters = Rc::new(CountingRenderCounters::new());
        let key = key("ja");
        let ctx = resolver.open(&key).expect("fake resolver opens");
        let handle = FontHandle::new(key, ctx, &LatinScriptPolicy, counters.clone());

        // 52 letters pre-cached; punctuation, digits and space shaped one by one
        assert_eq!(counters.precached.get(), 52);
        assert!(handle.lookup('!').is_fast_path());
        assert!(resolver.shape_calls() > 1);
    }

    #[test]
    fn test_fallback_font_makes_line_plan() {
        let resolver = FakeResolver::new().with_fallback_chars(['ą']);
        let handle = handle_with(&resolver, "en");
        let plan = handle.lookup('ą');
        match &plan.kind {
            PlanKind::Line(line) => assert_eq!(line.runs.len(), 2),
            other => panic!("expected line, got {:?}", other),
        }

        // Workspace stays usable after the line was moved out
        assert_eq!(handle.lookup('λ').kind.tag(), PlanTag::Glyph);
    }

    #[test]
    fn test_missing_glyph_reports_unknown() {
        let resolver = FakeResolver::new().with_missing(['\u{E000}']);
        let handle = handle_with(&resolver, "en");
        assert!(!handle.has_glyph('\u{E000}'));
        assert!(handle.has_glyph('x'));
        // Still drawable
        assert!(handle.lookup('\u{E000}').width > 0);
    }

    #[test]
    fn test_combining_and_multi_glyph_are_runs() {
        let resolver = FakeResolver::new().with_multi_glyph(['ﬃ']);
        let handle = handle_with(&resolver, "en");
        assert_eq!(handle.lookup('\u{0301}').kind.tag(), PlanTag::Run);
        match &handle.lookup('ﬃ').kind {
            PlanKind::Run { glyphs, .. } => assert_eq!(glyphs.len(), 2),
            other => panic!("expected run, got {:?}", other),
        }
    }
}
