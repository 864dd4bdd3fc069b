use std::rc::Rc;
use std::time::Duration;

use glint_text::testing::{FakeResolver, ManualClock};
use glint_text::{
    AntialiasOptions, CountingRenderCounters, FontConfigKey, FontDescription, FontHandleCache,
    FontResolver, PlanKind,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn key_for(resolver: &FakeResolver, resolution: f64) -> FontConfigKey {
    FontConfigKey::new(
        FontDescription::new("Fake Mono", 11.0),
        "en-US",
        resolution,
        AntialiasOptions::default(),
        resolver.generation(),
    )
}

#[test]
fn generation_bump_misses_the_cache() {
    let resolver = Rc::new(FakeResolver::new());
    let mut cache = FontHandleCache::new(resolver.clone());

    let before = cache.acquire(&key_for(&resolver, 96.0)).unwrap();
    resolver.bump_generation();
    let after = cache.acquire(&key_for(&resolver, 96.0)).unwrap();

    assert!(!Rc::ptr_eq(&before, &after));
    assert_eq!(resolver.opened(), 2);
}

#[test]
fn ascii_text_is_drawn_from_precached_plans() {
    let resolver = Rc::new(FakeResolver::new());
    let counters = Rc::new(CountingRenderCounters::new());
    let mut cache = FontHandleCache::new(resolver.clone()).with_counters(counters.clone());

    let handle = cache.acquire(&key_for(&resolver, 96.0)).unwrap();
    assert_eq!(counters.precached.get(), 95);

    for c in "The quick brown fox jumps over the lazy dog 0123456789".chars() {
        let plan = handle.lookup(c);
        assert!(
            matches!(plan.kind, PlanKind::Glyph { glyph, .. } if glyph as u32 == c as u32),
            "{c:?} should be an origin-aligned glyph"
        );
    }

    // One shaping call for the sample, none per character
    assert_eq!(counters.shaped.get(), 1);
    assert_eq!(resolver.shape_calls(), 1);
}

#[test]
fn handles_survive_a_zoom_cycle() {
    init_tracing();
    let resolver = Rc::new(FakeResolver::new());
    let clock = Rc::new(ManualClock::new());
    let mut cache = FontHandleCache::new(resolver.clone()).with_clock(clock.clone());

    let small = cache.acquire(&key_for(&resolver, 96.0)).unwrap();
    // Zoom in: old size released, new size acquired
    cache.release(&small);
    let large = cache.acquire(&key_for(&resolver, 144.0)).unwrap();
    clock.advance(Duration::from_secs(5));
    // Zoom back out within the grace period
    cache.release(&large);
    let small_again = cache.acquire(&key_for(&resolver, 96.0)).unwrap();

    assert!(Rc::ptr_eq(&small, &small_again));
    assert_eq!(small_again.refcount(), 1);
    assert_eq!(resolver.opened(), 2);

    clock.advance(Duration::from_secs(30));
    assert_eq!(cache.run_expired(), 1, "only the unused large handle goes");
    assert_eq!(cache.len(), 1);
}
