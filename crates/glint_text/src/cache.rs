//! Process-wide font handle cache
//!
//! Handles are keyed by [`FontConfigKey`] and reference counted through
//! [`FontHandleCache::acquire`] / [`FontHandleCache::release`]. A handle whose
//! count drops to zero is not freed right away: destruction is scheduled after
//! a grace period so resize and zoom cycles that drop and recreate the same
//! configuration reuse the handle. Re-acquiring cancels the pending destroy.
//!
//! Scheduling is cooperative. The owner of the event loop calls
//! [`FontHandleCache::run_expired`] (for example when
//! [`FontHandleCache::next_deadline`] passes); nothing runs on another thread.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

use crate::config::FontConfigKey;
use crate::counters::{NoopCounters, RenderCounters};
use crate::handle::FontHandle;
use crate::script::{LatinScriptPolicy, ScriptPolicy};
use crate::shaping::FontResolver;
use crate::Result;

new_key_type! {
    pub struct TimerId;
}

/// Default grace period before an unused handle is destroyed
pub const DEFAULT_RELEASE_DELAY: Duration = Duration::from_secs(30);

/// Time source for deferred destruction
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cache tuning
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// How long a handle with no users survives
    pub release_delay: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            release_delay: DEFAULT_RELEASE_DELAY,
        }
    }
}

/// A scheduled destruction
struct PendingDestroy {
    deadline: Instant,
    key: FontConfigKey,
}

/// Cache shared by every terminal surface on the thread
pub type SharedFontCache = Rc<RefCell<FontHandleCache>>;

/// Registry of live font handles
pub struct FontHandleCache {
    handles: FxHashMap<FontConfigKey, Rc<FontHandle>>,
    timers: SlotMap<TimerId, PendingDestroy>,
    resolver: Rc<dyn FontResolver>,
    policy: Rc<dyn ScriptPolicy>,
    counters: Rc<dyn RenderCounters>,
    clock: Rc<dyn Clock>,
    config: CacheConfig,
}

impl FontHandleCache {
    pub fn new(resolver: Rc<dyn FontResolver>) -> Self {
        Self {
            handles: FxHashMap::default(),
            timers: SlotMap::with_key(),
            resolver,
            policy: Rc::new(LatinScriptPolicy),
            counters: Rc::new(NoopCounters),
            clock: Rc::new(SystemClock),
            config: CacheConfig::default(),
        }
    }

    pub fn with_config(mut self, config: CacheConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_policy(mut self, policy: Rc<dyn ScriptPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_counters(mut self, counters: Rc<dyn RenderCounters>) -> Self {
        self.counters = counters;
        self
    }

    /// Wrap for sharing between surfaces
    pub fn shared(self) -> SharedFontCache {
        Rc::new(RefCell::new(self))
    }

    /// Font configuration generation to build keys against
    pub fn generation(&self) -> u64 {
        self.resolver.generation()
    }

    pub fn counters(&self) -> Rc<dyn RenderCounters> {
        Rc::clone(&self.counters)
    }

    /// Find or create the handle for `key` and take a reference to it
    pub fn acquire(&mut self, key: &FontConfigKey) -> Result<Rc<FontHandle>> {
        if let Some(handle) = self.handles.get(key).cloned() {
            self.revive(&handle);
            tracing::debug!(
                "reusing font handle {} (refcount {})",
                key.description.family,
                handle.refcount()
            );
            return Ok(handle);
        }

        let context = self.resolver.open(key)?;
        let handle = Rc::new(FontHandle::new(
            key.clone(),
            context,
            self.policy.as_ref(),
            Rc::clone(&self.counters),
        ));
        handle.increment();
        self.handles.insert(key.clone(), Rc::clone(&handle));
        Ok(handle)
    }

    /// Take another reference to a handle that is already cached
    pub fn retain(&mut self, handle: &Rc<FontHandle>) -> Rc<FontHandle> {
        assert!(
            self.handles
                .get(handle.key())
                .is_some_and(|cached| Rc::ptr_eq(cached, handle)),
            "retain of a font handle not owned by this cache"
        );
        self.revive(handle);
        Rc::clone(handle)
    }

    fn revive(&mut self, handle: &Rc<FontHandle>) {
        if let Some(timer) = handle.pending_destroy() {
            self.timers.remove(timer);
            handle.set_pending_destroy(None);
            tracing::debug!("cancelled destruction of {}", handle.key().description.family);
        }
        handle.increment();
    }

    /// Drop a reference; at zero, schedule destruction after the grace period
    pub fn release(&mut self, handle: &Rc<FontHandle>) {
        if handle.decrement() > 0 {
            return;
        }

        let deadline = self.clock.now() + self.config.release_delay;
        let timer = self.timers.insert(PendingDestroy {
            deadline,
            key: handle.key().clone(),
        });
        handle.set_pending_destroy(Some(timer));
        tracing::debug!(
            "font handle {} unused, destroying in {:?}",
            handle.key().description.family,
            self.config.release_delay
        );
    }

    /// Destroy handles whose grace period has passed; returns how many
    pub fn run_expired(&mut self) -> usize {
        let now = self.clock.now();
        let expired: SmallVec<[TimerId; 4]> = self
            .timers
            .iter()
            .filter(|(_, pending)| pending.deadline <= now)
            .map(|(id, _)| id)
            .collect();

        let mut destroyed = 0;
        for id in expired {
            let Some(pending) = self.timers.remove(id) else {
                continue;
            };
            let live = self
                .handles
                .get(&pending.key)
                .is_some_and(|h| h.pending_destroy() == Some(id) && h.refcount() == 0);
            if live {
                if let Some(handle) = self.handles.remove(&pending.key) {
                    handle.set_pending_destroy(None);
                    tracing::debug!(
                        "destroyed font handle {} ({} plans)",
                        pending.key.description.family,
                        handle.cached_plans()
                    );
                    destroyed += 1;
                }
            }
        }
        destroyed
    }

    /// Earliest scheduled destruction
    pub fn next_deadline(&self) -> Option<Instant> {
        self.timers.values().map(|pending| pending.deadline).min()
    }

    pub fn contains(&self, key: &FontConfigKey) -> bool {
        self.handles.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
