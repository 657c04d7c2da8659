//! Shared, reference-counted registry of code point caches.
//!
//! Every [`CodepointCache`] is owned by exactly one registry entry keyed by
//! its [`ContextFingerprint`]. Callers hold [`CacheHandle`]s; dropping the
//! last handle for a fingerprint does not destroy the cache but arms an
//! eviction timer. Acquiring the same fingerprint again before the timer
//! fires cancels it and reuses the cache, which keeps widget re-creation and
//! repeated zooming from rebuilding font state.
//!
//! The registry is confined to one thread (it is `!Send`). Timers do not run
//! on their own: the owning event loop calls [`FontContextRegistry::run_due_evictions`]
//! (and can ask for [`FontContextRegistry::next_eviction_deadline`] to schedule
//! a wake-up). Every `acquire` also fires due timers first, so a timer that
//! has expired is always observed before a reuse check.

mod timer;

pub use timer::{TimerQueue, TimerToken};

use std::cell::{Ref, RefCell, RefMut};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};
use std::time::{Duration, Instant};

use crate::Result;
use crate::cache::{CodepointCache, FontMetrics};
use crate::config::CacheConfig;
use crate::font::ContextFingerprint;

/// Source of the current time for eviction deadlines.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct Entry {
    cache: Rc<RefCell<CodepointCache>>,
    ref_count: usize,
    eviction: Option<TimerToken>,
}

struct Inner {
    entries: HashMap<ContextFingerprint, Entry>,
    timers: TimerQueue<ContextFingerprint>,
    eviction_delay: Duration,
    clock: Rc<dyn Clock>,
}

impl Inner {
    /// Destroy every cache whose eviction timer has expired.
    fn fire_due(&mut self) -> usize {
        let now = self.clock.now();
        let mut evicted = 0;
        while let Some(fingerprint) = self.timers.pop_due(now) {
            let idle = self
                .entries
                .get(&fingerprint)
                .is_some_and(|entry| entry.ref_count == 0);
            if idle {
                self.entries.remove(&fingerprint);
                evicted += 1;
                log::debug!("font registry: evicted {:?}", fingerprint.font);
            }
        }
        evicted
    }

    fn release(&mut self, fingerprint: &ContextFingerprint, cache: &Rc<RefCell<CodepointCache>>) {
        let entry = self
            .entries
            .get_mut(fingerprint)
            .filter(|entry| Rc::ptr_eq(&entry.cache, cache));
        let Some(entry) = entry else {
            panic!("released a cache handle this registry does not own");
        };
        assert!(entry.ref_count > 0, "cache handle released twice");

        entry.ref_count -= 1;
        if entry.ref_count == 0 {
            let deadline = self.clock.now() + self.eviction_delay;
            entry.eviction = Some(self.timers.schedule(deadline, fingerprint.clone()));
            log::debug!(
                "font registry: eviction armed for {:?} in {:?}",
                fingerprint.font,
                self.eviction_delay
            );
        }
    }
}

/// Process-wide (per thread) map from fingerprint to shared cache.
///
/// Cloning yields another reference to the same registry.
#[derive(Clone)]
pub struct FontContextRegistry {
    inner: Rc<RefCell<Inner>>,
}

thread_local! {
    static GLOBAL: FontContextRegistry = FontContextRegistry::new(
        CacheConfig::default().eviction_delay(),
        Rc::new(SystemClock),
    );
}

impl FontContextRegistry {
    pub fn new(eviction_delay: Duration, clock: Rc<dyn Clock>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                entries: HashMap::new(),
                timers: TimerQueue::new(),
                eviction_delay,
                clock,
            })),
        }
    }

    /// Registry configured from the `[cache]` section, on the wall clock.
    pub fn with_config(config: &CacheConfig) -> Self {
        Self::new(config.eviction_delay(), Rc::new(SystemClock))
    }

    /// The calling thread's shared registry, created on first use.
    pub fn global() -> Self {
        GLOBAL.with(Clone::clone)
    }

    pub fn eviction_delay(&self) -> Duration {
        self.inner.borrow().eviction_delay
    }

    /// Change the delay for evictions armed from now on. Timers that are
    /// already running keep their deadline.
    pub fn set_eviction_delay(&self, delay: Duration) {
        self.inner.borrow_mut().eviction_delay = delay;
    }

    /// Get the cache for `fingerprint`, building it with `construct` if none
    /// exists.
    ///
    /// An existing entry has its pending eviction cancelled and its count
    /// incremented. If `construct` fails the error is returned and the
    /// registry is left as it was.
    pub fn acquire<F>(&self, fingerprint: &ContextFingerprint, construct: F) -> Result<CacheHandle>
    where
        F: FnOnce() -> Result<CodepointCache>,
    {
        {
            let mut inner = self.inner.borrow_mut();
            inner.fire_due();
            let Inner {
                entries, timers, ..
            } = &mut *inner;
            if let Some(entry) = entries.get_mut(fingerprint) {
                if let Some(token) = entry.eviction.take() {
                    timers.cancel(token);
                    log::debug!("font registry: eviction cancelled for {:?}", fingerprint.font);
                }
                entry.ref_count += 1;
                log::debug!(
                    "font registry: hit {:?} (refs {})",
                    fingerprint.font,
                    entry.ref_count
                );
                return Ok(self.handle(fingerprint, Rc::clone(&entry.cache)));
            }
        }

        log::debug!("font registry: miss {:?}", fingerprint.font);
        let cache = Rc::new(RefCell::new(construct()?));
        self.inner.borrow_mut().entries.insert(
            fingerprint.clone(),
            Entry {
                cache: Rc::clone(&cache),
                ref_count: 1,
                eviction: None,
            },
        );
        Ok(self.handle(fingerprint, cache))
    }

    fn handle(
        &self,
        fingerprint: &ContextFingerprint,
        cache: Rc<RefCell<CodepointCache>>,
    ) -> CacheHandle {
        CacheHandle {
            cache,
            fingerprint: fingerprint.clone(),
            registry: Rc::downgrade(&self.inner),
        }
    }

    /// Give back a handle obtained from this registry.
    ///
    /// Equivalent to dropping it, except that a handle from a different
    /// registry is a contract violation and panics.
    pub fn release(&self, handle: CacheHandle) {
        assert!(
            Weak::ptr_eq(&handle.registry, &Rc::downgrade(&self.inner)),
            "cache handle released into a registry that did not issue it"
        );
        drop(handle);
    }

    /// Fire all eviction timers whose deadline has passed. Returns the
    /// number of caches destroyed.
    pub fn run_due_evictions(&self) -> usize {
        self.inner.borrow_mut().fire_due()
    }

    /// When the next eviction timer expires, if any is pending.
    pub fn next_eviction_deadline(&self) -> Option<Instant> {
        self.inner.borrow_mut().timers.next_deadline()
    }

    /// Number of live entries, including those pending eviction.
    pub fn len(&self) -> usize {
        self.inner.borrow().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().entries.is_empty()
    }

    /// Outstanding handles for `fingerprint`, or `None` without an entry.
    pub fn ref_count(&self, fingerprint: &ContextFingerprint) -> Option<usize> {
        self.inner
            .borrow()
            .entries
            .get(fingerprint)
            .map(|entry| entry.ref_count)
    }

    /// Whether `fingerprint` has no handles and an armed eviction timer.
    pub fn is_pending_eviction(&self, fingerprint: &ContextFingerprint) -> bool {
        self.inner
            .borrow()
            .entries
            .get(fingerprint)
            .is_some_and(|entry| entry.eviction.is_some())
    }
}

impl fmt::Debug for FontContextRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("FontContextRegistry")
            .field("entries", &inner.entries.len())
            .field("pending_evictions", &inner.timers.len())
            .field("eviction_delay", &inner.eviction_delay)
            .finish()
    }
}

/// One counted reference to a registry-owned cache.
///
/// Dropping the handle releases it. Handles are not `Clone`: each one is a
/// separate acquisition.
pub struct CacheHandle {
    cache: Rc<RefCell<CodepointCache>>,
    fingerprint: ContextFingerprint,
    registry: Weak<RefCell<Inner>>,
}

impl CacheHandle {
    pub fn fingerprint(&self) -> &ContextFingerprint {
        &self.fingerprint
    }

    pub fn borrow(&self) -> Ref<'_, CodepointCache> {
        self.cache.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, CodepointCache> {
        self.cache.borrow_mut()
    }

    pub fn metrics(&self) -> FontMetrics {
        self.cache.borrow().metrics()
    }

    /// Whether both handles refer to the same cache instance.
    pub fn same_cache(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.cache, &other.cache)
    }
}

impl Drop for CacheHandle {
    fn drop(&mut self) {
        // A registry that is already gone owns nothing to release.
        if let Some(inner) = self.registry.upgrade() {
            inner.borrow_mut().release(&self.fingerprint, &self.cache);
        }
    }
}

impl fmt::Debug for CacheHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheHandle")
            .field("font", &self.fingerprint.font)
            .finish_non_exhaustive()
    }
}
