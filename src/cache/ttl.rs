//! Single-flight TTL cache with stale-while-revalidate.
//!
//! # Refresh Strategy
//!
//! ```text
//! TtlCache
//! └── FxHashMap<K, Arc<CacheEntry<V>>>   (insert-if-absent, never removed)
//!     └── CacheEntry
//!         ├── expires_on: AtomicU64   fresh? return value, no lock taken
//!         ├── value: Option<V>
//!         └── lock: ReentrantMutex<()>
//!              ├── no value yet: lock()      every caller waits for one compute
//!              └── stale value:  try_lock()  losers return the stale value
//! ```
//!
//! Under the lock, the expiry observed before locking is compared with the
//! current one. If it moved, another caller already refreshed the entry and
//! the compute is skipped.
//!
//! A reader arriving while a refresh is in flight sees the old value, so an
//! edit to the backing source may stay invisible for up to just under two
//! TTL windows.

use std::borrow::Borrow;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use parking_lot::{ReentrantMutex, RwLock};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

// =============================================================================
// CacheEntry
// =============================================================================

struct CacheEntry<V> {
    /// Reentrant so a compute may look up its own key on the same thread.
    lock: ReentrantMutex<()>,
    /// Nanoseconds since the cache origin. Zero means expired.
    expires_on: AtomicU64,
    value: RwLock<Option<V>>,
}

impl<V: Clone> CacheEntry<V> {
    /// Create an already expired entry.
    fn new() -> Self {
        Self {
            lock: ReentrantMutex::new(()),
            expires_on: AtomicU64::new(0),
            value: RwLock::new(None),
        }
    }

    fn value(&self) -> Option<V> {
        self.value.read().clone()
    }

    /// Recompute unless someone refreshed the entry since `seen` was read.
    ///
    /// Must be called with `lock` held.
    fn refresh<E>(
        &self,
        key: &dyn fmt::Debug,
        seen: u64,
        clock: &Clock,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if seen < self.expires_on.load(Ordering::Acquire)
            && let Some(value) = self.value()
        {
            trace!(?key, "entry refreshed by another caller");
            return Ok(value);
        }

        // A failed compute leaves the previous value and expiry in place
        let value = compute()?;
        *self.value.write() = Some(value.clone());
        self.expires_on
            .store(clock.now().saturating_add(clock.ttl), Ordering::Release);
        Ok(value)
    }
}

// =============================================================================
// Clock
// =============================================================================

struct Clock {
    origin: Instant,
    /// TTL in nanoseconds.
    ttl: u64,
}

impl Clock {
    fn new(ttl: Duration) -> Self {
        Self {
            origin: Instant::now(),
            ttl: u64::try_from(ttl.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    /// Nanoseconds since the origin.
    #[inline]
    fn now(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX)
    }
}

// =============================================================================
// TtlCache
// =============================================================================

/// Unbounded cache whose entries refresh once their TTL has elapsed.
///
/// - At most one caller computes a key's first value; the rest wait for it.
/// - Once a key has a value, callers never block: a stale value is served
///   while at most one caller refreshes it.
/// - Compute errors propagate to the caller and are not cached; the entry
///   stays expired and the next call retries.
pub struct TtlCache<K, V> {
    clock: Clock,
    ttl: Duration,
    entries: RwLock<FxHashMap<K, Arc<CacheEntry<V>>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash,
    V: Clone,
{
    /// Create a cache with the given time-to-live.
    pub fn new(ttl: Duration) -> Self {
        Self {
            clock: Clock::new(ttl),
            ttl,
            entries: RwLock::new(FxHashMap::default()),
        }
    }

    /// Entry time-to-live.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Number of keys seen so far.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Check if no key has been requested yet.
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Get the value for `key`, computing or refreshing it when expired.
    ///
    /// The entry lock is reentrant: a `compute` that asks for its own key on
    /// the same thread (a template including itself) recomputes recursively
    /// instead of deadlocking. Unbounded self-reference therefore recurses
    /// until the stack overflows; renderers must bound include depth.
    pub fn get<Q, E>(&self, key: &Q, compute: impl FnOnce() -> Result<V, E>) -> Result<V, E>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + fmt::Debug + ?Sized,
    {
        let entry = self.entry(key);

        let seen = entry.expires_on.load(Ordering::Acquire);
        if self.clock.now() < seen
            && let Some(value) = entry.value()
        {
            return Ok(value);
        }

        match entry.value() {
            None => {
                let _guard = entry.lock.lock();
                debug!(?key, "populating cache entry");
                entry.refresh(&key, seen, &self.clock, compute)
            }
            Some(stale) => match entry.lock.try_lock() {
                Some(_guard) => {
                    debug!(?key, "refreshing stale cache entry");
                    entry.refresh(&key, seen, &self.clock, compute)
                }
                None => {
                    trace!(?key, "refresh in flight, serving stale value");
                    Ok(stale)
                }
            },
        }
    }

    fn entry<Q>(&self, key: &Q) -> Arc<CacheEntry<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ToOwned<Owned = K> + ?Sized,
    {
        if let Some(entry) = self.entries.read().get(key) {
            return entry.clone();
        }

        self.entries
            .write()
            .entry(key.to_owned())
            .or_insert_with(|| Arc::new(CacheEntry::new()))
            .clone()
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.read().len())
            .finish()
    }
}
