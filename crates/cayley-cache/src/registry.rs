//! # Instance Registry
//!
//! Owns the weak `(type, key) → instance` map behind every cached type.
//!
//! ## Storage
//!
//! One slot per cached type, keyed by `TypeId`, each a
//! `HashMap<T::Key, Weak<_>>`. Two types whose keys happen to be equal values
//! never share a slot, so they never collide.
//!
//! ## Locking
//!
//! A single `parking_lot::Mutex` guards the map. It is taken for the lookup
//! and again for the insert, never across `Cacheable::build`, because builds
//! re-enter the registry for their own dependencies.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Weak;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::cacheable::Cacheable;
use crate::cached::{Cached, Stamped};
use crate::error::CacheError;
use crate::persist::{PersistedInstance, RestoreSeed};

/// Registry tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Prune stale entries of every type after this many insertions.
    /// `0` disables periodic pruning; stale entries are still dropped when
    /// looked up.
    pub prune_interval: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { prune_interval: 64 }
    }
}

/// Occupancy snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RegistryStats {
    /// Cached types with at least one entry.
    pub types: usize,
    /// Entries, live or stale.
    pub entries: usize,
    /// Entries whose instance is still alive.
    pub live: usize,
}

trait ErasedSlot: Send + Sync {
    fn type_tag(&self) -> &'static str;
    fn prune(&mut self) -> usize;
    fn len(&self) -> usize;
    fn live(&self) -> usize;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

struct Slot<T: Cacheable> {
    entries: HashMap<T::Key, Weak<Stamped<T>>>,
}

impl<T: Cacheable> Default for Slot<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: Cacheable> ErasedSlot for Slot<T> {
    fn type_tag(&self) -> &'static str {
        T::TYPE_TAG
    }

    fn prune(&mut self) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, weak| weak.strong_count() > 0);
        before - self.entries.len()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn live(&self) -> usize {
        self.entries.values().filter(|w| w.strong_count() > 0).count()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Default)]
struct RegistryState {
    slots: HashMap<TypeId, Box<dyn ErasedSlot>>,
    inserts_since_prune: usize,
}

impl RegistryState {
    // Slots are keyed by `TypeId::of::<T>()`, so the downcasts below succeed.

    fn slot<T: Cacheable>(&self) -> Option<&Slot<T>> {
        self.slots
            .get(&TypeId::of::<T>())?
            .as_any()
            .downcast_ref::<Slot<T>>()
    }

    fn slot_mut<T: Cacheable>(&mut self) -> Option<&mut Slot<T>> {
        self.slots
            .get_mut(&TypeId::of::<T>())?
            .as_any_mut()
            .downcast_mut::<Slot<T>>()
    }

    fn slot_or_insert<T: Cacheable>(&mut self) -> Option<&mut Slot<T>> {
        self.slots
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(Slot::<T>::default()))
            .as_any_mut()
            .downcast_mut::<Slot<T>>()
    }

    fn prune_all(&mut self) -> usize {
        let pruned = self.slots.values_mut().map(|slot| slot.prune()).sum();
        self.slots.retain(|_, slot| slot.len() > 0);
        self.inserts_since_prune = 0;
        pruned
    }
}

/// The weak-value registry for cached types.
///
/// Create one per scope that should share instances (typically one per
/// process, passed down explicitly) and call [`reset`](Self::reset) to
/// isolate tests.
pub struct InstanceRegistry {
    config: RegistryConfig,
    state: Mutex<RegistryState>,
}

impl InstanceRegistry {
    /// An empty registry with default configuration.
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// An empty registry with the given configuration.
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            config,
            state: Mutex::new(RegistryState::default()),
        }
    }

    /// The configuration this registry was created with.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Obtain the instance for raw constructor arguments.
    ///
    /// Canonicalization errors surface before any lookup or build.
    pub fn get<T: Cacheable>(&self, args: &T::Args) -> Result<Cached<T>, T::Error> {
        let key = T::canonicalize(args)?;
        self.get_canonical(key)
    }

    /// Obtain the instance for an already-canonical key.
    ///
    /// Returns the live instance if there is one. Otherwise builds, stamps,
    /// and registers a new instance. A failed build registers nothing.
    pub fn get_canonical<T: Cacheable>(&self, key: T::Key) -> Result<Cached<T>, T::Error> {
        if let Some(live) = self.lookup::<T>(&key) {
            tracing::debug!(type_tag = T::TYPE_TAG, key = ?key, "cache hit");
            return Ok(live);
        }

        tracing::debug!(type_tag = T::TYPE_TAG, key = ?key, "cache miss; building");
        let value = T::build(&key, self).map_err(|e| {
            tracing::debug!(type_tag = T::TYPE_TAG, key = ?key, error = %e, "build failed");
            e
        })?;
        let cached = Cached::stamp(key, value);
        self.insert(&cached);
        Ok(cached)
    }

    /// The live instance for `key`, without building.
    ///
    /// A stale entry found here is removed. A miss never adds a slot.
    pub fn lookup<T: Cacheable>(&self, key: &T::Key) -> Option<Cached<T>> {
        let mut state = self.state.lock();
        let slot = state.slot_mut::<T>()?;
        if let Some(live) = Cached::upgrade(slot.entries.get(key)?) {
            return Some(live);
        }
        slot.entries.remove(key);
        let emptied = slot.entries.is_empty();
        tracing::trace!(type_tag = T::TYPE_TAG, key = ?key, "dropped stale entry");
        if emptied {
            state.slots.remove(&TypeId::of::<T>());
        }
        None
    }

    /// Whether a live instance is registered for `key`.
    pub fn contains<T: Cacheable>(&self, key: &T::Key) -> bool {
        self.state
            .lock()
            .slot::<T>()
            .and_then(|slot| slot.entries.get(key))
            .is_some_and(|weak| weak.strong_count() > 0)
    }

    /// Restore a persisted instance.
    ///
    /// # Errors
    ///
    /// `CacheError::TypeMismatch` (converted into `T::Error`) if the
    /// reference was persisted from another type; otherwise whatever
    /// [`get_canonical`](Self::get_canonical) returns.
    pub fn restore<T: Cacheable>(
        &self,
        persisted: PersistedInstance<T::Key>,
    ) -> Result<Cached<T>, T::Error> {
        if persisted.type_tag != T::TYPE_TAG {
            return Err(CacheError::TypeMismatch {
                expected: T::TYPE_TAG.to_string(),
                found: persisted.type_tag,
            }
            .into());
        }
        self.get_canonical(persisted.key)
    }

    /// A `DeserializeSeed` that restores `Cached<T>` through this registry.
    pub fn seed<T: Cacheable>(&self) -> RestoreSeed<'_, T> {
        RestoreSeed::new(self)
    }

    /// Remove every stale entry. Returns how many were removed.
    pub fn prune(&self) -> usize {
        let pruned = self.state.lock().prune_all();
        tracing::trace!(pruned, "pruned registry");
        pruned
    }

    /// Forget every entry. Live instances stay valid but are no longer shared
    /// with later requests.
    pub fn reset(&self) {
        let mut state = self.state.lock();
        state.slots.clear();
        state.inserts_since_prune = 0;
        tracing::debug!("registry reset");
    }

    /// Number of live instances across all types.
    pub fn live_count(&self) -> usize {
        self.state.lock().slots.values().map(|s| s.live()).sum()
    }

    /// Number of live instances of `T`.
    pub fn live_count_of<T: Cacheable>(&self) -> usize {
        self.state.lock().slot::<T>().map_or(0, |s| s.live())
    }

    /// Occupancy snapshot.
    pub fn stats(&self) -> RegistryStats {
        let state = self.state.lock();
        state
            .slots
            .values()
            .fold(RegistryStats::default(), |acc, slot| RegistryStats {
                types: acc.types + 1,
                entries: acc.entries + slot.len(),
                live: acc.live + slot.live(),
            })
    }

    fn insert<T: Cacheable>(&self, cached: &Cached<T>) {
        let mut state = self.state.lock();
        let Some(slot) = state.slot_or_insert::<T>() else {
            return;
        };
        let previous = slot.entries.insert(cached.key().clone(), cached.downgrade());
        if previous.is_some_and(|weak| weak.strong_count() > 0) {
            tracing::warn!(
                type_tag = T::TYPE_TAG,
                key = ?cached.key(),
                "concurrent build replaced a live instance"
            );
        } else {
            tracing::debug!(type_tag = T::TYPE_TAG, key = ?cached.key(), "registered instance");
        }

        state.inserts_since_prune += 1;
        let interval = self.config.prune_interval;
        if interval > 0 && state.inserts_since_prune >= interval {
            let pruned = state.prune_all();
            tracing::trace!(pruned, "periodic prune");
        }
    }
}

impl Default for InstanceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for InstanceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        let mut tags: Vec<&'static str> = state.slots.values().map(|s| s.type_tag()).collect();
        tags.sort_unstable();
        f.debug_struct("InstanceRegistry")
            .field("config", &self.config)
            .field("types", &tags)
            .finish()
    }
}
