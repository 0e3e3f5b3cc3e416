//! # Persistence Boundary
//!
//! A cached instance serializes to its [`PersistedInstance`]: the type tag and
//! the canonical key, nothing built from them. Restoring goes back through the
//! registry, which either returns the instance still alive under that key or
//! rebuilds an equivalent one.
//!
//! ```text
//! {"type_tag":"cayley.geometric_product_table","key":[1.0,1.0]}
//! ```
//!
//! Deserializing a `Cached<T>` needs a registry, so it is done with the
//! [`RestoreSeed`] `DeserializeSeed` returned by
//! [`InstanceRegistry::seed`](crate::InstanceRegistry::seed).

use std::marker::PhantomData;

use serde::de::{self, DeserializeSeed, Deserializer};
use serde::{Deserialize, Serialize};

use crate::cacheable::Cacheable;
use crate::cached::Cached;
use crate::registry::InstanceRegistry;

/// The persisted form of a cached instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PersistedInstance<K> {
    /// `Cacheable::TYPE_TAG` of the persisted type.
    pub type_tag: String,
    /// The canonical key.
    pub key: K,
}

/// Deserializes a `Cached<T>` by restoring it through a registry.
pub struct RestoreSeed<'r, T> {
    registry: &'r InstanceRegistry,
    _marker: PhantomData<fn() -> T>,
}

impl<'r, T> RestoreSeed<'r, T> {
    pub(crate) fn new(registry: &'r InstanceRegistry) -> Self {
        Self {
            registry,
            _marker: PhantomData,
        }
    }
}

impl<'de, T: Cacheable> DeserializeSeed<'de> for RestoreSeed<'_, T> {
    type Value = Cached<T>;

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<Cached<T>, D::Error> {
        let persisted = PersistedInstance::<T::Key>::deserialize(deserializer)?;
        self.registry
            .restore::<T>(persisted)
            .map_err(de::Error::custom)
    }
}
