//! # Cached Handles
//!
//! `Cached<T>` is the strong, cloneable handle the registry hands out. The
//! instance behind it is stamped with the canonical key it was built from.

use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::{Arc, Weak};

use cayley_core::{sha256_digest, CanonicalBytes, ContentDigest};
use serde::{Serialize, Serializer};

use crate::cacheable::Cacheable;
use crate::error::CacheError;
use crate::persist::PersistedInstance;

pub(crate) struct Stamped<T: Cacheable> {
    key: T::Key,
    value: T,
}

/// A shared instance of a cached type.
///
/// Dereferences to `T`. Equality, hashing, and serialization consider only
/// the type and the canonical key.
pub struct Cached<T: Cacheable> {
    inner: Arc<Stamped<T>>,
}

impl<T: Cacheable> Cached<T> {
    pub(crate) fn stamp(key: T::Key, value: T) -> Self {
        Self {
            inner: Arc::new(Stamped { key, value }),
        }
    }

    pub(crate) fn downgrade(&self) -> Weak<Stamped<T>> {
        Arc::downgrade(&self.inner)
    }

    pub(crate) fn upgrade(weak: &Weak<Stamped<T>>) -> Option<Self> {
        weak.upgrade().map(|inner| Self { inner })
    }

    /// The canonical key this instance was built from.
    pub fn key(&self) -> &T::Key {
        &self.inner.key
    }

    /// Whether two handles share one allocation.
    ///
    /// Stronger than `==`, which only compares keys.
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// Number of strong handles to this allocation.
    pub fn strong_count(this: &Self) -> usize {
        Arc::strong_count(&this.inner)
    }

    /// The `(type tag, key)` pair that stands in for this instance when persisted.
    pub fn persist(&self) -> PersistedInstance<T::Key> {
        PersistedInstance {
            type_tag: T::TYPE_TAG.to_string(),
            key: self.key().clone(),
        }
    }

    /// SHA-256 over the canonical bytes of `(type tag, key)`.
    ///
    /// Unlike `Hash`, identical in every process.
    pub fn stable_digest(&self) -> Result<ContentDigest, CacheError> {
        let bytes = CanonicalBytes::new(&(T::TYPE_TAG, self.key()))?;
        Ok(sha256_digest(&bytes))
    }
}

impl<T: Cacheable> Clone for Cached<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Cacheable> Deref for Cached<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner.value
    }
}

impl<T: Cacheable, U: Cacheable> PartialEq<Cached<U>> for Cached<T> {
    fn eq(&self, other: &Cached<U>) -> bool {
        if TypeId::of::<T>() != TypeId::of::<U>() {
            return false;
        }
        (other.key() as &dyn Any)
            .downcast_ref::<T::Key>()
            .is_some_and(|key| key == self.key())
    }
}

impl<T: Cacheable> Eq for Cached<T> {}

impl<T: Cacheable> Hash for Cached<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        T::TYPE_TAG.hash(state);
        self.key().hash(state);
    }
}

impl<T: Cacheable> fmt::Debug for Cached<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cached")
            .field("type", &T::TYPE_TAG)
            .field("key", self.key())
            .finish()
    }
}

impl<T: Cacheable> Serialize for Cached<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.persist().serialize(serializer)
    }
}
