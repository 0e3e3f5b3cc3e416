//! # The `Cacheable` Contract

use std::fmt;
use std::hash::Hash;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::CacheError;
use crate::registry::InstanceRegistry;

/// A parameterized, immutable type whose instances are shared per canonical key.
///
/// # Contract
///
/// - `canonicalize` is deterministic and depends only on its arguments.
///   Value-equal arguments must produce equal keys.
/// - `build` is a pure function of the key. Instances are never mutated
///   after construction.
/// - `TYPE_TAG` is unique among cached types and stable across releases;
///   persisted references carry it.
///
/// Equality of cached instances is key equality; implementors should not
/// rely on comparing built contents.
pub trait Cacheable: Sized + Send + Sync + 'static {
    /// Stable name of the type in persisted references and digests.
    const TYPE_TAG: &'static str;

    /// Raw constructor arguments.
    type Args: ?Sized;

    /// Canonical, hashable form of the arguments.
    type Key: Clone + Eq + Hash + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Failure of canonicalization or construction.
    type Error: From<CacheError> + std::error::Error;

    /// Map raw arguments to the canonical key. Runs before any build work.
    fn canonicalize(args: &Self::Args) -> Result<Self::Key, Self::Error>;

    /// Construct an instance from its key.
    ///
    /// The registry is passed through so that a build can obtain other cached
    /// instances it depends on; the registry lock is not held during `build`.
    fn build(key: &Self::Key, registry: &InstanceRegistry) -> Result<Self, Self::Error>;
}
