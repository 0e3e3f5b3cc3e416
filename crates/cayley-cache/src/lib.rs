//! # cayley-cache — Canonical Instance Cache
//!
//! Gives any immutable, parameter-determined type "at most one live instance
//! per canonical key" semantics.
//!
//! A type opts in by implementing [`Cacheable`]: it names a type tag, maps raw
//! constructor arguments to a hashable canonical key, and builds an instance
//! from that key. Instances are requested through an explicit
//! [`InstanceRegistry`]:
//!
//! ```text
//! args ──canonicalize──▶ key ──lookup──▶ live instance? ──yes──▶ Cached<T>
//!                                              │ no
//!                                              ▼
//!                                   build(key) ─▶ stamp ─▶ insert ─▶ Cached<T>
//! ```
//!
//! ## Identity
//!
//! [`Cached<T>`] compares, hashes, and serializes by `(type, key)` only.
//! Two handles with equal keys are equal even when they point at different
//! allocations (after eviction, or after a concurrent duplicate build), and a
//! persisted handle carries nothing but its type tag and key.
//!
//! ## Lifetime
//!
//! The registry holds only `Weak` handles. An instance lives exactly as long
//! as some `Cached<T>` refers to it; stale entries are pruned on access and
//! every `prune_interval` insertions.
//!
//! ## Concurrency
//!
//! Lookup-or-insert is atomic per call, but the build itself runs without the
//! registry lock so that builds can request other cached instances. Two
//! threads missing on the same key may both build; the later insertion wins.
//! Builds are pure functions of the key, so the duplicate is harmless.

pub mod cacheable;
pub mod cached;
pub mod error;
pub mod persist;
pub mod registry;

pub use cacheable::Cacheable;
pub use cached::Cached;
pub use error::CacheError;
pub use persist::{PersistedInstance, RestoreSeed};
pub use registry::{InstanceRegistry, RegistryConfig, RegistryStats};
