//! # cayley-core — Foundational Types for Cayley Tables
//!
//! This crate is the leaf of the workspace. It defines the parameter and
//! index-space primitives every product table is built from, and the
//! canonical-bytes pipeline that gives cached instances a stable identity.
//!
//! ## Key Design Principles
//!
//! 1. **`Metric` is a validated newtype.** A metric can only be constructed
//!    from finite scalars and at most [`MAX_GENERATORS`] of them. Its equality
//!    and hash are defined over normalized bit patterns, so it can serve
//!    directly as a cache key.
//!
//! 2. **Blade ordering is a frozen contract.** `BladeIndex` assigns dense
//!    indices in power-set order: ascending subset size, lexicographic over
//!    generator positions within a size. Downstream consumers depend on it.
//!
//! 3. **`CanonicalBytes` newtype.** Stable digests of cache keys flow through
//!    `CanonicalBytes::new()` (RFC 8785 / JCS), never through raw
//!    `serde_json::to_vec()`.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `cayley-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod blade;
pub mod canonical;
pub mod digest;
pub mod error;
pub mod metric;

// Re-export primary types for ergonomic imports.
pub use blade::{BladeIndex, PowerSet, MAX_GENERATORS};
pub use canonical::CanonicalBytes;
pub use digest::{sha256_digest, sha256_hex, ContentDigest};
pub use error::{CanonicalizationError, MetricError};
pub use metric::Metric;
