//! # cayley-tables — Cached Product Tables
//!
//! Ties the pipeline together: a metric goes in, a shared product table comes
//! out.
//!
//! ```text
//! registry.get::<OuterProductTable>(&[1.0, 1.0, -1.0])
//!     │ canonicalize: Metric (finite, -0.0 → 0.0)
//!     ▼
//! OuterProductTable ──get_canonical──▶ CombinedProductTable
//!                                        BladeIndex → builder → derive → compile
//! ```
//!
//! Both layers are [`Cacheable`](cayley_cache::Cacheable), keyed by the
//! canonical [`Metric`](cayley_core::Metric). While any handle is held, equal
//! metrics resolve to the same allocation; once the last handle drops, the
//! table is reclaimed and rebuilt identically on the next request.
//!
//! ## Example
//!
//! ```
//! use cayley_cache::InstanceRegistry;
//! use cayley_tables::GeometricProductTable;
//!
//! let registry = InstanceRegistry::new();
//! let gp = registry.get::<GeometricProductTable>(&[1.0, 1.0]).unwrap();
//!
//! // e1 · e2 = e12 in the Euclidean plane.
//! let e1 = [0.0, 1.0, 0.0, 0.0];
//! let e2 = [0.0, 0.0, 1.0, 0.0];
//! assert_eq!(gp.multiply(&e1, &e2).unwrap(), vec![0.0, 0.0, 0.0, 1.0]);
//! ```

pub mod combined;
pub mod error;
pub mod facade;

pub use combined::CombinedProductTable;
pub use error::TableError;
pub use facade::{
    Geometric, GeometricProductTable, Inner, InnerProductTable, LeftContraction,
    LeftContractionProductTable, Outer, OuterProductTable, ProductOperator, ProductTable,
};
