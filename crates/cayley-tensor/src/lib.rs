//! # cayley-tensor — Sparse Product Tensors
//!
//! Builds and evaluates the bilinear product tensors of a diagonal-metric
//! geometric algebra.
//!
//! - **Sparse storage** (`sparse.rs`): `SparseTensor`, a sorted coordinate
//!   list of `(left, right, result, value)` entries over dense blade indices.
//!
//! - **Table builder** (`builder.rs`): the `TableBuilder` seam and its
//!   `DiagonalTableBuilder` implementation, producing the geometric-product
//!   tensor plus the outer/inner/left-contraction grade masks.
//!
//! - **Masks** (`mask.rs`): `ProductKind` and its grade predicates, and the
//!   sparse `ProductMask` selector.
//!
//! - **Derivation** (`derive.rs`): applies the masks to the geometric tensor.
//!
//! - **Compilation** (`compile.rs`): turns a tensor into a
//!   `CompiledMultiplier`, optionally restricted to grade subsets.
//!
//! ## Mathematical Definition
//!
//! For a product ∘ with tensor T, and coefficient vectors a, b aligned to
//! the dense blade order:
//!
//! ```text
//! (a ∘ b)_k = Σ_{i,j} a_i · T[i, j, k] · b_j
//! ```
//!
//! T[i, j, k] is nonzero only where `bitmap_i ^ bitmap_j == bitmap_k`, so each
//! (i, j) pair contributes at most one entry. A dense 2^N × 2^N × 2^N array is
//! never materialized.

pub mod builder;
pub mod compile;
pub mod derive;
pub mod error;
pub mod mask;
pub mod sparse;

// Re-export primary types.
pub use builder::{blade_product, reordering_sign, AlgebraTables, DiagonalTableBuilder, TableBuilder};
pub use compile::{CompiledMultiplier, GradeRestriction};
pub use derive::{derive_product, derive_products, DerivedProducts};
pub use error::TensorError;
pub use mask::{ProductKind, ProductMask};
pub use sparse::{SparseTensor, TensorEntry};
