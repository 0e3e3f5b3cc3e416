//! # Diagonal-Metric Table Construction
//!
//! Produces the geometric-product tensor of an algebra with a diagonal metric,
//! together with the grade masks that carve the outer, inner, and
//! left-contraction products out of it.
//!
//! ## Blade Product
//!
//! For blades with bitmasks `a` and `b`:
//!
//! - the result blade is `a ^ b` (shared generators square away);
//! - the sign is the parity of transpositions needed to bring the
//!   concatenated generator list into canonical order;
//! - each shared generator contributes its metric self-product.
//!
//! A generator that squares to zero makes the coefficient vanish; the pair is
//! still visited and recorded in the masks.

use cayley_core::{BladeIndex, Metric, MetricError};

use crate::error::TensorError;
use crate::mask::{ProductKind, ProductMask};
use crate::sparse::{SparseTensor, TensorEntry};

/// Output of a table builder.
#[derive(Debug, Clone, PartialEq)]
pub struct AlgebraTables {
    /// Geometric-product tensor.
    pub geometric: SparseTensor,
    /// Coordinates kept by the outer product.
    pub outer_mask: ProductMask,
    /// Coordinates kept by the inner product.
    pub inner_mask: ProductMask,
    /// Coordinates kept by the left contraction.
    pub left_contraction_mask: ProductMask,
}

impl AlgebraTables {
    /// The mask for `kind`, or `None` for the geometric product.
    pub fn mask(&self, kind: ProductKind) -> Option<&ProductMask> {
        match kind {
            ProductKind::Geometric => None,
            ProductKind::Outer => Some(&self.outer_mask),
            ProductKind::Inner => Some(&self.inner_mask),
            ProductKind::LeftContraction => Some(&self.left_contraction_mask),
        }
    }
}

/// Turns a blade index and metric into a combined product table.
///
/// Implementations must be pure: equal inputs give equal tables. Cached
/// tables rely on it.
pub trait TableBuilder {
    /// Build the geometric tensor and product masks.
    fn construct(&self, blades: &BladeIndex, metric: &Metric) -> Result<AlgebraTables, TensorError>;
}

/// Table builder for diagonal metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagonalTableBuilder;

impl TableBuilder for DiagonalTableBuilder {
    fn construct(&self, blades: &BladeIndex, metric: &Metric) -> Result<AlgebraTables, TensorError> {
        if metric.generators() != blades.generators() {
            return Err(MetricError::GeneratorCountMismatch {
                expected: blades.generators(),
                found: metric.generators(),
            }
            .into());
        }

        let dim = blades.len();
        let bitmaps = blades.bitmaps();
        let grades = blades.grades();

        let mut entries = Vec::with_capacity(dim * dim);
        let mut outer = Vec::new();
        let mut inner = Vec::new();
        let mut left_contraction = Vec::new();

        for (i, (&a, &grade_a)) in bitmaps.iter().zip(grades).enumerate() {
            for (j, (&b, &grade_b)) in bitmaps.iter().zip(grades).enumerate() {
                let (bitmap, value) = blade_product(a, b, metric);
                let k = blades
                    .index_of(bitmap)
                    .ok_or(TensorError::UnknownBlade { bitmap })?;
                let grade_k = grades[k];

                entries.push(TensorEntry::new(i, j, k, value));
                if ProductKind::Outer.selects(grade_a, grade_b, grade_k) {
                    outer.push((i, j, k));
                }
                if ProductKind::Inner.selects(grade_a, grade_b, grade_k) {
                    inner.push((i, j, k));
                }
                if ProductKind::LeftContraction.selects(grade_a, grade_b, grade_k) {
                    left_contraction.push((i, j, k));
                }
            }
        }

        let geometric = SparseTensor::from_entries(dim, entries)?;
        tracing::trace!(
            generators = blades.generators(),
            nnz = geometric.nnz(),
            "constructed geometric product tensor"
        );

        Ok(AlgebraTables {
            geometric,
            outer_mask: ProductMask::from_coords(outer),
            inner_mask: ProductMask::from_coords(inner),
            left_contraction_mask: ProductMask::from_coords(left_contraction),
        })
    }
}

/// Sign of reordering the generators of `a` followed by those of `b` into
/// ascending order, ignoring the metric: `-1.0` for an odd number of swaps.
pub fn reordering_sign(a: u32, b: u32) -> f64 {
    let mut shifted = a >> 1;
    let mut swaps = 0u32;
    while shifted != 0 {
        swaps += (shifted & b).count_ones();
        shifted >>= 1;
    }
    if swaps & 1 == 0 {
        1.0
    } else {
        -1.0
    }
}

/// Product of two basis blades: the result bitmask and its coefficient.
pub fn blade_product(a: u32, b: u32, metric: &Metric) -> (u32, f64) {
    let sign = reordering_sign(a, b) * metric.square_factor(a & b);
    (a ^ b, sign)
}
