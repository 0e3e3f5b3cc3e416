//! # Product Table Derivation
//!
//! `derived[i, j, k] = geometric[i, j, k]` where the product's mask selects
//! `(i, j, k)`, zero elsewhere. Derivation is a filter over the stored entries
//! of the geometric tensor, so the derived tensors are never denser than it.

use crate::builder::AlgebraTables;
use crate::mask::ProductKind;
use crate::sparse::SparseTensor;

/// The three grade-restricted products of a combined table.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedProducts {
    /// Outer-product tensor.
    pub outer: SparseTensor,
    /// Inner-product tensor.
    pub inner: SparseTensor,
    /// Left-contraction tensor.
    pub left_contraction: SparseTensor,
}

/// Apply each mask of `tables` to its geometric tensor.
pub fn derive_products(tables: &AlgebraTables) -> DerivedProducts {
    let outer = tables.geometric.masked(&tables.outer_mask);
    let inner = tables.geometric.masked(&tables.inner_mask);
    let left_contraction = tables.geometric.masked(&tables.left_contraction_mask);

    tracing::trace!(
        geometric = tables.geometric.nnz(),
        outer = outer.nnz(),
        inner = inner.nnz(),
        left_contraction = left_contraction.nnz(),
        "derived product tensors"
    );

    DerivedProducts {
        outer,
        inner,
        left_contraction,
    }
}

/// Derive the tensor for a single product kind.
pub fn derive_product(tables: &AlgebraTables, kind: ProductKind) -> SparseTensor {
    match tables.mask(kind) {
        Some(mask) => tables.geometric.masked(mask),
        None => tables.geometric.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{DiagonalTableBuilder, TableBuilder};
    use cayley_core::{BladeIndex, Metric};

    fn build(metric: &[f64]) -> AlgebraTables {
        let metric = Metric::new(metric).unwrap();
        let blades = BladeIndex::new(metric.generators()).unwrap();
        DiagonalTableBuilder.construct(&blades, &metric).unwrap()
    }

    #[test]
    fn test_euclidean_plane_products() {
        let tables = build(&[1.0, 1.0]);
        let d = derive_products(&tables);

        // e1 ^ e2 = e12, e1 ^ e1 = 0
        assert_eq!(d.outer.get(1, 2, 3), 1.0);
        assert_eq!(d.outer.get(1, 1, 0), 0.0);
        // e1 . e1 = 1, e1 . e2 = 0
        assert_eq!(d.inner.get(1, 1, 0), 1.0);
        assert_eq!(d.inner.get(1, 2, 3), 0.0);
        // e1 _| e12 = e2, e12 _| e1 = 0
        assert_eq!(d.left_contraction.get(1, 3, 2), 1.0);
        assert_eq!(d.left_contraction.get(3, 1, 2), 0.0);
    }

    #[test]
    fn test_scalar_operands_excluded_from_inner() {
        let tables = build(&[1.0, 1.0]);
        let d = derive_products(&tables);
        assert_eq!(d.inner.get(0, 1, 1), 0.0);
        assert_eq!(d.inner.get(1, 0, 1), 0.0);
        // ...but kept by the outer product and the left contraction.
        assert_eq!(d.outer.get(0, 1, 1), 1.0);
        assert_eq!(d.left_contraction.get(0, 1, 1), 1.0);
    }

    #[test]
    fn test_derived_support_within_geometric() {
        let tables = build(&[1.0, -1.0, 0.0]);
        let d = derive_products(&tables);
        for t in [&d.outer, &d.inner, &d.left_contraction] {
            assert!(t.support_subset_of(&tables.geometric));
        }
    }

    #[test]
    fn test_single_kind_matches_bulk() {
        let tables = build(&[1.0, 1.0, 1.0]);
        let d = derive_products(&tables);
        assert_eq!(derive_product(&tables, ProductKind::Outer), d.outer);
        assert_eq!(derive_product(&tables, ProductKind::Inner), d.inner);
        assert_eq!(
            derive_product(&tables, ProductKind::LeftContraction),
            d.left_contraction
        );
        assert_eq!(derive_product(&tables, ProductKind::Geometric), tables.geometric);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::builder::{DiagonalTableBuilder, TableBuilder};
    use cayley_core::{BladeIndex, Metric};
    use proptest::prelude::*;

    fn metric_entry() -> impl Strategy<Value = f64> {
        prop_oneof![Just(1.0), Just(-1.0), Just(0.0), -4.0f64..4.0]
    }

    proptest! {
        /// Every derived nonzero has a nonzero geometric counterpart, and
        /// outer and inner never share a nonzero coordinate.
        #[test]
        fn masking_is_sound(values in prop::collection::vec(metric_entry(), 0..=4)) {
            let metric = Metric::new(&values).unwrap();
            let blades = BladeIndex::new(metric.generators()).unwrap();
            let tables = DiagonalTableBuilder.construct(&blades, &metric).unwrap();
            let d = derive_products(&tables);

            for t in [&d.outer, &d.inner, &d.left_contraction] {
                for e in t.iter() {
                    prop_assert_eq!(tables.geometric.get(e.left, e.right, e.result), e.value);
                }
            }
            for e in d.outer.iter() {
                prop_assert_eq!(d.inner.get(e.left, e.right, e.result), 0.0);
            }
            prop_assert!(tables.outer_mask.is_disjoint(&tables.inner_mask));
        }
    }
}
