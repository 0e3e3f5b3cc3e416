//! # Combined Product Table
//!
//! The cached, multi-operator table of one metric: the geometric tensor, the
//! three tensors derived from it, and a compiled multiplier per product.
//!
//! ## Pipeline
//!
//! ```text
//! metric ─▶ BladeIndex ─▶ TableBuilder ─▶ derive_products ─▶ compile ×4
//! ```
//!
//! Each stage is a pure function of the metric, so the whole table is too.
//! That is what makes sharing it through the registry sound.

use cayley_cache::{Cacheable, InstanceRegistry};
use cayley_core::{BladeIndex, Metric};
use cayley_tensor::{
    derive_products, CompiledMultiplier, DiagonalTableBuilder, GradeRestriction, ProductKind,
    SparseTensor, TableBuilder,
};

use crate::error::TableError;

/// All product tensors and multipliers of one diagonal-metric algebra.
#[derive(Debug, Clone, PartialEq)]
pub struct CombinedProductTable {
    metric: Metric,
    blades: BladeIndex,
    geometric: SparseTensor,
    outer: SparseTensor,
    inner: SparseTensor,
    left_contraction: SparseTensor,
    geometric_fn: CompiledMultiplier,
    outer_fn: CompiledMultiplier,
    inner_fn: CompiledMultiplier,
    left_contraction_fn: CompiledMultiplier,
}

impl CombinedProductTable {
    /// Run the full pipeline with a specific table builder, bypassing the
    /// registry.
    ///
    /// Cached tables always use [`DiagonalTableBuilder`]; this entry point
    /// lets a caller substitute another builder and compare the result.
    pub fn with_builder(metric: &Metric, builder: &dyn TableBuilder) -> Result<Self, TableError> {
        let blades = BladeIndex::new(metric.generators())?;
        let tables = builder.construct(&blades, metric)?;
        let derived = derive_products(&tables);

        let restriction = GradeRestriction::new(blades.grades());
        let compile = |tensor: &SparseTensor| CompiledMultiplier::compile(tensor, Some(&restriction));
        let geometric_fn = compile(&tables.geometric)?;
        let outer_fn = compile(&derived.outer)?;
        let inner_fn = compile(&derived.inner)?;
        let left_contraction_fn = compile(&derived.left_contraction)?;

        tracing::debug!(
            metric = %metric,
            blades = blades.len(),
            geometric_terms = geometric_fn.term_count(),
            "built combined product table"
        );

        Ok(Self {
            metric: metric.clone(),
            blades,
            geometric: tables.geometric,
            outer: derived.outer,
            inner: derived.inner,
            left_contraction: derived.left_contraction,
            geometric_fn,
            outer_fn,
            inner_fn,
            left_contraction_fn,
        })
    }

    /// The metric this table was built for.
    pub fn metric(&self) -> &Metric {
        &self.metric
    }

    /// The blade index of the algebra.
    pub fn blades(&self) -> &BladeIndex {
        &self.blades
    }

    /// Number of blades (2^N).
    pub fn dim(&self) -> usize {
        self.blades.len()
    }

    /// The product tensor for `kind`.
    pub fn tensor(&self, kind: ProductKind) -> &SparseTensor {
        match kind {
            ProductKind::Geometric => &self.geometric,
            ProductKind::Outer => &self.outer,
            ProductKind::Inner => &self.inner,
            ProductKind::LeftContraction => &self.left_contraction,
        }
    }

    /// The compiled multiplier for `kind`.
    pub fn function(&self, kind: ProductKind) -> &CompiledMultiplier {
        match kind {
            ProductKind::Geometric => &self.geometric_fn,
            ProductKind::Outer => &self.outer_fn,
            ProductKind::Inner => &self.inner_fn,
            ProductKind::LeftContraction => &self.left_contraction_fn,
        }
    }

    /// Evaluate the `kind` product of two coefficient vectors.
    pub fn multiply(&self, kind: ProductKind, a: &[f64], b: &[f64]) -> Result<Vec<f64>, TableError> {
        Ok(self.function(kind).multiply(a, b)?)
    }
}

impl Cacheable for CombinedProductTable {
    const TYPE_TAG: &'static str = "cayley.combined_product_table";
    type Args = [f64];
    type Key = Metric;
    type Error = TableError;

    fn canonicalize(args: &[f64]) -> Result<Metric, TableError> {
        Ok(Metric::new(args)?)
    }

    fn build(key: &Metric, _registry: &InstanceRegistry) -> Result<Self, TableError> {
        Self::with_builder(key, &DiagonalTableBuilder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cayley_tensor::{AlgebraTables, TensorError};

    fn table(metric: &[f64]) -> CombinedProductTable {
        CombinedProductTable::with_builder(&Metric::new(metric).unwrap(), &DiagonalTableBuilder)
            .unwrap()
    }

    #[test]
    fn euclidean_plane_geometric_products() {
        let t = table(&[1.0, 1.0]);
        let g = t.tensor(ProductKind::Geometric);
        assert_eq!(g.get(1, 1, 0), 1.0);
        assert_eq!(g.get(1, 2, 3), 1.0);
        assert_eq!(g.get(2, 1, 3), -1.0);
        assert_eq!(g.get(3, 3, 0), -1.0);
    }

    #[test]
    fn outer_drops_self_products() {
        let t = table(&[1.0, 1.0]);
        let e1 = [0.0, 1.0, 0.0, 0.0];
        let e2 = [0.0, 0.0, 1.0, 0.0];
        assert_eq!(t.multiply(ProductKind::Outer, &e1, &e1).unwrap(), vec![0.0; 4]);
        assert_eq!(
            t.multiply(ProductKind::Outer, &e1, &e2).unwrap(),
            vec![0.0, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn inner_ignores_scalar_operands() {
        let t = table(&[1.0, 1.0]);
        let one = [1.0, 0.0, 0.0, 0.0];
        let e1 = [0.0, 1.0, 0.0, 0.0];
        assert_eq!(t.multiply(ProductKind::Inner, &one, &e1).unwrap(), vec![0.0; 4]);
        assert_eq!(
            t.multiply(ProductKind::Inner, &e1, &e1).unwrap(),
            vec![1.0, 0.0, 0.0, 0.0]
        );
    }

    #[test]
    fn left_contraction_lowers_right_grade() {
        let t = table(&[1.0, 1.0]);
        let one = [1.0, 0.0, 0.0, 0.0];
        let e1 = [0.0, 1.0, 0.0, 0.0];
        let e12 = [0.0, 0.0, 0.0, 1.0];
        assert_eq!(
            t.multiply(ProductKind::LeftContraction, &one, &e1).unwrap(),
            e1.to_vec()
        );
        assert_eq!(
            t.multiply(ProductKind::LeftContraction, &e1, &e12).unwrap(),
            vec![0.0, 0.0, 1.0, 0.0]
        );
        assert_eq!(
            t.multiply(ProductKind::LeftContraction, &e12, &e1).unwrap(),
            vec![0.0; 4]
        );
    }

    #[test]
    fn functions_match_their_tensors() {
        let t = table(&[1.0, -1.0, 2.0]);
        for &kind in ProductKind::all() {
            assert_eq!(t.function(kind).term_count(), t.tensor(kind).nnz(), "{kind}");
            assert_eq!(t.function(kind).dim(), 8);
        }
    }

    #[test]
    fn rejects_wrong_operand_length() {
        let t = table(&[1.0]);
        let err = t
            .multiply(ProductKind::Geometric, &[1.0, 0.0, 0.0], &[1.0, 0.0])
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::Tensor(TensorError::DimensionMismatch { expected: 2, found: 3 })
        ));
    }

    #[test]
    fn zero_generators_is_the_scalar_field() {
        let t = table(&[]);
        assert_eq!(t.dim(), 1);
        assert_eq!(
            t.multiply(ProductKind::Geometric, &[3.0], &[4.0]).unwrap(),
            vec![12.0]
        );
        assert_eq!(t.multiply(ProductKind::Inner, &[3.0], &[4.0]).unwrap(), vec![0.0]);
    }

    struct FailingBuilder;

    impl TableBuilder for FailingBuilder {
        fn construct(&self, _: &BladeIndex, _: &Metric) -> Result<AlgebraTables, TensorError> {
            Err(TensorError::UnknownBlade { bitmap: 0b100 })
        }
    }

    #[test]
    fn builder_failure_propagates() {
        let err = CombinedProductTable::with_builder(&Metric::euclidean(2).unwrap(), &FailingBuilder)
            .unwrap_err();
        assert!(matches!(
            err,
            TableError::Tensor(TensorError::UnknownBlade { bitmap: 0b100 })
        ));
    }

    #[test]
    fn canonicalize_rejects_non_finite() {
        let err = CombinedProductTable::canonicalize(&[1.0, f64::INFINITY]).unwrap_err();
        assert!(matches!(err, TableError::Metric(_)));
    }
}
