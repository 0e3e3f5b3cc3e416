//! # Per-Operator Product Tables
//!
//! One cached type per product. Each exposes the tensor of its product,
//! borrowed from the [`CombinedProductTable`] of the same metric, and owns a
//! multiplier compiled from that tensor alone.
//!
//! ## Sharing
//!
//! Building a façade obtains the combined table through the registry, so all
//! four façades of one metric share a single combined table. The façade keeps
//! that table alive for as long as the façade itself lives.
//!
//! The façades are distinct cached types with distinct type tags: an
//! `OuterProductTable` and an `InnerProductTable` of the same metric never
//! compare equal and never occupy the same registry slot.

use std::fmt;
use std::marker::PhantomData;

use cayley_cache::{Cacheable, Cached, InstanceRegistry};
use cayley_core::Metric;
use cayley_tensor::{CompiledMultiplier, ProductKind, SparseTensor};

use crate::combined::CombinedProductTable;
use crate::error::TableError;

/// Names one product of the combined table.
pub trait ProductOperator: Send + Sync + 'static {
    /// The product this operator selects.
    const KIND: ProductKind;
    /// Type tag of the cached façade.
    const TYPE_TAG: &'static str;
}

/// The geometric product.
#[derive(Debug)]
pub enum Geometric {}

/// The outer (wedge) product.
#[derive(Debug)]
pub enum Outer {}

/// The inner product.
#[derive(Debug)]
pub enum Inner {}

/// The left contraction.
#[derive(Debug)]
pub enum LeftContraction {}

impl ProductOperator for Geometric {
    const KIND: ProductKind = ProductKind::Geometric;
    const TYPE_TAG: &'static str = "cayley.geometric_product_table";
}

impl ProductOperator for Outer {
    const KIND: ProductKind = ProductKind::Outer;
    const TYPE_TAG: &'static str = "cayley.outer_product_table";
}

impl ProductOperator for Inner {
    const KIND: ProductKind = ProductKind::Inner;
    const TYPE_TAG: &'static str = "cayley.inner_product_table";
}

impl ProductOperator for LeftContraction {
    const KIND: ProductKind = ProductKind::LeftContraction;
    const TYPE_TAG: &'static str = "cayley.left_contraction_product_table";
}

/// The cached table of a single product.
pub struct ProductTable<P: ProductOperator> {
    combined: Cached<CombinedProductTable>,
    func: CompiledMultiplier,
    _operator: PhantomData<fn() -> P>,
}

/// Cached geometric-product table.
pub type GeometricProductTable = ProductTable<Geometric>;
/// Cached outer-product table.
pub type OuterProductTable = ProductTable<Outer>;
/// Cached inner-product table.
pub type InnerProductTable = ProductTable<Inner>;
/// Cached left-contraction table.
pub type LeftContractionProductTable = ProductTable<LeftContraction>;

impl<P: ProductOperator> ProductTable<P> {
    /// The product this table implements.
    pub fn kind(&self) -> ProductKind {
        P::KIND
    }

    /// The metric the table was built for.
    pub fn metric(&self) -> &Metric {
        self.combined.metric()
    }

    /// The combined table this façade was extracted from.
    pub fn combined(&self) -> &Cached<CombinedProductTable> {
        &self.combined
    }

    /// The product tensor, borrowed from the combined table.
    pub fn value(&self) -> &SparseTensor {
        self.combined.tensor(P::KIND)
    }

    /// The multiplier compiled from [`value`](Self::value).
    pub fn func(&self) -> &CompiledMultiplier {
        &self.func
    }

    /// Evaluate the product of two coefficient vectors.
    pub fn multiply(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>, TableError> {
        Ok(self.func.multiply(a, b)?)
    }
}

impl<P: ProductOperator> Cacheable for ProductTable<P> {
    const TYPE_TAG: &'static str = P::TYPE_TAG;
    type Args = [f64];
    type Key = Metric;
    type Error = TableError;

    fn canonicalize(args: &[f64]) -> Result<Metric, TableError> {
        Ok(Metric::new(args)?)
    }

    fn build(key: &Metric, registry: &InstanceRegistry) -> Result<Self, TableError> {
        let combined = registry.get_canonical::<CombinedProductTable>(key.clone())?;
        let value = combined.tensor(P::KIND);
        let func = CompiledMultiplier::compile(value, None)?;
        tracing::debug!(
            product = P::KIND.as_str(),
            metric = %key,
            nnz = value.nnz(),
            "extracted product table"
        );
        Ok(Self {
            combined,
            func,
            _operator: PhantomData,
        })
    }
}

impl<P: ProductOperator> fmt::Debug for ProductTable<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductTable")
            .field("kind", &P::KIND)
            .field("metric", self.metric())
            .field("nnz", &self.value().nnz())
            .finish()
    }
}
