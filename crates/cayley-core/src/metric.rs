//! # Diagonal Metric
//!
//! A diagonal metric assigns each generator the scalar it squares to. The
//! `Metric` newtype is the canonical, frozen form of that sequence: it is the
//! cache key for every diagonal-metric product table.
//!
//! ## Equality and Hashing
//!
//! `f64` is neither `Eq` nor `Hash`. `Metric` rejects non-finite entries at
//! construction and normalizes `-0.0` to `0.0`, after which bitwise equality of
//! the entries coincides with numeric equality. Both `Eq` and `Hash` are
//! implemented over those bit patterns.

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::blade::MAX_GENERATORS;
use crate::error::MetricError;

/// An immutable, validated diagonal metric.
///
/// # Invariants
///
/// - Every entry is finite.
/// - No entry is `-0.0`.
/// - At most [`MAX_GENERATORS`] entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct Metric(Vec<f64>);

impl Metric {
    /// Freeze a metric from its self-products, one per generator.
    ///
    /// # Errors
    ///
    /// Returns `MetricError::NonFinite` for NaN or infinite entries and
    /// `MetricError::TooManyGenerators` above [`MAX_GENERATORS`].
    pub fn new(values: &[f64]) -> Result<Self, MetricError> {
        check_count(values.len())?;
        let mut frozen = Vec::with_capacity(values.len());
        for (position, &value) in values.iter().enumerate() {
            if !value.is_finite() {
                return Err(MetricError::NonFinite { position, value });
            }
            // Collapse -0.0 onto 0.0 so bit equality matches numeric equality.
            frozen.push(if value == 0.0 { 0.0 } else { value });
        }
        Ok(Self(frozen))
    }

    /// Freeze a metric, additionally checking it covers exactly `generators`.
    pub fn for_generators(generators: usize, values: &[f64]) -> Result<Self, MetricError> {
        if values.len() != generators {
            return Err(MetricError::GeneratorCountMismatch {
                expected: generators,
                found: values.len(),
            });
        }
        Self::new(values)
    }

    /// The Euclidean metric: every generator squares to `+1`.
    pub fn euclidean(generators: usize) -> Result<Self, MetricError> {
        check_count(generators)?;
        Self::new(&vec![1.0; generators])
    }

    /// The signature metric Cl(p, q, r): `p` generators squaring to `+1`,
    /// then `q` to `-1`, then `r` null generators.
    pub fn signature(p: usize, q: usize, r: usize) -> Result<Self, MetricError> {
        check_count(p.saturating_add(q).saturating_add(r))?;
        let mut values = vec![1.0; p];
        values.extend(std::iter::repeat(-1.0).take(q));
        values.extend(std::iter::repeat(0.0).take(r));
        Self::new(&values)
    }

    /// Number of generators.
    pub fn generators(&self) -> usize {
        self.0.len()
    }

    /// The self-products, in generator order.
    pub fn values(&self) -> &[f64] {
        &self.0
    }

    /// The self-product of generator `g`.
    pub fn get(&self, g: usize) -> Option<f64> {
        self.0.get(g).copied()
    }

    /// Product of the self-products of every generator set in `bitmap`.
    ///
    /// Bits above the generator count are ignored.
    pub fn square_factor(&self, bitmap: u32) -> f64 {
        self.0
            .iter()
            .enumerate()
            .filter(|&(g, _)| bitmap & (1u32 << g) != 0)
            .map(|(_, &v)| v)
            .product()
    }
}

// Runs before any allocation sized by `count`.
fn check_count(count: usize) -> Result<(), MetricError> {
    if count > MAX_GENERATORS {
        return Err(MetricError::TooManyGenerators {
            count,
            max: MAX_GENERATORS,
        });
    }
    Ok(())
}

impl PartialEq for Metric {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for Metric {}

impl Hash for Metric {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for v in &self.0 {
            v.to_bits().hash(state);
        }
    }
}

impl TryFrom<Vec<f64>> for Metric {
    type Error = MetricError;

    fn try_from(values: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(&values)
    }
}

impl From<Metric> for Vec<f64> {
    fn from(metric: Metric) -> Self {
        metric.0
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{v}")?;
        }
        f.write_str(")")
    }
}
