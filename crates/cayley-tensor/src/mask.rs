//! # Product Kinds and Grade Masks
//!
//! Every product other than the geometric one is a grade-selected restriction
//! of the geometric product. [`ProductKind::selects`] holds the selection
//! predicates; [`ProductMask`] records where a predicate holds over the index
//! space.
//!
//! ## Grade Predicates
//!
//! With operand grades r (left), s (right) and result grade t:
//!
//! | product          | selected when                  |
//! |------------------|--------------------------------|
//! | geometric        | always                         |
//! | outer            | t == r + s                     |
//! | inner            | t == \|r − s\|, r ≠ 0, s ≠ 0   |
//! | left contraction | t == s − r, s ≥ r              |
//!
//! Scalars never take part in the inner product. These predicates are a
//! compatibility contract: changing them changes every derived coefficient.

use serde::{Deserialize, Serialize};

/// The four products a diagonal-metric table provides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductKind {
    /// Full geometric product.
    Geometric,
    /// Outer (wedge) product.
    Outer,
    /// Hestenes inner product.
    Inner,
    /// Left contraction.
    LeftContraction,
}

impl ProductKind {
    /// Every product kind, geometric first.
    pub fn all() -> &'static [ProductKind] {
        &[
            Self::Geometric,
            Self::Outer,
            Self::Inner,
            Self::LeftContraction,
        ]
    }

    /// Stable identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Geometric => "geometric",
            Self::Outer => "outer",
            Self::Inner => "inner",
            Self::LeftContraction => "left_contraction",
        }
    }

    /// Whether this product keeps the geometric-product term that maps a
    /// grade-`left` blade and a grade-`right` blade to a grade-`result` blade.
    pub fn selects(&self, left: usize, right: usize, result: usize) -> bool {
        match self {
            Self::Geometric => true,
            Self::Outer => result == left + right,
            Self::Inner => left != 0 && right != 0 && result == left.abs_diff(right),
            Self::LeftContraction => right >= left && result == right - left,
        }
    }
}

impl std::fmt::Display for ProductKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sparse boolean selector over `(left, right, result)` coordinates.
///
/// Stores only the coordinates where the selector is true, sorted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProductMask {
    selected: Vec<(usize, usize, usize)>,
}

impl ProductMask {
    /// Build a mask from the coordinates it selects.
    pub fn from_coords(coords: impl IntoIterator<Item = (usize, usize, usize)>) -> Self {
        let mut selected: Vec<_> = coords.into_iter().collect();
        if !selected.windows(2).all(|w| w[0] < w[1]) {
            selected.sort_unstable();
            selected.dedup();
        }
        Self { selected }
    }

    /// Whether the coordinate is selected.
    pub fn contains(&self, left: usize, right: usize, result: usize) -> bool {
        self.selected.binary_search(&(left, right, result)).is_ok()
    }

    /// Number of selected coordinates.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected coordinates in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, usize)> + '_ {
        self.selected.iter().copied()
    }

    /// Whether no coordinate is selected by both masks.
    pub fn is_disjoint(&self, other: &ProductMask) -> bool {
        self.selected
            .iter()
            .all(|&(left, right, result)| !other.contains(left, right, result))
    }
}
