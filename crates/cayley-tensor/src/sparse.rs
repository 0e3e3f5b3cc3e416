//! # Sparse Tensor Storage
//!
//! A cubic rank-3 tensor over dense blade indices, stored as a coordinate list.
//!
//! ## Invariants
//!
//! - Entries are sorted by `(left, right, result)` with no duplicate coordinates.
//! - No stored value is zero.
//! - Every coordinate is below `dim`.
//!
//! These hold by construction: the only constructors are `zeros`,
//! `from_entries` (which validates, sorts, and merges), and `filter`, which
//! preserves all three.

use serde::Serialize;

use crate::error::TensorError;
use crate::mask::ProductMask;

/// One stored coefficient `T[left, right, result] = value`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TensorEntry {
    /// Index of the left operand blade.
    pub left: usize,
    /// Index of the right operand blade.
    pub right: usize,
    /// Index of the result blade.
    pub result: usize,
    /// Coefficient.
    pub value: f64,
}

impl TensorEntry {
    /// Construct an entry.
    pub fn new(left: usize, right: usize, result: usize, value: f64) -> Self {
        Self {
            left,
            right,
            result,
            value,
        }
    }

    /// The `(left, right, result)` coordinate.
    pub fn coords(&self) -> (usize, usize, usize) {
        (self.left, self.right, self.result)
    }
}

/// A sparse `dim × dim × dim` coefficient tensor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SparseTensor {
    dim: usize,
    entries: Vec<TensorEntry>,
}

impl SparseTensor {
    /// The all-zero tensor.
    pub fn zeros(dim: usize) -> Self {
        Self {
            dim,
            entries: Vec::new(),
        }
    }

    /// Build a tensor from arbitrary entries.
    ///
    /// Entries sharing a coordinate are summed; zero results are dropped.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::IndexOutOfRange` if any coordinate is `>= dim`.
    pub fn from_entries(
        dim: usize,
        entries: impl IntoIterator<Item = TensorEntry>,
    ) -> Result<Self, TensorError> {
        let mut entries: Vec<TensorEntry> = entries.into_iter().collect();
        for e in &entries {
            let worst = e.left.max(e.right).max(e.result);
            if worst >= dim {
                return Err(TensorError::IndexOutOfRange { index: worst, dim });
            }
        }

        let sorted = entries.windows(2).all(|w| w[0].coords() < w[1].coords());
        if !sorted {
            entries.sort_by_key(TensorEntry::coords);
            let mut merged: Vec<TensorEntry> = Vec::with_capacity(entries.len());
            for e in entries {
                match merged.last_mut() {
                    Some(last) if last.coords() == e.coords() => last.value += e.value,
                    _ => merged.push(e),
                }
            }
            entries = merged;
        }
        entries.retain(|e| e.value != 0.0);

        Ok(Self { dim, entries })
    }

    /// Length of every axis (2^N).
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// `[dim, dim, dim]`.
    pub fn shape(&self) -> [usize; 3] {
        [self.dim; 3]
    }

    /// Number of stored nonzero coefficients.
    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Whether every coefficient is zero.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stored entries in `(left, right, result)` order.
    pub fn entries(&self) -> &[TensorEntry] {
        &self.entries
    }

    /// Iterate stored entries.
    pub fn iter(&self) -> std::slice::Iter<'_, TensorEntry> {
        self.entries.iter()
    }

    /// The coefficient at a coordinate; zero when not stored.
    pub fn get(&self, left: usize, right: usize, result: usize) -> f64 {
        let key = (left, right, result);
        self.entries
            .binary_search_by(|e| e.coords().cmp(&key))
            .map(|pos| self.entries[pos].value)
            .unwrap_or(0.0)
    }

    /// Keep only the entries satisfying `keep`.
    pub fn filter(&self, mut keep: impl FnMut(&TensorEntry) -> bool) -> Self {
        Self {
            dim: self.dim,
            entries: self.entries.iter().copied().filter(|e| keep(e)).collect(),
        }
    }

    /// Keep only the entries whose coordinate `mask` selects.
    ///
    /// This is `where(mask, self, 0)` restricted to stored entries.
    pub fn masked(&self, mask: &ProductMask) -> Self {
        self.filter(|e| mask.contains(e.left, e.right, e.result))
    }

    /// Whether every stored coordinate of `self` is also stored in `other`.
    pub fn support_subset_of(&self, other: &SparseTensor) -> bool {
        self.dim == other.dim
            && self
                .entries
                .iter()
                .all(|e| other.get(e.left, e.right, e.result) != 0.0)
    }
}
