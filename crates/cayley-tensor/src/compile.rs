//! # Multiplier Compilation
//!
//! Turns a [`SparseTensor`] into a [`CompiledMultiplier`]: a row-compressed
//! term list evaluating `(a ∘ b)_k = Σ a_i · T[i, j, k] · b_j` over dense
//! coefficient vectors.
//!
//! A [`GradeRestriction`] narrows the compiled terms to left and right
//! operands of chosen grades, for callers that know their operands are
//! grade-sparse (a vector times a bivector, say). Terms outside the chosen
//! grades are dropped; the output is still a full-length vector, zero wherever
//! no remaining term lands.
//!
//! Compilation is referentially transparent: equal tensors and restrictions
//! give equal multipliers.

use std::collections::BTreeSet;

use crate::error::TensorError;
use crate::sparse::SparseTensor;

/// Grade filter applied while compiling a multiplier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeRestriction {
    grades: Vec<usize>,
    left: Option<BTreeSet<usize>>,
    right: Option<BTreeSet<usize>>,
}

impl GradeRestriction {
    /// A restriction over the given per-index grade list that admits every
    /// grade on both sides.
    pub fn new(grades: &[usize]) -> Self {
        Self {
            grades: grades.to_vec(),
            left: None,
            right: None,
        }
    }

    /// Admit only left operands of these grades.
    pub fn with_left_grades(mut self, grades: impl IntoIterator<Item = usize>) -> Self {
        self.left = Some(grades.into_iter().collect());
        self
    }

    /// Admit only right operands of these grades.
    pub fn with_right_grades(mut self, grades: impl IntoIterator<Item = usize>) -> Self {
        self.right = Some(grades.into_iter().collect());
        self
    }

    /// The per-index grade list.
    pub fn grades(&self) -> &[usize] {
        &self.grades
    }

    fn admits(side: &Option<BTreeSet<usize>>, grade: usize) -> bool {
        side.as_ref().map_or(true, |set| set.contains(&grade))
    }

    fn admits_pair(&self, left: usize, right: usize) -> bool {
        Self::admits(&self.left, self.grades[left]) && Self::admits(&self.right, self.grades[right])
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Term {
    right: usize,
    result: usize,
    value: f64,
}

/// A bilinear map over dense coefficient vectors.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledMultiplier {
    dim: usize,
    /// `terms[row_offsets[i]..row_offsets[i + 1]]` are the terms with left index `i`.
    row_offsets: Vec<usize>,
    terms: Vec<Term>,
}

impl CompiledMultiplier {
    /// Compile `tensor`, keeping only the terms `restriction` admits.
    ///
    /// # Errors
    ///
    /// Returns `TensorError::DimensionMismatch` if the restriction's grade
    /// list does not have one grade per tensor index.
    pub fn compile(
        tensor: &SparseTensor,
        restriction: Option<&GradeRestriction>,
    ) -> Result<Self, TensorError> {
        let dim = tensor.dim();
        if let Some(r) = restriction {
            if r.grades.len() != dim {
                return Err(TensorError::DimensionMismatch {
                    expected: dim,
                    found: r.grades.len(),
                });
            }
        }

        let mut row_offsets = vec![0; dim + 1];
        let mut terms = Vec::with_capacity(tensor.nnz());
        // Entries arrive sorted by left index.
        for e in tensor.iter() {
            if restriction.map_or(true, |r| r.admits_pair(e.left, e.right)) {
                terms.push(Term {
                    right: e.right,
                    result: e.result,
                    value: e.value,
                });
                row_offsets[e.left + 1] += 1;
            }
        }
        for i in 0..dim {
            row_offsets[i + 1] += row_offsets[i];
        }

        Ok(Self {
            dim,
            row_offsets,
            terms,
        })
    }

    /// Length of the operand and result vectors.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of compiled terms.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Multiply two coefficient vectors.
    pub fn multiply(&self, a: &[f64], b: &[f64]) -> Result<Vec<f64>, TensorError> {
        let mut out = vec![0.0; self.dim];
        self.multiply_into(a, b, &mut out)?;
        Ok(out)
    }

    /// Multiply two coefficient vectors into `out`, overwriting it.
    pub fn multiply_into(&self, a: &[f64], b: &[f64], out: &mut [f64]) -> Result<(), TensorError> {
        for v in [a, b, &*out] {
            if v.len() != self.dim {
                return Err(TensorError::DimensionMismatch {
                    expected: self.dim,
                    found: v.len(),
                });
            }
        }

        out.fill(0.0);
        // Every term is summed, so `0 * inf` yields NaN as in the dense product.
        for (i, &x) in a.iter().enumerate() {
            for t in &self.terms[self.row_offsets[i]..self.row_offsets[i + 1]] {
                out[t.result] += x * t.value * b[t.right];
            }
        }
        Ok(())
    }
}
