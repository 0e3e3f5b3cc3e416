//! # Bitmask Blade Indexing
//!
//! Enumerates the 2^N basis blades of an algebra with N generators and assigns
//! each a dense index. Generator `g` is the single bit `1 << g`; a blade is the
//! OR of its generators' bits, and its grade is the popcount.
//!
//! ## Ordering Contract
//!
//! Dense indices follow [`PowerSet`] order: subsets grouped by ascending size,
//! lexicographic over generator positions within a size. For N = 3:
//!
//! ```text
//! index   0    1    2    3    4     5     6     7
//! blade   1    e1   e2   e3   e12   e13   e23   e123
//! bitmap  000  001  010  100  011   101   110   111
//! ```
//!
//! Coefficient vectors of every product table are aligned to this order. It is
//! independent of the metric.

use serde::Serialize;

use crate::error::MetricError;

/// Largest supported generator count.
///
/// A nondegenerate algebra has 4^N nonzero geometric-product coefficients;
/// 12 generators already means ~16.7M stored entries.
pub const MAX_GENERATORS: usize = 12;

/// Deterministic power-set enumeration of `0..n`.
///
/// Yields every subset of generator positions exactly once, as a sorted
/// `Vec<usize>`, grouped by ascending size and lexicographic within a size.
/// A clone continues from the same position; `PowerSet::new` restarts.
#[derive(Debug, Clone)]
pub struct PowerSet {
    n: usize,
    current: Option<Vec<usize>>,
}

impl PowerSet {
    /// Enumerate the subsets of `n` generators.
    pub fn new(n: usize) -> Self {
        Self {
            n,
            current: Some(Vec::new()),
        }
    }
}

impl Iterator for PowerSet {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let out = self.current.take()?;
        let n = self.n;
        let r = out.len();

        let mut next = out.clone();
        // Rightmost position that can still move right.
        match (0..r).rev().find(|&i| next[i] < n - r + i) {
            Some(i) => {
                next[i] += 1;
                for j in i + 1..r {
                    next[j] = next[j - 1] + 1;
                }
                self.current = Some(next);
            }
            None if r < n => self.current = Some((0..=r).collect()),
            None => {}
        }
        Some(out)
    }
}

/// One basis blade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Blade {
    /// Dense index.
    pub index: usize,
    /// Generator bitmask.
    pub bitmap: u32,
    /// Number of generators.
    pub grade: usize,
}

/// Bidirectional bitmask ↔ dense-index map plus per-index grades.
///
/// A pure function of the generator count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BladeIndex {
    generators: usize,
    bitmaps: Vec<u32>,
    grades: Vec<usize>,
    /// Indexed by bitmask.
    index_of: Vec<usize>,
}

impl BladeIndex {
    /// Build the blade index for `generators` generators.
    ///
    /// # Errors
    ///
    /// Returns `MetricError::TooManyGenerators` above [`MAX_GENERATORS`].
    pub fn new(generators: usize) -> Result<Self, MetricError> {
        if generators > MAX_GENERATORS {
            return Err(MetricError::TooManyGenerators {
                count: generators,
                max: MAX_GENERATORS,
            });
        }
        let dim = 1usize << generators;
        let mut bitmaps = Vec::with_capacity(dim);
        let mut grades = Vec::with_capacity(dim);
        let mut index_of = vec![0; dim];

        for (index, subset) in PowerSet::new(generators).enumerate() {
            let bitmap = subset.iter().fold(0u32, |acc, &g| acc | (1u32 << g));
            bitmaps.push(bitmap);
            grades.push(subset.len());
            index_of[bitmap as usize] = index;
        }

        Ok(Self {
            generators,
            bitmaps,
            grades,
            index_of,
        })
    }

    /// Number of generators.
    pub fn generators(&self) -> usize {
        self.generators
    }

    /// Number of blades (2^N).
    pub fn len(&self) -> usize {
        self.bitmaps.len()
    }

    /// Always false: N = 0 still has the scalar blade.
    pub fn is_empty(&self) -> bool {
        self.bitmaps.is_empty()
    }

    /// Bitmask of each dense index.
    pub fn bitmaps(&self) -> &[u32] {
        &self.bitmaps
    }

    /// Grade of each dense index.
    pub fn grades(&self) -> &[usize] {
        &self.grades
    }

    /// Bitmask of the blade at `index`.
    pub fn bitmap(&self, index: usize) -> Option<u32> {
        self.bitmaps.get(index).copied()
    }

    /// Grade of the blade at `index`.
    pub fn grade(&self, index: usize) -> Option<usize> {
        self.grades.get(index).copied()
    }

    /// Dense index of the blade with generator bitmask `bitmap`.
    pub fn index_of(&self, bitmap: u32) -> Option<usize> {
        self.index_of.get(bitmap as usize).copied()
    }

    /// The blade at `index`.
    pub fn blade(&self, index: usize) -> Option<Blade> {
        Some(Blade {
            index,
            bitmap: self.bitmap(index)?,
            grade: self.grade(index)?,
        })
    }

    /// All blades in dense-index order.
    pub fn iter(&self) -> impl Iterator<Item = Blade> + '_ {
        self.bitmaps
            .iter()
            .zip(&self.grades)
            .enumerate()
            .map(|(index, (&bitmap, &grade))| Blade {
                index,
                bitmap,
                grade,
            })
    }

    /// Dense indices of every blade of `grade`, in index order.
    pub fn blades_of_grade(&self, grade: usize) -> Vec<usize> {
        self.grades
            .iter()
            .enumerate()
            .filter(|(_, &g)| g == grade)
            .map(|(i, _)| i)
            .collect()
    }

    /// Display name of the blade at `index`: `"1"` for the scalar, otherwise
    /// `e` followed by one-based generator numbers (`"e12"`, `"e123"`).
    ///
    /// Generator numbers above 9 are separated with underscores (`"e1_10"`).
    pub fn blade_name(&self, index: usize) -> Option<String> {
        let bitmap = self.bitmap(index)?;
        if bitmap == 0 {
            return Some("1".to_string());
        }
        let parts: Vec<String> = (0..self.generators)
            .filter(|&g| bitmap & (1u32 << g) != 0)
            .map(|g| (g + 1).to_string())
            .collect();
        let sep = if self.generators > 9 { "_" } else { "" };
        Some(format!("e{}", parts.join(sep)))
    }
}
