//! Errors raised while building or evaluating product tensors.

use cayley_core::MetricError;
use thiserror::Error;

/// Failure inside table construction, derivation, or multiplication.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TensorError {
    /// The metric does not fit the blade index.
    #[error("metric rejected: {0}")]
    Metric(#[from] MetricError),

    /// A coefficient vector or grade list has the wrong length.
    #[error("expected length {expected}, found {found}")]
    DimensionMismatch {
        /// Required length (2^N).
        expected: usize,
        /// Supplied length.
        found: usize,
    },

    /// A tensor coordinate lies outside the tensor shape.
    #[error("index {index} out of range for dimension {dim}")]
    IndexOutOfRange {
        /// Offending coordinate.
        index: usize,
        /// Tensor dimension along every axis.
        dim: usize,
    },

    /// A product produced a bitmask the blade index does not know.
    #[error("no blade with bitmap {bitmap:#b}")]
    UnknownBlade {
        /// The unmapped bitmask.
        bitmap: u32,
    },
}
