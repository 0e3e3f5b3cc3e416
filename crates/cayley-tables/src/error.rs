//! Errors raised while obtaining a product table.

use cayley_cache::CacheError;
use cayley_core::MetricError;
use cayley_tensor::TensorError;
use thiserror::Error;

/// Failure to canonicalize, build, restore, or evaluate a product table.
#[derive(Error, Debug)]
pub enum TableError {
    /// The metric was rejected before any construction work.
    #[error("invalid metric: {0}")]
    Metric(#[from] MetricError),

    /// Table construction, compilation, or multiplication failed.
    #[error("product table build failed: {0}")]
    Tensor(#[from] TensorError),

    /// The registry refused the request (e.g. a foreign persisted reference).
    #[error(transparent)]
    Cache(#[from] CacheError),
}
