//! # Error Types
//!
//! All errors use `thiserror` for derive-based `Display` and `Error`
//! implementations. Metric validation errors are raised while canonicalizing
//! constructor arguments, before any table construction work starts.

use thiserror::Error;

/// A metric that cannot parameterize a diagonal-metric algebra.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    /// A self-product was NaN or infinite.
    #[error("metric entry {position} is not finite: {value}")]
    NonFinite {
        /// Generator position of the offending entry.
        position: usize,
        /// The rejected value.
        value: f64,
    },

    /// The metric length does not match the requested generator count.
    #[error("metric has {found} entries but {expected} generators were requested")]
    GeneratorCountMismatch {
        /// Requested number of generators.
        expected: usize,
        /// Number of metric entries supplied.
        found: usize,
    },

    /// The algebra would exceed the supported index space.
    #[error("{count} generators requested; at most {max} are supported")]
    TooManyGenerators {
        /// Requested number of generators.
        count: usize,
        /// Supported maximum.
        max: usize,
    },
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
