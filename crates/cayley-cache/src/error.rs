//! Errors raised by the registry itself, as opposed to the builds it runs.

use cayley_core::CanonicalizationError;
use thiserror::Error;

/// Registry-level failure.
#[derive(Error, Debug)]
pub enum CacheError {
    /// A persisted reference names a different cached type.
    #[error("persisted instance has type tag {found:?}, expected {expected:?}")]
    TypeMismatch {
        /// Tag of the type being restored.
        expected: String,
        /// Tag found in the persisted reference.
        found: String,
    },

    /// The canonical key could not be rendered for a stable digest.
    #[error("canonical key encoding failed: {0}")]
    Canonicalization(#[from] CanonicalizationError),
}
