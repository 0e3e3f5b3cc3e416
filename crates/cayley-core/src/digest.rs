//! # Content Digest — Process-Independent Identity
//!
//! `std::hash::Hash` output depends on a per-process random seed, so it cannot
//! identify a cached instance across process boundaries. `ContentDigest` can:
//! it is the SHA-256 of the canonical bytes of a value, and can only be
//! computed from [`CanonicalBytes`].

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::canonical::CanonicalBytes;

/// A 32-byte SHA-256 digest of canonical bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ContentDigest {
    /// The raw 32-byte digest value.
    pub bytes: [u8; 32],
}

impl ContentDigest {
    /// Render the digest as a lowercase hex string.
    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}

impl std::fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sha256:{}", self.to_hex())
    }
}

/// Compute a SHA-256 content digest from canonical bytes.
///
/// Accepts only `&CanonicalBytes`, not raw `&[u8]`, so every digest in the
/// workspace is taken over the JCS rendering.
pub fn sha256_digest(data: &CanonicalBytes) -> ContentDigest {
    let hash = Sha256::digest(data.as_bytes());
    let mut bytes = [0u8; 32];
    bytes.copy_from_slice(&hash);
    ContentDigest { bytes }
}

/// Compute a SHA-256 hex string from canonical bytes.
pub fn sha256_hex(data: &CanonicalBytes) -> String {
    sha256_digest(data).to_hex()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_array_digest() {
        // sha256(b"[]")
        let cb = CanonicalBytes::new(&Vec::<u8>::new()).unwrap();
        assert_eq!(
            sha256_hex(&cb),
            "4f53cda18c2baa0c0354bb5f9a3ecbe5ed12ab4d8e11ba873c2f11161202b945"
        );
    }

    #[test]
    fn test_digest_is_deterministic() {
        let a = CanonicalBytes::new(&("tag", vec![1.0, 1.0])).unwrap();
        let b = CanonicalBytes::new(&("tag", vec![1, 1])).unwrap();
        assert_eq!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn test_different_inputs_differ() {
        let a = CanonicalBytes::new(&vec![1.0, 1.0]).unwrap();
        let b = CanonicalBytes::new(&vec![1.0, -1.0]).unwrap();
        assert_ne!(sha256_digest(&a), sha256_digest(&b));
    }

    #[test]
    fn test_display_prefix() {
        let cb = CanonicalBytes::new(&"x").unwrap();
        let d = sha256_digest(&cb);
        let shown = d.to_string();
        assert!(shown.starts_with("sha256:"));
        assert_eq!(shown.len(), "sha256:".len() + 64);
    }
}
