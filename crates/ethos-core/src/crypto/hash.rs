//! SHA-256 content hashing.

use sha2::{Digest, Sha256};

/// Size of a SHA-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// Hasher for graph and event content.
///
/// SHA-256 is used (rather than a faster non-standard digest) because the
/// signature document records the digest for independent verifiers, which
/// must be able to recompute it with any mainstream crypto library.
pub struct ContentHasher;

impl ContentHasher {
    /// Computes the SHA-256 digest of `bytes`.
    #[must_use]
    pub fn sha256(bytes: &[u8]) -> [u8; DIGEST_SIZE] {
        let digest = Sha256::digest(bytes);
        digest.into()
    }

    /// Computes the SHA-256 digest of `bytes`, lowercase hex-encoded.
    #[must_use]
    pub fn sha256_hex(bytes: &[u8]) -> String {
        hex::encode(Self::sha256(bytes))
    }
}
