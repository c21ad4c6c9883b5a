//! Cryptographic primitives for the Signed Integrity Graph.
//!
//! This module provides the three pieces that bind a graph to a signature:
//!
//! - **SHA-256 hashing** ([`hash`]): fixed-length content digests over
//!   canonical bytes
//! - **Ed25519 keys** ([`keys`]): keypair generation and PEM persistence
//! - **Signing and verification** ([`sign`]): producing and checking
//!   [`SignatureDocument`]s
//!
//! # Signatures
//!
//! Signatures cover the canonical encoding of the graph itself, not the
//! hash, so a verifier needs nothing beyond the graph artifact, the
//! signature document, and the public key. The recorded `graph_sha256`
//! exists to detect tampering cheaply before any cryptographic work and to
//! give a more actionable diagnostic than a bare signature failure.
//!
//! # Key material
//!
//! Private keys are persisted as unencrypted PKCS#8 PEM, public keys as
//! SPKI PEM, so a verifier implemented in any language or library can load
//! them. Keys are generated from the OS entropy source and never
//! transmitted by this crate.

pub mod hash;
pub mod keys;
pub mod sign;

pub use hash::{ContentHasher, DIGEST_SIZE};
pub use keys::{KeyError, Keypair};
pub use sign::{
    SIGNATURE_ALGORITHM, SignError, SignatureDocument, VerificationOutcome, VerifyError,
    sign_graph, verify_graph,
};
