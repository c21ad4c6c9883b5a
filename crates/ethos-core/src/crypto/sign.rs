//! Graph signing and verification.
//!
//! A [`SignatureDocument`] binds three things: the algorithm identifier, the
//! SHA-256 hex digest of the graph's canonical bytes at signing time, and
//! the Ed25519 signature over those canonical bytes. Verification is a
//! two-stage, short-circuiting check: the hash comparison runs first and a
//! mismatch fails without attempting any cryptographic work, both to avoid
//! spending crypto cycles on data already known to be wrong and to give the
//! operator the more actionable diagnostic.
//!
//! Sign and verify operate on the raw JSON value of the graph artifact, not
//! a typed struct, so a field injected, removed, or altered anywhere in the
//! stored file changes the recomputed hash. Stored formatting (pretty vs
//! compact) is irrelevant: canonicalization happens in memory.

use std::io::Write;
use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use ed25519_dalek::{Signature, Signer as _, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::hash::ContentHasher;
use crate::canonical::{CanonicalizeError, canonical_json_bytes};

/// Identifier of the signature scheme recorded in every document.
pub const SIGNATURE_ALGORITHM: &str = "ed25519";

/// Errors that can occur while producing or persisting a signature.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SignError {
    /// The graph could not be canonically encoded.
    #[error("graph canonicalization failed: {0}")]
    Canonicalize(#[from] CanonicalizeError),

    /// The destination path already exists and overwrite was not requested.
    #[error("refusing to overwrite existing signature file: {path}")]
    AlreadyExists {
        /// The pre-occupied destination path.
        path: String,
    },

    /// Writing the signature document failed.
    #[error("signature file I/O failed for {path}: {source}")]
    Io {
        /// The path involved.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The signature document could not be serialized.
    #[error("signature document serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors that can occur while verifying, distinct from integrity failures.
///
/// Everything here is an operator or input problem: a corrupt document, an
/// unreadable file, an algorithm this build does not implement. Integrity
/// failures (hash mismatch, bad signature) are never errors; they are
/// reported through [`VerificationOutcome`].
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VerifyError {
    /// The graph could not be canonically encoded.
    #[error("graph canonicalization failed: {0}")]
    Canonicalize(#[from] CanonicalizeError),

    /// The signature document names an algorithm this build does not
    /// implement.
    #[error("unsupported signature algorithm {algorithm:?}, expected {SIGNATURE_ALGORITHM:?}")]
    UnsupportedAlgorithm {
        /// The algorithm identifier found in the document.
        algorithm: String,
    },

    /// The signature document file could not be read.
    #[error("signature file I/O failed for {path}: {source}")]
    Io {
        /// The path involved.
        path: String,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The signature document is not valid JSON of the expected shape.
    #[error("malformed signature document {path}: {detail}")]
    Malformed {
        /// The offending file.
        path: String,
        /// Description of the parse failure.
        detail: String,
    },
}

/// The persisted record binding a graph's hash to its signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignatureDocument {
    /// Fixed identifier of the signature scheme ([`SIGNATURE_ALGORITHM`]).
    pub algorithm: String,

    /// Lowercase hex SHA-256 of the graph's canonical bytes at signing time.
    pub graph_sha256: String,

    /// Base64 (standard alphabet) encoding of the 64-byte Ed25519 signature.
    pub signature_b64: String,
}

impl SignatureDocument {
    /// Reads and parses a signature document from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Io`] if the file cannot be read or
    /// [`VerifyError::Malformed`] if it is not a valid document.
    pub fn from_file(path: &Path) -> Result<Self, VerifyError> {
        let text = std::fs::read_to_string(path).map_err(|source| VerifyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|e| VerifyError::Malformed {
            path: path.display().to_string(),
            detail: e.to_string(),
        })
    }

    /// Writes the document as pretty-printed JSON.
    ///
    /// The write is atomic; a pre-existing destination fails with
    /// [`SignError::AlreadyExists`] unless `overwrite` is set.
    pub fn write_to(&self, path: &Path, overwrite: bool) -> Result<(), SignError> {
        let json = serde_json::to_string_pretty(self)?;

        let dir = path.parent().filter(|p| !p.as_os_str().is_empty());
        let mut tmp = match dir {
            Some(dir) => tempfile::NamedTempFile::new_in(dir),
            None => tempfile::NamedTempFile::new_in("."),
        }
        .map_err(|source| SignError::Io {
            path: path.display().to_string(),
            source,
        })?;

        tmp.write_all(json.as_bytes()).map_err(|source| SignError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let result = if overwrite {
            tmp.persist(path).map(|_| ()).map_err(|e| SignError::Io {
                path: path.display().to_string(),
                source: e.error,
            })
        } else {
            tmp.persist_noclobber(path).map(|_| ()).map_err(|e| {
                if e.error.kind() == std::io::ErrorKind::AlreadyExists {
                    SignError::AlreadyExists {
                        path: path.display().to_string(),
                    }
                } else {
                    SignError::Io {
                        path: path.display().to_string(),
                        source: e.error,
                    }
                }
            })
        };
        result
    }
}

/// The result of verifying a signature document against a graph.
///
/// Integrity failures are expected outcomes, not exceptions; every
/// underlying cryptographic failure mode (undecodable base64, wrong length,
/// wrong key, bit-level mismatch) collapses into [`SignatureInvalid`] so
/// backend internals never leak into the verification contract.
///
/// [`SignatureInvalid`]: VerificationOutcome::SignatureInvalid
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationOutcome {
    /// Both the hash comparison and the cryptographic check passed. This is
    /// the sole path to a verified result; no partial-trust states exist.
    Verified,

    /// The recomputed canonical-bytes hash differs from the recorded one.
    /// The cryptographic check was not attempted.
    HashMismatch {
        /// The hash recorded in the signature document.
        expected: String,
        /// The hash recomputed from the supplied graph.
        actual: String,
    },

    /// The hash matched but the signature did not verify.
    SignatureInvalid,
}

impl VerificationOutcome {
    /// True only for [`VerificationOutcome::Verified`].
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        matches!(self, Self::Verified)
    }

    /// Human-readable reason surfaced to callers.
    #[must_use]
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Verified => "signature verified",
            Self::HashMismatch { .. } => "graph hash mismatch",
            Self::SignatureInvalid => "signature verification failed",
        }
    }
}

impl std::fmt::Display for VerificationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HashMismatch { expected, actual } => {
                write!(f, "{}: expected {expected}, got {actual}", self.reason())
            }
            _ => f.write_str(self.reason()),
        }
    }
}

/// Signs the canonical bytes of a graph value.
///
/// The signature covers the canonical bytes themselves, not the hash, so a
/// verifier needs only the graph, the document, and the public key. Neither
/// the graph nor the key is mutated.
///
/// # Errors
///
/// Returns [`SignError::Canonicalize`] if the graph cannot be canonically
/// encoded.
pub fn sign_graph(graph: &Value, signing_key: &SigningKey) -> Result<SignatureDocument, SignError> {
    let payload = canonical_json_bytes(graph)?;
    let signature = signing_key.sign(&payload);

    Ok(SignatureDocument {
        algorithm: SIGNATURE_ALGORITHM.to_string(),
        graph_sha256: ContentHasher::sha256_hex(&payload),
        signature_b64: BASE64.encode(signature.to_bytes()),
    })
}

/// Verifies a signature document against a graph value and public key.
///
/// Stage one recomputes the canonical-bytes hash and compares it to the
/// recorded `graph_sha256`; a mismatch short-circuits without touching the
/// cryptography. Stage two verifies the Ed25519 signature over the
/// canonical bytes.
///
/// # Errors
///
/// Returns an error only for operator problems: canonicalization failure or
/// an unsupported algorithm identifier. Integrity failures are reported in
/// the returned [`VerificationOutcome`].
pub fn verify_graph(
    document: &SignatureDocument,
    graph: &Value,
    verifying_key: &VerifyingKey,
) -> Result<VerificationOutcome, VerifyError> {
    if document.algorithm != SIGNATURE_ALGORITHM {
        return Err(VerifyError::UnsupportedAlgorithm {
            algorithm: document.algorithm.clone(),
        });
    }

    let payload = canonical_json_bytes(graph)?;
    let actual = ContentHasher::sha256_hex(&payload);
    if actual != document.graph_sha256 {
        return Ok(VerificationOutcome::HashMismatch {
            expected: document.graph_sha256.clone(),
            actual,
        });
    }

    let Ok(signature_bytes) = BASE64.decode(&document.signature_b64) else {
        return Ok(VerificationOutcome::SignatureInvalid);
    };
    let Ok(signature) = Signature::from_slice(&signature_bytes) else {
        return Ok(VerificationOutcome::SignatureInvalid);
    };

    match verifying_key.verify_strict(&payload, &signature) {
        Ok(()) => Ok(VerificationOutcome::Verified),
        Err(_) => Ok(VerificationOutcome::SignatureInvalid),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::crypto::keys::Keypair;

    fn test_graph() -> Value {
        json!({
            "nodes": [
                {
                    "id": "n1",
                    "type": "event",
                    "ts": "2026-01-01T00:00:00+00:00",
                    "content_hash": "abc",
                    "metadata": {"agent": "a1", "role": null, "tool_name": null}
                }
            ],
            "edges": []
        })
    }

    #[test]
    fn sign_then_verify_roundtrip() {
        let keypair = Keypair::generate();
        let graph = test_graph();

        let document = sign_graph(&graph, keypair.signing_key()).expect("sign");
        let outcome =
            verify_graph(&document, &graph, &keypair.verifying_key()).expect("verify");

        assert!(outcome.is_verified());
        assert_eq!(outcome.reason(), "signature verified");
    }

    #[test]
    fn document_records_algorithm_and_hash() {
        let keypair = Keypair::generate();
        let graph = test_graph();

        let document = sign_graph(&graph, keypair.signing_key()).expect("sign");
        assert_eq!(document.algorithm, "ed25519");
        assert_eq!(document.graph_sha256.len(), 64);

        let payload = canonical_json_bytes(&graph).expect("canonical");
        assert_eq!(document.graph_sha256, ContentHasher::sha256_hex(&payload));
    }

    #[test]
    fn tampered_graph_fails_with_hash_mismatch() {
        let keypair = Keypair::generate();
        let graph = test_graph();
        let document = sign_graph(&graph, keypair.signing_key()).expect("sign");

        let mut tampered = graph;
        tampered["nodes"][0]["content_hash"] = json!("evil");

        let outcome =
            verify_graph(&document, &tampered, &keypair.verifying_key()).expect("verify");
        assert_eq!(outcome.reason(), "graph hash mismatch");
        assert!(matches!(outcome, VerificationOutcome::HashMismatch { .. }));
    }

    #[test]
    fn injected_unknown_field_fails_with_hash_mismatch() {
        let keypair = Keypair::generate();
        let graph = test_graph();
        let document = sign_graph(&graph, keypair.signing_key()).expect("sign");

        let mut tampered = graph;
        tampered["extra"] = json!("smuggled");

        let outcome =
            verify_graph(&document, &tampered, &keypair.verifying_key()).expect("verify");
        assert!(matches!(outcome, VerificationOutcome::HashMismatch { .. }));
    }

    #[test]
    fn formatting_differences_do_not_affect_verification() {
        let keypair = Keypair::generate();
        let graph = test_graph();
        let document = sign_graph(&graph, keypair.signing_key()).expect("sign");

        // Round-trip through pretty-printed text, as a stored artifact would.
        let pretty = serde_json::to_string_pretty(&graph).expect("pretty");
        let reloaded: Value = serde_json::from_str(&pretty).expect("reload");

        let outcome =
            verify_graph(&document, &reloaded, &keypair.verifying_key()).expect("verify");
        assert!(outcome.is_verified());
    }

    #[test]
    fn wrong_key_fails_with_signature_reason() {
        let signer = Keypair::generate();
        let other = Keypair::generate();
        let graph = test_graph();

        let document = sign_graph(&graph, signer.signing_key()).expect("sign");
        let outcome = verify_graph(&document, &graph, &other.verifying_key()).expect("verify");

        assert_eq!(outcome, VerificationOutcome::SignatureInvalid);
        assert_eq!(outcome.reason(), "signature verification failed");
    }

    #[test]
    fn undecodable_base64_collapses_to_signature_invalid() {
        let keypair = Keypair::generate();
        let graph = test_graph();

        let mut document = sign_graph(&graph, keypair.signing_key()).expect("sign");
        document.signature_b64 = "not-base64!!!".to_string();

        let outcome =
            verify_graph(&document, &graph, &keypair.verifying_key()).expect("verify");
        assert_eq!(outcome, VerificationOutcome::SignatureInvalid);
    }

    #[test]
    fn wrong_length_signature_collapses_to_signature_invalid() {
        let keypair = Keypair::generate();
        let graph = test_graph();

        let mut document = sign_graph(&graph, keypair.signing_key()).expect("sign");
        document.signature_b64 = BASE64.encode([0u8; 16]);

        let outcome =
            verify_graph(&document, &graph, &keypair.verifying_key()).expect("verify");
        assert_eq!(outcome, VerificationOutcome::SignatureInvalid);
    }

    #[test]
    fn flipped_signature_bit_collapses_to_signature_invalid() {
        let keypair = Keypair::generate();
        let graph = test_graph();

        let document = sign_graph(&graph, keypair.signing_key()).expect("sign");
        let mut bytes = BASE64.decode(&document.signature_b64).expect("decode");
        bytes[0] ^= 0xff;
        let tampered = SignatureDocument {
            signature_b64: BASE64.encode(&bytes),
            ..document
        };

        let outcome =
            verify_graph(&tampered, &graph, &keypair.verifying_key()).expect("verify");
        assert_eq!(outcome, VerificationOutcome::SignatureInvalid);
    }

    #[test]
    fn unsupported_algorithm_is_an_error_not_an_outcome() {
        let keypair = Keypair::generate();
        let graph = test_graph();

        let mut document = sign_graph(&graph, keypair.signing_key()).expect("sign");
        document.algorithm = "rsa-pss".to_string();

        let err = verify_graph(&document, &graph, &keypair.verifying_key()).unwrap_err();
        assert!(matches!(err, VerifyError::UnsupportedAlgorithm { .. }));
    }

    #[test]
    fn signing_is_deterministic() {
        // Ed25519 signatures are deterministic for a fixed key and message.
        let keypair = Keypair::generate();
        let graph = test_graph();

        let a = sign_graph(&graph, keypair.signing_key()).expect("sign");
        let b = sign_graph(&graph, keypair.signing_key()).expect("sign");
        assert_eq!(a, b);
    }

    #[test]
    fn document_file_roundtrip() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sig.sig.json");

        let keypair = Keypair::generate();
        let document = sign_graph(&test_graph(), keypair.signing_key()).expect("sign");
        document.write_to(&path, false).expect("write");

        let reloaded = SignatureDocument::from_file(&path).expect("reload");
        assert_eq!(document, reloaded);
    }

    #[test]
    fn document_write_refuses_existing_path_without_overwrite() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sig.sig.json");
        std::fs::write(&path, "occupied").expect("sentinel");

        let keypair = Keypair::generate();
        let document = sign_graph(&test_graph(), keypair.signing_key()).expect("sign");

        let err = document.write_to(&path, false).unwrap_err();
        assert!(matches!(err, SignError::AlreadyExists { .. }));
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "occupied");

        document.write_to(&path, true).expect("overwrite requested");
        assert!(std::fs::read_to_string(&path).expect("read").contains("graph_sha256"));
    }

    #[test]
    fn malformed_document_file_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("sig.sig.json");
        std::fs::write(&path, "{\"algorithm\": \"ed25519\"").expect("write");

        let err = SignatureDocument::from_file(&path).unwrap_err();
        assert!(matches!(err, VerifyError::Malformed { .. }));
    }

    #[test]
    fn document_serializes_with_expected_field_names() {
        let document = SignatureDocument {
            algorithm: SIGNATURE_ALGORITHM.to_string(),
            graph_sha256: "00".repeat(32),
            signature_b64: "AA==".to_string(),
        };
        let json: Value = serde_json::to_value(&document).expect("to_value");
        assert!(json.get("algorithm").is_some());
        assert!(json.get("graph_sha256").is_some());
        assert!(json.get("signature_b64").is_some());
    }
}
