//! Core library for the Signed Integrity Graph (SIG).
//!
//! Ethos records an agent's interaction transcript as a tamper-evident,
//! content-addressed graph and lets a third party cryptographically verify
//! that the graph presented to them is exactly the one originally produced.
//!
//! The pipeline:
//!
//! ```text
//! transcript (JSONL)
//!     │  [`transcript`]
//!     ▼
//! ordered events ──► [`graph::GraphBuilder`] ──► Graph + risk evaluations
//!     │                                            │
//!     │                                            ▼
//!     │                                   [`canonical`] canonical bytes
//!     │                                            │
//!     │                                            ▼
//!     │                                   [`crypto::hash`] SHA-256 digest
//!     │                                            │
//!     └────────────────────────────────────────────┤
//!                                                  ▼
//!                              [`crypto::sign`] sign / verify (Ed25519)
//! ```
//!
//! The integrity guarantee rests on three legs, each deliberately small:
//!
//! - **Canonicalization** ([`canonical`]): semantically equal JSON values
//!   always encode to identical bytes, so the hash is a function of meaning,
//!   not formatting.
//! - **Hashing** ([`crypto::hash`]): SHA-256 over the canonical bytes,
//!   hex-encoded, so independent verifiers in any language agree.
//! - **Signatures** ([`crypto::sign`]): Ed25519 over the canonical bytes
//!   themselves, bound to the recorded hash in a [`crypto::SignatureDocument`].
//!
//! The heuristic risk checks ([`checks`]), aggregation policy ([`policy`]),
//! and YAML configuration ([`config`]) are collaborators of the graph
//! builder; their scores travel in the summary output, never inside the
//! signed graph.

pub mod canonical;
pub mod checks;
pub mod config;
pub mod crypto;
pub mod graph;
pub mod policy;
pub mod transcript;

pub use canonical::{CanonicalizeError, canonical_json_bytes};
pub use checks::{CheckOutcome, HeuristicScorer, Scorer};
pub use config::{ConfigError, EthosConfig, RiskThresholds};
pub use crypto::hash::{ContentHasher, DIGEST_SIZE};
pub use crypto::keys::{KeyError, Keypair};
pub use crypto::sign::{
    SIGNATURE_ALGORITHM, SignError, SignatureDocument, VerificationOutcome, VerifyError,
    sign_graph, verify_graph,
};
pub use graph::{Edge, Graph, GraphBuild, GraphBuilder, GraphError, Node, ToolEvaluation};
pub use policy::{Decision, RiskSummary, ToolDecision, Violation, summarize};
pub use transcript::{Event, TranscriptError, load_transcript};
