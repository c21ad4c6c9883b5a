//! The Signed Integrity Graph structure.
//!
//! A [`Graph`] is the exact unit that gets canonicalized, hashed, and
//! signed: an ordered sequence of nodes, one per transcript event, chained
//! by `"follows"` edges that mirror transcript order exactly. Any
//! semantic-level change to the graph (a field added, removed, or altered
//! anywhere) changes its canonical bytes and therefore its hash.
//!
//! # Invariants
//!
//! - Node ids are unique and strictly increasing in event order (`n1`,
//!   `n2`, ...)
//! - Edges form a simple path: node *k* has exactly one outgoing
//!   `"follows"` edge to node *k+1* for *k < n*; the first node has no
//!   incoming edge; the graph is acyclic and linearly ordered
//! - Every edge endpoint references an id present in the node sequence
//!
//! [`Graph::validate`] checks all of the above.

mod builder;

pub use builder::{BuildError, GraphBuild, GraphBuilder, ToolEvaluation};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::canonical::{CanonicalizeError, canonical_json_bytes};

/// The only edge relation currently defined.
pub const EDGE_RELATION_FOLLOWS: &str = "follows";

/// Errors raised by graph validation and encoding.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum GraphError {
    /// Two nodes share an id.
    #[error("duplicate node id: {id}")]
    DuplicateNodeId {
        /// The repeated id.
        id: String,
    },

    /// The edge count does not match a simple path over the nodes.
    #[error("edge count mismatch: {node_count} nodes require {expected} follows edges, got {actual}")]
    EdgeCountMismatch {
        /// Number of nodes in the graph.
        node_count: usize,
        /// Expected number of edges (`node_count - 1`, or 0 when empty).
        expected: usize,
        /// Actual number of edges.
        actual: usize,
    },

    /// An edge does not link consecutive nodes in sequence order.
    #[error(
        "edge {index} breaks the follows chain: expected {expected_from} -> {expected_to}, \
         got {actual_from} -> {actual_to}"
    )]
    ChainBroken {
        /// 0-based edge index.
        index: usize,
        /// The id the edge should originate from.
        expected_from: String,
        /// The id the edge should point to.
        expected_to: String,
        /// The id the edge actually originates from.
        actual_from: String,
        /// The id the edge actually points to.
        actual_to: String,
    },

    /// An edge carries a relation other than `"follows"`.
    #[error("edge {index} has relation {relation:?}, expected {EDGE_RELATION_FOLLOWS:?}")]
    UnknownRelation {
        /// 0-based edge index.
        index: usize,
        /// The relation found.
        relation: String,
    },

    /// The graph could not be converted to a JSON value.
    #[error("graph serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The graph could not be canonically encoded.
    #[error("graph canonicalization failed: {0}")]
    Canonicalize(#[from] CanonicalizeError),
}

/// Provenance metadata carried by every node.
///
/// Absent fields serialize as JSON `null` rather than being omitted, so the
/// canonical encoding of a node is the same shape for every event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NodeMetadata {
    /// Identifier of the agent whose transcript produced this graph.
    pub agent: String,

    /// The event's role, when present.
    pub role: Option<String>,

    /// The invoked tool, when the event was a tool call.
    pub tool_name: Option<String>,
}

/// One graph node, derived 1:1 from a transcript event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Node {
    /// Sequence-assigned id, `n<index+1>` starting at `n1`.
    pub id: String,

    /// The source event's `type` tag.
    #[serde(rename = "type")]
    pub kind: String,

    /// ISO-8601 timestamp, defaulted at build time when the event had none.
    pub ts: String,

    /// SHA-256 hex digest of the canonical bytes of the source event,
    /// independent of this node's own serialization.
    pub content_hash: String,

    /// Provenance metadata.
    pub metadata: NodeMetadata,
}

/// The ordering relation between two consecutive nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Edge {
    /// Id of the predecessor node.
    pub from: String,

    /// Id of the successor node.
    pub to: String,

    /// Always [`EDGE_RELATION_FOLLOWS`].
    pub relation: String,
}

/// The signed unit: ordered nodes plus ordered edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Graph {
    /// Nodes in transcript order.
    pub nodes: Vec<Node>,

    /// Follows edges in transcript order.
    pub edges: Vec<Edge>,
}

impl Graph {
    /// Converts the graph to a JSON value, the form the sign/verify path
    /// consumes.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Serialize`] if conversion fails.
    pub fn to_value(&self) -> Result<Value, GraphError> {
        Ok(serde_json::to_value(self)?)
    }

    /// The graph's canonical byte encoding.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Serialize`] or [`GraphError::Canonicalize`] on
    /// encoding failure.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, GraphError> {
        let value = self.to_value()?;
        Ok(canonical_json_bytes(&value)?)
    }

    /// Checks the structural invariants: unique ids and a `"follows"` chain
    /// linking consecutive nodes in sequence order.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), GraphError> {
        let mut seen = std::collections::HashSet::with_capacity(self.nodes.len());
        for node in &self.nodes {
            if !seen.insert(node.id.as_str()) {
                return Err(GraphError::DuplicateNodeId {
                    id: node.id.clone(),
                });
            }
        }

        let expected_edges = self.nodes.len().saturating_sub(1);
        if self.edges.len() != expected_edges {
            return Err(GraphError::EdgeCountMismatch {
                node_count: self.nodes.len(),
                expected: expected_edges,
                actual: self.edges.len(),
            });
        }

        for (index, edge) in self.edges.iter().enumerate() {
            if edge.relation != EDGE_RELATION_FOLLOWS {
                return Err(GraphError::UnknownRelation {
                    index,
                    relation: edge.relation.clone(),
                });
            }
            let expected_from = &self.nodes[index].id;
            let expected_to = &self.nodes[index + 1].id;
            if &edge.from != expected_from || &edge.to != expected_to {
                return Err(GraphError::ChainBroken {
                    index,
                    expected_from: expected_from.clone(),
                    expected_to: expected_to.clone(),
                    actual_from: edge.from.clone(),
                    actual_to: edge.to.clone(),
                });
            }
        }

        Ok(())
    }
}
