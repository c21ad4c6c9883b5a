//! Graph construction from an ordered transcript.

use chrono::{DateTime, Utc};
use serde_json::Value;
use thiserror::Error;

use super::{EDGE_RELATION_FOLLOWS, Edge, Graph, Node, NodeMetadata};
use crate::canonical::{CanonicalizeError, canonical_json_bytes};
use crate::checks::{CheckOutcome, Scorer};
use crate::crypto::hash::ContentHasher;
use crate::policy::{ToolDecision, decide_tool};
use crate::transcript::Event;

/// Errors that can occur during graph construction.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// An event could not be canonically encoded for hashing.
    #[error("event {index} canonicalization failed: {source}")]
    Canonicalize {
        /// 0-based event index.
        index: usize,
        /// The underlying canonicalization error.
        #[source]
        source: CanonicalizeError,
    },

    /// An event could not be rendered as text for scoring.
    #[error("event {index} serialization failed: {source}")]
    Serialize {
        /// 0-based event index.
        index: usize,
        /// The underlying serialization error.
        #[source]
        source: serde_json::Error,
    },
}

/// The risk evaluation of one tool-call event.
///
/// Computed over the event's `payload` alone, independent of the decision
/// over the full transcript.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolEvaluation {
    /// 0-based index of the tool-call event in the transcript.
    pub event_index: usize,

    /// The invoked tool, `"unknown"` when the event named none.
    pub tool_name: String,

    /// Check outcomes over the payload text.
    pub checks: Vec<CheckOutcome>,

    /// The allow/deny decision for this invocation.
    pub decision: ToolDecision,
}

/// The builder's output: the graph plus the risk-check outcomes that travel
/// in the summary (never inside the signed graph).
#[derive(Debug, Clone)]
pub struct GraphBuild {
    /// The hash-linked graph.
    pub graph: Graph,

    /// Check outcomes over the full transcript text.
    pub transcript_checks: Vec<CheckOutcome>,

    /// One evaluation per tool-call event, in transcript order.
    pub tool_evaluations: Vec<ToolEvaluation>,
}

/// Builds a Signed Integrity Graph from an ordered transcript.
///
/// Node ids are assigned sequentially from `n1` in input order; each event
/// is individually canonicalized and hashed for its node's `content_hash`;
/// consecutive nodes are chained with `"follows"` edges.
///
/// The timestamp used when an event omits `ts` is injected at construction
/// time rather than read from the wall clock internally, so a caller that
/// pins `default_ts` gets reproducible digests for the same input. Events
/// with omitted timestamps still make repeated CLI runs non-reproducible,
/// since the CLI injects the current time; supplying `ts` on every event
/// avoids this.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    agent_id: String,
    default_ts: DateTime<Utc>,
}

impl GraphBuilder {
    /// Creates a builder for the given agent with an injected fallback
    /// timestamp.
    pub fn new(agent_id: impl Into<String>, default_ts: DateTime<Utc>) -> Self {
        Self {
            agent_id: agent_id.into(),
            default_ts,
        }
    }

    /// Builds the graph and runs the scorer over the transcript and each
    /// tool-call payload.
    ///
    /// `deny_threshold` drives the per-tool allow/deny decisions.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError`] if an event cannot be encoded for hashing or
    /// scoring.
    pub fn build<S: Scorer>(
        &self,
        events: &[Event],
        scorer: &S,
        deny_threshold: f64,
    ) -> Result<GraphBuild, BuildError> {
        let mut nodes = Vec::with_capacity(events.len());
        let mut edges = Vec::with_capacity(events.len().saturating_sub(1));
        let mut transcript_lines = Vec::with_capacity(events.len());
        let mut tool_evaluations = Vec::new();

        let mut previous_id: Option<String> = None;
        for (index, event) in events.iter().enumerate() {
            let value = event.as_value();
            let canonical =
                canonical_json_bytes(&value).map_err(|source| BuildError::Canonicalize {
                    index,
                    source,
                })?;

            let id = format!("n{}", index + 1);
            nodes.push(Node {
                id: id.clone(),
                kind: event.kind().to_string(),
                ts: event
                    .ts()
                    .map_or_else(|| self.default_ts.to_rfc3339(), str::to_string),
                content_hash: ContentHasher::sha256_hex(&canonical),
                metadata: NodeMetadata {
                    agent: self.agent_id.clone(),
                    role: event.role().map(str::to_string),
                    tool_name: event.tool_name().map(str::to_string),
                },
            });

            if let Some(previous) = previous_id.take() {
                edges.push(Edge {
                    from: previous,
                    to: id.clone(),
                    relation: EDGE_RELATION_FOLLOWS.to_string(),
                });
            }
            previous_id = Some(id);

            transcript_lines.push(
                serde_json::to_string(&value).map_err(|source| BuildError::Serialize {
                    index,
                    source,
                })?,
            );

            if event.is_tool_call() {
                let payload = event.payload().cloned().unwrap_or(Value::Object(
                    serde_json::Map::new(),
                ));
                let payload_text =
                    serde_json::to_string(&payload).map_err(|source| BuildError::Serialize {
                        index,
                        source,
                    })?;
                let tool_name = event.tool_name().unwrap_or("unknown").to_string();
                let checks = scorer.score(&payload_text);
                let decision = decide_tool(&tool_name, &checks, deny_threshold);
                tool_evaluations.push(ToolEvaluation {
                    event_index: index,
                    tool_name,
                    checks,
                    decision,
                });
            }
        }

        let transcript_checks = scorer.score(&transcript_lines.join("\n"));

        tracing::debug!(
            agent = %self.agent_id,
            events = events.len(),
            tool_calls = tool_evaluations.len(),
            "built integrity graph"
        );

        Ok(GraphBuild {
            graph: Graph { nodes, edges },
            transcript_checks,
            tool_evaluations,
        })
    }
}
