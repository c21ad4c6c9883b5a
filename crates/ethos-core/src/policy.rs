//! Risk aggregation and allow/deny decisions.
//!
//! This layer turns raw check outcomes into a [`RiskSummary`]: an overall
//! score, the list of violations, and per-tool allow/deny decisions against
//! an explicit threshold. Thresholds are always passed in by the caller —
//! there is no ambient configuration state, so every function here is pure
//! and independently testable.

use serde::{Deserialize, Serialize};

use crate::checks::CheckOutcome;

/// An allow/deny decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// Allow the action.
    Allow,
    /// Deny the action.
    #[default]
    Deny,
}

/// A check outcome that contributed risk (score above zero).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The check's identifier.
    pub name: String,
    /// The check's score.
    pub score: f64,
    /// The check's explanation.
    pub explanation: String,
}

/// An allow/deny decision for one tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDecision {
    /// The tool the decision applies to.
    pub tool_name: String,
    /// The decision.
    pub decision: Decision,
    /// Why: the score and threshold that produced the decision.
    pub reason: String,
}

/// Aggregated risk over a set of check outcomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Mean check score, rounded to 4 decimals. Zero for an empty set.
    pub overall_risk_score: f64,
    /// Outcomes with score above zero.
    pub violations: Vec<Violation>,
    /// Tool decisions, when a tool was being evaluated.
    pub tool_decisions: Vec<ToolDecision>,
}

/// Mean of the check scores, 0.0 for an empty slice.
fn overall_score(checks: &[CheckOutcome]) -> f64 {
    if checks.is_empty() {
        return 0.0;
    }
    #[allow(clippy::cast_precision_loss)]
    let mean = checks.iter().map(|c| c.score).sum::<f64>() / checks.len() as f64;
    mean
}

/// Rounds to 4 decimal places for stable summary output.
fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Decides whether one tool invocation is allowed.
///
/// Denies when the overall risk score over `checks` reaches
/// `deny_threshold`.
#[must_use]
pub fn decide_tool(tool_name: &str, checks: &[CheckOutcome], deny_threshold: f64) -> ToolDecision {
    let overall = overall_score(checks);
    let decision = if overall >= deny_threshold {
        Decision::Deny
    } else {
        Decision::Allow
    };
    ToolDecision {
        tool_name: tool_name.to_string(),
        decision,
        reason: format!("overall_risk_score={overall:.2} threshold={deny_threshold:.2}"),
    }
}

/// Aggregates check outcomes into a [`RiskSummary`].
///
/// When `tool_name` is supplied the summary carries one decision for that
/// tool against `deny_threshold`.
#[must_use]
pub fn summarize(
    checks: &[CheckOutcome],
    tool_name: Option<&str>,
    deny_threshold: f64,
) -> RiskSummary {
    let violations = checks
        .iter()
        .filter(|c| c.score > 0.0)
        .map(|c| Violation {
            name: c.name.clone(),
            score: c.score,
            explanation: c.explanation.clone(),
        })
        .collect();

    let tool_decisions = tool_name
        .map(|name| vec![decide_tool(name, checks, deny_threshold)])
        .unwrap_or_default();

    RiskSummary {
        overall_risk_score: round4(overall_score(checks)),
        violations,
        tool_decisions,
    }
}
