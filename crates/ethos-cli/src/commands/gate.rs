//! Single tool-payload evaluation.

use std::path::Path;

use anyhow::{Context, Result};
use ethos_core::checks::{HeuristicScorer, Scorer};
use ethos_core::{EthosConfig, RiskSummary, summarize};

use super::{load_config_or_default, read_json_value};

/// Scores one tool payload and prints the summary with its allow/deny
/// decision.
pub fn run(config_path: &Path, tool: &str, payload_path: &Path) -> Result<()> {
    let config = load_config_or_default(config_path)?;
    let payload = read_json_value(payload_path)?;
    let payload_text =
        serde_json::to_string(&payload).context("failed to serialize payload")?;

    let summary = evaluate(&config, tool, &payload_text);
    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to render summary")?
    );
    Ok(())
}

/// Evaluates one payload for one tool.
///
/// A tool whose configured policy unconditionally denies is denied
/// regardless of the payload's risk score.
fn evaluate(config: &EthosConfig, tool: &str, payload_text: &str) -> RiskSummary {
    let scorer = HeuristicScorer {
        require_uncertainty: config.require_uncertainty,
    };
    let checks = scorer.score(payload_text);
    let mut summary = summarize(&checks, Some(tool), config.risk_thresholds.overall_deny);
    if let Some(decision) = config.static_tool_decision(tool) {
        for tool_decision in &mut summary.tool_decisions {
            tool_decision.decision = decision;
            tool_decision.reason = format!("tool policy denies {tool}");
        }
    }
    summary
}
