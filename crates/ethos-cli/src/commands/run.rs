//! Build the SIG graph and summary for a transcript.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::Utc;
use ethos_core::checks::HeuristicScorer;
use ethos_core::{GraphBuilder, load_transcript, summarize};

use super::load_config_or_default;

/// Name of the graph artifact written into the output directory.
pub const GRAPH_FILE: &str = "sig.graph.json";

/// Name of the summary artifact written into the output directory.
pub const SUMMARY_FILE: &str = "sig.summary.json";

/// Builds the graph for a transcript and writes the graph and summary
/// artifacts.
pub fn run(config_path: &Path, agent: &str, input: &Path, out_dir: &Path) -> Result<()> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory {}", out_dir.display()))?;

    let config = load_config_or_default(config_path)?;
    let deny_threshold = config.risk_thresholds.overall_deny;
    let events = load_transcript(input)?;

    let scorer = HeuristicScorer {
        require_uncertainty: config.require_uncertainty,
    };
    let builder = GraphBuilder::new(agent, Utc::now());
    let built = builder.build(&events, &scorer, deny_threshold)?;
    built.graph.validate().context("built graph violates chain invariants")?;

    let mut summary = summarize(&built.transcript_checks, None, deny_threshold);
    summary.tool_decisions = built
        .tool_evaluations
        .into_iter()
        .map(|evaluation| evaluation.decision)
        .collect();

    let graph_path = out_dir.join(GRAPH_FILE);
    let summary_path = out_dir.join(SUMMARY_FILE);

    let graph_value = built.graph.to_value()?;
    std::fs::write(
        &graph_path,
        serde_json::to_string_pretty(&graph_value).context("failed to render graph")?,
    )
    .with_context(|| format!("failed to write {}", graph_path.display()))?;
    std::fs::write(
        &summary_path,
        serde_json::to_string_pretty(&summary).context("failed to render summary")?,
    )
    .with_context(|| format!("failed to write {}", summary_path.display()))?;

    println!("Wrote {} and {}", graph_path.display(), summary_path.display());
    Ok(())
}
