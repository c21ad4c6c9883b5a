//! Transcript-level risk checks.

use std::path::Path;

use anyhow::{Context, Result};
use ethos_core::checks::{HeuristicScorer, Scorer};
use ethos_core::{load_transcript, summarize};

use super::{load_config_or_default, transcript_text};

/// Runs the checks over the whole transcript and prints the JSON summary.
pub fn run(config_path: &Path, file: &Path) -> Result<()> {
    let config = load_config_or_default(config_path)?;
    let events = load_transcript(file)?;

    let scorer = HeuristicScorer {
        require_uncertainty: config.require_uncertainty,
    };
    let checks = scorer.score(&transcript_text(&events)?);
    let summary = summarize(&checks, None, config.risk_thresholds.overall_deny);

    println!(
        "{}",
        serde_json::to_string_pretty(&summary).context("failed to render summary")?
    );
    Ok(())
}
