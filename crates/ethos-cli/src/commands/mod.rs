//! Subcommand implementations.

pub mod check;
pub mod gate;
pub mod init;
pub mod run;
pub mod sign;
pub mod verify;

use std::path::Path;

use anyhow::{Context, Result};
use ethos_core::EthosConfig;
use serde_json::Value;

/// Loads the configuration, falling back to the built-in defaults when the
/// file does not exist.
pub(crate) fn load_config_or_default(path: &Path) -> Result<EthosConfig> {
    if path.exists() {
        EthosConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))
    } else {
        Ok(EthosConfig::default())
    }
}

/// Reads a JSON file into a raw value.
pub(crate) fn read_json_value(path: &Path) -> Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid JSON in {}", path.display()))
}

/// Renders a transcript as the newline-joined compact JSON of its events,
/// the text form the transcript-level checks score.
pub(crate) fn transcript_text(events: &[ethos_core::Event]) -> Result<String> {
    let lines: Result<Vec<String>, _> = events
        .iter()
        .map(|event| serde_json::to_string(&event.as_value()))
        .collect();
    Ok(lines.context("failed to serialize transcript events")?.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let config =
            load_config_or_default(Path::new("/nonexistent/ethos.yaml")).expect("defaults");
        assert_eq!(config, EthosConfig::default());
    }

    #[test]
    fn unreadable_json_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{").expect("write");
        assert!(read_json_value(&path).is_err());
    }
}
