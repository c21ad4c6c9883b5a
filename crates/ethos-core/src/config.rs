//! Configuration parsing and management.
//!
//! Ethos configuration lives in a YAML file (`ethos.yaml` by convention)
//! declaring the principles being enforced, the risk thresholds, and the
//! tool policies. The core never reads configuration ambiently: callers
//! load an [`EthosConfig`] and pass the relevant values into each
//! operation explicitly.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::policy::Decision;

/// Errors that can occur while loading or writing configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("config I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML could not be parsed.
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The destination exists and overwriting was not requested.
    #[error("refusing to overwrite existing config file: {path}")]
    AlreadyExists {
        /// The pre-occupied destination path.
        path: String,
    },
}

/// A named principle the configuration enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principle {
    /// Short name.
    pub name: String,
    /// What the principle requires.
    pub description: String,
}

/// Risk thresholds driving the decision layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskThresholds {
    /// Overall score at or above which tool invocations are denied.
    #[serde(default = "default_overall_deny")]
    pub overall_deny: f64,

    /// Overall score at or above which escalation rules fire.
    #[serde(default = "default_overall_escalate")]
    pub overall_escalate: f64,

    /// Per-check attention threshold for the overconfidence check.
    #[serde(default = "default_check_threshold")]
    pub overconfidence: f64,

    /// Per-check attention threshold for the sensitive-data check.
    #[serde(default = "default_check_threshold")]
    pub sensitive_data: f64,

    /// Per-check attention threshold for the manipulation check.
    #[serde(default = "default_check_threshold")]
    pub manipulation: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            overall_deny: default_overall_deny(),
            overall_escalate: default_overall_escalate(),
            overconfidence: default_check_threshold(),
            sensitive_data: default_check_threshold(),
            manipulation: default_check_threshold(),
        }
    }
}

/// An escalation rule evaluated by the calling orchestration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EscalationRule {
    /// Rule name.
    pub name: String,
    /// Condition expression, interpreted by the orchestration layer.
    pub when: String,
    /// Action taken when the condition holds.
    pub action: String,
}

/// A per-tool policy entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolPolicy {
    /// The tool the policy applies to.
    pub tool_name: String,
    /// Whether the tool may run at all.
    pub allow: bool,
    /// Condition under which the allowance holds.
    pub conditions: String,
}

/// Top-level ethos configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EthosConfig {
    /// The principles being enforced.
    #[serde(default)]
    pub principles: Vec<Principle>,

    /// Whether the overconfidence check is active.
    #[serde(default = "default_require_uncertainty")]
    pub require_uncertainty: bool,

    /// Risk thresholds.
    #[serde(default)]
    pub risk_thresholds: RiskThresholds,

    /// Escalation rules.
    #[serde(default)]
    pub escalation: Vec<EscalationRule>,

    /// Per-tool policies.
    #[serde(default)]
    pub tool_policies: Vec<ToolPolicy>,
}

impl Default for EthosConfig {
    fn default() -> Self {
        Self {
            principles: vec![
                Principle {
                    name: "Evidence-based claims".to_string(),
                    description: "Avoid certainty when evidence or citations are absent."
                        .to_string(),
                },
                Principle {
                    name: "Privacy preservation".to_string(),
                    description: "Detect and prevent sensitive data leakage.".to_string(),
                },
                Principle {
                    name: "Non-manipulation".to_string(),
                    description: "Disallow coercive or manipulative language.".to_string(),
                },
            ],
            require_uncertainty: true,
            risk_thresholds: RiskThresholds::default(),
            escalation: vec![EscalationRule {
                name: "high_overall_risk".to_string(),
                when: "overall_risk_score >= overall_escalate".to_string(),
                action: "require_human_approval".to_string(),
            }],
            tool_policies: vec![
                ToolPolicy {
                    tool_name: "shell".to_string(),
                    allow: true,
                    conditions: "overall_risk_score < overall_deny".to_string(),
                },
                ToolPolicy {
                    tool_name: "web_search".to_string(),
                    allow: true,
                    conditions: "overall_risk_score < overall_deny".to_string(),
                },
                ToolPolicy {
                    tool_name: "delete_files".to_string(),
                    allow: false,
                    conditions: "always".to_string(),
                },
            ],
        }
    }
}

impl EthosConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Serializes configuration to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Writes the default configuration document to `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::AlreadyExists`] when the destination exists.
    pub fn write_default(path: &Path) -> Result<(), ConfigError> {
        if path.exists() {
            return Err(ConfigError::AlreadyExists {
                path: path.display().to_string(),
            });
        }
        std::fs::write(path, Self::default().to_yaml()?)?;
        Ok(())
    }

    /// Looks up the per-tool allowance for `tool_name`, if configured.
    #[must_use]
    pub fn tool_policy(&self, tool_name: &str) -> Option<&ToolPolicy> {
        self.tool_policies
            .iter()
            .find(|p| p.tool_name == tool_name)
    }

    /// The static decision for a tool whose policy unconditionally denies.
    #[must_use]
    pub fn static_tool_decision(&self, tool_name: &str) -> Option<Decision> {
        self.tool_policy(tool_name).and_then(|p| {
            if p.allow {
                None
            } else {
                Some(Decision::Deny)
            }
        })
    }
}

const fn default_require_uncertainty() -> bool {
    true
}

const fn default_overall_deny() -> f64 {
    0.8
}

const fn default_overall_escalate() -> f64 {
    0.6
}

const fn default_check_threshold() -> f64 {
    0.5
}
