//! Heuristic text-risk checks.
//!
//! The graph builder treats scoring as a pluggable capability behind the
//! [`Scorer`] trait: any implementation maps text to a list of
//! `(name, score, explanation)` outcomes with scores in `[0, 1]`. The
//! built-in [`HeuristicScorer`] runs a closed set of keyword/regex checks:
//!
//! - **overconfidence**: certainty language without evidence markers
//! - **`sensitive_data`**: email, phone number, and SSN patterns
//! - **manipulation**: coercive or manipulative phrasing
//!
//! These are deliberately shallow heuristics. They carry no integrity
//! weight: scores travel in the summary output, never inside the signed
//! graph.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Certainty phrases matched (case-insensitively) by the overconfidence
/// check.
const CERTAINTY_PHRASES: &[&str] = &[
    "definitely",
    "certainly",
    "guaranteed",
    "always",
    "without a doubt",
    "undeniably",
    "100%",
];

/// Markers suggesting claims are backed by evidence or citations.
const EVIDENCE_MARKERS: &[&str] = &[
    "according to",
    "evidence",
    "source",
    "citation",
    "http://",
    "https://",
    "[",
    "]",
];

/// Coercive phrases matched by the manipulation check.
const COERCIVE_PHRASES: &[&str] = &[
    "you must obey",
    "or else",
    "don't tell anyone",
    "keep this secret",
    "you have no choice",
    "immediately comply",
    "only a fool would refuse",
];

/// Named patterns for the sensitive-data check.
static SENSITIVE_PATTERNS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    [
        ("email", r"\b[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[A-Za-z]{2,}\b"),
        (
            "phone",
            r"\b(?:\+?1[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}\b",
        ),
        ("ssn", r"\b\d{3}-\d{2}-\d{4}\b"),
    ]
    .iter()
    .map(|(name, pattern)| {
        (
            *name,
            Regex::new(pattern).expect("sensitive-data pattern is valid"),
        )
    })
    .collect()
});

/// One check's result: a name, a score in `[0, 1]`, and an explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckOutcome {
    /// The check's identifier.
    pub name: String,

    /// Risk score in `[0, 1]`.
    pub score: f64,

    /// Human-readable explanation of the score.
    pub explanation: String,
}

impl CheckOutcome {
    fn new(name: &str, score: f64, explanation: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            score,
            explanation: explanation.into(),
        }
    }
}

/// A pluggable text scorer.
///
/// The contract is on the output shape only: each outcome's score lies in
/// `[0, 1]`. Implementations must be pure with respect to their input text.
pub trait Scorer {
    /// Scores a piece of text.
    fn score(&self, text: &str) -> Vec<CheckOutcome>;
}

/// The built-in keyword/regex scorer.
#[derive(Debug, Clone, Copy)]
pub struct HeuristicScorer {
    /// When false the overconfidence check is disabled and scores 0.
    pub require_uncertainty: bool,
}

impl Default for HeuristicScorer {
    fn default() -> Self {
        Self {
            require_uncertainty: true,
        }
    }
}

impl Scorer for HeuristicScorer {
    fn score(&self, text: &str) -> Vec<CheckOutcome> {
        vec![
            overconfidence_check(text, self.require_uncertainty),
            sensitive_data_check(text),
            manipulation_check(text),
        ]
    }
}

/// Clamps a score into `[0, 1]`.
fn clip(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Scores certainty language unaccompanied by evidence markers.
#[must_use]
pub fn overconfidence_check(text: &str, require_uncertainty: bool) -> CheckOutcome {
    const NAME: &str = "overconfidence";

    if !require_uncertainty {
        return CheckOutcome::new(NAME, 0.0, "Uncertainty requirement disabled.");
    }

    let lowered = text.to_lowercase();
    let certainty_hits = CERTAINTY_PHRASES
        .iter()
        .filter(|phrase| lowered.contains(*phrase))
        .count();
    let has_evidence = EVIDENCE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker));

    if certainty_hits == 0 {
        return CheckOutcome::new(NAME, 0.0, "No overconfident certainty phrases detected.");
    }

    #[allow(clippy::cast_precision_loss)]
    let mut score = 0.7 + (certainty_hits as f64 * 0.1).min(0.3);
    if has_evidence {
        score -= 0.4;
    }

    let explanation = if has_evidence {
        "Certainty language found, but evidence markers/citations are present."
    } else {
        "Certainty language found without evidence words or citations."
    };
    CheckOutcome::new(NAME, clip(score), explanation)
}

/// Scores email, phone-number, and SSN patterns in the text.
#[must_use]
pub fn sensitive_data_check(text: &str) -> CheckOutcome {
    const NAME: &str = "sensitive_data";

    let mut total_hits = 0;
    let mut kinds = Vec::new();
    for (kind, pattern) in SENSITIVE_PATTERNS.iter() {
        let hits = pattern.find_iter(text).count();
        if hits > 0 {
            kinds.push(*kind);
            total_hits += hits;
        }
    }

    if total_hits == 0 {
        return CheckOutcome::new(NAME, 0.0, "No email, phone number, or SSN patterns found.");
    }

    #[allow(clippy::cast_precision_loss)]
    let score = clip((0.35 + total_hits as f64 * 0.25).min(1.0));
    CheckOutcome::new(
        NAME,
        score,
        format!("Detected sensitive data patterns: {}.", kinds.join(", ")),
    )
}

/// Scores coercive or manipulative phrasing.
#[must_use]
pub fn manipulation_check(text: &str) -> CheckOutcome {
    const NAME: &str = "manipulation";

    let lowered = text.to_lowercase();
    let hits: Vec<&str> = COERCIVE_PHRASES
        .iter()
        .filter(|phrase| lowered.contains(*phrase))
        .copied()
        .collect();

    if hits.is_empty() {
        return CheckOutcome::new(NAME, 0.0, "No manipulative/coercive language detected.");
    }

    #[allow(clippy::cast_precision_loss)]
    let score = clip(0.4 + hits.len() as f64 * 0.2);
    CheckOutcome::new(
        NAME,
        score,
        format!("Detected coercive patterns: {}.", hits.join(", ")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_text_scores_zero_everywhere() {
        let scorer = HeuristicScorer::default();
        let outcomes = scorer.score("The weather might improve tomorrow.");
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.score == 0.0));
    }

    #[test]
    fn certainty_without_evidence_scores_high() {
        let outcome = overconfidence_check("This is definitely the answer.", true);
        assert!(outcome.score >= 0.7);
        assert_eq!(outcome.name, "overconfidence");
    }

    #[test]
    fn evidence_markers_reduce_overconfidence() {
        let bare = overconfidence_check("This is definitely correct.", true);
        let cited = overconfidence_check(
            "This is definitely correct, according to https://example.com.",
            true,
        );
        assert!(cited.score < bare.score);
    }

    #[test]
    fn multiple_certainty_phrases_accumulate_up_to_cap() {
        let one = overconfidence_check("definitely true", true);
        let many = overconfidence_check(
            "definitely, certainly, guaranteed, always, undeniably, 100% true",
            true,
        );
        assert!(many.score > one.score);
        assert!(many.score <= 1.0);
    }

    #[test]
    fn disabled_uncertainty_requirement_silences_the_check() {
        let outcome = overconfidence_check("definitely certainly guaranteed", false);
        assert_eq!(outcome.score, 0.0);
    }

    #[test]
    fn detects_email_addresses() {
        let outcome = sensitive_data_check("contact alice@example.com please");
        assert!(outcome.score > 0.0);
        assert!(outcome.explanation.contains("email"));
    }

    #[test]
    fn detects_phone_numbers() {
        let outcome = sensitive_data_check("call 555-123-4567 now");
        assert!(outcome.score > 0.0);
        assert!(outcome.explanation.contains("phone"));
    }

    #[test]
    fn detects_ssn_patterns() {
        let outcome = sensitive_data_check("ssn is 123-45-6789");
        assert!(outcome.score > 0.0);
        assert!(outcome.explanation.contains("ssn"));
    }

    #[test]
    fn sensitive_score_saturates_at_one() {
        let outcome = sensitive_data_check(
            "a@b.co c@d.co e@f.co g@h.co 123-45-6789 555-123-4567 888-555-1212",
        );
        assert!(outcome.score <= 1.0);
    }

    #[test]
    fn detects_coercive_phrases_case_insensitively() {
        let outcome = manipulation_check("You MUST OBEY and keep this secret.");
        assert!(outcome.score > 0.0);
        assert!(outcome.explanation.contains("you must obey"));
        assert!(outcome.explanation.contains("keep this secret"));
    }

    #[test]
    fn coercive_hits_accumulate() {
        let one = manipulation_check("or else");
        let two = manipulation_check("or else you have no choice");
        assert!(two.score > one.score);
    }

    #[test]
    fn all_scores_stay_in_unit_interval() {
        let scorer = HeuristicScorer::default();
        let hostile = "definitely certainly guaranteed always undeniably 100% \
                       you must obey or else don't tell anyone keep this secret \
                       a@b.com 123-45-6789";
        for outcome in scorer.score(hostile) {
            assert!((0.0..=1.0).contains(&outcome.score), "{outcome:?}");
        }
    }
}
