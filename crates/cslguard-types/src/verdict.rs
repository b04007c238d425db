use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Outcome of a Guardian evaluation.
///
/// Variants are declared from least to most conservative so that `Ord` gives
/// "most conservative wins" directly: `Rejected > Escalate > Repaired >
/// Approved`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Approved,
    Repaired,
    Escalate,
    Rejected,
}

impl Outcome {
    /// Terminal outcomes stop rule evaluation within the triggering policy.
    pub fn is_terminal(self) -> bool {
        matches!(self, Outcome::Escalate | Outcome::Rejected)
    }
}

/// Reference to a rule that fired during evaluation, with its message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TriggeredRule {
    pub policy: String,
    pub rule: String,
    pub message: String,
    pub outcome: Outcome,
}

/// The output contract shared with collaborators.
///
/// Produced once per evaluation call; owned by the caller after return.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub outcome: Outcome,
    pub triggered_rules: Vec<TriggeredRule>,
    pub rationale: Vec<String>,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_most_conservative_last() {
        assert!(Outcome::Rejected > Outcome::Escalate);
        assert!(Outcome::Escalate > Outcome::Repaired);
        assert!(Outcome::Repaired > Outcome::Approved);
    }

    #[test]
    fn terminal_outcomes() {
        assert!(Outcome::Rejected.is_terminal());
        assert!(Outcome::Escalate.is_terminal());
        assert!(!Outcome::Repaired.is_terminal());
        assert!(!Outcome::Approved.is_terminal());
    }

    #[test]
    fn verdict_serializes_outcome_lowercase() {
        let verdict = Verdict {
            outcome: Outcome::Escalate,
            triggered_rules: Vec::new(),
            rationale: vec!["needs review".to_string()],
            evaluated_at: time::macros::datetime!(2026-01-01 00:00:00 UTC),
        };
        let json = serde_json::to_string(&verdict).expect("serialize");
        assert!(json.contains("\"outcome\":\"escalate\""));
    }
}
