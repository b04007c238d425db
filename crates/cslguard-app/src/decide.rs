//! The `decide` use case: evaluate a decision context against the active
//! rule set.

use cslguard_domain::guardian::{evaluate, Scope};
use cslguard_domain::model::{DecisionContext, RuleSet};
use cslguard_types::{Outcome, Verdict};
use time::OffsetDateTime;

/// Input for the decide use case.
#[derive(Clone, Debug)]
pub struct DecideInput<'a> {
    pub ruleset: &'a RuleSet,
    pub scope: Scope,
    pub context: DecisionContext,
}

/// Evaluate and stamp the verdict with the current time.
pub fn run_decide(input: DecideInput<'_>) -> Verdict {
    evaluate(
        input.ruleset,
        &input.scope,
        &input.context,
        OffsetDateTime::now_utc(),
    )
}

/// Parse the CLI scope argument: `all`, or a policy name.
pub fn parse_scope(value: &str) -> Scope {
    match value {
        "all" => Scope::All,
        name => Scope::Policy(name.to_string()),
    }
}

/// Map outcome to exit code: 0 = approved/repaired, 2 = rejected,
/// 3 = escalate.
pub fn outcome_exit_code(outcome: Outcome) -> i32 {
    match outcome {
        Outcome::Approved => 0,
        Outcome::Repaired => 0,
        Outcome::Rejected => 2,
        Outcome::Escalate => 3,
    }
}
