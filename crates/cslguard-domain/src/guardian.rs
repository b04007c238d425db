//! Decision-time evaluation.
//!
//! `evaluate` is a pure function of (rule set, scope, context, timestamp):
//! no IO, no internal state, no locking. Missing or malformed context data
//! never raises; it maps to an Escalate outcome, because silently skipping
//! a safety check on missing data is the unsafe direction.

use crate::model::{action_outcome, DecisionContext, Policy, RuleSet, Value};
use cslguard_syntax::{CmpOp, Expr};
use cslguard_types::{Outcome, TriggeredRule, Verdict};
use thiserror::Error;
use time::OffsetDateTime;

/// Caller-supplied narrowing of the rule set for one evaluation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Scope {
    All,
    Policy(String),
}

/// A gap encountered while evaluating a condition. Not an error to the
/// caller: every gap maps deterministically to an Escalate outcome.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum EvalGap {
    #[error("condition references variable `{0}` missing from the decision context")]
    MissingVariable(String),
    #[error("cannot compare {lhs} and {rhs} with `{op}`")]
    TypeMismatch {
        op: &'static str,
        lhs: &'static str,
        rhs: &'static str,
    },
    #[error("condition did not evaluate to a boolean")]
    NotBoolean,
}

/// Evaluate a decision context against the scoped rule set.
///
/// Within a policy, rules run in effective order; Rejected and Escalate
/// triggers short-circuit the rest of that policy, Repair and informational
/// triggers accumulate. Across the scope the most conservative outcome
/// wins: Rejected > Escalate > Repaired > Approved.
pub fn evaluate(
    ruleset: &RuleSet,
    scope: &Scope,
    ctx: &DecisionContext,
    evaluated_at: OffsetDateTime,
) -> Verdict {
    let selected: Vec<&Policy> = match scope {
        Scope::All => ruleset.policies.values().collect(),
        Scope::Policy(name) => match ruleset.policy(name) {
            Some(policy) => vec![policy],
            None => {
                return Verdict {
                    outcome: Outcome::Escalate,
                    triggered_rules: Vec::new(),
                    rationale: vec![format!(
                        "no policy named `{name}` in the active rule set; escalating for review"
                    )],
                    evaluated_at,
                };
            }
        },
    };

    let mut triggered: Vec<TriggeredRule> = Vec::new();
    let mut rationale: Vec<String> = Vec::new();

    for policy in selected {
        for rule in &policy.rules {
            match eval_condition(&rule.condition, ctx) {
                Ok(false) => {}
                Ok(true) => {
                    let outcome = action_outcome(rule.action);
                    rationale.push(format!(
                        "rule `{}.{}`: {}",
                        policy.name, rule.name, rule.message
                    ));
                    triggered.push(TriggeredRule {
                        policy: policy.name.clone(),
                        rule: rule.name.clone(),
                        message: rule.message.clone(),
                        outcome,
                    });
                    if outcome.is_terminal() {
                        break;
                    }
                }
                Err(gap) => {
                    rationale.push(format!(
                        "rule `{}.{}` escalated: {gap}",
                        policy.name, rule.name
                    ));
                    triggered.push(TriggeredRule {
                        policy: policy.name.clone(),
                        rule: rule.name.clone(),
                        message: rule.message.clone(),
                        outcome: Outcome::Escalate,
                    });
                    break;
                }
            }
        }
    }

    let outcome = triggered
        .iter()
        .map(|t| t.outcome)
        .max()
        .unwrap_or(Outcome::Approved);

    if triggered.is_empty() {
        rationale.push("no applicable constraints fired".to_string());
    }

    Verdict {
        outcome,
        triggered_rules: triggered,
        rationale,
        evaluated_at,
    }
}

/// Evaluate a condition to a boolean against the context.
pub fn eval_condition(expr: &Expr, ctx: &DecisionContext) -> Result<bool, EvalGap> {
    match eval_value(expr, ctx)? {
        Value::Bool(b) => Ok(b),
        _ => Err(EvalGap::NotBoolean),
    }
}

/// Recursive descent over the expression tree.
///
/// `and`/`or` evaluate both operands: a gap on either side must surface
/// rather than hide behind a short-circuit.
fn eval_value(expr: &Expr, ctx: &DecisionContext) -> Result<Value, EvalGap> {
    match expr {
        Expr::Literal(lit) => Ok(Value::from(lit)),
        Expr::Var(name) => ctx
            .get(name)
            .cloned()
            .ok_or_else(|| EvalGap::MissingVariable(name.clone())),
        Expr::Not(inner) => match eval_value(inner, ctx)? {
            Value::Bool(b) => Ok(Value::Bool(!b)),
            _ => Err(EvalGap::NotBoolean),
        },
        Expr::And(l, r) => {
            let lhs = eval_bool(l, ctx)?;
            let rhs = eval_bool(r, ctx)?;
            Ok(Value::Bool(lhs && rhs))
        }
        Expr::Or(l, r) => {
            let lhs = eval_bool(l, ctx)?;
            let rhs = eval_bool(r, ctx)?;
            Ok(Value::Bool(lhs || rhs))
        }
        Expr::Cmp { op, lhs, rhs } => {
            let lhs = eval_value(lhs, ctx)?;
            let rhs = eval_value(rhs, ctx)?;
            compare(*op, &lhs, &rhs).map(Value::Bool)
        }
    }
}

fn eval_bool(expr: &Expr, ctx: &DecisionContext) -> Result<bool, EvalGap> {
    match eval_value(expr, ctx)? {
        Value::Bool(b) => Ok(b),
        _ => Err(EvalGap::NotBoolean),
    }
}

fn compare(op: CmpOp, lhs: &Value, rhs: &Value) -> Result<bool, EvalGap> {
    match (lhs, rhs) {
        (Value::Number(a), Value::Number(b)) => Ok(match op {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        }),
        (Value::Str(a), Value::Str(b)) => match op {
            CmpOp::Eq => Ok(a == b),
            CmpOp::Ne => Ok(a != b),
            _ => Err(mismatch(op, lhs, rhs)),
        },
        (Value::Bool(a), Value::Bool(b)) => match op {
            CmpOp::Eq => Ok(a == b),
            CmpOp::Ne => Ok(a != b),
            _ => Err(mismatch(op, lhs, rhs)),
        },
        _ => Err(mismatch(op, lhs, rhs)),
    }
}

fn mismatch(op: CmpOp, lhs: &Value, rhs: &Value) -> EvalGap {
    EvalGap::TypeMismatch {
        op: op.as_str(),
        lhs: lhs.type_name(),
        rhs: rhs.type_name(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compile::compile_file;
    use cslguard_syntax::extract_blocks;
    use cslguard_types::SourcePath;
    use time::macros::datetime;

    const EVALUATED_AT: OffsetDateTime = datetime!(2026-01-01 00:00:00 UTC);

    fn ruleset(src: &str) -> RuleSet {
        let model = compile_file(&SourcePath::new("test.csl"), &extract_blocks(src));
        assert!(
            model.findings.is_empty(),
            "fixture must be clean: {:?}",
            model.findings
        );
        RuleSet::from_policies(model.policies)
    }

    const BUDGET: &str = r#"policy budget_limits {
    rule cap {
        when amount > 50000
        then escalate
        message "exceeds auto-approval limit"
    }
}
"#;

    #[test]
    fn triggering_rule_escalates() {
        let rs = ruleset(BUDGET);
        let ctx = DecisionContext::new().with("amount", 75000.0);
        let verdict = evaluate(&rs, &Scope::Policy("budget_limits".into()), &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Escalate);
        assert_eq!(verdict.triggered_rules.len(), 1);
        assert_eq!(verdict.triggered_rules[0].rule, "cap");
        assert_eq!(
            verdict.rationale,
            vec!["rule `budget_limits.cap`: exceeds auto-approval limit"]
        );
    }

    #[test]
    fn no_trigger_approves_with_empty_triggered_rules() {
        let rs = ruleset(BUDGET);
        let ctx = DecisionContext::new().with("amount", 10000.0);
        let verdict = evaluate(&rs, &Scope::Policy("budget_limits".into()), &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Approved);
        assert!(verdict.triggered_rules.is_empty());
        assert_eq!(verdict.rationale, vec!["no applicable constraints fired"]);
    }

    #[test]
    fn missing_variable_fails_safe_to_escalate() {
        let rs = ruleset(BUDGET);
        let ctx = DecisionContext::new().with("currency", "USD");
        let verdict = evaluate(&rs, &Scope::Policy("budget_limits".into()), &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Escalate);
        assert_eq!(verdict.triggered_rules.len(), 1);
        assert!(verdict.rationale[0].contains("variable `amount` missing"));
    }

    #[test]
    fn most_conservative_outcome_wins() {
        let rs = ruleset(
            r#"policy p {
    rule log_all {
        when amount > 0
        then log
        message "spend observed"
    }
    rule deny_big {
        when amount > 100
        then reject
        message "too big"
    }
}
"#,
        );
        let ctx = DecisionContext::new().with("amount", 500.0);
        let verdict = evaluate(&rs, &Scope::Policy("p".into()), &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Rejected);
        assert_eq!(verdict.triggered_rules.len(), 2);
    }

    #[test]
    fn terminal_trigger_short_circuits_remaining_rules() {
        let rs = ruleset(
            r#"policy p {
    rule deny_big {
        when amount > 100
        then reject
        message "too big"
    }
    rule log_all {
        when amount > 0
        then log
        message "spend observed"
    }
}
"#,
        );
        let ctx = DecisionContext::new().with("amount", 500.0);
        let verdict = evaluate(&rs, &Scope::Policy("p".into()), &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Rejected);
        // log_all never ran: deny_big is terminal.
        assert_eq!(verdict.triggered_rules.len(), 1);
    }

    #[test]
    fn repair_accumulates_and_loses_to_escalate() {
        let rs = ruleset(
            r#"policy p {
    rule clamp {
        when amount > 100
        then repair
        message "clamped to limit"
    }
    rule review_large {
        when amount > 200
        then escalate
        message "needs review"
    }
}
"#,
        );
        let ctx = DecisionContext::new().with("amount", 500.0);
        let verdict = evaluate(&rs, &Scope::Policy("p".into()), &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Escalate);
        assert_eq!(verdict.triggered_rules.len(), 2);
    }

    #[test]
    fn priority_reorders_evaluation() {
        let rs = ruleset(
            r#"policy p {
    rule declared_first {
        when amount > 0
        then log
        message "observed"
    }
    rule urgent_reject {
        when amount > 0
        then reject
        message "blocked"
        priority 1
    }
}
"#,
        );
        let ctx = DecisionContext::new().with("amount", 5.0);
        let verdict = evaluate(&rs, &Scope::Policy("p".into()), &ctx, EVALUATED_AT);
        // urgent_reject runs first and short-circuits declared_first.
        assert_eq!(verdict.triggered_rules.len(), 1);
        assert_eq!(verdict.triggered_rules[0].rule, "urgent_reject");
    }

    #[test]
    fn unknown_scope_escalates() {
        let rs = ruleset(BUDGET);
        let ctx = DecisionContext::new().with("amount", 1.0);
        let verdict = evaluate(&rs, &Scope::Policy("nonexistent".into()), &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Escalate);
        assert!(verdict.rationale[0].contains("no policy named `nonexistent`"));
    }

    #[test]
    fn scope_all_spans_policies() {
        let rs = ruleset(
            r#"policy a {
    rule log_spend {
        when amount > 0
        then log
        message "observed"
    }
}
policy b {
    rule deny {
        when amount > 100
        then reject
        message "blocked"
    }
}
"#,
        );
        let ctx = DecisionContext::new().with("amount", 500.0);
        let verdict = evaluate(&rs, &Scope::All, &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Rejected);
        assert_eq!(verdict.triggered_rules.len(), 2);
    }

    #[test]
    fn repeated_evaluation_is_deterministic() {
        let rs = ruleset(BUDGET);
        let ctx = DecisionContext::new().with("amount", 75000.0);
        let first = evaluate(&rs, &Scope::All, &ctx, EVALUATED_AT);
        let second = evaluate(&rs, &Scope::All, &ctx, EVALUATED_AT);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_vec(&first).expect("serialize"),
            serde_json::to_vec(&second).expect("serialize")
        );
    }

    #[test]
    fn type_mismatch_escalates() {
        let rs = ruleset(
            r#"policy p {
    rule r {
        when amount > 100
        then reject
        message "blocked"
    }
}
"#,
        );
        let ctx = DecisionContext::new().with("amount", "lots");
        let verdict = evaluate(&rs, &Scope::All, &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Escalate);
        assert!(verdict.rationale[0].contains("cannot compare"));
    }

    #[test]
    fn gap_in_or_operand_is_not_hidden() {
        let rs = ruleset(
            r#"policy p {
    rule r {
        when approved == true or amount > 100
        then reject
        message "blocked"
    }
}
"#,
        );
        // `approved` satisfies the left side, but `amount` is missing.
        let ctx = DecisionContext::new().with("approved", true);
        let verdict = evaluate(&rs, &Scope::All, &ctx, EVALUATED_AT);
        assert_eq!(verdict.outcome, Outcome::Escalate);
        assert!(verdict.rationale[0].contains("`amount`"));
    }
}
