//! Optional consistency-checking capability.
//!
//! The checker is injected at load time, never resolved from a global. When
//! no real capability is available, [`NoopChecker`] returns a vacuous pass
//! so that activation is never blocked by an absent enhancement. Checker
//! diagnostics are warnings; they neither mask nor override structural
//! findings.

use crate::model::{Policy, Rule};
use cslguard_syntax::{ActionKind, CmpOp, Expr, Literal};
use cslguard_types::{ids, Finding, Location, Severity};
use std::collections::BTreeMap;

/// Verification result for one policy.
#[derive(Clone, Debug, Default)]
pub struct ConsistencyReport {
    /// False when the capability abstained entirely (vacuous pass).
    pub checked: bool,
    /// True when no contradiction or dead rule was proven.
    pub valid: bool,
    pub diagnostics: Vec<Finding>,
}

impl ConsistencyReport {
    /// No claim made; never blocks activation.
    pub fn vacuous_pass() -> Self {
        Self {
            checked: false,
            valid: true,
            diagnostics: Vec::new(),
        }
    }
}

/// Capability contract: prove rules reachable and mutually compatible.
pub trait ConsistencyChecker {
    fn check(&self, policy: &Policy) -> ConsistencyReport;
}

/// The absent capability: vacuous pass for every policy.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopChecker;

impl ConsistencyChecker for NoopChecker {
    fn check(&self, _policy: &Policy) -> ConsistencyReport {
        ConsistencyReport::vacuous_pass()
    }
}

/// Built-in, solver-free checker over the conjunctive fragment.
///
/// Only rules whose conditions are pure conjunctions of variable-vs-literal
/// comparisons are analyzed; anything else is abstained from. Within that
/// fragment it proves:
/// - a rule's condition unsatisfiable (dead rule)
/// - two rules jointly satisfiable while prescribing contradictory actions
#[derive(Clone, Copy, Debug, Default)]
pub struct IntervalChecker;

impl ConsistencyChecker for IntervalChecker {
    fn check(&self, policy: &Policy) -> ConsistencyReport {
        let analyses: Vec<Option<ConstraintMap>> =
            policy.rules.iter().map(|r| analyze(&r.condition)).collect();

        let mut diagnostics = Vec::new();

        for (rule, analysis) in policy.rules.iter().zip(&analyses) {
            if let Some(map) = analysis
                && !satisfiable(map)
            {
                diagnostics.push(diagnostic(
                    policy,
                    rule,
                    ids::CODE_DEAD_RULE,
                    format!(
                        "rule `{}.{}` can never trigger: `{}` is unsatisfiable",
                        policy.name, rule.name, rule.condition_text
                    ),
                ));
            }
        }

        for i in 0..policy.rules.len() {
            for j in (i + 1)..policy.rules.len() {
                let (Some(a), Some(b)) = (&analyses[i], &analyses[j]) else {
                    continue;
                };
                if !satisfiable(a) || !satisfiable(b) {
                    continue;
                }
                let first = &policy.rules[i];
                let second = &policy.rules[j];
                if !contradictory(first.action, second.action) {
                    continue;
                }
                if satisfiable(&merge(a, b)) {
                    diagnostics.push(diagnostic(
                        policy,
                        second,
                        ids::CODE_CONTRADICTORY_RULES,
                        format!(
                            "rules `{}.{}` and `{}.{}` overlap but prescribe contradictory \
                             actions (`{}` vs `{}`)",
                            policy.name,
                            first.name,
                            policy.name,
                            second.name,
                            first.action_text,
                            second.action_text
                        ),
                    ));
                }
            }
        }

        ConsistencyReport {
            checked: true,
            valid: diagnostics.is_empty(),
            diagnostics,
        }
    }
}

fn diagnostic(policy: &Policy, rule: &Rule, code: &str, message: String) -> Finding {
    Finding {
        severity: Severity::Warning,
        check_id: ids::CHECK_POLICY_CONSISTENCY.to_string(),
        code: code.to_string(),
        message,
        location: Some(Location {
            path: policy.source.clone(),
            line: Some(rule.line),
        }),
        policy: Some(policy.name.clone()),
        rule: Some(rule.name.clone()),
        help: None,
        fingerprint: None,
    }
}

fn contradictory(a: ActionKind, b: ActionKind) -> bool {
    matches!(
        (a, b),
        (ActionKind::Reject, ActionKind::Inform) | (ActionKind::Inform, ActionKind::Reject)
    )
}

/// Per-variable constraints accumulated from a conjunction.
#[derive(Clone, Debug, Default)]
struct Constraints {
    /// (bound, inclusive)
    lower: Option<(f64, bool)>,
    upper: Option<(f64, bool)>,
    eqs: Vec<Literal>,
    nes: Vec<Literal>,
}

type ConstraintMap = BTreeMap<String, Constraints>;

/// Decompose a condition into variable-vs-literal conjuncts.
///
/// Returns `None` (abstain) for anything outside the fragment.
fn analyze(expr: &Expr) -> Option<ConstraintMap> {
    let mut conjuncts = Vec::new();
    if !collect_conjuncts(expr, &mut conjuncts) {
        return None;
    }

    let mut map = ConstraintMap::new();
    for (var, op, lit) in conjuncts {
        let entry = map.entry(var).or_default();
        match (op, lit) {
            (CmpOp::Eq, lit) => entry.eqs.push(lit),
            (CmpOp::Ne, lit) => entry.nes.push(lit),
            (CmpOp::Lt, Literal::Number(n)) => tighten_upper(entry, n, false),
            (CmpOp::Le, Literal::Number(n)) => tighten_upper(entry, n, true),
            (CmpOp::Gt, Literal::Number(n)) => tighten_lower(entry, n, false),
            (CmpOp::Ge, Literal::Number(n)) => tighten_lower(entry, n, true),
            // Relational comparison against a non-number: abstain.
            _ => return None,
        }
    }
    Some(map)
}

fn collect_conjuncts(expr: &Expr, out: &mut Vec<(String, CmpOp, Literal)>) -> bool {
    match expr {
        Expr::And(l, r) => collect_conjuncts(l, out) && collect_conjuncts(r, out),
        Expr::Cmp { op, lhs, rhs } => match (lhs.as_ref(), rhs.as_ref()) {
            (Expr::Var(var), Expr::Literal(lit)) => {
                out.push((var.clone(), *op, lit.clone()));
                true
            }
            (Expr::Literal(lit), Expr::Var(var)) => {
                out.push((var.clone(), flip(*op), lit.clone()));
                true
            }
            _ => false,
        },
        Expr::Literal(Literal::Bool(true)) => true,
        _ => false,
    }
}

fn flip(op: CmpOp) -> CmpOp {
    match op {
        CmpOp::Lt => CmpOp::Gt,
        CmpOp::Le => CmpOp::Ge,
        CmpOp::Gt => CmpOp::Lt,
        CmpOp::Ge => CmpOp::Le,
        CmpOp::Eq | CmpOp::Ne => op,
    }
}

fn tighten_lower(c: &mut Constraints, bound: f64, inclusive: bool) {
    c.lower = Some(match c.lower {
        None => (bound, inclusive),
        Some((cur, cur_incl)) => {
            if bound > cur {
                (bound, inclusive)
            } else if bound == cur {
                (cur, cur_incl && inclusive)
            } else {
                (cur, cur_incl)
            }
        }
    });
}

fn tighten_upper(c: &mut Constraints, bound: f64, inclusive: bool) {
    c.upper = Some(match c.upper {
        None => (bound, inclusive),
        Some((cur, cur_incl)) => {
            if bound < cur {
                (bound, inclusive)
            } else if bound == cur {
                (cur, cur_incl && inclusive)
            } else {
                (cur, cur_incl)
            }
        }
    });
}

fn satisfiable(map: &ConstraintMap) -> bool {
    map.values().all(satisfiable_var)
}

fn satisfiable_var(c: &Constraints) -> bool {
    if let Some(first) = c.eqs.first() {
        // All equality constraints must agree.
        if c.eqs.iter().any(|other| !literal_eq(first, other)) {
            return false;
        }
        if c.nes.iter().any(|ne| literal_eq(first, ne)) {
            return false;
        }
        return match first {
            Literal::Number(n) => within_bounds(*n, c),
            // A non-number pinned value is incompatible with numeric bounds.
            _ => c.lower.is_none() && c.upper.is_none(),
        };
    }

    match (c.lower, c.upper) {
        (Some((lo, lo_incl)), Some((hi, hi_incl))) => {
            if lo > hi {
                return false;
            }
            if lo == hi {
                if !(lo_incl && hi_incl) {
                    return false;
                }
                // Degenerate point interval: excluded by a != constraint?
                return !c
                    .nes
                    .iter()
                    .any(|ne| matches!(ne, Literal::Number(n) if *n == lo));
            }
            true
        }
        _ => true,
    }
}

fn within_bounds(n: f64, c: &Constraints) -> bool {
    if let Some((lo, incl)) = c.lower {
        if n < lo || (n == lo && !incl) {
            return false;
        }
    }
    if let Some((hi, incl)) = c.upper {
        if n > hi || (n == hi && !incl) {
            return false;
        }
    }
    true
}

fn literal_eq(a: &Literal, b: &Literal) -> bool {
    match (a, b) {
        (Literal::Number(x), Literal::Number(y)) => x == y,
        (Literal::Str(x), Literal::Str(y)) => x == y,
        (Literal::Bool(x), Literal::Bool(y)) => x == y,
        _ => false,
    }
}

fn merge(a: &ConstraintMap, b: &ConstraintMap) -> ConstraintMap {
    let mut out = a.clone();
    for (var, c) in b {
        let entry = out.entry(var.clone()).or_default();
        if let Some((bound, incl)) = c.lower {
            tighten_lower(entry, bound, incl);
        }
        if let Some((bound, incl)) = c.upper {
            tighten_upper(entry, bound, incl);
        }
        entry.eqs.extend(c.eqs.iter().cloned());
        entry.nes.extend(c.nes.iter().cloned());
    }
    out
}
