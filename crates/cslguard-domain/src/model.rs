use cslguard_syntax::{ActionKind, Expr, Literal};
use cslguard_types::{Outcome, SourcePath};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use thiserror::Error;

/// A compiled rule: condition parsed once at load time, action classified,
/// message ready for rationales.
#[derive(Clone, Debug)]
pub struct Rule {
    pub name: String,
    pub condition: Expr,
    pub condition_text: String,
    pub action: ActionKind,
    pub action_text: String,
    pub message: String,
    pub priority: Option<u32>,
    pub line: u32,
}

/// A named, ordered group of rules governing one category of decision.
#[derive(Clone, Debug)]
pub struct Policy {
    pub name: String,
    pub source: SourcePath,
    pub line: u32,
    /// Rules in effective evaluation order (see [`Policy::order_rules`]).
    pub rules: Vec<Rule>,
}

impl Policy {
    /// Sort rules into effective evaluation order: ascending `priority`
    /// (rules without one sort after all prioritized rules), declaration
    /// order preserved within equal priority.
    pub fn order_rules(&mut self) {
        self.rules
            .sort_by_key(|r| r.priority.unwrap_or(u32::MAX));
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

/// The merged collection of all valid policies, keyed by name.
///
/// Immutable after load; published as a snapshot and swapped atomically on
/// reload, never mutated in place while evaluation is in flight.
#[derive(Clone, Debug, Default)]
pub struct RuleSet {
    pub policies: BTreeMap<String, Policy>,
}

impl RuleSet {
    pub fn from_policies(policies: impl IntoIterator<Item = Policy>) -> Self {
        Self {
            policies: policies.into_iter().map(|p| (p.name.clone(), p)).collect(),
        }
    }

    pub fn policy(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    pub fn policy_count(&self) -> usize {
        self.policies.len()
    }

    pub fn rule_count(&self) -> usize {
        self.policies.values().map(|p| p.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

/// Scalar value in a decision context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Str(String),
    Bool(bool),
}

impl Value {
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::Str(_) => "string",
            Value::Bool(_) => "boolean",
        }
    }
}

impl From<&Literal> for Value {
    fn from(lit: &Literal) -> Self {
        match lit {
            Literal::Number(n) => Value::Number(*n),
            Literal::Str(s) => Value::Str(s.clone()),
            Literal::Bool(b) => Value::Bool(*b),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

/// Error turning caller-supplied JSON into a decision context.
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("context is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("context must be a JSON object")]
    NotAnObject,
    #[error("context value for `{0}` must be a number, string, or boolean")]
    Unsupported(String),
}

/// Named values describing the action under evaluation.
///
/// Constructed per decision, consumed once, discarded.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DecisionContext {
    values: BTreeMap<String, Value>,
}

impl DecisionContext {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Build a context from a flat JSON object of scalars.
    pub fn from_json_str(text: &str) -> Result<Self, ContextError> {
        let parsed: JsonValue = serde_json::from_str(text)?;
        let JsonValue::Object(map) = parsed else {
            return Err(ContextError::NotAnObject);
        };

        let mut ctx = DecisionContext::new();
        for (key, value) in map {
            let value = match value {
                JsonValue::Number(n) => match n.as_f64() {
                    Some(f) => Value::Number(f),
                    None => return Err(ContextError::Unsupported(key)),
                },
                JsonValue::String(s) => Value::Str(s),
                JsonValue::Bool(b) => Value::Bool(b),
                _ => return Err(ContextError::Unsupported(key)),
            };
            ctx.values.insert(key, value);
        }
        Ok(ctx)
    }
}

/// Map an action classification to the verdict outcome it contributes.
pub fn action_outcome(action: ActionKind) -> Outcome {
    match action {
        ActionKind::Reject => Outcome::Rejected,
        ActionKind::Escalate => Outcome::Escalate,
        ActionKind::Repair => Outcome::Repaired,
        ActionKind::Inform => Outcome::Approved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cslguard_syntax::parse_expr;

    fn rule(name: &str, priority: Option<u32>) -> Rule {
        Rule {
            name: name.to_string(),
            condition: parse_expr("amount > 1").expect("parse"),
            condition_text: "amount > 1".to_string(),
            action: ActionKind::Inform,
            action_text: "allow".to_string(),
            message: "m".to_string(),
            priority,
            line: 1,
        }
    }

    #[test]
    fn prioritized_rules_come_first_in_stable_order() {
        let mut policy = Policy {
            name: "p".to_string(),
            source: SourcePath::new("p.csl"),
            line: 1,
            rules: vec![
                rule("declared_first", None),
                rule("late_but_urgent", Some(1)),
                rule("declared_second", None),
                rule("also_urgent", Some(1)),
            ],
        };
        policy.order_rules();
        let names: Vec<&str> = policy.rules.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["late_but_urgent", "also_urgent", "declared_first", "declared_second"]
        );
    }

    #[test]
    fn context_from_json() {
        let ctx = DecisionContext::from_json_str(
            r#"{"amount": 75000, "currency": "USD", "approved": false}"#,
        )
        .expect("context");
        assert_eq!(ctx.get("amount"), Some(&Value::Number(75000.0)));
        assert_eq!(ctx.get("currency"), Some(&Value::Str("USD".to_string())));
        assert_eq!(ctx.get("approved"), Some(&Value::Bool(false)));
        assert_eq!(ctx.get("missing"), None);
    }

    #[test]
    fn context_rejects_nested_values() {
        let err = DecisionContext::from_json_str(r#"{"nested": {"a": 1}}"#).unwrap_err();
        assert!(matches!(err, ContextError::Unsupported(key) if key == "nested"));
    }

    #[test]
    fn context_rejects_non_objects() {
        let err = DecisionContext::from_json_str("[1, 2]").unwrap_err();
        assert!(matches!(err, ContextError::NotAnObject));
    }

    #[test]
    fn action_outcomes() {
        assert_eq!(action_outcome(ActionKind::Reject), Outcome::Rejected);
        assert_eq!(action_outcome(ActionKind::Escalate), Outcome::Escalate);
        assert_eq!(action_outcome(ActionKind::Repair), Outcome::Repaired);
        assert_eq!(action_outcome(ActionKind::Inform), Outcome::Approved);
    }
}
