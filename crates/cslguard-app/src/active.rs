//! The process-wide active rule set.
//!
//! Reads take a snapshot (an `Arc` clone under a read lock); reloads build
//! the candidate entirely off to the side and publish it with a single
//! pointer swap. Neither lock is ever held across an evaluation, so
//! in-flight evaluations keep the snapshot they started with.

use crate::validate::{run_validate, ValidateInput};
use cslguard_domain::model::RuleSet;
use cslguard_types::ReportEnvelope;
use std::sync::{Arc, RwLock};

#[derive(Debug, Default)]
pub struct ActiveRuleSet {
    current: RwLock<Arc<RuleSet>>,
}

impl ActiveRuleSet {
    /// Start with an already validated rule set.
    pub fn new(initial: Arc<RuleSet>) -> Self {
        Self {
            current: RwLock::new(initial),
        }
    }

    /// Start with an empty rule set (nothing loaded yet).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The snapshot evaluations should run against.
    ///
    /// # Panics
    ///
    /// Panics if the rule-set lock has been poisoned.
    pub fn snapshot(&self) -> Arc<RuleSet> {
        Arc::clone(&self.current.read().expect("active rule set poisoned"))
    }

    /// Atomically publish a new rule set.
    ///
    /// # Panics
    ///
    /// Panics if the rule-set lock has been poisoned.
    pub fn publish(&self, next: Arc<RuleSet>) {
        *self.current.write().expect("active rule set poisoned") = next;
    }

    /// Run the full load pipeline and publish the candidate only when it
    /// passed. On failure the previously active rule set stays in service;
    /// the report is returned either way.
    pub fn reload(&self, input: ValidateInput<'_>) -> anyhow::Result<ReportEnvelope> {
        let output = run_validate(input)?;
        if let Some(ruleset) = output.ruleset {
            self.publish(ruleset);
        }
        Ok(output.report)
    }
}
