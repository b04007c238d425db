//! The `validate` use case: run the load pipeline and produce a report.

use anyhow::Context;
use camino::Utf8Path;
use cslguard_domain::consistency::{ConsistencyChecker, IntervalChecker, NoopChecker};
use cslguard_domain::model::RuleSet;
use cslguard_settings::{Overrides, ResolvedConfig};
use cslguard_types::{LoadVerdict, ReportEnvelope, ToolMeta, SCHEMA_REPORT_V1};
use std::sync::Arc;
use time::OffsetDateTime;

/// Input for the validate use case.
#[derive(Clone, Debug)]
pub struct ValidateInput<'a> {
    /// Directory containing `cslguard.toml` and the policy directory.
    pub root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the validate use case.
#[derive(Clone, Debug)]
pub struct ValidateOutput {
    /// The generated report.
    pub report: ReportEnvelope,
    /// The candidate rule set; `Some` only when activation is allowed.
    pub ruleset: Option<Arc<RuleSet>>,
    /// The resolved configuration used.
    pub resolved: ResolvedConfig,
}

/// Run the validate use case with the checker selected by configuration:
/// the built-in interval checker when `consistency` is enabled, the no-op
/// checker otherwise.
pub fn run_validate(input: ValidateInput<'_>) -> anyhow::Result<ValidateOutput> {
    run_validate_with(input, None)
}

/// Like [`run_validate`], with an explicitly injected consistency
/// capability (used by hosts that carry a real solver).
pub fn run_validate_with(
    input: ValidateInput<'_>,
    checker: Option<&dyn ConsistencyChecker>,
) -> anyhow::Result<ValidateOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        cslguard_settings::CslguardConfigV1::default()
    } else {
        cslguard_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved =
        cslguard_settings::resolve_config(cfg, input.overrides.clone()).context("resolve config")?;

    let policy_dir = input.root.join(&resolved.policy_dir);
    let candidate = cslguard_loader::build_candidate(&policy_dir, &resolved.extension)
        .context("build candidate model")?;

    let default_checker: &dyn ConsistencyChecker = if resolved.effective.consistency {
        &IntervalChecker
    } else {
        &NoopChecker
    };
    let checker = checker.unwrap_or(default_checker);

    let domain = cslguard_domain::validate(candidate, &resolved.effective, checker);

    let finished_at = OffsetDateTime::now_utc();

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "cslguard".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict: domain.verdict,
        files: domain.files,
        findings: domain.findings,
        data: domain.data,
    };

    Ok(ValidateOutput {
        report,
        ruleset: domain.ruleset.map(Arc::new),
        resolved,
    })
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: LoadVerdict) -> i32 {
    match verdict {
        LoadVerdict::Pass => 0,
        LoadVerdict::Warn => 0,
        LoadVerdict::Fail => 2,
    }
}
