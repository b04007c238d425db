//! Aggregate validation over a candidate model.

use crate::checks;
use crate::compile::CandidateModel;
use crate::config::{FailOn, ValidationConfig};
use crate::consistency::ConsistencyChecker;
use crate::fingerprint::fingerprint_finding;
use crate::model::RuleSet;
use crate::report::{DomainReport, SeverityCounts};
use cslguard_types::{FileSummary, Finding, LoadData, LoadVerdict, Severity};

/// Validate the candidate and, when it passes, build the rule set.
///
/// Validation is total: every violation across every file is reported in
/// one pass. The candidate rule set is produced only when no file has an
/// error (and, under `fail_on = warning`, no warnings either) — a partially
/// valid configuration is never put into service.
pub fn validate(
    candidate: CandidateModel,
    cfg: &ValidationConfig,
    checker: &dyn ConsistencyChecker,
) -> DomainReport {
    let mut files = candidate.files;

    // Consistency diagnostics are appended to the owning file. The checker
    // runs after structural compilation and can only add warnings; it never
    // masks or overrides a structural finding.
    if cfg.consistency {
        for file in &mut files {
            for policy in &file.policies {
                let report = checker.check(policy);
                file.findings.extend(report.diagnostics);
            }
        }
    }

    let mut global: Vec<Finding> = Vec::new();
    checks::run_all(&files, cfg, &mut global);

    for file in &mut files {
        for finding in &mut file.findings {
            stamp_fingerprint(finding);
        }
        file.findings.sort_by(compare_findings);
    }
    for finding in &mut global {
        stamp_fingerprint(finding);
    }
    global.sort_by(compare_findings);

    let counts = SeverityCounts::from_findings(
        files
            .iter()
            .flat_map(|f| f.findings.iter())
            .chain(global.iter()),
    );

    let verdict = compute_verdict(&counts, cfg.fail_on);

    let data = LoadData {
        files_scanned: files.len() as u32,
        policies_total: files.iter().map(|f| f.policy_names.len() as u32).sum(),
        rules_total: files.iter().map(|f| f.rule_names.len() as u32).sum(),
        errors_total: counts.error,
        warnings_total: counts.warning,
    };

    let ruleset = if verdict == LoadVerdict::Fail {
        None
    } else {
        Some(RuleSet::from_policies(
            files.iter_mut().flat_map(|f| std::mem::take(&mut f.policies)),
        ))
    };

    let files = files
        .into_iter()
        .map(|f| FileSummary {
            path: f.path,
            policies: f.policy_names,
            rules: f.rule_names,
            findings: f.findings,
        })
        .collect();

    DomainReport {
        verdict,
        files,
        findings: global,
        counts,
        data,
        ruleset,
    }
}

fn compute_verdict(counts: &SeverityCounts, fail_on: FailOn) -> LoadVerdict {
    if counts.error > 0 {
        return LoadVerdict::Fail;
    }
    if counts.warning > 0 {
        return match fail_on {
            FailOn::Warning => LoadVerdict::Fail,
            FailOn::Error => LoadVerdict::Warn,
        };
    }
    LoadVerdict::Pass
}

fn stamp_fingerprint(finding: &mut Finding) {
    if finding.fingerprint.is_none() {
        finding.fingerprint = Some(fingerprint_finding(
            &finding.code,
            finding.location.as_ref().map(|l| l.path.as_str()),
            finding.policy.as_deref(),
            finding.rule.as_deref(),
        ));
    }
}

fn compare_findings(a: &Finding, b: &Finding) -> std::cmp::Ordering {
    // Ordering priority:
    // 1) severity (error -> warning -> info)
    // 2) location.line (missing last)
    // 3) check_id
    // 4) code
    // 5) message
    let severity_rank = |sev: Severity| match sev {
        Severity::Error => 0,
        Severity::Warning => 1,
        Severity::Info => 2,
    };
    let line = |f: &Finding| {
        f.location
            .as_ref()
            .and_then(|l| l.line)
            .unwrap_or(u32::MAX)
    };

    severity_rank(a.severity)
        .cmp(&severity_rank(b.severity))
        .then(line(a).cmp(&line(b)))
        .then(a.check_id.cmp(&b.check_id))
        .then(a.code.cmp(&b.code))
        .then(a.message.cmp(&b.message))
}
