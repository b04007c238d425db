use cslguard_types::{Finding, LoadVerdict, ReportEnvelope, Severity};

/// Render the per-file pass/fail listing and aggregate summary printed by
/// `cslguard validate`.
pub fn render_summary(report: &ReportEnvelope) -> String {
    let mut out = String::new();

    for file in &report.files {
        let status = if file.passed() { "PASS" } else { "FAIL" };
        out.push_str(&format!(
            "[{}] {} (policies: {}, rules: {})\n",
            status,
            file.path.as_str(),
            file.policies.len(),
            file.rules.len()
        ));
        for finding in &file.findings {
            out.push_str(&format!("    {}\n", finding_line(finding)));
        }
    }

    for finding in &report.findings {
        out.push_str(&format!("{}\n", finding_line(finding)));
    }

    let passed = report.files.iter().filter(|f| f.passed()).count();
    out.push_str(&format!(
        "summary: verdict {} — files {}/{} passed, policies {}, rules {}, errors {}, warnings {}\n",
        verdict_label(report.verdict),
        passed,
        report.files.len(),
        report.data.policies_total,
        report.data.rules_total,
        report.data.errors_total,
        report.data.warnings_total
    ));

    out
}

fn verdict_label(verdict: LoadVerdict) -> &'static str {
    match verdict {
        LoadVerdict::Pass => "PASS",
        LoadVerdict::Warn => "WARN",
        LoadVerdict::Fail => "FAIL",
    }
}

fn severity_label(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "info",
        Severity::Warning => "warning",
        Severity::Error => "error",
    }
}

fn finding_line(finding: &Finding) -> String {
    let mut line = format!(
        "{}[{}] {}",
        severity_label(finding.severity),
        finding.code,
        finding.message
    );
    if let Some(loc) = &finding.location
        && let Some(n) = loc.line
    {
        line.push_str(&format!(" (line {n})"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use cslguard_types::{
        FileSummary, LoadData, Location, SourcePath, ToolMeta, SCHEMA_REPORT_V1,
    };
    use time::macros::datetime;

    fn report(files: Vec<FileSummary>, findings: Vec<Finding>) -> ReportEnvelope {
        let errors: u32 = files
            .iter()
            .flat_map(|f| f.findings.iter())
            .chain(findings.iter())
            .filter(|f| f.severity == Severity::Error)
            .count() as u32;
        let verdict = if errors > 0 {
            LoadVerdict::Fail
        } else {
            LoadVerdict::Pass
        };
        ReportEnvelope {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "cslguard".to_string(),
                version: "0.1.0".to_string(),
            },
            started_at: datetime!(2026-01-01 00:00:00 UTC),
            finished_at: datetime!(2026-01-01 00:00:01 UTC),
            verdict,
            data: LoadData {
                files_scanned: files.len() as u32,
                policies_total: files.iter().map(|f| f.policies.len() as u32).sum(),
                rules_total: files.iter().map(|f| f.rules.len() as u32).sum(),
                errors_total: errors,
                warnings_total: 0,
            },
            files,
            findings,
        }
    }

    fn error_finding(code: &str, message: &str, line: Option<u32>) -> Finding {
        Finding {
            severity: Severity::Error,
            check_id: "syntax.blocks".to_string(),
            code: code.to_string(),
            message: message.to_string(),
            location: line.map(|n| Location {
                path: SourcePath::new("broken.csl"),
                line: Some(n),
            }),
            policy: None,
            rule: None,
            help: None,
            fingerprint: None,
        }
    }

    #[test]
    fn renders_pass_and_fail_files() {
        let clean = FileSummary {
            path: SourcePath::new("budget_limits.csl"),
            policies: vec!["budget_limits".to_string()],
            rules: vec!["budget_limits.cap".to_string()],
            findings: Vec::new(),
        };
        let broken = FileSummary {
            path: SourcePath::new("broken.csl"),
            policies: Vec::new(),
            rules: Vec::new(),
            findings: vec![error_finding(
                "no_policy_blocks",
                "no policy blocks found",
                None,
            )],
        };
        let out = render_summary(&report(vec![clean, broken], Vec::new()));

        insta::assert_snapshot!(out.trim_end(), @r###"
        [PASS] budget_limits.csl (policies: 1, rules: 1)
        [FAIL] broken.csl (policies: 0, rules: 0)
            error[no_policy_blocks] no policy blocks found
        summary: verdict FAIL — files 1/2 passed, policies 1, rules 1, errors 1, warnings 0
        "###);
    }

    #[test]
    fn includes_line_numbers_and_cross_file_findings() {
        let broken = FileSummary {
            path: SourcePath::new("broken.csl"),
            policies: vec!["p".to_string()],
            rules: vec!["p.r".to_string()],
            findings: vec![error_finding("missing_then", "rule `r` is missing its `then` clause", Some(2))],
        };
        let global = error_finding(
            "missing_required_policy",
            "required policy `guardian` is missing from the loaded set",
            None,
        );
        let out = render_summary(&report(vec![broken], vec![global]));
        assert!(out.contains("(line 2)"));
        assert!(out.contains("error[missing_required_policy]"));
        assert!(out.ends_with("errors 2, warnings 0\n"));
    }
}
