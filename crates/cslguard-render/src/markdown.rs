use cslguard_types::{Finding, LoadVerdict, ReportEnvelope, Severity};

/// Render the load report as Markdown for review surfaces.
pub fn render_markdown(report: &ReportEnvelope) -> String {
    let mut out = String::new();

    out.push_str("# cslguard report\n\n");
    let verdict = match report.verdict {
        LoadVerdict::Pass => "PASS",
        LoadVerdict::Warn => "WARN",
        LoadVerdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}**\n- Files: {} — Policies: {} — Rules: {}\n- Errors: {} — Warnings: {}\n\n",
        verdict,
        report.data.files_scanned,
        report.data.policies_total,
        report.data.rules_total,
        report.data.errors_total,
        report.data.warnings_total
    ));

    let total_findings: usize = report
        .files
        .iter()
        .map(|f| f.findings.len())
        .sum::<usize>()
        + report.findings.len();
    if total_findings == 0 {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for file in &report.files {
        for f in &file.findings {
            out.push_str(&finding_bullet(f));
        }
    }
    for f in &report.findings {
        out.push_str(&finding_bullet(f));
    }

    out
}

fn finding_bullet(f: &Finding) -> String {
    let sev = match f.severity {
        Severity::Info => "INFO",
        Severity::Warning => "WARN",
        Severity::Error => "ERROR",
    };

    let mut line = if let Some(loc) = &f.location {
        format!(
            "- [{}] `{}` / `{}` — {} (`{}`:{})\n",
            sev,
            f.check_id,
            f.code,
            f.message,
            loc.path.as_str(),
            loc.line.unwrap_or(0)
        )
    } else {
        format!("- [{}] `{}` / `{}` — {}\n", sev, f.check_id, f.code, f.message)
    };

    if let Some(help) = &f.help {
        line.push_str(&format!("  - help: {}\n", help));
    }

    line
}
