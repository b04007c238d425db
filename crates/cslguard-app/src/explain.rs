//! The `explain` use case: remediation guidance for finding codes.

use cslguard_types::{all_codes, lookup_explanation, Explanation};

/// Result of an explain lookup.
pub enum ExplainOutput {
    Found(Explanation),
    NotFound {
        code: String,
        known_codes: &'static [&'static str],
    },
}

pub fn run_explain(code: &str) -> ExplainOutput {
    match lookup_explanation(code) {
        Some(explanation) => ExplainOutput::Found(explanation),
        None => ExplainOutput::NotFound {
            code: code.to_string(),
            known_codes: all_codes(),
        },
    }
}

/// Format an explanation for terminal output.
pub fn format_explanation(exp: &Explanation) -> String {
    format!(
        "{}\n{}\n\n{}\n\nRemediation:\n{}\n\nBefore:\n{}\n\nAfter:\n{}\n",
        exp.title,
        "=".repeat(exp.title.len()),
        exp.description,
        exp.remediation,
        exp.examples.before,
        exp.examples.after
    )
}

/// Format the not-found message with the known codes.
pub fn format_unknown_code(code: &str, known_codes: &[&str]) -> String {
    let mut out = format!("unknown finding code: {code}\n\nKnown codes:\n");
    for known in known_codes {
        out.push_str(&format!("  {known}\n"));
    }
    out
}
