use crate::compile::FileModel;
use crate::config::ValidationConfig;
use cslguard_types::{ids, Finding, Severity};
use std::collections::BTreeSet;

/// A fixed set of policy names must exist across the entire loaded set.
///
/// Absence is a configuration error distinct from per-file syntax errors:
/// every file may be well-formed while a mandatory guardrail category is
/// still missing.
pub fn run(files: &[FileModel], cfg: &ValidationConfig, out: &mut Vec<Finding>) {
    let declared: BTreeSet<&str> = files
        .iter()
        .flat_map(|f| f.policy_names.iter().map(String::as_str))
        .collect();

    for required in &cfg.required_policies {
        if !declared.contains(required.as_str()) {
            out.push(Finding {
                severity: Severity::Error,
                check_id: ids::CHECK_POLICY_REQUIRED.to_string(),
                code: ids::CODE_MISSING_REQUIRED_POLICY.to_string(),
                message: format!("required policy `{required}` is missing from the loaded set"),
                location: None,
                policy: Some(required.clone()),
                rule: None,
                help: Some(format!(
                    "declare a `policy {required} {{ ... }}` block in one of the policy files, \
                     or adjust required_policies in cslguard.toml"
                )),
                fingerprint: None,
            });
        }
    }
}
