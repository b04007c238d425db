use crate::compile::FileModel;
use cslguard_types::{ids, Finding, Location, Severity};
use std::collections::BTreeMap;

/// Policy names must be unique across the loaded set; duplicates are an
/// error, never silently merged.
pub fn run(files: &[FileModel], out: &mut Vec<Finding>) {
    let mut first_seen: BTreeMap<&str, &FileModel> = BTreeMap::new();

    for file in files {
        for policy in &file.policies {
            match first_seen.get(policy.name.as_str()) {
                None => {
                    first_seen.insert(&policy.name, file);
                }
                Some(first) => out.push(Finding {
                    severity: Severity::Error,
                    check_id: ids::CHECK_POLICY_STRUCTURE.to_string(),
                    code: ids::CODE_DUPLICATE_POLICY.to_string(),
                    message: format!(
                        "policy `{}` is already declared in {}",
                        policy.name,
                        first.path.as_str()
                    ),
                    location: Some(Location {
                        path: file.path.clone(),
                        line: Some(policy.line),
                    }),
                    policy: Some(policy.name.clone()),
                    rule: None,
                    help: Some("rename one of the policies or merge their rules".to_string()),
                    fingerprint: None,
                }),
            }
        }
    }
}
