//! Compile parsed blocks into the policy model, recording findings.
//!
//! Compilation is total per file: every violation is reported in one pass,
//! invalid rules are excluded, and sibling rules keep compiling.

use crate::model::{Policy, Rule};
use cslguard_syntax::{classify_action, parse_clauses, parse_expr, FileBlocks, Issue};
use cslguard_types::{ids, Finding, Location, Severity, SourcePath};

/// One source file compiled into model form, with its findings.
#[derive(Clone, Debug)]
pub struct FileModel {
    pub path: SourcePath,
    /// Policy names declared in this file, in declaration order.
    pub policy_names: Vec<String>,
    /// Rule names declared in this file, qualified as `policy.rule`.
    pub rule_names: Vec<String>,
    /// Compiled policies; invalid rules are excluded from them.
    pub policies: Vec<Policy>,
    pub findings: Vec<Finding>,
}

impl FileModel {
    /// A file that could not be read contributes nothing but an error.
    pub fn unreadable(path: SourcePath, reason: &str) -> Self {
        let finding = Finding {
            severity: Severity::Error,
            check_id: ids::CHECK_SOURCE_IO.to_string(),
            code: ids::CODE_UNREADABLE_FILE.to_string(),
            message: format!("failed to read policy source: {reason}"),
            location: Some(Location {
                path: path.clone(),
                line: None,
            }),
            policy: None,
            rule: None,
            help: None,
            fingerprint: None,
        };
        Self {
            path,
            policy_names: Vec::new(),
            rule_names: Vec::new(),
            policies: Vec::new(),
            findings: vec![finding],
        }
    }
}

/// All files of one load attempt.
#[derive(Clone, Debug, Default)]
pub struct CandidateModel {
    pub files: Vec<FileModel>,
}

/// Compile one file's extracted blocks into model form.
pub fn compile_file(path: &SourcePath, blocks: &FileBlocks) -> FileModel {
    let mut findings: Vec<Finding> = blocks
        .issues
        .iter()
        .map(|issue| finding_from_issue(path, issue, None, None))
        .collect();

    let mut policy_names = Vec::new();
    let mut rule_names = Vec::new();
    let mut policies = Vec::new();

    for block in &blocks.policies {
        policy_names.push(block.name.clone());

        if block.rules.is_empty() {
            findings.push(Finding {
                severity: Severity::Error,
                check_id: ids::CHECK_POLICY_STRUCTURE.to_string(),
                code: ids::CODE_EMPTY_POLICY.to_string(),
                message: format!("policy `{}` contains no rules", block.name),
                location: Some(Location {
                    path: path.clone(),
                    line: Some(block.line),
                }),
                policy: Some(block.name.clone()),
                rule: None,
                help: None,
                fingerprint: None,
            });
        }

        let mut rules = Vec::new();
        for rule_block in &block.rules {
            rule_names.push(format!("{}.{}", block.name, rule_block.name));

            let clauses = parse_clauses(rule_block);
            let clause_errors = clauses
                .issues
                .iter()
                .any(|i| i.severity == Severity::Error);
            findings.extend(clauses.issues.iter().map(|issue| {
                finding_from_issue(path, issue, Some(&block.name), Some(&rule_block.name))
            }));

            let (Some(when), Some(then), Some(message)) =
                (&clauses.when, &clauses.then, &clauses.message)
            else {
                continue;
            };
            if clause_errors {
                continue;
            }

            let condition = match parse_expr(&when.0) {
                Ok(expr) => expr,
                Err(err) => {
                    findings.push(Finding {
                        severity: Severity::Error,
                        check_id: ids::CHECK_SYNTAX_EXPRESSIONS.to_string(),
                        code: ids::CODE_INVALID_CONDITION.to_string(),
                        message: format!(
                            "rule `{}.{}` has an invalid condition: {err}",
                            block.name, rule_block.name
                        ),
                        location: Some(Location {
                            path: path.clone(),
                            line: Some(when.1),
                        }),
                        policy: Some(block.name.clone()),
                        rule: Some(rule_block.name.clone()),
                        help: None,
                        fingerprint: None,
                    });
                    continue;
                }
            };

            let Some(action) = classify_action(&then.0) else {
                findings.push(Finding {
                    severity: Severity::Error,
                    check_id: ids::CHECK_SYNTAX_EXPRESSIONS.to_string(),
                    code: ids::CODE_INVALID_ACTION.to_string(),
                    message: format!(
                        "rule `{}.{}` has an unrecognized action `{}`",
                        block.name, rule_block.name, then.0
                    ),
                    location: Some(Location {
                        path: path.clone(),
                        line: Some(then.1),
                    }),
                    policy: Some(block.name.clone()),
                    rule: Some(rule_block.name.clone()),
                    help: Some(
                        "actions start with reject, deny, block, escalate, review, repair, \
                         allow, approve, log, notify, or flag"
                            .to_string(),
                    ),
                    fingerprint: None,
                });
                continue;
            };

            rules.push(Rule {
                name: rule_block.name.clone(),
                condition,
                condition_text: when.0.clone(),
                action,
                action_text: then.0.clone(),
                message: message.0.clone(),
                priority: clauses.priority.map(|(value, _)| value),
                line: rule_block.line,
            });
        }

        let mut policy = Policy {
            name: block.name.clone(),
            source: path.clone(),
            line: block.line,
            rules,
        };
        policy.order_rules();
        policies.push(policy);
    }

    FileModel {
        path: path.clone(),
        policy_names,
        rule_names,
        policies,
        findings,
    }
}

fn finding_from_issue(
    path: &SourcePath,
    issue: &Issue,
    policy: Option<&str>,
    rule: Option<&str>,
) -> Finding {
    Finding {
        severity: issue.severity,
        check_id: issue.check_id.to_string(),
        code: issue.code.to_string(),
        message: issue.message.clone(),
        location: Some(Location {
            path: path.clone(),
            line: issue.line,
        }),
        policy: policy.map(String::from),
        rule: rule.map(String::from),
        help: None,
        fingerprint: None,
    }
}
