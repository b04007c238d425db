//! Explain registry for finding codes.
//!
//! Maps finding codes to human-readable explanations with remediation guidance.

use crate::ids;

/// Explanation entry for a finding code.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short description of the code.
    pub title: &'static str,
    /// What the finding means and why it exists.
    pub description: &'static str,
    /// How to fix violations.
    pub remediation: &'static str,
    /// Before/after policy-source examples.
    pub examples: ExamplePair,
}

/// Before and after policy-source examples.
#[derive(Debug, Clone)]
pub struct ExamplePair {
    /// Source that would trigger the finding.
    pub before: &'static str,
    /// Source that passes.
    pub after: &'static str,
}

/// Look up an explanation by finding code.
///
/// Returns `None` if the code is not recognized.
pub fn lookup_explanation(code: &str) -> Option<Explanation> {
    match code {
        ids::CODE_NO_POLICY_BLOCKS => Some(explain_no_policy_blocks()),
        ids::CODE_UNBALANCED_BRACES => Some(explain_unbalanced_braces()),
        ids::CODE_MISSING_WHEN => Some(explain_missing_clause("Missing `when` Clause", "when")),
        ids::CODE_MISSING_THEN => Some(explain_missing_clause("Missing `then` Clause", "then")),
        ids::CODE_MISSING_MESSAGE => {
            Some(explain_missing_clause("Missing `message` Clause", "message"))
        }
        ids::CODE_INVALID_CONDITION => Some(explain_invalid_condition()),
        ids::CODE_INVALID_ACTION => Some(explain_invalid_action()),
        ids::CODE_DUPLICATE_POLICY => Some(explain_duplicate_policy()),
        ids::CODE_EMPTY_POLICY => Some(explain_empty_policy()),
        ids::CODE_MISSING_REQUIRED_POLICY => Some(explain_missing_required_policy()),
        ids::CODE_DEAD_RULE => Some(explain_dead_rule()),
        ids::CODE_CONTRADICTORY_RULES => Some(explain_contradictory_rules()),
        _ => None,
    }
}

/// List all codes present in the registry.
pub fn all_codes() -> &'static [&'static str] {
    &[
        ids::CODE_NO_POLICY_BLOCKS,
        ids::CODE_UNBALANCED_BRACES,
        ids::CODE_MISSING_WHEN,
        ids::CODE_MISSING_THEN,
        ids::CODE_MISSING_MESSAGE,
        ids::CODE_INVALID_CONDITION,
        ids::CODE_INVALID_ACTION,
        ids::CODE_DUPLICATE_POLICY,
        ids::CODE_EMPTY_POLICY,
        ids::CODE_MISSING_REQUIRED_POLICY,
        ids::CODE_DEAD_RULE,
        ids::CODE_CONTRADICTORY_RULES,
    ]
}

fn explain_no_policy_blocks() -> Explanation {
    Explanation {
        title: "No Policy Blocks Found",
        description: "\
The file contains no top-level `policy <name> { ... }` blocks.

Every CSL file must declare at least one policy. A file with no policy
blocks is rejected rather than silently accepted, so that an empty or
mis-saved file cannot weaken the active guardrails.",
        remediation: "\
Wrap the rules in a named policy block:

    policy budget_limits {
        rule cap {
            when amount > 50000
            then escalate
            message \"exceeds auto-approval limit\"
        }
    }",
        examples: ExamplePair {
            before: r#"rule cap {
    when amount > 50000
    then escalate
    message "exceeds auto-approval limit"
}"#,
            after: r#"policy budget_limits {
    rule cap {
        when amount > 50000
        then escalate
        message "exceeds auto-approval limit"
    }
}"#,
        },
    }
}

fn explain_unbalanced_braces() -> Explanation {
    Explanation {
        title: "Unbalanced Braces",
        description: "\
The file's opening and closing brace counts differ (string literals are
excluded from the count). This is reported independently of whether any
policy or rule was still extractable, because a truncated or mis-edited
file must never be partially loaded.",
        remediation: "\
Close every `policy` and `rule` block. Check the end of the file first;
a missing final `}` is the most common cause.",
        examples: ExamplePair {
            before: r#"policy budget_limits {
    rule cap {
        when amount > 50000
        then escalate
        message "exceeds auto-approval limit"
"#,
            after: r#"policy budget_limits {
    rule cap {
        when amount > 50000
        then escalate
        message "exceeds auto-approval limit"
    }
}"#,
        },
    }
}

fn explain_missing_clause(title: &'static str, clause: &'static str) -> Explanation {
    let (description, remediation) = match clause {
        "when" => (
            "The rule has no `when` clause. Every rule needs a condition; a rule \
without one cannot be evaluated and is excluded from the active rule set."
                as &'static str,
            "Add a `when <condition>` line to the rule body." as &'static str,
        ),
        "then" => (
            "The rule has no `then` clause. Every rule needs an action (reject, \
escalate, repair, allow, ...); a rule without one is excluded from the \
active rule set.",
            "Add a `then <action>` line to the rule body.",
        ),
        _ => (
            "The rule has no `message` clause. The message is relayed to humans \
in verdict rationales and escalation notices; a rule without one is \
excluded from the active rule set.",
            "Add a `message \"<human-readable string>\"` line to the rule body.",
        ),
    };
    Explanation {
        title,
        description,
        remediation,
        examples: ExamplePair {
            before: r#"rule cap {
    when amount > 50000
}"#,
            after: r#"rule cap {
    when amount > 50000
    then escalate
    message "exceeds auto-approval limit"
}"#,
        },
    }
}

fn explain_invalid_condition() -> Explanation {
    Explanation {
        title: "Invalid Condition Expression",
        description: "\
The rule's `when` expression does not parse. Conditions are comparisons of
named variables against literals (number, string, boolean), combinable
with `and`, `or`, `not`, and parentheses.",
        remediation: "\
Fix the expression. Supported operators: `==`, `!=`, `<`, `<=`, `>`, `>=`,
`and`/`&&`, `or`/`||`, `not`/`!`.",
        examples: ExamplePair {
            before: r#"when amount >> 50000"#,
            after: r#"when amount > 50000 and currency == "USD""#,
        },
    }
}

fn explain_invalid_action() -> Explanation {
    Explanation {
        title: "Invalid Action Expression",
        description: "\
The rule's `then` expression does not start with a known action keyword.
Recognized actions: `reject`/`deny`/`block`, `escalate`/`review`,
`repair`, `allow`/`approve`/`log`/`notify`/`flag`.",
        remediation: "Start the `then` clause with one of the recognized action keywords.",
        examples: ExamplePair {
            before: r#"then terminate"#,
            after: r#"then escalate"#,
        },
    }
}

fn explain_duplicate_policy() -> Explanation {
    Explanation {
        title: "Duplicate Policy Name",
        description: "\
Two policy blocks in the loaded set share the same name. Policies are keyed
by name; duplicates are a load-time error rather than being silently
merged, because merge order would make the effective guardrails depend on
file enumeration order.",
        remediation: "\
Rename one of the policies, or consolidate the rules into a single block.",
        examples: ExamplePair {
            before: r#"# a.csl
policy budget_limits { ... }

# b.csl
policy budget_limits { ... }"#,
            after: r#"# a.csl
policy budget_limits { ... }

# b.csl
policy contract_limits { ... }"#,
        },
    }
}

fn explain_empty_policy() -> Explanation {
    Explanation {
        title: "Empty Policy",
        description: "\
The policy block contains no rule blocks. A policy must contain at least
one rule; an empty policy would look configured while enforcing nothing.",
        remediation: "Add at least one rule block, or remove the policy.",
        examples: ExamplePair {
            before: r#"policy data_access {
}"#,
            after: r#"policy data_access {
    rule deny_raw_pii {
        when dataset == "pii_raw"
        then reject
        message "raw PII may not be queried directly"
    }
}"#,
        },
    }
}

fn explain_missing_required_policy() -> Explanation {
    Explanation {
        title: "Missing Required Policy",
        description: "\
A policy name the deployment requires (by default: budget_limits,
action_gates, data_access, guardian) is absent from the entire loaded set.
This is a configuration error distinct from per-file syntax errors: the
files may all be well-formed, yet the system would run without one of its
mandatory guardrail categories.",
        remediation: "\
Add a policy block with the required name to one of the loaded files, or
adjust `required_policies` in cslguard.toml if the deployment genuinely
does not need it.",
        examples: ExamplePair {
            before: r#"# cslguard.toml
required_policies = ["budget_limits", "data_access"]
# ...but no file declares `policy data_access`"#,
            after: r#"policy data_access {
    rule deny_raw_pii {
        when dataset == "pii_raw"
        then reject
        message "raw PII may not be queried directly"
    }
}"#,
        },
    }
}

fn explain_dead_rule() -> Explanation {
    Explanation {
        title: "Dead Rule",
        description: "\
The consistency check proved the rule's condition unsatisfiable: no
decision context can ever trigger it. The rule is dead weight and probably
a typo (e.g. contradictory bounds on the same variable).",
        remediation: "Fix the condition's bounds, or delete the rule.",
        examples: ExamplePair {
            before: r#"when amount > 50000 and amount < 1000"#,
            after: r#"when amount > 50000"#,
        },
    }
}

fn explain_contradictory_rules() -> Explanation {
    Explanation {
        title: "Contradictory Rules",
        description: "\
Two rules in the same policy have conditions that can be satisfied by the
same decision context while prescribing contradictory actions (one
rejects, the other allows). Which one wins then depends on rule order,
which is rarely what the policy author intended.",
        remediation: "\
Tighten one condition so the two rules no longer overlap, or make the
intended precedence explicit with the `priority` clause.",
        examples: ExamplePair {
            before: r#"rule allow_small { when amount < 10000 then allow ... }
rule deny_flagged { when amount < 50000 then reject ... }"#,
            after: r#"rule allow_small { when amount < 10000 then allow ... }
rule deny_flagged { when amount >= 10000 and amount < 50000 then reject ... }"#,
        },
    }
}
