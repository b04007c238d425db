//! Stable identifiers for validation checks and finding codes.
//!
//! `check_id` is a dotted namespace. `code` is a short snake_case discriminator.

// Checks
pub const CHECK_SYNTAX_BLOCKS: &str = "syntax.blocks";
pub const CHECK_SYNTAX_RULE_CLAUSES: &str = "syntax.rule_clauses";
pub const CHECK_SYNTAX_EXPRESSIONS: &str = "syntax.expressions";
pub const CHECK_POLICY_STRUCTURE: &str = "policy.structure";
pub const CHECK_POLICY_REQUIRED: &str = "policy.required";
pub const CHECK_POLICY_CONSISTENCY: &str = "policy.consistency";
pub const CHECK_SOURCE_IO: &str = "source.io";

// Codes: syntax.blocks
pub const CODE_NO_POLICY_BLOCKS: &str = "no_policy_blocks";
pub const CODE_UNBALANCED_BRACES: &str = "unbalanced_braces";
pub const CODE_MALFORMED_BLOCK: &str = "malformed_block";

// Codes: syntax.rule_clauses
pub const CODE_MISSING_WHEN: &str = "missing_when";
pub const CODE_MISSING_THEN: &str = "missing_then";
pub const CODE_MISSING_MESSAGE: &str = "missing_message";
pub const CODE_DUPLICATE_CLAUSE: &str = "duplicate_clause";
pub const CODE_UNTERMINATED_STRING: &str = "unterminated_string";
pub const CODE_INVALID_PRIORITY: &str = "invalid_priority";

// Codes: syntax.expressions
pub const CODE_INVALID_CONDITION: &str = "invalid_condition";
pub const CODE_INVALID_ACTION: &str = "invalid_action";

// Codes: policy.structure
pub const CODE_DUPLICATE_POLICY: &str = "duplicate_policy";
pub const CODE_EMPTY_POLICY: &str = "empty_policy";

// Codes: policy.required
pub const CODE_MISSING_REQUIRED_POLICY: &str = "missing_required_policy";

// Codes: policy.consistency
pub const CODE_DEAD_RULE: &str = "dead_rule";
pub const CODE_CONTRADICTORY_RULES: &str = "contradictory_rules";

// Codes: source.io
pub const CODE_UNREADABLE_FILE: &str = "unreadable_file";
