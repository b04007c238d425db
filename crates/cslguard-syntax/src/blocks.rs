use crate::source::{brace_balance, strip_comments};
use cslguard_types::{ids, Severity};

/// Syntax issue found while scanning a source file.
///
/// Issues carry stable check/code identifiers; the domain layer turns them
/// into report findings with file attribution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Issue {
    pub check_id: &'static str,
    pub code: &'static str,
    pub severity: Severity,
    pub message: String,
    pub line: Option<u32>,
}

impl Issue {
    pub fn error(
        check_id: &'static str,
        code: &'static str,
        message: impl Into<String>,
        line: Option<u32>,
    ) -> Self {
        Self {
            check_id,
            code,
            severity: Severity::Error,
            message: message.into(),
            line,
        }
    }

    pub fn warning(
        check_id: &'static str,
        code: &'static str,
        message: impl Into<String>,
        line: Option<u32>,
    ) -> Self {
        Self {
            check_id,
            code,
            severity: Severity::Warning,
            message: message.into(),
            line,
        }
    }
}

/// A `rule <name> { ... }` block. `body` is the text between the braces;
/// `body_line` is the line holding the opening brace, so clause offsets can
/// be mapped back to source lines.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RuleBlock {
    pub name: String,
    pub line: u32,
    pub body_line: u32,
    pub body: String,
}

/// A top-level `policy <name> { ... }` block with its rule blocks in
/// declaration order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PolicyBlock {
    pub name: String,
    pub line: u32,
    pub rules: Vec<RuleBlock>,
}

/// Block-extraction result for one source file.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FileBlocks {
    pub policies: Vec<PolicyBlock>,
    pub issues: Vec<Issue>,
}

/// Locate `policy`/`rule` blocks in raw source text.
///
/// Comments are stripped first; braces are tracked by depth (string
/// literals excluded) so nested braces inside a rule body are handled.
/// A file with zero policy blocks and any brace-count mismatch are both
/// reported as issues, independently of each other.
pub fn extract_blocks(source: &str) -> FileBlocks {
    let stripped = strip_comments(source);
    let mut issues = Vec::new();

    let counts = brace_balance(&stripped);
    if !counts.balanced() {
        issues.push(Issue::error(
            ids::CHECK_SYNTAX_BLOCKS,
            ids::CODE_UNBALANCED_BRACES,
            format!(
                "unbalanced braces: {} opening vs {} closing",
                counts.open, counts.close
            ),
            None,
        ));
    }

    let mut policies = Vec::new();
    let mut sc = Scanner::new(&stripped);
    let mut depth: i32 = 0;
    loop {
        match sc.peek() {
            None => break,
            Some('"') => {
                sc.bump();
                sc.skip_string();
            }
            Some('{') => {
                depth += 1;
                sc.bump();
            }
            Some('}') => {
                depth -= 1;
                sc.bump();
            }
            Some(c) if is_word_start(c) => {
                let word = sc.read_word();
                if word == "policy" && depth == 0 {
                    parse_policy(&mut sc, &mut policies, &mut issues);
                }
            }
            Some(_) => {
                sc.bump();
            }
        }
    }

    if policies.is_empty() {
        issues.push(Issue::error(
            ids::CHECK_SYNTAX_BLOCKS,
            ids::CODE_NO_POLICY_BLOCKS,
            "no policy blocks found",
            None,
        ));
    }

    FileBlocks { policies, issues }
}

fn parse_policy(sc: &mut Scanner, policies: &mut Vec<PolicyBlock>, issues: &mut Vec<Issue>) {
    let header_line = sc.line;
    let Some(name) = sc.read_ident() else {
        issues.push(Issue::error(
            ids::CHECK_SYNTAX_BLOCKS,
            ids::CODE_MALFORMED_BLOCK,
            "policy block missing a name",
            Some(header_line),
        ));
        return;
    };
    sc.skip_ws();
    if sc.peek() != Some('{') {
        issues.push(Issue::error(
            ids::CHECK_SYNTAX_BLOCKS,
            ids::CODE_MALFORMED_BLOCK,
            format!("policy `{name}` has no opening brace"),
            Some(header_line),
        ));
        return;
    }
    sc.bump();

    let mut rules = Vec::new();
    let mut depth: i32 = 0;
    loop {
        match sc.peek() {
            // EOF before the policy closed; the brace-mismatch issue covers it.
            None => break,
            Some('"') => {
                sc.bump();
                sc.skip_string();
            }
            Some('{') => {
                depth += 1;
                sc.bump();
            }
            Some('}') => {
                sc.bump();
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            Some(c) if is_word_start(c) => {
                let word = sc.read_word();
                if word == "rule" && depth == 0 {
                    if let Some(rule) = parse_rule(sc, &name, issues) {
                        rules.push(rule);
                    }
                }
            }
            Some(_) => {
                sc.bump();
            }
        }
    }

    policies.push(PolicyBlock {
        name,
        line: header_line,
        rules,
    });
}

fn parse_rule(sc: &mut Scanner, policy: &str, issues: &mut Vec<Issue>) -> Option<RuleBlock> {
    let header_line = sc.line;
    let Some(name) = sc.read_ident() else {
        issues.push(Issue::error(
            ids::CHECK_SYNTAX_BLOCKS,
            ids::CODE_MALFORMED_BLOCK,
            format!("rule block in policy `{policy}` missing a name"),
            Some(header_line),
        ));
        return None;
    };
    sc.skip_ws();
    if sc.peek() != Some('{') {
        issues.push(Issue::error(
            ids::CHECK_SYNTAX_BLOCKS,
            ids::CODE_MALFORMED_BLOCK,
            format!("rule `{name}` has no opening brace"),
            Some(header_line),
        ));
        return None;
    }
    let body_line = sc.line;
    sc.bump();

    let mut body = String::new();
    let mut depth: i32 = 0;
    loop {
        match sc.peek() {
            None => break,
            Some('"') => {
                body.push('"');
                sc.bump();
                sc.capture_string(&mut body);
            }
            Some('{') => {
                depth += 1;
                body.push('{');
                sc.bump();
            }
            Some('}') => {
                if depth == 0 {
                    sc.bump();
                    break;
                }
                depth -= 1;
                body.push('}');
                sc.bump();
            }
            Some(c) => {
                body.push(c);
                sc.bump();
            }
        }
    }

    Some(RuleBlock {
        name,
        line: header_line,
        body_line,
        body,
    })
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

struct Scanner {
    chars: Vec<char>,
    pos: usize,
    line: u32,
}

impl Scanner {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    /// Consume to the closing quote; the opening quote is already consumed.
    fn skip_string(&mut self) {
        let mut escaped = false;
        while let Some(c) = self.bump() {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                break;
            }
        }
    }

    /// Like `skip_string`, but copies the consumed text (closing quote
    /// included) into `out`.
    fn capture_string(&mut self, out: &mut String) {
        let mut escaped = false;
        while let Some(c) = self.bump() {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                break;
            }
        }
    }

    fn read_word(&mut self) -> String {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_alphanumeric() || c == '_' || c == '.' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        s
    }

    fn read_ident(&mut self) -> Option<String> {
        self.skip_ws();
        let s = self.read_word();
        if s.is_empty() { None } else { Some(s) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SAMPLE: &str = r#"# budget guardrails
policy budget_limits {
    rule cap {
        when amount > 50000
        then escalate
        message "exceeds auto-approval limit"
    }

    rule small_fast_path {
        when amount <= 1000
        then allow
        message "small spend fast path"
    }
}
"#;

    #[test]
    fn extracts_policies_and_rules_with_lines() {
        let blocks = extract_blocks(SAMPLE);
        assert!(blocks.issues.is_empty());
        assert_eq!(blocks.policies.len(), 1);

        let policy = &blocks.policies[0];
        assert_eq!(policy.name, "budget_limits");
        assert_eq!(policy.line, 2);
        assert_eq!(policy.rules.len(), 2);
        assert_eq!(policy.rules[0].name, "cap");
        assert_eq!(policy.rules[0].line, 3);
        assert_eq!(policy.rules[1].name, "small_fast_path");
        assert!(policy.rules[0].body.contains("when amount > 50000"));
    }

    #[test]
    fn nested_braces_in_rule_body_are_kept() {
        let src = r#"policy p {
    rule r {
        when amount > 1
        then repair { amount = 1 }
        message "clamped"
    }
}
"#;
        let blocks = extract_blocks(src);
        assert!(blocks.issues.is_empty());
        assert_eq!(blocks.policies[0].rules.len(), 1);
        assert!(blocks.policies[0].rules[0].body.contains("{ amount = 1 }"));
    }

    #[test]
    fn zero_policy_blocks_is_an_error() {
        let blocks = extract_blocks("this is not valid CSL content\n");
        assert!(blocks.policies.is_empty());
        assert!(
            blocks
                .issues
                .iter()
                .any(|i| i.code == cslguard_types::ids::CODE_NO_POLICY_BLOCKS)
        );
    }

    #[test]
    fn brace_mismatch_is_reported_alongside_extracted_blocks() {
        let src = "policy p {\n    rule r {\n        when x > 1\n";
        let blocks = extract_blocks(src);
        assert!(
            blocks
                .issues
                .iter()
                .any(|i| i.code == cslguard_types::ids::CODE_UNBALANCED_BRACES)
        );
        // The policy and rule are still surfaced for reporting purposes.
        assert_eq!(blocks.policies.len(), 1);
        assert_eq!(blocks.policies[0].rules.len(), 1);
    }

    #[test]
    fn policy_without_name_is_malformed() {
        let blocks = extract_blocks("policy { }\n");
        assert!(
            blocks
                .issues
                .iter()
                .any(|i| i.code == cslguard_types::ids::CODE_MALFORMED_BLOCK)
        );
    }

    #[test]
    fn multiple_policies_in_one_file() {
        let src = "policy a { rule r1 { when x > 1 then allow message \"m\" } }\n\
                   policy b { rule r2 { when y > 1 then reject message \"m\" } }\n";
        let blocks = extract_blocks(src);
        let names: Vec<&str> = blocks.policies.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    proptest! {
        #[test]
        fn extract_blocks_never_panics(input in ".*") {
            let _ = extract_blocks(&input);
        }
    }
}
