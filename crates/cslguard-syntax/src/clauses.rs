use crate::blocks::{Issue, RuleBlock};
use cslguard_types::ids;

/// Clauses extracted from one rule body.
///
/// `when`/`then`/`message` are required; each absent clause yields exactly
/// one error issue. Duplicated clauses keep the first occurrence and warn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleClauses {
    pub when: Option<(String, u32)>,
    pub then: Option<(String, u32)>,
    pub message: Option<(String, u32)>,
    pub priority: Option<(u32, u32)>,
    pub issues: Vec<Issue>,
}

/// Extract `when`/`then`/`message`/`priority` clauses from a rule body.
///
/// Clause extraction is line-oriented: each clause is one line, keyword
/// first. Lines that start with anything else are warned about and skipped.
pub fn parse_clauses(rule: &RuleBlock) -> RuleClauses {
    let mut clauses = RuleClauses::default();

    for (offset, raw) in rule.body.lines().enumerate() {
        let line_no = rule.body_line + offset as u32;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (keyword, rest) = match line.split_once(char::is_whitespace) {
            Some((k, r)) => (k, r.trim()),
            None => (line, ""),
        };

        match keyword {
            "when" => set_text_clause(&mut clauses.when, "when", rest, line_no, &mut clauses.issues),
            "then" => set_text_clause(&mut clauses.then, "then", rest, line_no, &mut clauses.issues),
            "message" => parse_message(&mut clauses, rest, line_no),
            "priority" => parse_priority(&mut clauses, rest, line_no),
            other => clauses.issues.push(Issue::warning(
                ids::CHECK_SYNTAX_RULE_CLAUSES,
                ids::CODE_MALFORMED_BLOCK,
                format!("unrecognized clause `{other}` in rule `{}`", rule.name),
                Some(line_no),
            )),
        }
    }

    for (slot, code, clause) in [
        (clauses.when.is_none(), ids::CODE_MISSING_WHEN, "when"),
        (clauses.then.is_none(), ids::CODE_MISSING_THEN, "then"),
        (
            clauses.message.is_none()
                && !clauses
                    .issues
                    .iter()
                    .any(|i| i.code == ids::CODE_UNTERMINATED_STRING),
            ids::CODE_MISSING_MESSAGE,
            "message",
        ),
    ] {
        if slot {
            clauses.issues.push(Issue::error(
                ids::CHECK_SYNTAX_RULE_CLAUSES,
                code,
                format!("rule `{}` is missing its `{clause}` clause", rule.name),
                Some(rule.line),
            ));
        }
    }

    clauses
}

fn set_text_clause(
    slot: &mut Option<(String, u32)>,
    name: &str,
    rest: &str,
    line_no: u32,
    issues: &mut Vec<Issue>,
) {
    if slot.is_some() {
        issues.push(Issue::warning(
            ids::CHECK_SYNTAX_RULE_CLAUSES,
            ids::CODE_DUPLICATE_CLAUSE,
            format!("duplicate `{name}` clause; the first occurrence wins"),
            Some(line_no),
        ));
        return;
    }
    *slot = Some((rest.to_string(), line_no));
}

fn parse_message(clauses: &mut RuleClauses, rest: &str, line_no: u32) {
    if clauses.message.is_some() {
        clauses.issues.push(Issue::warning(
            ids::CHECK_SYNTAX_RULE_CLAUSES,
            ids::CODE_DUPLICATE_CLAUSE,
            "duplicate `message` clause; the first occurrence wins".to_string(),
            Some(line_no),
        ));
        return;
    }
    match unquote(rest) {
        Some(text) => clauses.message = Some((text, line_no)),
        None => clauses.issues.push(Issue::error(
            ids::CHECK_SYNTAX_RULE_CLAUSES,
            ids::CODE_UNTERMINATED_STRING,
            "message must be a double-quoted string".to_string(),
            Some(line_no),
        )),
    }
}

fn parse_priority(clauses: &mut RuleClauses, rest: &str, line_no: u32) {
    if clauses.priority.is_some() {
        clauses.issues.push(Issue::warning(
            ids::CHECK_SYNTAX_RULE_CLAUSES,
            ids::CODE_DUPLICATE_CLAUSE,
            "duplicate `priority` clause; the first occurrence wins".to_string(),
            Some(line_no),
        ));
        return;
    }
    match rest.parse::<u32>() {
        Ok(value) => clauses.priority = Some((value, line_no)),
        Err(_) => clauses.issues.push(Issue::error(
            ids::CHECK_SYNTAX_RULE_CLAUSES,
            ids::CODE_INVALID_PRIORITY,
            format!("priority must be a non-negative integer, got `{rest}`"),
            Some(line_no),
        )),
    }
}

/// Unquote a double-quoted string with backslash escapes. Returns `None`
/// when the text is not a single, terminated string literal.
fn unquote(text: &str) -> Option<String> {
    let mut chars = text.chars();
    if chars.next() != Some('"') {
        return None;
    }
    let mut out = String::new();
    let mut escaped = false;
    for c in chars.by_ref() {
        if escaped {
            out.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            // Trailing garbage after the closing quote is tolerated.
            return Some(out);
        } else {
            out.push(c);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use cslguard_types::Severity;

    fn rule(body: &str) -> RuleBlock {
        RuleBlock {
            name: "cap".to_string(),
            line: 1,
            body_line: 1,
            body: body.to_string(),
        }
    }

    #[test]
    fn extracts_all_clauses() {
        let clauses = parse_clauses(&rule(
            "\nwhen amount > 50000\nthen escalate\nmessage \"exceeds limit\"\npriority 5\n",
        ));
        assert!(clauses.issues.is_empty());
        assert_eq!(clauses.when.as_ref().unwrap().0, "amount > 50000");
        assert_eq!(clauses.when.as_ref().unwrap().1, 2);
        assert_eq!(clauses.then.as_ref().unwrap().0, "escalate");
        assert_eq!(clauses.message.as_ref().unwrap().0, "exceeds limit");
        assert_eq!(clauses.priority, Some((5, 5)));
    }

    #[test]
    fn one_error_per_missing_clause() {
        let clauses = parse_clauses(&rule("\nwhen amount > 50000\n"));
        let codes: Vec<&str> = clauses.issues.iter().map(|i| i.code).collect();
        assert_eq!(
            codes,
            vec![
                cslguard_types::ids::CODE_MISSING_THEN,
                cslguard_types::ids::CODE_MISSING_MESSAGE
            ]
        );
    }

    #[test]
    fn duplicate_clause_keeps_first_and_warns() {
        let clauses = parse_clauses(&rule(
            "\nwhen amount > 1\nwhen amount > 2\nthen allow\nmessage \"m\"\n",
        ));
        assert_eq!(clauses.when.as_ref().unwrap().0, "amount > 1");
        assert_eq!(clauses.issues.len(), 1);
        assert_eq!(
            clauses.issues[0].code,
            cslguard_types::ids::CODE_DUPLICATE_CLAUSE
        );
        assert_eq!(clauses.issues[0].severity, Severity::Warning);
    }

    #[test]
    fn unterminated_message_is_an_error_not_also_missing() {
        let clauses = parse_clauses(&rule("\nwhen x > 1\nthen allow\nmessage \"oops\n"));
        let codes: Vec<&str> = clauses.issues.iter().map(|i| i.code).collect();
        assert_eq!(codes, vec![cslguard_types::ids::CODE_UNTERMINATED_STRING]);
    }

    #[test]
    fn message_with_escaped_quote() {
        let clauses =
            parse_clauses(&rule("\nwhen x > 1\nthen allow\nmessage \"say \\\"hi\\\"\"\n"));
        assert_eq!(clauses.message.as_ref().unwrap().0, "say \"hi\"");
    }

    #[test]
    fn bad_priority_is_an_error() {
        let clauses =
            parse_clauses(&rule("\nwhen x > 1\nthen allow\nmessage \"m\"\npriority soon\n"));
        assert!(
            clauses
                .issues
                .iter()
                .any(|i| i.code == cslguard_types::ids::CODE_INVALID_PRIORITY)
        );
    }

    #[test]
    fn unknown_clause_warns() {
        let clauses = parse_clauses(&rule("\nwhen x > 1\nthen allow\nmessage \"m\"\nseverity 3\n"));
        assert!(
            clauses
                .issues
                .iter()
                .any(|i| i.code == cslguard_types::ids::CODE_MALFORMED_BLOCK
                    && i.severity == Severity::Warning)
        );
    }
}
