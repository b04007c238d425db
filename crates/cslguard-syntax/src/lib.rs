//! IO-free CSL source analysis.
//!
//! Input: raw policy-source text.
//! Output: policy/rule blocks, rule clauses, parsed expressions, and
//! syntax issues — all without touching the filesystem.
//!
//! These functions are designed to never panic on any input.

#![forbid(unsafe_code)]

mod blocks;
mod clauses;
mod expr;
mod source;

pub use blocks::{extract_blocks, FileBlocks, Issue, PolicyBlock, RuleBlock};
pub use clauses::{parse_clauses, RuleClauses};
pub use expr::{classify_action, parse_expr, ActionKind, CmpOp, Expr, ExprError, Literal};
pub use source::{brace_balance, strip_comments, BraceCounts};
