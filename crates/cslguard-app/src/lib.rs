//! Use case orchestration for cslguard.
//!
//! This crate provides the application layer: use cases that coordinate the
//! settings, loader, domain, and render layers. It is intentionally thin and
//! delegates heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod active;
mod decide;
mod explain;
mod validate;

pub use active::ActiveRuleSet;
pub use decide::{outcome_exit_code, parse_scope, run_decide, DecideInput};
pub use explain::{format_explanation, format_unknown_code, run_explain, ExplainOutput};
pub use validate::{run_validate, run_validate_with, verdict_exit_code, ValidateInput, ValidateOutput};
