//! Stable DTOs and IDs used across the cslguard workspace.
//!
//! This crate is intentionally boring:
//! - data types for the emitted load report and runtime verdict
//! - stable string IDs and codes
//! - canonical source-relative path handling
//! - explain registry for remediation guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod path;
pub mod report;
pub mod verdict;

pub use explain::{all_codes, lookup_explanation, Explanation};
pub use path::SourcePath;
pub use report::{
    FileSummary, Finding, LoadData, LoadVerdict, Location, ReportEnvelope, Severity, ToolMeta,
    SCHEMA_REPORT_V1,
};
pub use verdict::{Outcome, TriggeredRule, Verdict};
