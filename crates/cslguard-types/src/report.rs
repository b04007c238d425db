use crate::SourcePath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for cslguard load reports.
pub const SCHEMA_REPORT_V1: &str = "cslguard.report.v1";

/// Severity is intentionally small: it maps cleanly to load gating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Location {
    pub path: SourcePath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub severity: Severity,
    pub check_id: String,
    pub code: String,
    pub message: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,

    /// Policy the finding belongs to, when attributable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    /// Rule the finding belongs to, when attributable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Stable identifier intended for dedup and trending. Typically a hash of:
    /// `code + path + policy + rule`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoadVerdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Per-file slice of the load report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileSummary {
    pub path: SourcePath,
    /// Policy names declared in this file, in declaration order.
    pub policies: Vec<String>,
    /// Rule names declared in this file, qualified as `policy.rule`.
    pub rules: Vec<String>,
    pub findings: Vec<Finding>,
}

impl FileSummary {
    /// A file passes when none of its findings is an error.
    pub fn passed(&self) -> bool {
        !self.findings.iter().any(|f| f.severity == Severity::Error)
    }
}

/// Aggregate totals for the load report.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoadData {
    pub files_scanned: u32,
    pub policies_total: u32,
    pub rules_total: u32,
    pub errors_total: u32,
    pub warnings_total: u32,
}

/// Envelope written as the load report artifact.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: LoadVerdict,
    pub files: Vec<FileSummary>,
    /// Findings not attributable to a single file (e.g. a required policy
    /// missing from the entire loaded set).
    pub findings: Vec<Finding>,
    pub data: LoadData,
}
