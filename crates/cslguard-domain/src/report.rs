use crate::model::RuleSet;
use cslguard_types::{FileSummary, Finding, LoadData, LoadVerdict, Severity};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub info: u32,
    pub warning: u32,
    pub error: u32,
}

impl SeverityCounts {
    pub fn from_findings<'a>(findings: impl IntoIterator<Item = &'a Finding>) -> Self {
        let mut counts = SeverityCounts::default();
        for f in findings {
            match f.severity {
                Severity::Info => counts.info += 1,
                Severity::Warning => counts.warning += 1,
                Severity::Error => counts.error += 1,
            }
        }
        counts
    }
}

/// Output of a full validation pass.
///
/// `ruleset` is `Some` only when the candidate may be activated (verdict is
/// not `Fail`): activation is all-or-nothing.
#[derive(Clone, Debug)]
pub struct DomainReport {
    pub verdict: LoadVerdict,
    pub files: Vec<FileSummary>,
    /// Cross-file findings (duplicate policies, missing required policies).
    pub findings: Vec<Finding>,
    pub counts: SeverityCounts,
    pub data: LoadData,
    pub ruleset: Option<RuleSet>,
}
