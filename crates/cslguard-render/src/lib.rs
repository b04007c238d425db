//! Deterministic renderers over the load report envelope.

#![forbid(unsafe_code)]

mod markdown;
mod text;

pub use markdown::render_markdown;
pub use text::render_summary;

use cslguard_types::ReportEnvelope;

/// Serialize the report envelope as pretty JSON with a trailing newline.
pub fn serialize_report(report: &ReportEnvelope) -> serde_json::Result<String> {
    let mut out = serde_json::to_string_pretty(report)?;
    out.push('\n');
    Ok(out)
}
