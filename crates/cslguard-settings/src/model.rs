use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `cslguard.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so
/// forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CslguardConfigV1 {
    /// Optional schema string for tooling (`cslguard.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,

    /// Directory scanned for policy sources, relative to the root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy_dir: Option<String>,

    /// Policy-source file extension, without the leading dot.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,

    /// When to fail the load: `error` (default) or `warning`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fail_on: Option<String>,

    /// Run the consistency checker at load time.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub consistency: Option<bool>,

    /// Policy names that must be present across the loaded set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required_policies: Option<Vec<String>>,
}
