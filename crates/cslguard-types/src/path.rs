use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Canonical policy-source path used in findings and reports.
///
/// Normalization rules are intentionally simple and deterministic:
/// - always forward slashes (`/`)
/// - no leading `./`
/// - never empty
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct SourcePath(String);

impl Default for SourcePath {
    fn default() -> Self {
        SourcePath::new(".")
    }
}

impl SourcePath {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        let mut v = s.as_ref().replace('\\', "/");
        while v.starts_with("./") {
            v = v.trim_start_matches("./").to_string();
        }
        // Avoid empty path; keep it explicit.
        if v.is_empty() {
            v = ".".to_string();
        }
        Self(v)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_utf8_pathbuf(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.0.clone())
    }

    pub fn file_name(&self) -> Option<&str> {
        Utf8Path::new(self.as_str()).file_name()
    }
}

impl From<&Utf8Path> for SourcePath {
    fn from(value: &Utf8Path) -> Self {
        SourcePath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for SourcePath {
    fn from(value: Utf8PathBuf) -> Self {
        SourcePath::new(value.as_str())
    }
}
