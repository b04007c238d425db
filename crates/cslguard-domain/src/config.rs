/// When the aggregate load verdict becomes `Fail`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailOn {
    Error,
    Warning,
}

/// Effective validation configuration resolved by the settings layer.
#[derive(Clone, Debug)]
pub struct ValidationConfig {
    pub profile: String,
    pub fail_on: FailOn,
    /// Run the consistency checker at load time.
    pub consistency: bool,
    /// Policy names that must be present across the entire loaded set.
    pub required_policies: Vec<String>,
}

/// Policy names every correctly configured deployment carries.
pub fn default_required_policies() -> Vec<String> {
    ["budget_limits", "action_gates", "data_access", "guardian"]
        .into_iter()
        .map(String::from)
        .collect()
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            profile: "standard".to_string(),
            fail_on: FailOn::Error,
            consistency: true,
            required_policies: default_required_policies(),
        }
    }
}
