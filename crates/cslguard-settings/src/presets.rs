use cslguard_domain::config::{default_required_policies, FailOn, ValidationConfig};

/// Preset profiles are opinionated defaults.
///
/// Keep these small and readable. Anything deployment-specific belongs in
/// `cslguard.toml`.
pub fn preset(profile: &str) -> ValidationConfig {
    match profile {
        "strict" => strict_profile(),
        // default
        _ => standard_profile(),
    }
}

fn standard_profile() -> ValidationConfig {
    ValidationConfig {
        profile: "standard".to_string(),
        fail_on: FailOn::Error,
        consistency: true,
        required_policies: default_required_policies(),
    }
}

/// Strict treats consistency warnings as fatal to the load.
fn strict_profile() -> ValidationConfig {
    ValidationConfig {
        profile: "strict".to_string(),
        fail_on: FailOn::Warning,
        consistency: true,
        required_policies: default_required_policies(),
    }
}
