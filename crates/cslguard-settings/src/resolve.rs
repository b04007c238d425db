use crate::{model::CslguardConfigV1, presets};
use cslguard_domain::config::{FailOn, ValidationConfig};

/// CLI-level overrides applied on top of file configuration.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub profile: Option<String>,
    pub policy_dir: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    /// Directory scanned for policy sources, relative to the root.
    pub policy_dir: String,
    /// Policy-source extension without the leading dot.
    pub extension: String,
    pub effective: ValidationConfig,
}

pub fn resolve_config(
    cfg: CslguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    let profile = overrides
        .profile
        .clone()
        .or(cfg.profile.clone())
        .unwrap_or_else(|| "standard".to_string());

    let mut effective = presets::preset(&profile);

    if let Some(fail_on) = cfg.fail_on.as_deref() {
        effective.fail_on = parse_fail_on(fail_on)?;
    }
    if let Some(consistency) = cfg.consistency {
        effective.consistency = consistency;
    }
    if let Some(required) = cfg.required_policies.clone() {
        effective.required_policies = required;
    }

    let policy_dir = overrides
        .policy_dir
        .or(cfg.policy_dir)
        .unwrap_or_else(|| "policies".to_string());

    let extension = cfg
        .extension
        .map(|e| e.trim_start_matches('.').to_string())
        .unwrap_or_else(|| "csl".to_string());
    if extension.is_empty() {
        anyhow::bail!("extension must not be empty");
    }

    Ok(ResolvedConfig {
        policy_dir,
        extension,
        effective,
    })
}

fn parse_fail_on(v: &str) -> anyhow::Result<FailOn> {
    match v {
        "error" => Ok(FailOn::Error),
        "warning" | "warn" => Ok(FailOn::Warning),
        other => anyhow::bail!("unknown fail_on: {other} (expected error|warning)"),
    }
}
