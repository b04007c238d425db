//! Config parsing and profile resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves
//! configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod presets;
mod resolve;

pub use model::CslguardConfigV1;
pub use resolve::{Overrides, ResolvedConfig};

/// Parse `cslguard.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<CslguardConfigV1> {
    let cfg: CslguardConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the validator (profile + overrides).
pub fn resolve_config(
    cfg: CslguardConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
