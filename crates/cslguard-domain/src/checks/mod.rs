use crate::compile::FileModel;
use crate::config::ValidationConfig;
use cslguard_types::Finding;

mod duplicate_policy;
mod required_policies;

/// Run all cross-file checks, appending findings to `out`.
pub fn run_all(files: &[FileModel], cfg: &ValidationConfig, out: &mut Vec<Finding>) {
    duplicate_policy::run(files, out);
    required_policies::run(files, cfg, out);
}
