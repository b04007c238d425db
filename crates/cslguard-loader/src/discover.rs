use anyhow::bail;
use camino::{Utf8Path, Utf8PathBuf};
use walkdir::WalkDir;
use std::path::PathBuf;

/// Discover policy sources under `policy_dir` with the given extension.
///
/// Behavior:
/// - the directory must exist, and at least one file must match
/// - matching is recursive; results are sorted for a stable load order
pub fn discover_sources(
    policy_dir: &Utf8Path,
    extension: &str,
) -> anyhow::Result<Vec<Utf8PathBuf>> {
    if !policy_dir.is_dir() {
        bail!("policy directory does not exist: {}", policy_dir);
    }

    let mut out: Vec<Utf8PathBuf> = WalkDir::new(policy_dir)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
        .filter(|p| p.extension() == Some(extension))
        .collect();

    // Stable order.
    out.sort();
    out.dedup();

    if out.is_empty() {
        bail!("no .{} policy files found in {}", extension, policy_dir);
    }

    Ok(out)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}
