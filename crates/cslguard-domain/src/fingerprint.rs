use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a load finding.
///
/// Identity fields:
/// - code
/// - source path (if present)
/// - policy name (if present)
/// - rule name (if present)
pub fn fingerprint_finding(
    code: &str,
    path: Option<&str>,
    policy: Option<&str>,
    rule: Option<&str>,
) -> String {
    let mut parts = vec![code];
    if let Some(p) = path {
        parts.push(p);
    }
    if let Some(p) = policy {
        parts.push(p);
    }
    if let Some(r) = rule {
        parts.push(r);
    }
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
