use ociguard_types::Finding;
use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a finding.
///
/// Identity fields:
/// - rule_id
/// - code
/// - file (repo-relative)
/// - start line and column
/// - message
pub fn fingerprint_for_finding(finding: &Finding) -> String {
    let line = finding.range.start.line.to_string();
    let column = finding.range.start.column.to_string();
    let parts = [
        finding.rule_id.as_str(),
        finding.code.as_str(),
        finding.range.filename.as_str(),
        line.as_str(),
        column.as_str(),
        finding.message.as_str(),
    ];
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}
