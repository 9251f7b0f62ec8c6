//! ImageMagick security policy patch allowing PDF read/write.

use std::path::Path;

use anyhow::Context;

const BLOCKED: &str = r#"rights="none" pattern="PDF""#;
const ALLOWED: &str = r#"rights="read|write" pattern="PDF""#;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyPatch {
    Patched,
    AlreadyPatched,
    /// No policy file on the host
    Missing,
}

pub fn patch_policy(path: &Path) -> anyhow::Result<PolicyPatch> {
    if !path.exists() {
        return Ok(PolicyPatch::Missing);
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read policy file: {}", path.display()))?;
    if !content.contains(BLOCKED) {
        return Ok(PolicyPatch::AlreadyPatched);
    }

    std::fs::write(path, content.replace(BLOCKED, ALLOWED))
        .with_context(|| format!("Failed to write policy file: {}", path.display()))?;
    Ok(PolicyPatch::Patched)
}
