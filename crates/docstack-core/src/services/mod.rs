//! Service unit installation and activation.

mod policy;
mod unit;

pub use policy::{PolicyPatch, patch_policy};
pub use unit::{ServiceUnit, UnitSection, paperless_units, parse_unit};

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use crate::error::ProvisionError;
use crate::exec::CommandSpec;
use crate::settings::Layout;

/// Keys every installed unit must carry, by section.
const REQUIRED_KEYS: &[(&str, &str)] = &[
    ("Unit", "Description"),
    ("Service", "ExecStart"),
    ("Service", "WorkingDirectory"),
    ("Install", "WantedBy"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    Written,
    /// On-disk content already matched
    Unchanged,
}

pub fn hash_content(content: &[u8]) -> String {
    blake3::hash(content).to_hex().to_string()
}

/// Write `unit` into `unit_dir`, skipping the write when the file on disk
/// already has the rendered content.
pub fn write_unit(unit_dir: &Path, unit: &ServiceUnit) -> anyhow::Result<WriteOutcome> {
    let path = unit_dir.join(unit.file_name());
    let rendered = unit.render();

    if let Ok(existing) = std::fs::read(&path)
        && hash_content(&existing) == hash_content(rendered.as_bytes())
    {
        debug!(unit = %unit.name, "unit file unchanged");
        return Ok(WriteOutcome::Unchanged);
    }

    std::fs::create_dir_all(unit_dir)
        .with_context(|| format!("Failed to create unit directory: {}", unit_dir.display()))?;
    std::fs::write(&path, rendered)
        .with_context(|| format!("Failed to write unit file: {}", path.display()))?;
    Ok(WriteOutcome::Written)
}

/// Check a written unit file before it is enabled.
///
/// The file must parse, carry [`REQUIRED_KEYS`], and every required path
/// of `unit` must exist on the host.
pub fn verify_unit(path: &Path, unit: &ServiceUnit, layout: &Layout) -> anyhow::Result<()> {
    let failure = |reason: String| ProvisionError::UnitVerification {
        unit: unit.file_name(),
        reason,
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read unit file: {}", path.display()))?;
    let sections = parse_unit(&content).map_err(|e| failure(e.to_string()))?;

    for (section, key) in REQUIRED_KEYS {
        let present = sections
            .iter()
            .filter(|s| s.name == *section)
            .any(|s| s.get(key).is_some_and(|v| !v.is_empty()));
        if !present {
            return Err(failure(format!("missing {key} in [{section}]")).into());
        }
    }

    for required in &unit.required_paths {
        let host_path = layout.rebase(required);
        if !host_path.exists() {
            return Err(failure(format!("{} does not exist", required.display())).into());
        }
    }

    Ok(())
}

pub fn daemon_reload() -> CommandSpec {
    CommandSpec::new("systemctl").arg("daemon-reload")
}

/// `systemctl enable [--now] <units>`.
pub fn enable_command(units: &[ServiceUnit], start: bool) -> CommandSpec {
    let mut spec = CommandSpec::new("systemctl").arg("enable");
    if start {
        spec = spec.arg("--now");
    }
    spec.args(units.iter().map(|u| u.name.clone()))
}
