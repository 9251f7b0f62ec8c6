//! Host customization and cleanup.

use anyhow::Context;
use tracing::info;

use super::host_address;
use crate::exec::CommandSpec;
use crate::packages;
use crate::pipeline::{ProvisionContext, StepOutcome};
use crate::release::ARCHIVE_ROOT;

/// Login banner text.
fn motd(version: Option<&str>, address: &str) -> String {
    let mut out = String::from("Paperless-ngx");
    if let Some(version) = version {
        out.push(' ');
        out.push_str(version);
    }
    out.push_str(&format!("\nWeb interface: {address}\n"));
    out
}

pub(super) fn customize(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let address = match &ctx.deployment.public_url {
        Some(url) => url.clone(),
        None => format!("http://{}:8000", host_address(ctx)),
    };
    let version = ctx.deployment.release.as_ref().map(|r| r.tag.as_str());

    let path = ctx.layout.motd_file();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    std::fs::write(&path, motd(version, &address))
        .with_context(|| format!("Failed to write {}", path.display()))?;

    for hook in &ctx.settings.hooks.post_install {
        let Some((program, args)) = hook.split_first() else {
            continue;
        };
        info!(hook = %hook.join(" "), "running post-install hook");
        ctx.backends
            .runner
            .run(&CommandSpec::new(program.as_str()).args(args.iter().cloned()))?;
    }

    Ok(StepOutcome::Completed)
}

pub(super) fn cleanup(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let build_dir = ctx.layout.encoder_build_dir();
    if build_dir.exists() {
        std::fs::remove_dir_all(&build_dir)
            .with_context(|| format!("Failed to remove directory: {}", build_dir.display()))?;
    }

    let parent = ctx.layout.install_parent();
    if let Ok(entries) = std::fs::read_dir(&parent) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with(ARCHIVE_ROOT) && name.ends_with(".tar.xz") {
                std::fs::remove_file(entry.path()).with_context(|| {
                    format!("Failed to remove archive: {}", entry.path().display())
                })?;
            }
        }
    }

    for spec in packages::cleanup_commands() {
        ctx.backends.runner.run(&spec)?;
    }
    Ok(StepOutcome::Completed)
}
