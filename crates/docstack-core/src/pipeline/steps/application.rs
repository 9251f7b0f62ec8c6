//! Release download, unpack and first-time seeding of the install directory.

use std::path::Path;

use anyhow::Context;
use tracing::{debug, info};
use url::Url;

use crate::error::ProvisionError;
use crate::exec::CommandSpec;
use crate::pipeline::{ProvisionContext, StepOutcome};
use crate::release::{ARCHIVE_ROOT, unpack_tar_xz};
use crate::settings::DATA_DIRS;

pub(super) fn install(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let releases = ctx.backends.releases;
    let release = releases.latest_release()?;
    info!(tag = %release.tag, "resolved release");

    let install_dir = ctx.layout.install_dir();
    if install_dir.exists() {
        anyhow::bail!(
            "Install directory {} already exists; remove it or set paths.install_dir",
            install_dir.display()
        );
    }

    let parent = ctx.layout.install_parent();
    std::fs::create_dir_all(&parent)
        .with_context(|| format!("Failed to create directory: {}", parent.display()))?;

    let archive = parent.join(release.archive_name());
    let url = release.download_url(releases.repository())?;
    releases.download(&url, &archive)?;

    let staging = parent.join(format!(".{}-unpack", ARCHIVE_ROOT));
    remove_dir_if_exists(&staging)?;
    unpack_tar_xz(&archive, &staging)?;

    let unpacked = staging.join(ARCHIVE_ROOT);
    if !unpacked.is_dir() {
        return Err(ProvisionError::MissingPath(unpacked).into());
    }
    std::fs::rename(&unpacked, &install_dir).with_context(|| {
        format!(
            "Failed to move {} to {}",
            unpacked.display(),
            install_dir.display()
        )
    })?;
    remove_dir_if_exists(&staging)?;
    std::fs::remove_file(&archive)
        .with_context(|| format!("Failed to remove archive: {}", archive.display()))?;

    ctx.backends.runner.run(
        &CommandSpec::new("python3")
            .args(["-m", "pip", "install", "-r", "requirements.txt"])
            .current_dir(&install_dir),
    )?;

    seed_config(ctx)?;

    for name in DATA_DIRS {
        let dir = install_dir.join(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }

    let marker = ctx.layout.version_file();
    if let Some(dir) = marker.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    }
    std::fs::write(&marker, format!("{}\n", release.tag))
        .with_context(|| format!("Failed to write version file: {}", marker.display()))?;

    ctx.deployment.release = Some(release);
    Ok(StepOutcome::Completed)
}

/// Replace the shipped config file with the current upstream template.
///
/// When the template cannot be fetched the copy shipped in the archive is
/// kept; the run fails only when neither exists.
fn seed_config(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<()> {
    let config_file = ctx.layout.config_file();
    let template_url = &ctx.settings.release.config_template_url;

    let fetched = Url::parse(template_url)
        .map_err(|e| anyhow::anyhow!("Invalid config template URL '{}': {}", template_url, e))
        .and_then(|url| ctx.backends.releases.fetch_text(&url));

    match fetched {
        Ok(template) => {
            std::fs::write(&config_file, template)
                .with_context(|| format!("Failed to write config file: {}", config_file.display()))?;
            debug!(path = %config_file.display(), "seeded config from template");
        }
        Err(e) if config_file.is_file() => {
            ctx.warn(format!(
                "Could not fetch config template ({e:#}); using the copy shipped with the release"
            ));
        }
        Err(e) => return Err(e.context("No config template available")),
    }
    Ok(())
}

fn remove_dir_if_exists(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to remove directory: {}", dir.display()))?;
    }
    Ok(())
}
