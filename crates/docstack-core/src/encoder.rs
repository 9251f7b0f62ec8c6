//! JBIG2 encoder build from source.
//!
//! The encoder is not packaged by the distribution, so it is cloned, built
//! with autotools, installed system-wide and the source tree removed.

use std::path::Path;

use anyhow::Context;
use tracing::info;

use crate::exec::{CommandRunner, CommandSpec};

/// Obtains a source tree.
pub trait SourceCheckout {
    fn checkout(&self, url: &str, dest: &Path) -> anyhow::Result<()>;
}

/// Clones with libgit2.
#[derive(Debug, Default, Clone, Copy)]
pub struct Git2Checkout;

impl SourceCheckout for Git2Checkout {
    fn checkout(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        info!(url = %url, dest = %dest.display(), "cloning");
        git2::Repository::clone(url, dest)
            .with_context(|| format!("Failed to clone {} into {}", url, dest.display()))?;
        Ok(())
    }
}

/// Creates an empty directory instead of cloning; used for dry runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopCheckout;

impl SourceCheckout for NoopCheckout {
    fn checkout(&self, url: &str, dest: &Path) -> anyhow::Result<()> {
        info!(url = %url, "dry-run: skipped clone");
        std::fs::create_dir_all(dest)
            .with_context(|| format!("Failed to create directory: {}", dest.display()))
    }
}

/// Autotools build and install, run inside the source tree.
pub fn build_commands(source_dir: &Path) -> Vec<CommandSpec> {
    [
        vec!["bash", "./autogen.sh"],
        vec!["bash", "./configure"],
        vec!["make"],
        vec!["make", "install"],
    ]
    .into_iter()
    .map(|argv| {
        CommandSpec::new(argv[0])
            .args(argv[1..].iter().copied())
            .current_dir(source_dir)
    })
    .collect()
}

/// Clone, build and install the encoder, leaving no source tree behind.
pub fn install_jbig2(
    checkout: &dyn SourceCheckout,
    runner: &dyn CommandRunner,
    url: &str,
    build_dir: &Path,
) -> anyhow::Result<()> {
    remove_tree(build_dir)?;
    checkout.checkout(url, build_dir)?;
    for spec in build_commands(build_dir) {
        runner.run(&spec)?;
    }
    remove_tree(build_dir)
}

fn remove_tree(dir: &Path) -> anyhow::Result<()> {
    if dir.exists() {
        std::fs::remove_dir_all(dir)
            .with_context(|| format!("Failed to remove directory: {}", dir.display()))?;
    }
    Ok(())
}
