//! Package installs and toolchain builds.

use anyhow::Context;
use tracing::info;

use crate::database::DatabaseMode;
use crate::encoder::install_jbig2;
use crate::exec::CommandSpec;
use crate::packages;
use crate::pipeline::{ProvisionContext, StepOutcome};
use crate::prompt::{self, keys};

pub(super) fn dependencies(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    packages::install(ctx.backends.runner, packages::DEPENDENCIES)?;
    Ok(StepOutcome::Completed)
}

/// Ask whether PostgreSQL runs on this host and install it if so.
pub(super) fn database_server(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let mode = ask_database_mode(ctx)?;
    if mode == DatabaseMode::Remote {
        info!("using a remote database server");
        return Ok(StepOutcome::Skipped);
    }
    packages::install(ctx.backends.runner, packages::DATABASE)?;
    Ok(StepOutcome::Completed)
}

/// Decide the database mode once per run.
pub(super) fn ask_database_mode(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<DatabaseMode> {
    if let Some(mode) = ctx.deployment.database_mode {
        return Ok(mode);
    }
    let local = prompt::confirm(
        ctx.prompter,
        keys::DATABASE_INSTALL_LOCAL,
        "Install a local PostgreSQL server?",
        false,
    )?;
    let mode = if local {
        DatabaseMode::Local
    } else {
        DatabaseMode::Remote
    };
    ctx.deployment.database_mode = Some(mode);
    Ok(mode)
}

pub(super) fn python(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    packages::install(ctx.backends.runner, packages::PYTHON)?;
    Ok(StepOutcome::Completed)
}

pub(super) fn ocr(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let extend = prompt::confirm(
        ctx.prompter,
        keys::OCR_ADD_LANGUAGES,
        "Add OCR languages besides English?",
        false,
    )?;
    if extend {
        let input = ctx.prompter.input(
            keys::OCR_LANGUAGES,
            "Tesseract language codes, comma separated (e.g. deu,fra)",
            None,
        )?;
        let rejected = ctx.deployment.ocr_languages.extend_from_input(&input);
        for code in rejected {
            ctx.warn(format!("Ignoring malformed OCR language code '{code}'"));
        }
    }

    let mut wanted: Vec<String> = packages::OCR.iter().map(|p| p.to_string()).collect();
    wanted.extend(ctx.deployment.ocr_languages.packages());
    packages::install(ctx.backends.runner, &wanted)?;

    info!(languages = %ctx.deployment.ocr_languages.joined(), "OCR languages installed");
    Ok(StepOutcome::Completed)
}

pub(super) fn jbig2(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    install_jbig2(
        ctx.backends.checkout,
        ctx.backends.runner,
        &ctx.settings.encoder.repository,
        &ctx.layout.encoder_build_dir(),
    )?;
    Ok(StepOutcome::Completed)
}

pub(super) fn nltk(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let corpora = &ctx.settings.nltk.corpora;
    if corpora.is_empty() {
        return Ok(StepOutcome::Skipped);
    }

    let data_dir = ctx.layout.nltk_data_dir();
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create directory: {}", data_dir.display()))?;

    let spec = CommandSpec::new("python3")
        .args(["-m", "nltk.downloader", "-d"])
        .arg(data_dir.display().to_string())
        .args(corpora.iter().cloned());
    ctx.backends.runner.run(&spec)?;
    Ok(StepOutcome::Completed)
}
