//! Collect deployment parameters and write them into the config file.

use anyhow::Context;
use tracing::debug;

use super::system::ask_database_mode;
use crate::conf::{ConfKey, ConfigFile, Substitution};
use crate::database::{
    DEFAULT_NAME, DEFAULT_PORT, DEFAULT_USER, DatabaseMode, DatabaseSettings, generate_password,
    generate_secret_key,
};
use crate::pipeline::{FeatureFlags, ProvisionContext, StepOutcome, normalize_public_url};
use crate::prompt::{self, Prompter, keys};

pub(super) fn run(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let mode = ask_database_mode(ctx)?;
    let database = match mode {
        DatabaseMode::Local => DatabaseSettings::local(generate_password()),
        DatabaseMode::Remote => remote_database(ctx.prompter)?,
    };
    database.validate()?;

    let time_zone = prompt::with_default(
        ctx.prompter,
        keys::CONFIG_TIME_ZONE,
        "Time zone (e.g. Europe/Berlin)",
        "UTC",
    )?;

    let url = ctx.prompter.input(
        keys::CONFIG_URL,
        "Public URL of the web interface (empty to skip)",
        None,
    )?;
    let public_url = if url.trim().is_empty() {
        None
    } else {
        Some(normalize_public_url(&url)?)
    };

    let features = ask_features(ctx.prompter)?;
    let secret_key = generate_secret_key();

    let path = ctx.layout.config_file();
    let mut conf = ConfigFile::load(&path)?;
    let target = ctx.layout.target_install_dir();

    let mut entries: Vec<(ConfKey, String)> = vec![
        (ConfKey::Redis, "redis://localhost:6379".to_string()),
        (
            ConfKey::ConsumptionDir,
            target.join("consume").display().to_string(),
        ),
        (ConfKey::DataDir, target.join("data").display().to_string()),
        (ConfKey::MediaRoot, target.join("media").display().to_string()),
        (ConfKey::StaticDir, target.join("static").display().to_string()),
        (ConfKey::DbHost, database.host.clone()),
        (ConfKey::DbPort, database.port.to_string()),
        (ConfKey::DbName, database.name.clone()),
        (ConfKey::DbUser, database.user.clone()),
        (ConfKey::DbPass, database.password.clone()),
        (ConfKey::SecretKey, secret_key.clone()),
        (ConfKey::TimeZone, time_zone.clone()),
    ];
    if ctx.deployment.ocr_languages.has_extra() {
        entries.push((ConfKey::OcrLanguage, ctx.deployment.ocr_languages.joined()));
    }
    if let Some(url) = &public_url {
        entries.push((ConfKey::Url, url.clone()));
    }
    for (key, enabled) in [
        (ConfKey::ConsumerRecursive, features.recursive),
        (ConfKey::ConsumerSubdirsAsTags, features.subdirs_as_tags),
        (ConfKey::ConsumerDeleteDuplicates, features.delete_duplicates),
        (ConfKey::ConsumerEnableBarcodes, features.barcodes),
    ] {
        if enabled {
            entries.push((key, "true".to_string()));
        }
    }

    let mut missing = 0;
    for (key, value) in &entries {
        if conf.activate(*key, value) == Substitution::NotFound {
            missing += 1;
        }
    }
    debug!(applied = entries.len() - missing, missing, "rewrote config file");
    conf.save(&path)
        .with_context(|| format!("Failed to save {}", path.display()))?;

    let deployment = &mut ctx.deployment;
    deployment.database = Some(database);
    deployment.secret_key = Some(secret_key);
    deployment.time_zone = Some(time_zone);
    deployment.public_url = public_url;
    deployment.features = features;
    Ok(StepOutcome::Completed)
}

fn remote_database(prompter: &mut dyn Prompter) -> anyhow::Result<DatabaseSettings> {
    let host = prompt::required(prompter, keys::DATABASE_HOST, "Database host")?;
    let port = prompt::with_default(
        prompter,
        keys::DATABASE_PORT,
        "Database port",
        &DEFAULT_PORT.to_string(),
    )?;
    let port: u16 = port
        .parse()
        .with_context(|| format!("Invalid database port '{}'", port))?;
    let name = prompt::with_default(prompter, keys::DATABASE_NAME, "Database name", DEFAULT_NAME)?;
    let user = prompt::with_default(prompter, keys::DATABASE_USER, "Database user", DEFAULT_USER)?;
    let password = prompter.secret(
        keys::DATABASE_PASSWORD,
        "Database password (empty to generate)",
    )?;
    let password = if password.is_empty() {
        generate_password()
    } else {
        password
    };

    Ok(DatabaseSettings {
        mode: DatabaseMode::Remote,
        host,
        port,
        name,
        user,
        password,
    })
}

fn ask_features(prompter: &mut dyn Prompter) -> anyhow::Result<FeatureFlags> {
    Ok(FeatureFlags {
        recursive: prompt::confirm(
            prompter,
            keys::FEATURE_RECURSIVE,
            "Consume documents from subdirectories?",
            false,
        )?,
        subdirs_as_tags: prompt::confirm(
            prompter,
            keys::FEATURE_SUBDIRS_AS_TAGS,
            "Tag documents with their subdirectory names?",
            false,
        )?,
        delete_duplicates: prompt::confirm(
            prompter,
            keys::FEATURE_DELETE_DUPLICATES,
            "Delete duplicate documents on import?",
            false,
        )?,
        barcodes: prompt::confirm(
            prompter,
            keys::FEATURE_BARCODES,
            "Split documents on barcode separator pages?",
            false,
        )?,
    })
}
