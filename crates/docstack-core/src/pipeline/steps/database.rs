//! Database provisioning and the optional Adminer UI.

use tracing::info;

use super::host_address;
use crate::database::{
    CredentialBlock, DatabaseMode, provision_local, role_statements, role_statements_redacted,
};
use crate::error::ProvisionError;
use crate::exec::CommandSpec;
use crate::packages;
use crate::pipeline::{ProvisionContext, StepOutcome};
use crate::prompt::{self, keys};

pub(super) fn provision(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let database = ctx.deployment.database()?.clone();

    match database.mode {
        DatabaseMode::Local => provision_local(ctx.backends.runner, &database)?,
        DatabaseMode::Remote => {
            let instructions = |statements: Vec<String>| {
                format!(
                    "Create the database on {}:{} before continuing, e.g. as the postgres superuser:\n\n{}\n",
                    database.host,
                    database.port,
                    statements.join("\n")
                )
            };
            ctx.prompter.sensitive_message(
                &instructions(role_statements(&database)?),
                &instructions(role_statements_redacted(&database)?),
            )?;

            let ready = prompt::confirm(
                ctx.prompter,
                keys::DATABASE_REMOTE_READY,
                "Has the remote database been created?",
                false,
            )?;
            if !ready {
                return Err(ProvisionError::RemoteDatabaseNotConfirmed {
                    host: database.host.clone(),
                    database: database.name.clone(),
                }
                .into());
            }
            info!(host = %database.host, "remote database confirmed by operator");
        }
    }

    ctx.credentials_log()
        .append(&CredentialBlock::database(&database))?;
    Ok(StepOutcome::Completed)
}

pub(super) fn adminer(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let install = prompt::confirm(
        ctx.prompter,
        keys::ADMINER_INSTALL,
        "Install Adminer, a web interface for the database?",
        false,
    )?;
    if !install {
        return Ok(StepOutcome::Skipped);
    }

    let runner = ctx.backends.runner;
    packages::install(runner, packages::ADMINER)?;
    runner.run(&CommandSpec::new("a2enconf").arg("adminer"))?;
    runner.run(&CommandSpec::new("systemctl").args(["reload", "apache2"]))?;

    let address = host_address(ctx);
    let database = ctx.deployment.database()?;
    ctx.credentials_log()
        .append(&CredentialBlock::adminer(&address, database))?;

    ctx.deployment.adminer_installed = true;
    Ok(StepOutcome::Completed)
}
