//! Commands run through the application's `manage.py`.

use crate::conf::ConfigFile;
use crate::database::{CredentialBlock, generate_password};
use crate::exec::CommandSpec;
use crate::pipeline::{AdminAccount, ProvisionContext, StepOutcome};
use crate::prompt::{self, keys};

const ADMIN_USER_VAR: &str = "DOCSTACK_ADMIN_USER";
const ADMIN_PASSWORD_VAR: &str = "DOCSTACK_ADMIN_PASSWORD";

/// Creates the superuser unless one with that name exists.
const CREATE_SUPERUSER: &str = r#"import os
from django.contrib.auth import get_user_model

User = get_user_model()
username = os.environ["DOCSTACK_ADMIN_USER"]
password = os.environ["DOCSTACK_ADMIN_PASSWORD"]
if not User.objects.filter(username=username).exists():
    User.objects.create_superuser(username, "admin@localhost", password)
"#;

/// `python3 manage.py <args>` in the source directory, with the active
/// config entries exported as environment.
fn manage(ctx: &ProvisionContext<'_>, args: &[&str]) -> anyhow::Result<CommandSpec> {
    let conf = ConfigFile::load(&ctx.layout.config_file())?;
    Ok(CommandSpec::new("python3")
        .arg("manage.py")
        .args(args.iter().copied())
        .current_dir(ctx.layout.src_dir())
        .envs(conf.active_entries()))
}

pub(super) fn migrate(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let spec = manage(ctx, &["migrate"])?;
    ctx.backends.runner.run(&spec)?;
    Ok(StepOutcome::Completed)
}

pub(super) fn create_admin(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let username = prompt::with_default(
        ctx.prompter,
        keys::ADMIN_USERNAME,
        "Admin username",
        "admin",
    )?;
    let password = ctx
        .prompter
        .secret(keys::ADMIN_PASSWORD, "Admin password (empty to generate)")?;
    let password = if password.is_empty() {
        generate_password()
    } else {
        password
    };

    let spec = manage(ctx, &["shell"])?
        .env(ADMIN_USER_VAR, username.as_str())
        .env(ADMIN_PASSWORD_VAR, password.as_str())
        .stdin(CREATE_SUPERUSER);
    ctx.backends.runner.run(&spec)?;

    ctx.credentials_log()
        .append(&CredentialBlock::web_ui(&username, &password))?;
    ctx.deployment.admin = Some(AdminAccount { username, password });
    Ok(StepOutcome::Completed)
}
