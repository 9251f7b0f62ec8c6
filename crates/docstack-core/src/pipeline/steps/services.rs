use tracing::info;

use crate::pipeline::{ProvisionContext, StepOutcome};
use crate::prompt::{self, keys};
use crate::services::{
    PolicyPatch, WriteOutcome, daemon_reload, enable_command, paperless_units, patch_policy,
    verify_unit, write_unit,
};

pub(super) fn install(ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    let units = paperless_units(ctx.layout.target_install_dir());
    let unit_dir = ctx.layout.unit_dir();

    for unit in &units {
        let outcome = write_unit(&unit_dir, unit)?;
        let path = unit_dir.join(unit.file_name());
        if outcome == WriteOutcome::Unchanged {
            info!(path = %path.display(), "unit file already up to date");
        }
        ctx.units.push(path);
    }

    let policy = ctx.layout.imagemagick_policy();
    match patch_policy(&policy)? {
        PolicyPatch::Patched => info!(path = %policy.display(), "allowed PDF in ImageMagick policy"),
        PolicyPatch::AlreadyPatched => {}
        PolicyPatch::Missing => ctx.warn(format!(
            "ImageMagick policy {} not found; PDF thumbnails may fail",
            policy.display()
        )),
    }

    for unit in &units {
        verify_unit(&unit_dir.join(unit.file_name()), unit, ctx.layout)?;
    }

    let runner = ctx.backends.runner;
    runner.run(&daemon_reload())?;

    let start = prompt::confirm(
        ctx.prompter,
        keys::SERVICES_START,
        "Start Paperless-ngx services now?",
        true,
    )?;
    runner.run(&enable_command(&units, start))?;

    Ok(StepOutcome::Completed)
}
