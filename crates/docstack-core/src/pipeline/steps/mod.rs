mod application;
mod configure;
mod database;
mod finish;
mod manage;
mod services;
mod system;

use super::{ProvisionContext, StepId, StepOutcome};

pub(super) fn run(step: StepId, ctx: &mut ProvisionContext<'_>) -> anyhow::Result<StepOutcome> {
    match step {
        StepId::Dependencies => system::dependencies(ctx),
        StepId::Database => system::database_server(ctx),
        StepId::Python => system::python(ctx),
        StepId::Ocr => system::ocr(ctx),
        StepId::Jbig2 => system::jbig2(ctx),
        StepId::Application => application::install(ctx),
        StepId::Nltk => system::nltk(ctx),
        StepId::Configure => configure::run(ctx),
        StepId::ProvisionDb => database::provision(ctx),
        StepId::Migrate => manage::migrate(ctx),
        StepId::Admin => manage::create_admin(ctx),
        StepId::Adminer => database::adminer(ctx),
        StepId::Services => services::install(ctx),
        StepId::Customize => finish::customize(ctx),
        StepId::Cleanup => finish::cleanup(ctx),
    }
}

/// First address reported by `hostname -I`, or `localhost`.
fn host_address(ctx: &ProvisionContext<'_>) -> String {
    let spec = crate::exec::CommandSpec::new("hostname").arg("-I");
    match ctx.backends.runner.capture(&spec) {
        Ok(output) => output
            .split_whitespace()
            .next()
            .unwrap_or("localhost")
            .to_string(),
        Err(e) => {
            tracing::debug!(error = %e, "could not determine host address");
            "localhost".to_string()
        }
    }
}
