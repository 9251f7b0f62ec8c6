//! The provisioning pipeline.
//!
//! A fixed, ordered list of steps run strictly in sequence. Each step reads
//! and extends the shared [`Deployment`]; the first failure aborts the run
//! with no rollback.

mod context;
mod deployment;
mod steps;

pub use context::ProvisionContext;
pub use deployment::{AdminAccount, Deployment, FeatureFlags, normalize_public_url};

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::database::DatabaseMode;
use crate::encoder::SourceCheckout;
use crate::exec::CommandRunner;
use crate::prompt::Prompter;
use crate::release::ReleaseSource;
use crate::settings::{Layout, Settings};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StepId {
    Dependencies,
    Database,
    Python,
    Ocr,
    Jbig2,
    Application,
    Nltk,
    Configure,
    ProvisionDb,
    Migrate,
    Admin,
    Adminer,
    Services,
    Customize,
    Cleanup,
}

impl StepId {
    /// Every step, in execution order.
    pub const ALL: [StepId; 15] = [
        StepId::Dependencies,
        StepId::Database,
        StepId::Python,
        StepId::Ocr,
        StepId::Jbig2,
        StepId::Application,
        StepId::Nltk,
        StepId::Configure,
        StepId::ProvisionDb,
        StepId::Migrate,
        StepId::Admin,
        StepId::Adminer,
        StepId::Services,
        StepId::Customize,
        StepId::Cleanup,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepId::Dependencies => "dependencies",
            StepId::Database => "database",
            StepId::Python => "python",
            StepId::Ocr => "ocr",
            StepId::Jbig2 => "jbig2",
            StepId::Application => "application",
            StepId::Nltk => "nltk",
            StepId::Configure => "configure",
            StepId::ProvisionDb => "provision-db",
            StepId::Migrate => "migrate",
            StepId::Admin => "admin",
            StepId::Adminer => "adminer",
            StepId::Services => "services",
            StepId::Customize => "customize",
            StepId::Cleanup => "cleanup",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            StepId::Dependencies => "Installing dependencies",
            StepId::Database => "Setting up database server",
            StepId::Python => "Installing Python",
            StepId::Ocr => "Installing OCR toolchain",
            StepId::Jbig2 => "Building JBIG2 encoder",
            StepId::Application => "Installing Paperless-ngx",
            StepId::Nltk => "Downloading NLTK corpora",
            StepId::Configure => "Writing configuration",
            StepId::ProvisionDb => "Provisioning database",
            StepId::Migrate => "Migrating database schema",
            StepId::Admin => "Creating admin account",
            StepId::Adminer => "Installing Adminer",
            StepId::Services => "Installing services",
            StepId::Customize => "Customizing host",
            StepId::Cleanup => "Cleaning up",
        }
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StepId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        StepId::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| {
                let known: Vec<_> = StepId::ALL.iter().map(|s| s.as_str()).collect();
                anyhow::anyhow!("Unknown step '{}'. Known steps: {}", s, known.join(", "))
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepOutcome {
    Completed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: StepId,
    pub outcome: StepOutcome,
}

/// Progress callbacks for frontends.
pub trait StepObserver {
    /// `index` is 1-based.
    fn step_started(&mut self, _step: StepId, _index: usize, _total: usize) {}

    fn step_finished(&mut self, _step: StepId, _outcome: StepOutcome) {}
}

pub struct NoopObserver;

impl StepObserver for NoopObserver {}

/// External systems the pipeline talks to.
#[derive(Clone, Copy)]
pub struct Backends<'a> {
    pub runner: &'a dyn CommandRunner,
    pub releases: &'a dyn ReleaseSource,
    pub checkout: &'a dyn SourceCheckout,
}

#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub version: Option<String>,
    pub database_mode: Option<DatabaseMode>,
    pub steps: Vec<StepRecord>,
    /// Unit files written, as host paths
    pub units: Vec<PathBuf>,
    pub credentials_file: PathBuf,
    pub warnings: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

impl InstallReport {
    pub fn outcome(&self, step: StepId) -> Option<StepOutcome> {
        self.steps
            .iter()
            .find(|record| record.step == step)
            .map(|record| record.outcome)
    }
}

pub struct Pipeline<'a> {
    layout: &'a Layout,
    settings: &'a Settings,
    backends: Backends<'a>,
    skip: BTreeSet<StepId>,
}

impl<'a> Pipeline<'a> {
    pub fn new(layout: &'a Layout, settings: &'a Settings, backends: Backends<'a>) -> Self {
        Self {
            layout,
            settings,
            backends,
            skip: BTreeSet::new(),
        }
    }

    /// Skip `steps` entirely; they are reported as skipped.
    pub fn skip(mut self, steps: &[StepId]) -> Self {
        self.skip.extend(steps.iter().copied());
        self
    }

    pub fn run(
        &self,
        prompter: &mut dyn Prompter,
        observer: &mut dyn StepObserver,
    ) -> anyhow::Result<InstallReport> {
        let mut ctx = ProvisionContext::new(self.layout, self.settings, self.backends, prompter);
        let mut records = Vec::with_capacity(StepId::ALL.len());
        let total = StepId::ALL.len();

        for (index, step) in StepId::ALL.into_iter().enumerate() {
            observer.step_started(step, index + 1, total);

            let outcome = if self.skip.contains(&step) {
                info!(step = %step, "skipped by request");
                StepOutcome::Skipped
            } else {
                info!(step = %step, "{}", step.title());
                steps::run(step, &mut ctx).with_context(|| format!("step '{}' failed", step))?
            };

            observer.step_finished(step, outcome);
            records.push(StepRecord { step, outcome });
        }

        Ok(ctx.into_report(records))
    }
}
