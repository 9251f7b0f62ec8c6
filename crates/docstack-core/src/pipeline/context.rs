use std::path::PathBuf;

use chrono::Utc;
use tracing::warn;

use super::{Backends, Deployment, InstallReport, StepRecord};
use crate::database::CredentialsLog;
use crate::prompt::Prompter;
use crate::settings::{Layout, Settings};

/// State threaded through every step of one run.
pub struct ProvisionContext<'a> {
    pub layout: &'a Layout,
    pub settings: &'a Settings,
    pub backends: Backends<'a>,
    pub prompter: &'a mut dyn Prompter,
    pub deployment: Deployment,
    pub warnings: Vec<String>,
    /// Unit files written so far, as host paths
    pub units: Vec<PathBuf>,
}

impl<'a> ProvisionContext<'a> {
    pub fn new(
        layout: &'a Layout,
        settings: &'a Settings,
        backends: Backends<'a>,
        prompter: &'a mut dyn Prompter,
    ) -> Self {
        Self {
            layout,
            settings,
            backends,
            prompter,
            deployment: Deployment::new(),
            warnings: Vec::new(),
            units: Vec::new(),
        }
    }

    /// Record a non-fatal problem for the final report.
    pub fn warn(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!("{}", message);
        self.warnings.push(message);
    }

    pub fn credentials_log(&self) -> CredentialsLog {
        CredentialsLog::new(self.layout.credentials_file())
    }

    pub fn into_report(self, steps: Vec<StepRecord>) -> InstallReport {
        InstallReport {
            version: self.deployment.release.as_ref().map(|r| r.tag.clone()),
            database_mode: self.deployment.database_mode,
            steps,
            units: self.units,
            credentials_file: self.layout.credentials_file(),
            warnings: self.warnings,
            finished_at: Utc::now(),
        }
    }
}
