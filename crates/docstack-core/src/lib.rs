//! Docstack Core Library
//!
//! Provides the provisioning pipeline for a Paperless-ngx host: package
//! installation, release download, configuration rewriting, database
//! provisioning and service unit generation.

pub mod conf;
pub mod database;
pub mod encoder;
pub mod error;
pub mod exec;
pub mod ocr;
pub mod packages;
pub mod pipeline;
pub mod prompt;
pub mod release;
pub mod services;
pub mod settings;

/// Re-exports of commonly used types
pub mod prelude {
    // Settings
    pub use crate::settings::{Layout, Settings, SettingsStore};

    // Pipeline
    pub use crate::pipeline::{
        Backends, Deployment, InstallReport, NoopObserver, Pipeline, StepId, StepObserver,
        StepOutcome,
    };

    // Prompts
    pub use crate::prompt::{AnswerPrompter, Prompter};

    // External systems
    pub use crate::encoder::{Git2Checkout, NoopCheckout, SourceCheckout};
    pub use crate::exec::{CommandRunner, CommandSpec, RecordingRunner, SystemRunner};
    pub use crate::release::{GitHubReleases, Release, ReleaseSource};

    // Errors
    pub use crate::error::ProvisionError;
}
