//! Failure classes surfaced by the provisioning pipeline.
//!
//! Most code paths return `anyhow::Result` with context attached; the
//! variants here are the failures a frontend reports distinctly.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProvisionError {
    /// An external command exited unsuccessfully.
    #[error("command `{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: String,
        stderr: String,
    },

    #[error("could not resolve a release of {repository}: {reason}")]
    Release { repository: String, reason: String },

    #[error("remote database '{database}' on {host} was not confirmed by the operator")]
    RemoteDatabaseNotConfirmed { host: String, database: String },

    #[error("unit {unit} failed verification: {reason}")]
    UnitVerification { unit: String, reason: String },

    /// A prompt without a default received no answer.
    #[error("no answer for required prompt '{key}'")]
    MissingAnswer { key: String },

    #[error(
        "invalid {kind} '{value}': use lowercase letters, digits and underscores, starting with a letter or underscore"
    )]
    InvalidIdentifier { kind: &'static str, value: String },

    #[error("required path is missing: {}", .0.display())]
    MissingPath(PathBuf),
}
