//! Generated secrets and the plaintext credentials log.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Context;
use rand::Rng;
use tracing::debug;

use super::{DatabaseMode, DatabaseSettings};

pub const PASSWORD_LENGTH: usize = 13;
pub const SECRET_KEY_LENGTH: usize = 32;

fn alphanumeric(length: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Random alphanumeric password for database and admin accounts.
pub fn generate_password() -> String {
    alphanumeric(PASSWORD_LENGTH)
}

pub fn generate_secret_key() -> String {
    alphanumeric(SECRET_KEY_LENGTH)
}

/// A group of `Label: value` lines appended to the log together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialBlock {
    lines: Vec<(String, String)>,
}

impl CredentialBlock {
    fn new() -> Self {
        Self { lines: Vec::new() }
    }

    fn line(mut self, label: &str, value: impl Into<String>) -> Self {
        self.lines.push((label.to_string(), value.into()));
        self
    }

    pub fn database(db: &DatabaseSettings) -> Self {
        let mut block = Self::new()
            .line("Paperless-ngx Database User", &db.user)
            .line("Paperless-ngx Database Password", &db.password)
            .line("Paperless-ngx Database Name", &db.name);
        if db.mode == DatabaseMode::Remote {
            block = block.line(
                "Paperless-ngx Database Host",
                format!("{}:{}", db.host, db.port),
            );
        }
        block
    }

    pub fn web_ui(user: &str, password: &str) -> Self {
        Self::new()
            .line("Paperless-ngx WebUI User", user)
            .line("Paperless-ngx WebUI Password", password)
    }

    pub fn adminer(address: &str, db: &DatabaseSettings) -> Self {
        Self::new()
            .line("Adminer Interface", format!("http://{address}/adminer/"))
            .line("Adminer System", "PostgreSQL")
            .line("Adminer Server", format!("{}:{}", db.host, db.port))
            .line("Adminer Username", &db.user)
            .line("Adminer Password", &db.password)
            .line("Adminer Database", &db.name)
    }

    /// A blank separator line followed by one line per entry.
    pub fn render(&self) -> String {
        let mut out = String::from("\n");
        for (label, value) in &self.lines {
            out.push_str(label);
            out.push_str(": ");
            out.push_str(value);
            out.push('\n');
        }
        out
    }
}

/// Append-only plaintext log readable by the operator only.
#[derive(Debug, Clone)]
pub struct CredentialsLog {
    path: PathBuf,
}

impl CredentialsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, block: &CredentialBlock) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        let mut options = OpenOptions::new();
        options.create(true).append(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options
            .open(&self.path)
            .with_context(|| format!("Failed to open credentials log: {}", self.path.display()))?;
        file.write_all(block.render().as_bytes())
            .with_context(|| format!("Failed to write credentials log: {}", self.path.display()))?;

        debug!(path = %self.path.display(), "appended credentials");
        Ok(())
    }
}
