//! PostgreSQL role and database provisioning.

mod credentials;

pub use credentials::{
    CredentialBlock, CredentialsLog, PASSWORD_LENGTH, SECRET_KEY_LENGTH, generate_password,
    generate_secret_key,
};

use serde::Serialize;
use tracing::info;

use crate::error::ProvisionError;
use crate::exec::{CommandRunner, CommandSpec};

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_NAME: &str = "paperlessdb";
pub const DEFAULT_USER: &str = "paperless";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseMode {
    /// PostgreSQL installed and provisioned on this host
    Local,
    /// An existing server provisioned by the operator
    Remote,
}

impl std::fmt::Display for DatabaseMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseMode::Local => write!(f, "local"),
            DatabaseMode::Remote => write!(f, "remote"),
        }
    }
}

/// Connection settings written into the config file and the credentials log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    pub mode: DatabaseMode,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
}

impl DatabaseSettings {
    pub fn local(password: impl Into<String>) -> Self {
        Self {
            mode: DatabaseMode::Local,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            name: DEFAULT_NAME.to_string(),
            user: DEFAULT_USER.to_string(),
            password: password.into(),
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        validate_identifier("database name", &self.name)?;
        validate_identifier("database user", &self.user)?;
        Ok(())
    }
}

/// Accept names matching `[a-z_][a-z0-9_]*`, which need no quoting in SQL.
pub fn validate_identifier(kind: &'static str, value: &str) -> Result<(), ProvisionError> {
    let mut chars = value.chars();
    let valid = chars
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(ProvisionError::InvalidIdentifier {
            kind,
            value: value.to_string(),
        })
    }
}

/// Quote a string literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Stands in for the role password in statements shown or logged.
pub const REDACTED_PASSWORD: &str = "'********'";

/// Statements that create the role and database, in execution order.
pub fn role_statements(db: &DatabaseSettings) -> anyhow::Result<Vec<String>> {
    statements_with_password(db, &quote_literal(&db.password))
}

/// [`role_statements`] with the password literal masked.
pub fn role_statements_redacted(db: &DatabaseSettings) -> anyhow::Result<Vec<String>> {
    statements_with_password(db, REDACTED_PASSWORD)
}

fn statements_with_password(db: &DatabaseSettings, password: &str) -> anyhow::Result<Vec<String>> {
    db.validate()?;
    let user = &db.user;
    Ok(vec![
        format!("CREATE ROLE {} WITH LOGIN PASSWORD {};", user, password),
        format!(
            "CREATE DATABASE {} WITH OWNER {} TEMPLATE template0;",
            db.name, user
        ),
        format!("ALTER ROLE {} SET client_encoding TO 'utf8';", user),
        format!(
            "ALTER ROLE {} SET default_transaction_isolation TO 'read committed';",
            user
        ),
        format!("ALTER ROLE {} SET timezone TO 'UTC';", user),
    ])
}

/// Run one statement as the local `postgres` superuser.
pub fn psql_command(statement: &str) -> CommandSpec {
    CommandSpec::new("sudo")
        .args(["-u", "postgres", "psql", "-c", statement])
        .sensitive()
}

pub fn provision_local(runner: &dyn CommandRunner, db: &DatabaseSettings) -> anyhow::Result<()> {
    let statements = role_statements(db)?;
    info!(database = %db.name, user = %db.user, "provisioning local database");
    for statement in &statements {
        runner.run(&psql_command(statement))?;
    }
    Ok(())
}
