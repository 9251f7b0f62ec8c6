//! `paperless.conf` editing by sentinel-line substitution.
//!
//! The file is a flat list of `KEY=VALUE` lines, most of them commented-out
//! defaults. Activating a key replaces its sentinel line with an active
//! line; nothing else in the file is parsed or touched.

pub mod keys;

use std::path::Path;

use anyhow::Context;
use tracing::debug;

pub use keys::ConfKey;

/// Result of a single activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitution {
    Applied,
    /// The key already has an active line; the file is unchanged
    AlreadyActive,
    /// No sentinel line matched; the file is unchanged
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    lines: Vec<String>,
    trailing_newline: bool,
}

impl ConfigFile {
    pub fn parse(content: &str) -> Self {
        Self {
            lines: content.lines().map(str::to_string).collect(),
            trailing_newline: content.ends_with('\n'),
        }
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Ok(Self::parse(&content))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        std::fs::write(path, self.render())
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }

    pub fn render(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline && !self.lines.is_empty() {
            out.push('\n');
        }
        out
    }

    /// Replace the sentinel line of `key` with `KEY=value`.
    ///
    /// Matches the whole line, ignoring trailing whitespace. Only the first
    /// sentinel is replaced so a key is never active twice. The value is
    /// quoted when a dotenv reader would otherwise alter it.
    pub fn activate(&mut self, key: ConfKey, value: &str) -> Substitution {
        if self.active_value(key.name()).is_some() {
            debug!(key = key.name(), "already active, leaving as is");
            return Substitution::AlreadyActive;
        }

        let sentinel = key.sentinel_line();
        match self
            .lines
            .iter()
            .position(|line| line.trim_end() == sentinel)
        {
            Some(index) => {
                self.lines[index] = format!("{}={}", key.name(), quote_value(value));
                debug!(key = key.name(), "activated");
                Substitution::Applied
            }
            None => {
                debug!(key = key.name(), sentinel = %sentinel, "sentinel line not found");
                Substitution::NotFound
            }
        }
    }

    /// Value of the active line for `name`, if any.
    pub fn active_value(&self, name: &str) -> Option<String> {
        self.active_entries()
            .into_iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value)
    }

    /// All active `KEY=VALUE` pairs in file order, comments skipped.
    ///
    /// Values are read the way dotenv reads them: quoted values are unquoted
    /// and unescaped, unquoted values end at an inline ` #` comment.
    pub fn active_entries(&self) -> Vec<(String, String)> {
        self.lines
            .iter()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    return None;
                }
                let (key, value) = line.split_once('=')?;
                let key = key.trim();
                if key.is_empty() || key.contains(char::is_whitespace) {
                    return None;
                }
                Some((key.to_string(), parse_value(value.trim())))
            })
            .collect()
    }
}

/// Single-quote `value` if it holds whitespace, a comment marker, quotes,
/// backslashes or `$`. Single quotes keep dotenv from interpolating.
fn quote_value(value: &str) -> String {
    let plain = value
        .chars()
        .all(|c| !c.is_whitespace() && !matches!(c, '#' | '"' | '\'' | '\\' | '$'));
    if plain {
        return value.to_string();
    }
    format!("'{}'", value.replace('\\', "\\\\").replace('\'', "\\'"))
}

fn parse_value(raw: &str) -> String {
    for quote in ['"', '\''] {
        if raw.len() >= 2 && raw.starts_with(quote) && raw.ends_with(quote) {
            return unescape(&raw[1..raw.len() - 1], quote);
        }
    }
    match raw.find(" #").or_else(|| raw.find("\t#")) {
        Some(index) => raw[..index].trim_end().to_string(),
        None => raw.to_string(),
    }
}

fn unescape(inner: &str, quote: char) -> String {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(next) if next == '\\' || next == quote => out.push(next),
                Some(next) => {
                    out.push(c);
                    out.push(next);
                }
                None => out.push(c),
            }
        } else {
            out.push(c);
        }
    }
    out
}
