//! TOML parser with helpful error messages

use std::path::Path;

use anyhow::{Context, Result};

use super::schema::Settings;

/// Parse docstack.toml with detailed error messages
pub fn parse_settings(path: &Path) -> Result<Settings> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

    parse_settings_str(&content)
        .with_context(|| format!("Failed to parse settings file: {}", path.display()))
}

/// Parse docstack.toml content from string
pub fn parse_settings_str(content: &str) -> Result<Settings> {
    let settings: Settings =
        toml::from_str(content).map_err(|e| enhance_toml_error(e, content))?;

    settings.validate()?;

    Ok(settings)
}

/// Serialize settings to a TOML string
pub fn to_toml(settings: &Settings) -> Result<String> {
    toml::to_string_pretty(settings).context("Failed to serialize settings to TOML")
}

/// Attach the line and column of the failing span, with the offending line
/// and a caret under the column.
fn enhance_toml_error(error: toml::de::Error, content: &str) -> anyhow::Error {
    let Some(span) = error.span() else {
        return anyhow::anyhow!("TOML parsing error: {}", error.message().trim_end());
    };

    let before = &content.as_bytes()[..span.start.min(content.len())];
    let line = before.iter().filter(|b| **b == b'\n').count() + 1;
    let column = before.iter().rev().take_while(|b| **b != b'\n').count() + 1;

    anyhow::anyhow!(
        "TOML parsing error at line {}, column {}: {}\n{}",
        line,
        column,
        error.message().trim_end(),
        excerpt(content, line, column)
    )
}

fn excerpt(content: &str, line: usize, column: usize) -> String {
    let text = content.lines().nth(line - 1).unwrap_or_default();
    format!("{:>4} | {}\n     | {}^", line, text, " ".repeat(column - 1))
}
