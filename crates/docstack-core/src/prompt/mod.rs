//! Operator prompts.
//!
//! Every decision point asks through a [`Prompter`] under a stable key (see
//! [`keys`]), so answers can be pre-filled from `docstack.toml` or scripted
//! in tests. Yes/no questions share one parsing rule, [`parse_yes_no`].

mod answers;
pub mod keys;

pub use answers::AnswerPrompter;

use crate::error::ProvisionError;

pub trait Prompter {
    /// Ask for a line of text. `default` is returned for empty input.
    fn input(&mut self, key: &str, prompt: &str, default: Option<&str>) -> anyhow::Result<String>;

    /// Ask for a secret without echo. Empty input is returned as is.
    fn secret(&mut self, key: &str, prompt: &str) -> anyhow::Result<String>;

    /// Show an informational message to the operator.
    fn message(&mut self, _text: &str) -> anyhow::Result<()> {
        Ok(())
    }

    /// Show a message that embeds a secret. `redacted` is the same text with
    /// the secret masked; anything that logs or stores output must use it.
    fn sensitive_message(&mut self, _text: &str, redacted: &str) -> anyhow::Result<()> {
        self.message(redacted)
    }
}

/// Interpret a yes/no answer.
///
/// The answer is trimmed and lowercased; `y` and `yes` are affirmative, empty
/// input takes `default`, anything else is negative.
pub fn parse_yes_no(input: &str, default: bool) -> bool {
    match input.trim().to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    }
}

/// Ask a yes/no question, appending the `<Y/n>` or `<y/N>` hint.
pub fn confirm(
    prompter: &mut dyn Prompter,
    key: &str,
    question: &str,
    default: bool,
) -> anyhow::Result<bool> {
    let hint = if default { "<Y/n>" } else { "<y/N>" };
    let answer = prompter.input(key, &format!("{question} {hint}"), None)?;
    Ok(parse_yes_no(&answer, default))
}

/// Ask for a value that has no default; empty input is an error.
pub fn required(prompter: &mut dyn Prompter, key: &str, prompt: &str) -> anyhow::Result<String> {
    let answer = prompter.input(key, prompt, None)?;
    let answer = answer.trim();
    if answer.is_empty() {
        return Err(ProvisionError::MissingAnswer {
            key: key.to_string(),
        }
        .into());
    }
    Ok(answer.to_string())
}

/// Ask for a value, falling back to `default` on empty input.
pub fn with_default(
    prompter: &mut dyn Prompter,
    key: &str,
    prompt: &str,
    default: &str,
) -> anyhow::Result<String> {
    let answer = prompter.input(key, prompt, Some(default))?;
    let answer = answer.trim();
    Ok(if answer.is_empty() {
        default.to_string()
    } else {
        answer.to_string()
    })
}
