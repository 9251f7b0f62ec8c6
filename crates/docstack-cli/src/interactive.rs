//! Terminal prompts and progress output.
//!
//! Uses dialoguer for prompts and console for styling.

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use dialoguer::{Input, Password, theme::ColorfulTheme};

use docstack_core::pipeline::{StepId, StepObserver, StepOutcome};
use docstack_core::prompt::Prompter;

/// Prompter that asks on the terminal.
pub struct TerminalPrompter<W: Write = io::Stderr> {
    /// Output writer for messages (for testing)
    writer: W,
    theme: ColorfulTheme,
}

impl TerminalPrompter<io::Stderr> {
    pub fn new() -> Self {
        Self {
            writer: io::stderr(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter<io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> TerminalPrompter<W> {
    /// Create a prompter with a custom message writer (for testing).
    #[cfg(test)]
    pub fn with_writer(writer: W) -> Self {
        Self {
            writer,
            theme: ColorfulTheme::default(),
        }
    }
}

impl<W: Write> Prompter for TerminalPrompter<W> {
    fn input(&mut self, _key: &str, prompt: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty(true);
        if let Some(default) = default {
            input = input.default(default.to_string());
        }
        Ok(input.interact_text()?)
    }

    fn secret(&mut self, _key: &str, prompt: &str) -> Result<String> {
        Ok(Password::with_theme(&self.theme)
            .with_prompt(prompt)
            .allow_empty_password(true)
            .interact()?)
    }

    fn message(&mut self, text: &str) -> Result<()> {
        writeln!(self.writer)?;
        for line in text.lines() {
            writeln!(self.writer, "  {}", style(line).yellow())?;
        }
        writeln!(self.writer)?;
        Ok(())
    }

    /// Shows the unredacted text.
    fn sensitive_message(&mut self, text: &str, _redacted: &str) -> Result<()> {
        self.message(text)
    }
}

/// Prints one line per pipeline step.
pub struct ConsoleProgress<W: Write = io::Stderr> {
    writer: W,
}

impl ConsoleProgress<io::Stderr> {
    pub fn new() -> Self {
        Self {
            writer: io::stderr(),
        }
    }
}

impl Default for ConsoleProgress<io::Stderr> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> ConsoleProgress<W> {
    #[cfg(test)]
    pub fn with_writer(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> StepObserver for ConsoleProgress<W> {
    fn step_started(&mut self, step: StepId, index: usize, total: usize) {
        let _ = writeln!(
            self.writer,
            "{} {}",
            style(format!("[{index:>2}/{total}]")).dim(),
            style(step.title()).bold()
        );
    }

    fn step_finished(&mut self, step: StepId, outcome: StepOutcome) {
        let line = match outcome {
            StepOutcome::Completed => format!("  {} {}", style("✓").green(), step),
            StepOutcome::Skipped => format!("  {} {} (skipped)", style("-").yellow(), step),
        };
        let _ = writeln!(self.writer, "{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_is_indented_per_line() {
        let mut output = Vec::new();
        {
            let mut prompter = TerminalPrompter::with_writer(&mut output);
            prompter.message("first\nsecond").unwrap();
        }

        let text = console::strip_ansi_codes(&String::from_utf8(output).unwrap()).into_owned();
        assert_eq!(text, "\n  first\n  second\n\n");
    }

    #[test]
    fn test_sensitive_message_is_shown_in_full() {
        let mut output = Vec::new();
        {
            let mut prompter = TerminalPrompter::with_writer(&mut output);
            prompter
                .sensitive_message("PASSWORD 'pw'", "PASSWORD '********'")
                .unwrap();
        }

        let text = console::strip_ansi_codes(&String::from_utf8(output).unwrap()).into_owned();
        assert_eq!(text, "\n  PASSWORD 'pw'\n\n");
    }

    #[test]
    fn test_progress_lines() {
        let mut output = Vec::new();
        {
            let mut progress = ConsoleProgress::with_writer(&mut output);
            progress.step_started(StepId::Python, 3, 15);
            progress.step_finished(StepId::Python, StepOutcome::Completed);
            progress.step_finished(StepId::Adminer, StepOutcome::Skipped);
        }

        let text = console::strip_ansi_codes(&String::from_utf8(output).unwrap()).into_owned();
        assert_eq!(
            text,
            "[ 3/15] Installing Python\n  ✓ python\n  - adminer (skipped)\n"
        );
    }
}
