//! Command runner that records instead of executing.
//!
//! Used for dry runs and by tests that assert on the exact sequence of
//! external calls.

use std::cell::RefCell;
use std::collections::HashMap;

use tracing::info;

use super::{CommandRunner, CommandSpec};

#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: RefCell<Vec<CommandSpec>>,
    /// Canned stdout returned by `capture`, keyed by program name
    outputs: HashMap<String, String>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `stdout` whenever `program` is captured.
    pub fn with_output(mut self, program: &str, stdout: &str) -> Self {
        self.outputs.insert(program.to_string(), stdout.to_string());
        self
    }

    pub fn commands(&self) -> Vec<CommandSpec> {
        self.commands.borrow().clone()
    }

    /// Unmasked command lines in the order they were issued.
    pub fn command_lines(&self) -> Vec<String> {
        self.commands
            .borrow()
            .iter()
            .map(CommandSpec::command_line)
            .collect()
    }

    fn record(&self, spec: &CommandSpec) {
        info!(command = %spec.display(), "dry-run: skipped command");
        self.commands.borrow_mut().push(spec.clone());
    }
}

impl CommandRunner for RecordingRunner {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<()> {
        self.record(spec);
        Ok(())
    }

    fn capture(&self, spec: &CommandSpec) -> anyhow::Result<String> {
        self.record(spec);
        Ok(self.outputs.get(&spec.program).cloned().unwrap_or_default())
    }
}
