//! Process-spawning command runner.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use anyhow::Context;
use tracing::debug;

use super::{CommandRunner, CommandSpec};
use crate::error::ProvisionError;

/// Runs commands on the host with `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }

    fn output(&self, spec: &CommandSpec) -> anyhow::Result<Output> {
        debug!(command = %spec.display(), "running command");

        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        cmd.stdin(if spec.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

        let mut child = cmd
            .spawn()
            .with_context(|| format!("Failed to run {}", spec.display()))?;

        if let Some(input) = &spec.stdin
            && let Some(mut pipe) = child.stdin.take()
        {
            pipe.write_all(input.as_bytes())
                .with_context(|| format!("Failed to write stdin of {}", spec.display()))?;
        }

        let output = child
            .wait_with_output()
            .with_context(|| format!("Failed to wait for {}", spec.display()))?;

        if !output.status.success() {
            let status = output
                .status
                .code()
                .map(|code| format!("exit code {code}"))
                .unwrap_or_else(|| "terminated by signal".to_string());
            return Err(ProvisionError::CommandFailed {
                command: spec.display(),
                status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        Ok(output)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<()> {
        self.output(spec).map(|_| ())
    }

    fn capture(&self, spec: &CommandSpec) -> anyhow::Result<String> {
        let output = self.output(spec)?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}
