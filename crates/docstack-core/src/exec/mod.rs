//! External command execution.
//!
//! Every call into the package manager, database client, build toolchain or
//! service manager is described by a [`CommandSpec`] and handed to a
//! [`CommandRunner`]. [`SystemRunner`] spawns real processes;
//! [`RecordingRunner`] only records what would have run.

mod recording;
mod system;

use std::path::{Path, PathBuf};

pub use recording::RecordingRunner;
pub use system::SystemRunner;

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
    /// Text written to the child's stdin before waiting on it
    pub stdin: Option<String>,
    /// Arguments carry secrets and are masked in logs
    pub sensitive: bool,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
            stdin: None,
            sensitive: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.cwd = Some(dir.as_ref().to_path_buf());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn stdin(mut self, input: impl Into<String>) -> Self {
        self.stdin = Some(input.into());
        self
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Program and arguments joined by spaces, unmasked.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Command line suitable for logs; arguments are masked when sensitive.
    pub fn display(&self) -> String {
        if self.sensitive {
            format!("{} <{} arguments hidden>", self.program, self.args.len())
        } else {
            self.command_line()
        }
    }
}

/// Runs external commands. Every failure is fatal to the caller.
pub trait CommandRunner {
    /// Run a command to completion. A non-zero exit status is an error.
    fn run(&self, spec: &CommandSpec) -> anyhow::Result<()>;

    /// Run a command and return its trimmed stdout.
    fn capture(&self, spec: &CommandSpec) -> anyhow::Result<String>;
}
