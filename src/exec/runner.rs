//! Running shell commands

use crate::error::Result;
use std::path::PathBuf;
use std::process::Command;

/// Default shell used to interpret command lines
pub const DEFAULT_SHELL: &str = "/bin/sh";

/// Captured result of one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// stdout followed by stderr, trimmed
    pub fn combined(&self) -> String {
        let stdout = self.stdout.trim();
        let stderr = self.stderr.trim();
        match (stdout.is_empty(), stderr.is_empty()) {
            (false, false) => format!("{}\n{}", stdout, stderr),
            (false, true) => stdout.to_string(),
            (true, _) => stderr.to_string(),
        }
    }
}

/// Something that can run a shell command line to completion
pub trait CommandRunner {
    fn run(&self, command: &str) -> Result<CommandOutput>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        (**self).run(command)
    }
}

/// Runs commands through `sh -c`
#[derive(Debug, Clone)]
pub struct ShellRunner {
    shell: PathBuf,
}

impl Default for ShellRunner {
    fn default() -> Self {
        Self {
            shell: PathBuf::from(DEFAULT_SHELL),
        }
    }
}

impl ShellRunner {
    pub fn new(shell: impl Into<PathBuf>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        // The command line may carry credentials; callers log a masked copy.
        tracing::trace!("spawning {} -c", self.shell.display());

        let output = Command::new(&self.shell).arg("-c").arg(command).output()?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
