//! Executing planned commands
//!
//! The [`Executor`] evaluates an [`ExecSpec`]'s guard once, then runs the
//! command under its retry policy. Commands go through a [`CommandRunner`]
//! so the host shell can be swapped out.

pub mod retry;
pub mod runner;

#[cfg(test)]
pub(crate) mod testing;

pub use retry::{RetryPolicy, DEFAULT_TRIES, DEFAULT_TRY_SLEEP};
pub use runner::{CommandOutput, CommandRunner, ShellRunner, DEFAULT_SHELL};

use crate::error::Result;
use crate::gate::Guard;
use crate::plan::ExecSpec;
use std::fmt;

/// What happened to one [`ExecSpec`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The guard said the action is not needed
    Skipped,
    /// Dry run: the guard said the action is needed
    WouldRun,
    /// The command succeeded
    Applied { attempts: u32 },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::WouldRun => write!(f, "would run"),
            Outcome::Applied { attempts: 1 } => write!(f, "applied"),
            Outcome::Applied { attempts } => write!(f, "applied after {} attempts", attempts),
        }
    }
}

/// Runs guarded commands
pub struct Executor<R: CommandRunner> {
    runner: R,
    dry_run: bool,
}

impl<R: CommandRunner> Executor<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            dry_run: false,
        }
    }

    /// Evaluate guards but never run the guarded commands
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Whether the guard's marker container exists
    pub fn marker_exists(&self, guard: &Guard) -> Result<bool> {
        let output = self.runner.run(&guard.command())?;
        let exists = output.success();
        tracing::debug!("{} exists: {}", guard.marker(), exists);
        Ok(exists)
    }

    /// Converge one spec
    pub fn apply(&self, spec: &ExecSpec) -> Result<Outcome> {
        let exists = self.marker_exists(&spec.guard)?;

        if !spec.guard.should_run(exists) {
            tracing::info!("{}: nothing to do ({})", spec.title, spec.guard);
            return Ok(Outcome::Skipped);
        }

        if self.dry_run {
            tracing::info!("{}: would run", spec.title);
            return Ok(Outcome::WouldRun);
        }

        tracing::info!("{}: running", spec.title);
        tracing::debug!("{}", spec.redacted);

        let attempts = spec
            .retry
            .run(&self.runner, &spec.title, &spec.command, spec.log_output)?;

        tracing::info!("{}: done", spec.title);
        Ok(Outcome::Applied { attempts })
    }

    /// Converge specs in order, stopping at the first failure
    pub fn apply_all(&self, specs: &[ExecSpec]) -> Result<Vec<Outcome>> {
        specs.iter().map(|spec| self.apply(spec)).collect()
    }
}
