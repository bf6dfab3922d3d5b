//! Fixed-delay retries

use super::runner::{CommandOutput, CommandRunner};
use crate::error::{Result, UcpError};
use serde::Serialize;
use std::thread;
use std::time::Duration;

pub const DEFAULT_TRIES: u32 = 3;
pub const DEFAULT_TRY_SLEEP: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RetryPolicy {
    /// Total attempts, at least one
    pub tries: u32,
    /// Pause between attempts
    pub try_sleep: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            tries: DEFAULT_TRIES,
            try_sleep: DEFAULT_TRY_SLEEP,
        }
    }
}

impl RetryPolicy {
    pub fn new(tries: u32, try_sleep: Duration) -> Self {
        Self {
            tries: tries.max(1),
            try_sleep,
        }
    }

    /// Run `command` until it exits 0 or the tries run out.
    ///
    /// Returns the number of attempts used. Each attempt's output is logged
    /// when `log_output` is set.
    pub fn run<R: CommandRunner>(
        &self,
        runner: &R,
        title: &str,
        command: &str,
        log_output: bool,
    ) -> Result<u32> {
        let tries = self.tries.max(1);
        let mut last = CommandOutput::default();

        for attempt in 1..=tries {
            let output = runner.run(command)?;

            if log_output {
                for line in output.combined().lines() {
                    tracing::info!("{}: {}", title, line);
                }
            }

            if output.success() {
                return Ok(attempt);
            }

            tracing::warn!(
                "{} failed (attempt {}/{}, exit code {:?})",
                title,
                attempt,
                tries,
                output.exit_code
            );
            last = output;

            if attempt < tries && !self.try_sleep.is_zero() {
                thread::sleep(self.try_sleep);
            }
        }

        Err(UcpError::Execution {
            title: title.to_string(),
            attempts: tries,
            exit_code: last.exit_code,
            output: last.combined(),
        })
    }
}
