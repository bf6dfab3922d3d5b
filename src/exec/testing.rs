//! In-memory command runner for tests

use super::runner::{CommandOutput, CommandRunner};
use crate::error::Result;
use std::cell::RefCell;
use std::collections::HashMap;

/// Replays scripted exit codes per command line and records every call.
///
/// Each scripted command pops its next exit code; the last one repeats once
/// the script runs out. Unscripted commands exit 1, like `docker inspect`
/// on a missing container.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    script: RefCell<HashMap<String, Vec<i32>>>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exits(self, command: &str, codes: &[i32]) -> Self {
        self.script
            .borrow_mut()
            .insert(command.to_string(), codes.to_vec());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Whether any recorded call starts with `prefix`
    pub fn ran(&self, prefix: &str) -> bool {
        self.calls.borrow().iter().any(|call| call.starts_with(prefix))
    }
}

impl CommandRunner for ScriptedRunner {
    fn run(&self, command: &str) -> Result<CommandOutput> {
        self.calls.borrow_mut().push(command.to_string());

        let code = match self.script.borrow_mut().get_mut(command) {
            Some(codes) if codes.len() > 1 => codes.remove(0),
            Some(codes) => codes.first().copied().unwrap_or(0),
            None => 1,
        };

        Ok(CommandOutput {
            exit_code: Some(code),
            stdout: String::new(),
            stderr: if code == 0 {
                String::new()
            } else {
                format!("exit {}", code)
            },
        })
    }
}
