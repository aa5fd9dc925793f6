use std::process::Command;

use tracing::debug;

use crate::command::StatusCommand;
use crate::error::{Result, StatusError};

/// Runs the queue-query command and returns its standard output.
///
/// Injected into the reconciler so tests can substitute canned output.
pub trait CommandRunner {
    fn run(&self, command: &StatusCommand) -> Result<String>;
}

/// Spawns the command as a child process and waits for it.
///
/// No timeout is applied; the command's own behaviour bounds the wait.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, command: &StatusCommand) -> Result<String> {
        debug!(%command, "running status query");

        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|e| StatusError::CommandExecution {
                command: command.to_string(),
                reason: format!("failed to launch: {e}"),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let mut reason = match output.status.code() {
                Some(code) => format!("exit status {code}"),
                None => "terminated by signal".to_string(),
            };
            if !stderr.is_empty() {
                reason.push_str(&format!(": {stderr}"));
            }
            return Err(StatusError::CommandExecution {
                command: command.to_string(),
                reason,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
