use std::{process::Stdio, time::Duration};

use async_trait::async_trait;
use tokio::process::Command;

use crate::errors::ServiceError;
use crate::installer::runner::{CommandOutput, CommandRunner};

/// Runs commands as child processes with `tokio::process`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessRunner;

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, program: &str, args: &[String], timeout: Option<Duration>) -> Result<CommandOutput, ServiceError> {
        let mut command = Command::new(program);
        command
            .args(args)
            .stdin(Stdio::null())
            // only a timed-out child is killed; without a limit an install outlives its request
            .kill_on_drop(timeout.is_some());

        let output = match timeout {
            Some(limit) => tokio::time::timeout(limit, command.output())
                .await
                .map_err(|_| ServiceError::Timeout(limit))?,
            None => command.output().await,
        }
        .map_err(|e| ServiceError::Command(format!("{}: {}", program, e)))?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(CommandOutput { success: output.status.success(), code: output.status.code(), combined })
    }
}
