use std::time::Duration;

use async_trait::async_trait;

use crate::errors::ServiceError;

/// Result of a finished external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub success: bool,
    pub code: Option<i32>,
    /// stdout followed by stderr.
    pub combined: String,
}

impl CommandOutput {
    pub fn status_label(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "terminated by signal".to_string(),
        }
    }
}

/// Seam for running external programs, so installs can be faked in tests.
///
/// `timeout` of `None` waits for the program however long it takes.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, program: &str, args: &[String], timeout: Option<Duration>) -> Result<CommandOutput, ServiceError>;
}
