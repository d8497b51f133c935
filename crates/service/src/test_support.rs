#![cfg(test)]
use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::errors::ServiceError;
use crate::installer::{CommandOutput, CommandRunner};

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Option<Duration>,
}

/// Command runner that returns a canned output and remembers what it was asked to run.
pub struct FakeRunner {
    output: CommandOutput,
    calls: Mutex<Vec<RecordedCall>>,
}

impl FakeRunner {
    pub fn succeeding(combined: &str) -> Arc<Self> {
        Arc::new(Self {
            output: CommandOutput { success: true, code: Some(0), combined: combined.to_string() },
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(combined: &str) -> Arc<Self> {
        Arc::new(Self {
            output: CommandOutput { success: false, code: Some(1), combined: combined.to_string() },
            calls: Mutex::new(Vec::new()),
        })
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }
}

#[async_trait]
impl CommandRunner for FakeRunner {
    async fn run(&self, program: &str, args: &[String], timeout: Option<Duration>) -> Result<CommandOutput, ServiceError> {
        self.calls.lock().await.push(RecordedCall {
            program: program.to_string(),
            args: args.to_vec(),
            timeout,
        });
        Ok(self.output.clone())
    }
}
