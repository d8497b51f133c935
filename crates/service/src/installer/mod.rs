//! Chart installation through the helm CLI.

pub mod process;
pub mod runner;

use std::{sync::Arc, time::Duration};

use tracing::{debug, error, info};

use crate::errors::ServiceError;
pub use process::ProcessRunner;
pub use runner::{CommandOutput, CommandRunner};

/// Runs `helm [--host <host>] install <chart>` and hands back its combined output.
#[derive(Clone)]
pub struct ChartInstaller {
    runner: Arc<dyn CommandRunner>,
    binary: String,
    host: String,
    timeout: Option<Duration>,
}

impl ChartInstaller {
    pub fn new(runner: Arc<dyn CommandRunner>, binary: impl Into<String>, host: impl Into<String>) -> Self {
        Self { runner, binary: binary.into(), host: host.into(), timeout: None }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn install_args(&self, chart: &str) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if !self.host.is_empty() {
            args.push("--host".to_string());
            args.push(self.host.clone());
        }
        args.push("install".to_string());
        args.push(chart.to_string());
        args
    }

    /// Install `chart`. A non-zero exit is an error carrying the output.
    pub async fn install(&self, chart: &str) -> Result<String, ServiceError> {
        let args = self.install_args(chart);
        info!(%chart, binary = %self.binary, event = "install_start", "installing chart");
        let output = self.runner.run(&self.binary, &args, self.timeout).await.map_err(|e| {
            error!(%chart, error = %e, event = "install_failed", "could not run helm");
            e
        })?;

        if !output.success {
            error!(%chart, status = %output.status_label(), output = %output.combined, event = "install_failed", "helm install exited with failure");
            return Err(ServiceError::Install { status: output.status_label(), output: output.combined });
        }
        debug!(%chart, output = %output.combined, "helm install output");
        info!(%chart, event = "install_done", "chart installed");
        Ok(output.combined)
    }
}

/// Release name reported by `helm install`: the last space-separated word of
/// the first output line (`NAME:   wobbly-panda`). Nothing checks that the word
/// really is a release name.
pub fn parse_release_name(output: &str) -> String {
    let first_line = output.split('\n').next().unwrap_or_default();
    first_line.rsplit(' ').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::FakeRunner;

    #[test]
    fn release_name_from_first_line() {
        let out = "NAME:   wobbly-panda\nLAST DEPLOYED: Mon Jan  1\nNAMESPACE: default\n";
        assert_eq!(parse_release_name(out), "wobbly-panda");
    }

    #[test]
    fn release_name_is_not_validated() {
        assert_eq!(parse_release_name(""), "");
        assert_eq!(parse_release_name("trailing space \nx"), "");
        assert_eq!(parse_release_name("single"), "single");
    }

    #[test]
    fn args_include_host_when_set() {
        let installer = ChartInstaller::new(FakeRunner::succeeding(""), "helm", "tiller:44134");
        assert_eq!(installer.install_args("stable/redis"), vec!["--host", "tiller:44134", "install", "stable/redis"]);
        let installer = ChartInstaller::new(FakeRunner::succeeding(""), "helm", "");
        assert_eq!(installer.install_args("stable/redis"), vec!["install", "stable/redis"]);
    }

    #[tokio::test]
    async fn install_returns_combined_output() -> Result<(), anyhow::Error> {
        let runner = FakeRunner::succeeding("NAME:   r1\n");
        let installer = ChartInstaller::new(runner.clone(), "helm", "h")
            .with_timeout(Some(Duration::from_secs(5)));
        let out = installer.install("chart").await?;
        assert_eq!(out, "NAME:   r1\n");

        let calls = runner.calls().await;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "helm");
        assert_eq!(calls[0].timeout, Some(Duration::from_secs(5)));
        Ok(())
    }

    #[tokio::test]
    async fn failing_exit_is_install_error() {
        let installer = ChartInstaller::new(FakeRunner::failing("Error: chart not found"), "helm", "");
        match installer.install("nope").await {
            Err(ServiceError::Install { output, .. }) => assert!(output.contains("chart not found")),
            other => panic!("unexpected: {:?}", other),
        }
    }
}
