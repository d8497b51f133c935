use std::{sync::Arc, time::Duration};

use configs::AppConfig;
use service::broker::{HelmBroker, ServiceBroker};
use service::installer::{ChartInstaller, CommandRunner};
use service::registry::{RegistrationService, RegistryStore};

/// Shared handler state. The store and the command runner are injected so the
/// same router runs against Redis/helm in production and fakes in tests.
#[derive(Clone)]
pub struct ServerState {
    pub registry: RegistrationService,
    pub broker: Arc<dyn ServiceBroker>,
}

impl ServerState {
    pub fn new(store: Arc<dyn RegistryStore>, runner: Arc<dyn CommandRunner>, cfg: &AppConfig) -> Self {
        let registry = RegistrationService::new(store);
        let installer = ChartInstaller::new(runner, cfg.helm.binary.clone(), cfg.helm.host.clone())
            .with_timeout(cfg.helm.timeout_secs.map(Duration::from_secs));
        let broker = HelmBroker::new(registry.clone(), installer)
            .with_last_operation_delay(Duration::from_millis(cfg.broker.last_operation_delay_ms));
        Self { registry, broker: Arc::new(broker) }
    }
}
