use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::broker::model::*;
use crate::broker::operation::OperationToken;
use crate::broker::ServiceBroker;
use crate::errors::ServiceError;
use crate::installer::{parse_release_name, ChartInstaller};
use crate::registry::{RegistrationService, ServiceRegistration};

/// Delay before `last_operation` answers when nothing else is configured.
pub const DEFAULT_LAST_OPERATION_DELAY: Duration = Duration::from_secs(2);

/// Broker that provisions a registered service by installing its Helm chart.
///
/// Provisioning is reported as asynchronous, but there is no status tracking:
/// `last_operation` waits a fixed delay and then always reports success.
#[derive(Clone)]
pub struct HelmBroker {
    registry: RegistrationService,
    installer: ChartInstaller,
    last_operation_delay: Duration,
}

impl HelmBroker {
    pub fn new(registry: RegistrationService, installer: ChartInstaller) -> Self {
        Self { registry, installer, last_operation_delay: DEFAULT_LAST_OPERATION_DELAY }
    }

    pub fn with_last_operation_delay(mut self, delay: Duration) -> Self {
        self.last_operation_delay = delay;
        self
    }
}

/// One catalog entry per registration, each with a single "Default" plan.
pub fn catalog_entry(reg: &ServiceRegistration) -> Service {
    Service {
        id: reg.name.clone(),
        name: reg.name.clone(),
        description: "ye".to_string(),
        bindable: true,
        plan_updateable: false,
        plans: vec![ServicePlan {
            id: format!("plan-{}", reg.name),
            name: "Default".to_string(),
            description: "Just the default".to_string(),
        }],
    }
}

#[async_trait]
impl ServiceBroker for HelmBroker {
    async fn services(&self) -> Result<Vec<Service>, ServiceError> {
        info!(event = "catalog_start", "starting catalog request");
        let registrations = self.registry.list().await?;
        let catalog: Vec<Service> = registrations.iter().map(catalog_entry).collect();
        info!(event = "catalog_done", services = catalog.len(), "catalog built");
        Ok(catalog)
    }

    async fn provision(
        &self,
        instance_id: &str,
        details: ProvisionDetails,
        async_allowed: bool,
    ) -> Result<ProvisionedServiceSpec, ServiceError> {
        if details.service_id.is_empty() {
            return Err(ServiceError::Validation("service_id missing".into()));
        }
        if details.plan_id.is_empty() {
            return Err(ServiceError::Validation("plan_id missing".into()));
        }
        if !async_allowed {
            return Err(ServiceError::AsyncRequired);
        }

        let registration = self.registry.lookup(&details.service_id).await?;
        let output = self.installer.install(&registration.helm_chart_name).await?;
        let release_name = parse_release_name(&output);
        info!(
            %instance_id,
            service_id = %details.service_id,
            release = %release_name,
            event = "provisioned",
            "chart install finished"
        );

        Ok(ProvisionedServiceSpec {
            is_async: true,
            dashboard_url: None,
            operation_data: OperationToken::new(release_name).encode()?,
        })
    }

    async fn last_operation(&self, instance_id: &str, operation_data: &str) -> Result<LastOperation, ServiceError> {
        tokio::time::sleep(self.last_operation_delay).await;
        let token = OperationToken::decode(operation_data).map_err(|e| {
            warn!(%instance_id, %operation_data, "could not decode operation data");
            e
        })?;
        Ok(LastOperation {
            state: LastOperationState::Succeeded,
            description: format!("Successfully deployed release {}", token.release_name),
        })
    }

    async fn deprovision(
        &self,
        instance_id: &str,
        _details: DeprovisionDetails,
        _async_allowed: bool,
    ) -> Result<DeprovisionServiceSpec, ServiceError> {
        warn!(%instance_id, op = "deprovision", "unsupported broker operation");
        Err(ServiceError::Unsupported("deprovision"))
    }

    async fn bind(&self, instance_id: &str, binding_id: &str, _details: BindDetails) -> Result<Binding, ServiceError> {
        warn!(%instance_id, %binding_id, op = "bind", "unsupported broker operation");
        Err(ServiceError::Unsupported("bind"))
    }

    async fn unbind(&self, instance_id: &str, binding_id: &str, _details: UnbindDetails) -> Result<(), ServiceError> {
        warn!(%instance_id, %binding_id, op = "unbind", "unsupported broker operation");
        Err(ServiceError::Unsupported("unbind"))
    }

    async fn update(
        &self,
        instance_id: &str,
        _details: UpdateDetails,
        _async_allowed: bool,
    ) -> Result<UpdateServiceSpec, ServiceError> {
        warn!(%instance_id, op = "update", "unsupported broker operation");
        Err(ServiceError::Unsupported("update"))
    }
}
