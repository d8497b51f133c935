//! Open Service Broker contract and the Helm-backed implementation.

pub mod helm;
pub mod model;
pub mod operation;

use async_trait::async_trait;

use crate::errors::ServiceError;
pub use helm::HelmBroker;
pub use model::*;
pub use operation::OperationToken;

/// Operations a platform drives through the `/v2` API.
#[async_trait]
pub trait ServiceBroker: Send + Sync {
    async fn services(&self) -> Result<Vec<Service>, ServiceError>;

    async fn provision(
        &self,
        instance_id: &str,
        details: ProvisionDetails,
        async_allowed: bool,
    ) -> Result<ProvisionedServiceSpec, ServiceError>;

    async fn last_operation(&self, instance_id: &str, operation_data: &str) -> Result<LastOperation, ServiceError>;

    async fn deprovision(
        &self,
        instance_id: &str,
        details: DeprovisionDetails,
        async_allowed: bool,
    ) -> Result<DeprovisionServiceSpec, ServiceError>;

    async fn bind(&self, instance_id: &str, binding_id: &str, details: BindDetails) -> Result<Binding, ServiceError>;

    async fn unbind(&self, instance_id: &str, binding_id: &str, details: UnbindDetails) -> Result<(), ServiceError>;

    async fn update(
        &self,
        instance_id: &str,
        details: UpdateDetails,
        async_allowed: bool,
    ) -> Result<UpdateServiceSpec, ServiceError>;
}
