use std::sync::Arc;

use tracing::{info, warn};

use crate::errors::ServiceError;
use crate::registry::{service_key, ServiceRegistration, SERVICE_PREFIX};
use crate::registry::store::RegistryStore;

/// Registration and lookup of services on top of a [`RegistryStore`].
///
/// Writes are plain overwrites: two registrations racing on the same name
/// leave whichever landed last.
#[derive(Clone)]
pub struct RegistrationService {
    store: Arc<dyn RegistryStore>,
}

impl RegistrationService {
    pub fn new(store: Arc<dyn RegistryStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RegistryStore> {
        &self.store
    }

    /// Validate and store `name -> helm_chart_name`, replacing any previous chart.
    pub async fn register(&self, name: &str, helm_chart_name: &str) -> Result<ServiceRegistration, ServiceError> {
        if name.is_empty() {
            return Err(ServiceError::Validation("name is empty".into()));
        }
        if helm_chart_name.is_empty() {
            return Err(ServiceError::Validation("helmChartName is empty".into()));
        }

        let registration = ServiceRegistration {
            name: name.to_string(),
            helm_chart_name: helm_chart_name.to_string(),
        };
        let value = serde_json::to_string(&registration)?;
        self.store.set(&service_key(name), value).await?;
        info!(service = %name, chart = %helm_chart_name, event = "service_registered", "service registered");
        Ok(registration)
    }

    /// Fetch and decode the registration stored under `key`.
    pub async fn get_by_key(&self, key: &str) -> Result<ServiceRegistration, ServiceError> {
        let raw = self
            .store
            .get(key)
            .await?
            .ok_or_else(|| ServiceError::not_found(&format!("registry key {}", key)))?;
        serde_json::from_str(&raw).map_err(|e| {
            warn!(%key, value = %raw, "could not decode registry value");
            ServiceError::Decode(format!("{}: {}", key, e))
        })
    }

    /// Look up a registration by service name.
    pub async fn lookup(&self, name: &str) -> Result<ServiceRegistration, ServiceError> {
        self.get_by_key(&service_key(name)).await
    }

    /// Every registration, sorted by name. One bad entry fails the whole listing.
    pub async fn list(&self) -> Result<Vec<ServiceRegistration>, ServiceError> {
        let keys = self.store.keys(SERVICE_PREFIX).await?;
        let mut registrations = Vec::with_capacity(keys.len());
        for key in keys {
            registrations.push(self.get_by_key(&key).await?);
        }
        registrations.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(registrations)
    }
}
