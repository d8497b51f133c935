//! Service registry: which Helm chart backs which service name.
//!
//! Registrations are stored as JSON under `svc_<name>` keys in a key-value
//! store. The store is injected through [`store::RegistryStore`] so the
//! broker can run against Redis in production and an in-memory map in tests.

pub mod memory_store;
pub mod redis_store;
pub mod service;
pub mod store;

use serde::{Deserialize, Serialize};

pub use memory_store::InMemoryRegistryStore;
pub use redis_store::RedisRegistryStore;
pub use service::RegistrationService;
pub use store::RegistryStore;

/// Key prefix shared by every registration.
pub const SERVICE_PREFIX: &str = "svc_";

/// Registry key for a service name.
pub fn service_key(name: &str) -> String {
    format!("{}{}", SERVICE_PREFIX, name)
}

/// A service name mapped to the chart installed on provision.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistration {
    pub name: String,
    pub helm_chart_name: String,
}
