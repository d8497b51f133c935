use async_trait::async_trait;

use crate::errors::ServiceError;

/// Trait abstraction for the registry key-value store.
/// Only the handful of operations the broker needs: point reads and writes,
/// a prefix scan for the catalog, and a liveness ping.
#[async_trait]
pub trait RegistryStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError>;
    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError>;
    /// All keys starting with `prefix`, in no particular order.
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, ServiceError>;
    async fn ping(&self) -> Result<(), ServiceError>;
}
