use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::debug;

use crate::errors::ServiceError;
use crate::registry::store::RegistryStore;

/// Redis-backed registry. Every call checks out a multiplexed connection from
/// the shared client; the client itself is cheap to clone and safe to share.
#[derive(Clone)]
pub struct RedisRegistryStore {
    client: redis::Client,
}

impl RedisRegistryStore {
    /// Build the client. No connection is made until the first command.
    pub fn new(url: &str) -> Result<Self, ServiceError> {
        let client = redis::Client::open(url)?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection, ServiceError> {
        Ok(self.client.get_multiplexed_async_connection().await?)
    }
}

#[async_trait]
impl RegistryStore for RedisRegistryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        debug!(%key, found = value.is_some(), "registry get");
        Ok(value)
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        let mut conn = self.connection().await?;
        let _: () = conn.set(key, value).await?;
        debug!(%key, "registry set");
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        let mut conn = self.connection().await?;
        let keys: Vec<String> = conn.keys(format!("{}*", prefix)).await?;
        Ok(keys)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        let mut conn = self.connection().await?;
        let _: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_url() {
        assert!(matches!(RedisRegistryStore::new("not a url"), Err(ServiceError::Store(_))));
    }

    // Runs only when a disposable Redis is provided, e.g. REDIS_TEST_URL=redis://127.0.0.1:6379/
    #[tokio::test]
    async fn redis_roundtrip_when_available() -> Result<(), anyhow::Error> {
        let Ok(url) = std::env::var("REDIS_TEST_URL") else { return Ok(()) };
        let store = RedisRegistryStore::new(&url)?;
        store.ping().await?;

        let prefix = format!("test_{}_", uuid::Uuid::new_v4().simple());
        let key = format!("{}a", prefix);
        assert_eq!(store.get(&key).await?, None);
        store.set(&key, "1".into()).await?;
        store.set(&key, "2".into()).await?;
        assert_eq!(store.get(&key).await?, Some("2".to_string()));
        assert_eq!(store.keys(&prefix).await?, vec![key]);
        Ok(())
    }
}
