use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::ServiceError;
use crate::registry::store::RegistryStore;

/// Process-local registry, used when no Redis is wanted (tests, local runs).
#[derive(Clone, Default)]
pub struct InMemoryRegistryStore {
    inner: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryRegistryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of stored keys.
    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[async_trait]
impl RegistryStore for InMemoryRegistryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, ServiceError> {
        Ok(self.inner.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), ServiceError> {
        self.inner.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn keys(&self, prefix: &str) -> Result<Vec<String>, ServiceError> {
        let map = self.inner.read().await;
        Ok(map.keys().filter(|k| k.starts_with(prefix)).cloned().collect())
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_get_and_scan() -> Result<(), anyhow::Error> {
        let store = InMemoryRegistryStore::new();
        assert!(store.is_empty().await);

        store.set("svc_a", "1".into()).await?;
        store.set("svc_b", "2".into()).await?;
        store.set("other", "3".into()).await?;
        assert_eq!(store.get("svc_a").await?, Some("1".to_string()));
        assert_eq!(store.get("missing").await?, None);

        let mut keys = store.keys("svc_").await?;
        keys.sort();
        assert_eq!(keys, vec!["svc_a".to_string(), "svc_b".to_string()]);

        // overwrite keeps a single entry
        store.set("svc_a", "10".into()).await?;
        assert_eq!(store.len().await, 3);
        assert_eq!(store.get("svc_a").await?, Some("10".to_string()));
        Ok(())
    }
}
