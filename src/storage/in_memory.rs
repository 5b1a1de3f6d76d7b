//! In-memory implementations for testing and development

use crate::core::manager::ManagerDirectory;
use crate::core::property::Property;
use crate::core::service::{FetchScope, KeyValueStore, PropertySource};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// In-memory key-value store
///
/// Useful for testing and development. Uses RwLock for thread-safe access;
/// clones share the same map.
#[derive(Clone)]
pub struct InMemoryKeyValueStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl InMemoryKeyValueStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Number of stored keys
    pub fn len(&self) -> Result<usize> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;
        Ok(entries.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl Default for InMemoryKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl KeyValueStore for InMemoryKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        entries.insert(key.to_string(), value.to_string());

        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;

        entries.remove(key);

        Ok(())
    }
}

/// A fixed set of listings and managers served as if from the backend
///
/// Only `limit` is honored; company and requester scoping are server-side
/// visibility rules that a fixture has no data for.
#[derive(Clone, Default)]
pub struct InMemoryPropertySource {
    properties: Arc<RwLock<Vec<Property>>>,
    managers: Arc<RwLock<ManagerDirectory>>,
}

impl InMemoryPropertySource {
    pub fn new(properties: Vec<Property>, managers: ManagerDirectory) -> Self {
        Self {
            properties: Arc::new(RwLock::new(properties)),
            managers: Arc::new(RwLock::new(managers)),
        }
    }

    /// Replace the served listings
    pub fn replace(&self, properties: Vec<Property>) -> Result<()> {
        let mut current = self
            .properties
            .write()
            .map_err(|e| anyhow!("Failed to acquire write lock: {}", e))?;
        *current = properties;
        Ok(())
    }
}

#[async_trait]
impl PropertySource for InMemoryPropertySource {
    async fn fetch_properties(&self, scope: &FetchScope) -> Result<Vec<Property>> {
        let properties = self
            .properties
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        let limit = scope.limit.unwrap_or(usize::MAX);
        Ok(properties.iter().take(limit).cloned().collect())
    }

    async fn fetch_managers(&self, _company: Option<&str>) -> Result<ManagerDirectory> {
        let managers = self
            .managers
            .read()
            .map_err(|e| anyhow!("Failed to acquire read lock: {}", e))?;

        Ok(managers.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::manager::Manager;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_remove() {
        let store = InMemoryKeyValueStore::new();
        assert_eq!(store.get("k").await.unwrap(), None);

        store.set("k", "v1").await.unwrap();
        store.set("k", "v2").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
        assert_eq!(store.len().unwrap(), 1);

        store.remove("k").await.unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = InMemoryKeyValueStore::new();
        let other = store.clone();
        other.set("shared", "yes").await.unwrap();
        assert_eq!(store.get("shared").await.unwrap().as_deref(), Some("yes"));
    }

    #[tokio::test]
    async fn test_property_source_honors_limit() {
        let records = (0..5)
            .map(|i| Property::from_json(json!({ "name": format!("p{}", i) })).unwrap())
            .collect();
        let source = InMemoryPropertySource::new(
            records,
            ManagerDirectory::new(vec![Manager::new("u1", "Kim")]),
        );

        let all = source.fetch_properties(&FetchScope::new()).await.unwrap();
        assert_eq!(all.len(), 5);

        let capped = source
            .fetch_properties(&FetchScope::new().limit(2))
            .await
            .unwrap();
        assert_eq!(capped.len(), 2);
        assert_eq!(capped[1].name_or_empty(), "p1");

        let managers = source.fetch_managers(None).await.unwrap();
        assert_eq!(managers.managers().len(), 1);
    }
}
