use std::sync::Arc;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::repository::KeyValueStore;

/// Best-effort JSON accessor over a `KeyValueStore`.
///
/// Reads fall back to a caller-supplied default and writes swallow failures;
/// persisted state is a convenience cache, never the source of truth.
#[derive(Clone)]
pub struct PersistentStore {
    slots: Arc<dyn KeyValueStore>,
}

impl PersistentStore {
    #[must_use]
    pub fn new(slots: Arc<dyn KeyValueStore>) -> Self {
        Self { slots }
    }

    /// Read and parse `key`, or return `default` when the slot is missing,
    /// holds data that no longer parses, or the backend fails.
    pub async fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let raw = match self.slots.get(key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return default,
            Err(err) => {
                tracing::warn!(key, error = %err, "storage read failed; using default");
                return default;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "stored value did not parse; using default");
                default
            }
        }
    }

    /// Serialize and write `value` under `key`. Failures are logged and dropped.
    pub async fn save<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key, error = %err, "value did not serialize; not saved");
                return;
            }
        };

        match self.slots.set(key, &raw).await {
            Ok(()) => tracing::debug!(key, bytes = raw.len(), "saved"),
            Err(err) => tracing::warn!(key, error = %err, "storage write failed; not saved"),
        }
    }

    /// Delete `key`. Failures are logged and dropped.
    pub async fn remove(&self, key: &str) {
        if let Err(err) = self.slots.remove(key).await {
            tracing::warn!(key, error = %err, "storage remove failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::InMemoryStore;
    use serde::Deserialize;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Prefs {
        name: String,
        tags: Vec<String>,
    }

    fn store(backend: InMemoryStore) -> (PersistentStore, InMemoryStore) {
        (PersistentStore::new(Arc::new(backend.clone())), backend)
    }

    #[tokio::test]
    async fn save_then_load_round_trips() {
        let (store, _) = store(InMemoryStore::new());
        let prefs = Prefs {
            name: "eco".into(),
            tags: vec!["solar".into(), "wind".into()],
        };
        store.save("prefs", &prefs).await;

        let loaded: Prefs = store
            .load(
                "prefs",
                Prefs {
                    name: String::new(),
                    tags: Vec::new(),
                },
            )
            .await;
        assert_eq!(loaded, prefs);
    }

    #[tokio::test]
    async fn missing_key_returns_default() {
        let (store, _) = store(InMemoryStore::new());
        let loaded: Vec<u32> = store.load("never-saved", vec![7]).await;
        assert_eq!(loaded, vec![7]);
    }

    #[tokio::test]
    async fn unparsable_value_returns_default() {
        let (store, backend) = store(InMemoryStore::new());
        backend.set("n", "{not json").await.unwrap();
        assert_eq!(store.load("n", 3_u8).await, 3);

        // Valid JSON with the wrong shape is discarded too.
        backend.set("n", "\"text\"").await.unwrap();
        assert_eq!(store.load("n", 3_u8).await, 3);
    }

    #[tokio::test]
    async fn unavailable_backend_never_errors() {
        let (store, _) = store(InMemoryStore::unavailable());
        store.save("k", &vec![1, 2, 3]).await;
        store.remove("k").await;
        let loaded: Vec<i32> = store.load("k", Vec::new()).await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn quota_failure_keeps_previous_value() {
        let (store, _) = store(InMemoryStore::with_quota(16));
        store.save("k", "short").await;
        store.save("k", "much longer than the quota allows").await;
        assert_eq!(store.load("k", String::new()).await, "short");
    }

    #[tokio::test]
    async fn null_round_trips_as_none() {
        let (store, _) = store(InMemoryStore::new());
        store.save("user", &Option::<String>::None).await;
        let loaded: Option<String> = store.load("user", Some("stale".into())).await;
        assert_eq!(loaded, None);
    }
}
