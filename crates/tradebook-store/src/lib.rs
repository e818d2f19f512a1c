//! Partitioned key-value record storage
//!
//! The persistence substrate for tradebook: an injected key-value store
//! holding one serialized blob per record partition.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub mod error;
pub mod partition;

pub use error::StoreError;
pub use partition::{PartitionKey, PartitionStore};

// ==================== Utility Functions ====================

/// Generate a short hash (8 characters) from content
pub fn short_hash(content: &str) -> String {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    let hash = hasher.finish();

    format!("{:016x}", hash)[..8].to_string()
}

/// Generate a unique record ID
///
/// Millisecond timestamp plus a process-local sequence number, so two
/// records created within the same millisecond still get distinct ids.
pub fn generate_record_id() -> String {
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::{SystemTime, UNIX_EPOCH};

    static SEQ: AtomicU64 = AtomicU64::new(0);

    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("rec-{}-{}", now, seq)
}

// ==================== Key-Value Store Trait ====================

/// Store reference type
pub type KvRef = Arc<dyn KvStore>;

/// Trait for the underlying key-value store
///
/// Keys are opaque strings; values are serialized partition blobs.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Read the value stored under a key, if any
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store a value under a key, replacing any previous value
    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;
}

// ==================== In-Memory Store ====================

/// In-memory key-value store
///
/// The default backend for tests and single-session use.
#[derive(Clone, Default)]
pub struct MemoryKvStore {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryKvStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Number of keys currently stored
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let entries = self.entries.lock().unwrap();
        Ok(entries.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(key.to_string(), value);
        Ok(())
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store_roundtrip() {
        let store = MemoryKvStore::new();
        assert_eq!(store.get("missing").await.unwrap(), None);

        store.set("k", "v".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

        store.set("k", "v2".to_string()).await.unwrap();
        assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_short_hash_is_stable() {
        assert_eq!(short_hash("abc"), short_hash("abc"));
        assert_ne!(short_hash("abc"), short_hash("abd"));
        assert_eq!(short_hash("abc").len(), 8);
    }

    #[test]
    fn test_generate_record_id_unique() {
        let a = generate_record_id();
        let b = generate_record_id();
        assert!(a.starts_with("rec-"));
        assert_ne!(a, b);
    }
}
