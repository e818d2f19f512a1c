//! Record partitions over the key-value store
//!
//! A partition is one named bucket of records, addressed by a module/tab
//! pair and stored as a single JSON blob. Reads probe the legacy key
//! variants still found in older data; writes always use the canonical key.

use crate::{KvRef, StoreError};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Address of one record partition
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PartitionKey {
    pub module: String,
    pub tab: String,
}

impl PartitionKey {
    pub fn new(module: impl Into<String>, tab: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            tab: tab.into(),
        }
    }
}

impl std::fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.module, self.tab)
    }
}

/// Store for the partitions of one entity kind
pub struct PartitionStore {
    kv: KvRef,
    kind: String,
}

impl PartitionStore {
    pub fn new(kv: KvRef, kind: impl Into<String>) -> Self {
        Self {
            kv,
            kind: kind.into(),
        }
    }

    /// The canonical storage key for a partition
    pub fn canonical_key(&self, key: &PartitionKey) -> String {
        format!("{}:{}:{}", self.kind, key.module, key.tab)
    }

    /// All key spellings for a partition, canonical first.
    ///
    /// Older data wrote underscore-joined and kind-last keys; reads take
    /// the first spelling that holds a value.
    fn key_variants(&self, key: &PartitionKey) -> [String; 3] {
        [
            self.canonical_key(key),
            format!("{}_{}_{}", self.kind, key.module, key.tab),
            format!("{}_{}_{}", key.module, key.tab, self.kind),
        ]
    }

    /// Read the full contents of a partition.
    ///
    /// A partition that has never been written, or whose blob fails to
    /// parse, reads as empty. Corruption is logged, never raised.
    pub async fn read<T: DeserializeOwned>(&self, key: &PartitionKey) -> Vec<T> {
        for variant in self.key_variants(key) {
            let blob = match self.kv.get(&variant).await {
                Ok(Some(blob)) => blob,
                Ok(None) => continue,
                Err(e) => {
                    log::warn!(
                        target: "tradebook::store",
                        "Partition {} unreadable at key '{}': {}",
                        key, variant, e
                    );
                    return Vec::new();
                }
            };

            return match serde_json::from_str(&blob) {
                Ok(records) => records,
                Err(e) => {
                    log::warn!(
                        target: "tradebook::store",
                        "Partition {} corrupt at key '{}', treating as empty: {}",
                        key, variant, e
                    );
                    Vec::new()
                }
            };
        }

        Vec::new()
    }

    /// Replace the full contents of a partition.
    ///
    /// Always writes the canonical key, migrating legacy-keyed partitions
    /// forward on their next write.
    pub async fn write_all<T: Serialize>(
        &self,
        key: &PartitionKey,
        records: &[T],
    ) -> Result<(), StoreError> {
        let blob = serde_json::to_string(records)?;
        self.kv.set(&self.canonical_key(key), blob).await
    }
}

// ==================== Tests ====================
