//! Federation router: one virtual collection over many record partitions
//!
//! A mother view merges the partitions named in its registry with its own
//! partition. Writes and deletes resolve the owning partition from the
//! record's source tags and go back there; the merged view is rebuilt from
//! storage after every mutation. Views without a registry skip the fan-out
//! and work against their single partition directly.

use tradebook_store::{PartitionKey, PartitionStore, StoreError};

use crate::models::LedgerRecord;

pub struct FederationRouter {
    store: PartitionStore,
    home: PartitionKey,
    registry: Vec<PartitionKey>,
}

impl FederationRouter {
    pub fn new(store: PartitionStore, home: PartitionKey, registry: Vec<PartitionKey>) -> Self {
        Self {
            store,
            home,
            registry,
        }
    }

    /// The view's own partition
    pub fn home(&self) -> &PartitionKey {
        &self.home
    }

    /// Whether this view aggregates sibling partitions
    pub fn is_federated(&self) -> bool {
        !self.registry.is_empty()
    }

    /// Rebuild the virtual collection from storage.
    ///
    /// Registry partitions are read in registry order and their records
    /// tagged with the owning partition if not already tagged; the home
    /// partition comes last. No deduplication: a record present in two
    /// partitions appears twice. A partition that fails to read contributes
    /// nothing (the store logs which one).
    pub async fn refresh(&self) -> Vec<LedgerRecord> {
        if !self.is_federated() {
            return self.store.read(&self.home).await;
        }

        let mut merged: Vec<LedgerRecord> = Vec::new();
        for key in &self.registry {
            let mut records: Vec<LedgerRecord> = self.store.read(key).await;
            for record in &mut records {
                if record.source_module.is_none() {
                    record.source_module = Some(key.module.clone());
                }
                if record.source_tab.is_none() {
                    record.source_tab = Some(key.tab.clone());
                }
            }
            merged.append(&mut records);
        }
        merged.extend(self.store.read::<LedgerRecord>(&self.home).await);
        merged
    }

    /// The partition a record belongs to: its source tags, else home
    fn owner_of(&self, record: &LedgerRecord) -> PartitionKey {
        match record.source() {
            Some((module, tab)) => PartitionKey::new(module, tab),
            None => self.home.clone(),
        }
    }

    /// Persist a record and return the rebuilt collection.
    ///
    /// `collection` is the caller's current in-memory collection; the
    /// non-federated path updates it directly instead of re-reading.
    /// The partition write completes before the collection is rebuilt, so
    /// the returned collection always reflects the mutation.
    pub async fn save(
        &self,
        collection: &[LedgerRecord],
        record: LedgerRecord,
        is_new: bool,
    ) -> Result<Vec<LedgerRecord>, StoreError> {
        if !self.is_federated() {
            let mut records = collection.to_vec();
            if !apply_save(&mut records, record, is_new) {
                return Ok(records);
            }
            self.store.write_all(&self.home, &records).await?;
            return Ok(records);
        }

        let owner = self.owner_of(&record);
        let mut records: Vec<LedgerRecord> = self.store.read(&owner).await;
        if apply_save(&mut records, record, is_new) {
            self.store.write_all(&owner, &records).await?;
        }
        Ok(self.refresh().await)
    }

    /// Remove a record from its owning partition and return the rebuilt
    /// collection. Unknown ids leave every partition unmodified.
    pub async fn delete(
        &self,
        collection: &[LedgerRecord],
        id: &str,
        source: Option<(&str, &str)>,
    ) -> Result<Vec<LedgerRecord>, StoreError> {
        if !self.is_federated() {
            let mut records = collection.to_vec();
            if !apply_delete(&mut records, id) {
                return Ok(records);
            }
            self.store.write_all(&self.home, &records).await?;
            return Ok(records);
        }

        let owner = match source {
            Some((module, tab)) => PartitionKey::new(module, tab),
            None => self.home.clone(),
        };
        let mut records: Vec<LedgerRecord> = self.store.read(&owner).await;
        if apply_delete(&mut records, id) {
            self.store.write_all(&owner, &records).await?;
        }
        Ok(self.refresh().await)
    }
}

/// Append or replace in place; false means nothing changed
fn apply_save(records: &mut Vec<LedgerRecord>, record: LedgerRecord, is_new: bool) -> bool {
    if is_new {
        records.push(record);
        return true;
    }
    match records.iter_mut().find(|r| r.id == record.id) {
        Some(slot) => {
            *slot = record;
            true
        }
        None => {
            log::warn!(
                target: "tradebook::federation",
                "Update for unknown record '{}' ignored",
                record.id
            );
            false
        }
    }
}

/// Remove by id; false means nothing changed
fn apply_delete(records: &mut Vec<LedgerRecord>, id: &str) -> bool {
    let before = records.len();
    records.retain(|r| r.id != id);
    if records.len() == before {
        log::warn!(
            target: "tradebook::federation",
            "Delete for unknown record '{}' ignored",
            id
        );
        false
    } else {
        true
    }
}

// ==================== Tests ====================
