//! Core ledger record engine and business logic
//!
//! The `Ledger` facade ties the pieces together: drafts are validated,
//! derived fields recomputed, records routed to their owning partition,
//! and the in-memory collection rebuilt after every mutation.

pub mod clock;
pub mod engine;
pub mod error;
pub mod federation;
pub mod models;
pub mod query;
pub mod reports;

pub use clock::{Clock, ClockRef, FixedClock, SystemClock, TimeContext};
pub use engine::{recompute, CurrencyTable};
pub use error::{CoreError, CoreResult, ErrorCode, ErrorSeverity};
pub use federation::FederationRouter;
pub use models::{LedgerRecord, PaymentStatus, RecordDraft, RecordPatch};
pub use query::RecordQuery;
pub use reports::{summarize, LedgerSummary};

use std::sync::RwLock;
use tradebook_config::{Config, TimeRange};
use tradebook_store::{generate_record_id, short_hash, KvRef, PartitionKey, PartitionStore};

/// Entity kind under which record partitions are stored
const RECORD_KIND: &str = "records";

/// One ledger view over a partitioned record store
///
/// A view constructed with a federation registry in its config becomes a
/// mother view aggregating its sibling partitions; otherwise it works
/// against its own partition alone.
pub struct Ledger {
    config: Config,
    currencies: CurrencyTable,
    clock: ClockRef,
    router: FederationRouter,
    data: RwLock<Vec<LedgerRecord>>,
}

impl Ledger {
    /// Create a view for the partition `home` on top of a key-value store
    pub fn new(config: Config, kv: KvRef, clock: ClockRef, home: PartitionKey) -> Self {
        let currencies = CurrencyTable::from_config(&config.currency);
        let registry = config
            .federation
            .registry
            .iter()
            .map(|entry| PartitionKey::new(entry.module.clone(), entry.tab.clone()))
            .collect();
        let router = FederationRouter::new(PartitionStore::new(kv, RECORD_KIND), home, registry);

        Self {
            config,
            currencies,
            clock,
            router,
            data: RwLock::new(Vec::new()),
        }
    }

    /// The currency table this view converts against
    pub fn currencies(&self) -> &CurrencyTable {
        &self.currencies
    }

    /// Whether this view aggregates sibling partitions
    pub fn is_federated(&self) -> bool {
        self.router.is_federated()
    }

    /// Rebuild the collection from storage
    pub async fn refresh(&self) {
        let records = self.router.refresh().await;
        *self.data.write().unwrap() = records;
    }

    /// Get all records in the current collection
    pub fn records(&self) -> Vec<LedgerRecord> {
        self.data.read().unwrap().clone()
    }

    /// Get a record by ID
    pub fn record(&self, id: &str) -> Option<LedgerRecord> {
        self.data.read().unwrap().iter().find(|r| r.id == id).cloned()
    }

    /// Number of records in the current collection
    pub fn record_count(&self) -> usize {
        self.data.read().unwrap().len()
    }

    /// Create a record from a draft: validate, assign an id, derive the
    /// dependent fields once, persist, and rebuild the collection.
    pub async fn create_record(&self, draft: RecordDraft) -> CoreResult<LedgerRecord> {
        draft.validate()?;

        let id = generate_record_id();
        let code = match draft.code.as_deref().map(str::trim) {
            Some(code) if !code.is_empty() => code.to_string(),
            _ => format!("TB-{}", short_hash(&id).to_uppercase()),
        };

        let mut record = draft.build(id, code);
        recompute(&mut record, &self.currencies, self.clock.today());

        let collection = self.records();
        let updated = self.router.save(&collection, record.clone(), true).await?;
        *self.data.write().unwrap() = updated;

        Ok(record)
    }

    /// Merge a patch over a record's base fields, re-derive the dependent
    /// fields, persist to the owning partition, and rebuild the collection.
    pub async fn update_record(&self, id: &str, patch: RecordPatch) -> CoreResult<LedgerRecord> {
        let mut record = self
            .record(id)
            .ok_or_else(|| CoreError::RecordNotFound { id: id.to_string() })?;

        patch.apply_to(&mut record);
        record.validate()?;
        recompute(&mut record, &self.currencies, self.clock.today());

        let collection = self.records();
        let updated = self.router.save(&collection, record.clone(), false).await?;
        *self.data.write().unwrap() = updated;

        Ok(record)
    }

    /// Hard-delete a record from its owning partition.
    ///
    /// An id not present in the collection is a no-op.
    pub async fn delete_record(&self, id: &str) -> CoreResult<()> {
        let existing = self.record(id);
        let source_owned = existing.as_ref().and_then(|r| {
            r.source()
                .map(|(module, tab)| (module.to_string(), tab.to_string()))
        });
        let source = source_owned
            .as_ref()
            .map(|(module, tab)| (module.as_str(), tab.as_str()));

        let collection = self.records();
        let updated = self.router.delete(&collection, id, source).await?;
        *self.data.write().unwrap() = updated;

        Ok(())
    }

    /// Run the query pipeline over the current collection
    pub fn query(&self, query: &RecordQuery) -> Vec<LedgerRecord> {
        let data = self.data.read().unwrap();
        query.apply(&data)
    }

    /// Run the query pipeline and return one page of results
    pub fn query_page(&self, query: &RecordQuery, page: usize) -> Vec<LedgerRecord> {
        let per_page = self.config.pagination.records_per_page;
        self.query(query)
            .into_iter()
            .skip(page * per_page)
            .take(per_page)
            .collect()
    }

    /// Period totals over the current collection
    pub fn summary(&self, range: TimeRange) -> LedgerSummary {
        let data = self.data.read().unwrap();
        summarize(&data, &TimeContext::new(range), self.clock.today())
    }
}

// ==================== Tests ====================
