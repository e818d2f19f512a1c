//! Tradebook: a ledger record engine with federated partition storage
//!
//! Records for a trading business's books (purchases, payments, exports,
//! tickets) live in independent partitions of a key-value store, one per
//! module/tab. Derived fields (commission, final amount, outstanding
//! balance, converted amount, payment status) are recomputed from the base
//! fields after every edit, and a "mother" view can aggregate sibling
//! partitions into one virtual collection, routing writes and deletes back
//! to the partition that owns each record.

pub use tradebook_config::{Config, ConfigError, CurrencyConfig, PartitionRef, TimeRange};
pub use tradebook_core::{
    recompute, summarize, Clock, ClockRef, CoreError, CurrencyTable, ErrorCode,
    FederationRouter, FixedClock, Ledger, LedgerRecord, LedgerSummary, PaymentStatus,
    RecordDraft, RecordPatch, RecordQuery, SystemClock, TimeContext,
};
pub use tradebook_store::{
    KvRef, KvStore, MemoryKvStore, PartitionKey, PartitionStore, StoreError,
};
pub use tradebook_utils as utils;

/// Current version of tradebook
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
