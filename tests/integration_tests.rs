// tests/integration_tests.rs
//
// End-to-end tests over the full stack: config -> ledger views -> federation
// router -> partition store -> in-memory key-value backend.

use chrono::NaiveDate;
use std::sync::Arc;
use tradebook::{
    Config, FixedClock, KvRef, KvStore, Ledger, MemoryKvStore, PartitionKey, PaymentStatus,
    RecordDraft, RecordPatch, RecordQuery, TimeRange,
};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn clock() -> Arc<FixedClock> {
    Arc::new(FixedClock(NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()))
}

fn child_config() -> Config {
    Config::from_yaml(
        r#"
currency:
  base_currency: LKR
  rates:
    USD: 300.0
    EUR: 330.0
"#,
    )
    .unwrap()
}

fn mother_config() -> Config {
    Config::from_yaml(
        r#"
currency:
  base_currency: LKR
  rates:
    USD: 300.0
    EUR: 330.0
federation:
  registry:
    - module: purchases
      tab: local
    - module: payments
      tab: foreign
"#,
    )
    .unwrap()
}

/// A shared backend plus one child view per sibling partition and the
/// federated mother view over all of them.
fn setup() -> (KvRef, Ledger, Ledger, Ledger) {
    init_logging();
    let kv: KvRef = Arc::new(MemoryKvStore::new());

    let purchases = Ledger::new(
        child_config(),
        kv.clone(),
        clock(),
        PartitionKey::new("purchases", "local"),
    );
    let payments = Ledger::new(
        child_config(),
        kv.clone(),
        clock(),
        PartitionKey::new("payments", "foreign"),
    );
    let mother = Ledger::new(
        mother_config(),
        kv.clone(),
        clock(),
        PartitionKey::new("unified", "all"),
    );

    (kv, purchases, payments, mother)
}

fn draft(counterparty: &str, base: f64) -> RecordDraft {
    RecordDraft {
        date: "2025-06-10".to_string(),
        counterparty: counterparty.to_string(),
        currency: "LKR".to_string(),
        base_amount: Some(base),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_mother_view_merges_child_partitions() {
    let (_kv, purchases, payments, mother) = setup();

    purchases
        .create_record(draft("Ceylon Exports", 1000.0))
        .await
        .unwrap();
    payments
        .create_record(RecordDraft {
            currency: "USD".to_string(),
            paid_amount: Some(500.0),
            ..draft("Silk Route Traders", 1000.0)
        })
        .await
        .unwrap();

    mother.refresh().await;
    let merged = mother.records();
    assert_eq!(merged.len(), 2);

    // Every child record is tagged with its owning partition
    assert_eq!(merged[0].source(), Some(("purchases", "local")));
    assert_eq!(merged[1].source(), Some(("payments", "foreign")));

    // Derived fields came through storage intact
    assert_eq!(merged[1].converted_amount, Some(150_000.0));
    assert_eq!(merged[1].status, PaymentStatus::Partial);
}

#[tokio::test]
async fn test_federated_save_routes_back_to_owner() {
    let (_kv, purchases, _payments, mother) = setup();

    let record = purchases
        .create_record(draft("Ceylon Exports", 1000.0))
        .await
        .unwrap();

    mother.refresh().await;
    let updated = mother
        .update_record(
            &record.id,
            RecordPatch {
                paid_amount: Some(1000.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, PaymentStatus::Paid);

    // The virtual collection reflects the write immediately
    assert_eq!(
        mother.record(&record.id).unwrap().status,
        PaymentStatus::Paid
    );
    // Exactly one copy of the record exists in the merged view
    assert_eq!(mother.record_count(), 1);

    // The child view sees the update after re-reading its partition
    purchases.refresh().await;
    assert_eq!(
        purchases.record(&record.id).unwrap().status,
        PaymentStatus::Paid
    );
}

#[tokio::test]
async fn test_record_created_in_mother_lands_in_home_partition() {
    let (_kv, purchases, payments, mother) = setup();

    mother.refresh().await;
    let record = mother
        .create_record(draft("Unified Trade", 750.0))
        .await
        .unwrap();

    assert_eq!(mother.record_count(), 1);

    // Sibling partitions stay empty
    purchases.refresh().await;
    payments.refresh().await;
    assert_eq!(purchases.record_count(), 0);
    assert_eq!(payments.record_count(), 0);

    // Deleting from the mother view removes it from its home partition
    mother.delete_record(&record.id).await.unwrap();
    assert_eq!(mother.record_count(), 0);
}

#[tokio::test]
async fn test_federated_delete_leaves_other_partitions_unchanged() {
    let (_kv, purchases, payments, mother) = setup();

    let doomed = purchases
        .create_record(draft("Ceylon Exports", 1000.0))
        .await
        .unwrap();
    payments
        .create_record(draft("Silk Route Traders", 500.0))
        .await
        .unwrap();
    mother.refresh().await;
    mother.create_record(draft("Unified Trade", 250.0)).await.unwrap();
    assert_eq!(mother.record_count(), 3);

    mother.delete_record(&doomed.id).await.unwrap();
    assert_eq!(mother.record_count(), 2);

    purchases.refresh().await;
    payments.refresh().await;
    assert_eq!(purchases.record_count(), 0);
    assert_eq!(payments.record_count(), 1);
}

#[tokio::test]
async fn test_legacy_partition_keys_are_readable() {
    let (kv, _purchases, _payments, mother) = setup();

    // A partition written by an older build under the underscore key
    let legacy = RecordDraft {
        currency: "LKR".to_string(),
        date: "2025-06-01".to_string(),
        counterparty: "Old Stock".to_string(),
        base_amount: Some(10.0),
        ..Default::default()
    }
    .build("rec-legacy".to_string(), "TB-OLD".to_string());
    kv.set(
        "records_purchases_local",
        serde_json::to_string(&[legacy]).unwrap(),
    )
    .await
    .unwrap();

    mother.refresh().await;
    assert_eq!(mother.record_count(), 1);
    assert_eq!(mother.records()[0].id, "rec-legacy");
}

#[tokio::test]
async fn test_corrupt_partition_degrades_to_partial_view() {
    let (kv, _purchases, payments, mother) = setup();

    kv.set("records:purchases:local", "{oops".to_string())
        .await
        .unwrap();
    payments
        .create_record(draft("Silk Route Traders", 500.0))
        .await
        .unwrap();

    mother.refresh().await;
    assert_eq!(mother.record_count(), 1);
}

#[tokio::test]
async fn test_query_over_the_virtual_collection() {
    let (_kv, purchases, payments, mother) = setup();

    purchases
        .create_record(RecordDraft {
            date: "2025-06-01".to_string(),
            ..draft("Ceylon Exports", 1000.0)
        })
        .await
        .unwrap();
    payments
        .create_record(RecordDraft {
            date: "2025-06-05".to_string(),
            currency: "USD".to_string(),
            ..draft("Silk Route Traders", 800.0)
        })
        .await
        .unwrap();

    mother.refresh().await;

    let usd_only = mother.query(&RecordQuery {
        currency: Some("USD".to_string()),
        ..Default::default()
    });
    assert_eq!(usd_only.len(), 1);
    assert_eq!(usd_only[0].counterparty, "Silk Route Traders");

    let newest_first = mother.query(&RecordQuery::default());
    assert_eq!(newest_first[0].date, "2025-06-05");

    let summary = mother.summary(TimeRange::Month);
    assert_eq!(summary.record_count, 2);
    assert_eq!(summary.total_base, 1800.0);
}

#[tokio::test]
async fn test_last_writer_wins_across_views() -> anyhow::Result<()> {
    let (kv, purchases, _payments, _mother) = setup();

    let record = purchases.create_record(draft("Ceylon Exports", 1000.0)).await?;

    // A second view over the same partition, edited independently
    let other = Ledger::new(
        child_config(),
        kv.clone(),
        clock(),
        PartitionKey::new("purchases", "local"),
    );
    other.refresh().await;
    other
        .update_record(
            &record.id,
            RecordPatch {
                paid_amount: Some(250.0),
                ..Default::default()
            },
        )
        .await?;

    // The first view overwrites the whole partition with its own copy
    purchases
        .update_record(
            &record.id,
            RecordPatch {
                paid_amount: Some(999.0),
                ..Default::default()
            },
        )
        .await?;

    other.refresh().await;
    assert_eq!(other.record(&record.id).unwrap().paid_amount, 999.0);
    Ok(())
}
