//! Query pipeline: search, filters and ordering over record collections
//!
//! Pure functions over an in-memory collection; persistence is untouched.

use serde::{Deserialize, Serialize};

use crate::models::LedgerRecord;

/// Filter and search specification for a record listing
///
/// All predicates compose by logical AND. Categorical filters accept the
/// `"All"` sentinel the filter dropdowns use for "no filter".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordQuery {
    /// Case-insensitive substring search
    #[serde(default)]
    pub search: String,
    /// Currency filter
    #[serde(default)]
    pub currency: Option<String>,
    /// Payment status filter
    #[serde(default)]
    pub status: Option<String>,
    /// Company filter
    #[serde(default)]
    pub company: Option<String>,
    /// Payment method filter
    #[serde(default)]
    pub method: Option<String>,
    /// Inclusive lower date bound (YYYY-MM-DD)
    #[serde(default)]
    pub date_from: Option<String>,
    /// Inclusive upper date bound (YYYY-MM-DD)
    #[serde(default)]
    pub date_to: Option<String>,
}

impl RecordQuery {
    /// Apply the query to a collection.
    ///
    /// Returns matching records sorted descending by date; records sharing
    /// a date keep their original relative order.
    pub fn apply(&self, records: &[LedgerRecord]) -> Vec<LedgerRecord> {
        let mut matched: Vec<LedgerRecord> = records
            .iter()
            .filter(|r| self.matches(r))
            .cloned()
            .collect();
        matched.sort_by(|a, b| b.date.cmp(&a.date));
        matched
    }

    /// Whether one record passes every predicate
    pub fn matches(&self, record: &LedgerRecord) -> bool {
        self.matches_search(record)
            && filter_matches(&self.currency, &record.currency)
            && filter_matches(&self.status, &record.status.to_string())
            && filter_matches(&self.company, record.company.as_deref().unwrap_or(""))
            && filter_matches(&self.method, record.payment_method.as_deref().unwrap_or(""))
            && self.matches_date_range(record)
    }

    fn matches_search(&self, record: &LedgerRecord) -> bool {
        let query = self.search.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        // Fixed list of searchable fields for this entity type
        record.counterparty.to_lowercase().contains(&query)
            || record.code.to_lowercase().contains(&query)
            || record.description.to_lowercase().contains(&query)
            || record
                .company
                .as_ref()
                .map(|c| c.to_lowercase().contains(&query))
                .unwrap_or(false)
    }

    fn matches_date_range(&self, record: &LedgerRecord) -> bool {
        // ISO dates sort lexicographically in chronological order
        if let Some(ref from) = self.date_from {
            if record.date.as_str() < from.as_str() {
                return false;
            }
        }
        if let Some(ref to) = self.date_to {
            if record.date.as_str() > to.as_str() {
                return false;
            }
        }
        true
    }
}

/// Exact-match categorical filter with the "All" sentinel
fn filter_matches(selected: &Option<String>, value: &str) -> bool {
    match selected {
        None => true,
        Some(s) if s.eq_ignore_ascii_case("all") => true,
        Some(s) => s.eq_ignore_ascii_case(value),
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RecordDraft;

    fn record(id: &str, date: &str, counterparty: &str) -> LedgerRecord {
        RecordDraft {
            date: date.to_string(),
            counterparty: counterparty.to_string(),
            currency: "LKR".to_string(),
            base_amount: Some(100.0),
            ..Default::default()
        }
        .build(id.to_string(), format!("TB-{}", id))
    }

    fn sample() -> Vec<LedgerRecord> {
        let mut a = record("1", "2025-06-01", "Ceylon Exports");
        a.company = Some("Acme Shipping".to_string());
        let mut b = record("2", "2025-06-10", "Silk Route Traders");
        b.currency = "USD".to_string();
        let c = record("3", "2025-05-20", "Harbor Freight");
        vec![a, b, c]
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let records = sample();
        let result = RecordQuery::default().apply(&records);
        assert_eq!(result.len(), 3);
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let records = sample();
        let query = RecordQuery {
            search: "silk route".to_string(),
            ..Default::default()
        };
        let result = query.apply(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_search_covers_company_field() {
        let records = sample();
        let query = RecordQuery {
            search: "acme".to_string(),
            ..Default::default()
        };
        let result = query.apply(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }

    #[test]
    fn test_all_sentinel_matches_everything() {
        let records = sample();
        let query = RecordQuery {
            currency: Some("All".to_string()),
            ..Default::default()
        };
        assert_eq!(query.apply(&records).len(), 3);
    }

    #[test]
    fn test_currency_filter() {
        let records = sample();
        let query = RecordQuery {
            currency: Some("USD".to_string()),
            ..Default::default()
        };
        let result = query.apply(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "2");
    }

    #[test]
    fn test_date_range_bounds_are_inclusive() {
        let records = sample();
        let query = RecordQuery {
            date_from: Some("2025-05-20".to_string()),
            date_to: Some("2025-06-01".to_string()),
            ..Default::default()
        };
        let result = query.apply(&records);
        assert_eq!(result.len(), 2);
        assert!(result.iter().any(|r| r.id == "1"));
        assert!(result.iter().any(|r| r.id == "3"));
    }

    #[test]
    fn test_predicates_compose_with_and() {
        let records = sample();
        let query = RecordQuery {
            search: "ceylon".to_string(),
            currency: Some("USD".to_string()),
            ..Default::default()
        };
        assert!(query.apply(&records).is_empty());
    }

    #[test]
    fn test_sorted_descending_by_date() {
        let records = sample();
        let result = RecordQuery::default().apply(&records);
        let dates: Vec<&str> = result.iter().map(|r| r.date.as_str()).collect();
        assert_eq!(dates, vec!["2025-06-10", "2025-06-01", "2025-05-20"]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_dates() {
        let records = vec![
            record("a", "2025-06-01", "First"),
            record("b", "2025-06-01", "Second"),
            record("c", "2025-06-02", "Third"),
        ];
        let result = RecordQuery::default().apply(&records);
        let ids: Vec<&str> = result.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_status_filter() {
        let mut records = sample();
        records[0].status = crate::models::PaymentStatus::Paid;
        let query = RecordQuery {
            status: Some("paid".to_string()),
            ..Default::default()
        };
        let result = query.apply(&records);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].id, "1");
    }
}
