//! Summary structures for period reporting

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tradebook_utils::format_amount;

use crate::clock::TimeContext;
use crate::models::{LedgerRecord, PaymentStatus};

/// Totals over one reporting period
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSummary {
    /// Human-readable period description
    pub period: String,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub record_count: usize,
    pub total_base: f64,
    pub total_paid: f64,
    pub total_outstanding: f64,
    pub total_commission: f64,
    pub paid_count: usize,
    pub partial_count: usize,
    pub pending_count: usize,
    pub overdue_count: usize,
}

impl LedgerSummary {
    /// Outstanding total with thousands separators, for display
    pub fn total_outstanding_display(&self) -> String {
        format_amount(self.total_outstanding)
    }

    /// Paid total with thousands separators, for display
    pub fn total_paid_display(&self) -> String {
        format_amount(self.total_paid)
    }
}

/// Compute period totals over a collection.
///
/// Records whose date falls outside the period are skipped; records with
/// an unparseable date are included, matching the listing behavior.
pub fn summarize(
    records: &[LedgerRecord],
    context: &TimeContext,
    today: NaiveDate,
) -> LedgerSummary {
    let mut summary = LedgerSummary {
        period: context.description(),
        start_date: context.start_date(today).map(|d| d.to_string()),
        end_date: context.end_date(today).map(|d| d.to_string()),
        record_count: 0,
        total_base: 0.0,
        total_paid: 0.0,
        total_outstanding: 0.0,
        total_commission: 0.0,
        paid_count: 0,
        partial_count: 0,
        pending_count: 0,
        overdue_count: 0,
    };

    for record in records {
        let in_period = match record.date_naive() {
            Some(date) => context.contains(today, &date),
            None => true,
        };
        if !in_period {
            continue;
        }

        summary.record_count += 1;
        summary.total_base += record.base_amount;
        summary.total_paid += record.paid_amount;
        summary.total_outstanding += record.outstanding_amount;
        summary.total_commission += record.commission.unwrap_or(0.0);
        match record.status {
            PaymentStatus::Paid => summary.paid_count += 1,
            PaymentStatus::Partial => summary.partial_count += 1,
            PaymentStatus::Pending => summary.pending_count += 1,
            PaymentStatus::Overdue => summary.overdue_count += 1,
        }
    }

    summary
}

// ==================== Tests ====================
