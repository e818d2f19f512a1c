//! Derived field engine
//!
//! Every field a user cannot edit directly (commission, final amount,
//! outstanding balance, converted amount, status) is a pure function of the
//! base fields. `recompute` re-derives the full dependent set from current
//! base values after any base-field change, so callers never have to say
//! which field changed.

use chrono::NaiveDate;
use std::collections::HashMap;
use tradebook_config::CurrencyConfig;
use tradebook_utils::normalize_currency;

use crate::models::{LedgerRecord, PaymentStatus};

/// Static exchange-rate table against the base currency
#[derive(Debug, Clone)]
pub struct CurrencyTable {
    base: String,
    rates: HashMap<String, f64>,
}

impl CurrencyTable {
    pub fn new(base: impl Into<String>, rates: HashMap<String, f64>) -> Self {
        let rates = rates
            .into_iter()
            .map(|(code, rate)| (normalize_currency(&code), rate))
            .collect();
        Self {
            base: normalize_currency(&base.into()),
            rates,
        }
    }

    pub fn from_config(config: &CurrencyConfig) -> Self {
        Self::new(config.base_currency.clone(), config.rates.clone())
    }

    /// The base currency code
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Whether a code names the base currency
    pub fn is_base(&self, code: &str) -> bool {
        normalize_currency(code) == self.base
    }

    /// Rate for a currency code; `None` means unconvertible.
    ///
    /// The base currency never consults the table, and a missing code is
    /// not substituted with a rate of 1.0.
    pub fn rate_of(&self, code: &str) -> Option<f64> {
        self.rates.get(&normalize_currency(code)).copied()
    }
}

fn finite_or_zero(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

fn is_past_due(due_date: Option<&str>, today: NaiveDate) -> bool {
    due_date
        .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
        .map(|due| due < today)
        .unwrap_or(false)
}

/// Re-derive every dependent field from the current base fields.
///
/// Deterministic and idempotent: a second pass over an unchanged record
/// changes nothing. The rule order avoids read-after-write hazards within
/// one pass (status reads the outstanding amount computed just above it).
pub fn recompute(record: &mut LedgerRecord, currencies: &CurrencyTable, today: NaiveDate) {
    let base_amount = finite_or_zero(record.base_amount);
    let paid_amount = finite_or_zero(record.paid_amount);

    if currencies.is_base(&record.currency) {
        // Base-currency records never carry a rate or a converted amount
        record.exchange_rate = None;
        record.converted_amount = None;
    } else {
        // The table wins for listed currencies, so a currency switch never
        // keeps the previous currency's rate; a manually supplied rate
        // survives only for codes the table does not know.
        if let Some(rate) = currencies.rate_of(&record.currency) {
            record.exchange_rate = Some(rate);
        }
        record.converted_amount = record.exchange_rate.map(|rate| paid_amount * rate);
    }

    // A percent of zero is a real commission rate, distinct from none
    record.commission = record.percent.map(|percent| base_amount * percent / 100.0);

    record.final_amount = base_amount + record.commission.unwrap_or(0.0);
    record.outstanding_amount = base_amount - paid_amount;

    record.status = if record.outstanding_amount <= 0.0 {
        PaymentStatus::Paid
    } else if paid_amount > 0.0 {
        // Partial takes precedence over Overdue
        PaymentStatus::Partial
    } else if is_past_due(record.due_date.as_deref(), today) {
        PaymentStatus::Overdue
    } else {
        PaymentStatus::Pending
    };
}

// ==================== Tests ====================
