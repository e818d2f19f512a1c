//! Core data models for the ledger record engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Payment status of a ledger record
///
/// Derived from the amounts and the due date; never set directly by a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Outstanding amount settled in full
    Paid,
    /// Some payment received, balance still open
    Partial,
    /// Nothing paid yet, not past due
    Pending,
    /// Nothing paid and the due date has passed
    Overdue,
}

impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Pending
    }
}

impl std::str::FromStr for PaymentStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(PaymentStatus::Paid),
            "partial" => Ok(PaymentStatus::Partial),
            "pending" => Ok(PaymentStatus::Pending),
            "overdue" => Ok(PaymentStatus::Overdue),
            _ => Err(format!("Invalid payment status: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Partial => write!(f, "partial"),
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Overdue => write!(f, "overdue"),
        }
    }
}

/// One ledger record: a purchase, payment, export or ticket line
///
/// Base fields are the source of truth; the derived fields are recomputed
/// by the engine after every base-field change and are never edited
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    /// Unique record identifier, assigned once at creation
    pub id: String,
    /// Human-facing reference code
    pub code: String,
    /// Record date (YYYY-MM-DD format)
    pub date: String,

    // Base inputs
    /// Supplier/customer name
    pub counterparty: String,
    /// Free-form description
    #[serde(default)]
    pub description: String,
    /// Currency code of the amounts (e.g. "LKR", "USD")
    pub currency: String,
    /// Invoice or cost amount, in `currency`
    #[serde(default)]
    pub base_amount: f64,
    /// Amount already settled, in `currency`
    #[serde(default)]
    pub paid_amount: f64,
    /// Commission rate in percent; zero is a real rate, `None` means no commission
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    /// Exchange rate to the base currency; absent for base-currency records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exchange_rate: Option<f64>,
    /// Payment due date (YYYY-MM-DD format)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    /// Free-form weight attribute (tickets/exports)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<String>,
    /// Company / agency attribute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Payment method (cash, bank, cheque, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<String>,
    /// Half-payment flag
    #[serde(default)]
    pub half_paid: bool,
    /// Cleared flag
    #[serde(default)]
    pub cleared: bool,

    // Partition tags, set during federated refresh
    /// Module of the owning partition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_module: Option<String>,
    /// Tab of the owning partition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_tab: Option<String>,

    // Derived fields
    /// `base_amount * percent / 100` when a rate is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub commission: Option<f64>,
    /// `base_amount` plus commission
    #[serde(default)]
    pub final_amount: f64,
    /// `base_amount - paid_amount`
    #[serde(default)]
    pub outstanding_amount: f64,
    /// Paid amount converted to the base currency, when a rate applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converted_amount: Option<f64>,
    /// Derived payment status
    #[serde(default)]
    pub status: PaymentStatus,
}

impl LedgerRecord {
    /// Get the record date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    /// The owning partition tags, when both are present
    pub fn source(&self) -> Option<(&str, &str)> {
        match (self.source_module.as_deref(), self.source_tab.as_deref()) {
            (Some(module), Some(tab)) => Some((module, tab)),
            _ => None,
        }
    }

    /// Check the base fields a save requires
    ///
    /// Missing fields are named in the error message so the form can show
    /// a blocking message; amounts are only treated as zero inside the
    /// engine, never silently persisted as such through validation.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_base_fields(
            &self.counterparty,
            &self.currency,
            Some(self.base_amount),
            &self.date,
        )
    }
}

pub(crate) fn validate_base_fields(
    counterparty: &str,
    currency: &str,
    base_amount: Option<f64>,
    date: &str,
) -> Result<(), CoreError> {
    let mut missing: Vec<&str> = Vec::new();

    if counterparty.trim().is_empty() {
        missing.push("counterparty");
    }
    if currency.trim().is_empty() {
        missing.push("currency");
    }
    match base_amount {
        Some(amount) if amount.is_finite() => {}
        _ => missing.push("base amount"),
    }
    if !tradebook_utils::is_iso_date(date) {
        missing.push("date");
    }

    if missing.is_empty() {
        Ok(())
    } else {
        Err(CoreError::ValidationError {
            message: format!("missing or invalid required field(s): {}", missing.join(", ")),
        })
    }
}

/// User-supplied base fields for a new record
///
/// Amounts are optional here so that "not entered" is distinguishable from
/// an explicit zero at validation time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordDraft {
    #[serde(default)]
    pub code: Option<String>,
    pub date: String,
    pub counterparty: String,
    #[serde(default)]
    pub description: String,
    pub currency: String,
    #[serde(default)]
    pub base_amount: Option<f64>,
    #[serde(default)]
    pub paid_amount: Option<f64>,
    #[serde(default)]
    pub percent: Option<f64>,
    #[serde(default)]
    pub exchange_rate: Option<f64>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub half_paid: bool,
    #[serde(default)]
    pub cleared: bool,
}

impl RecordDraft {
    /// Check the base fields a save requires
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_base_fields(
            &self.counterparty,
            &self.currency,
            self.base_amount,
            &self.date,
        )
    }

    /// Build a record from this draft; derived fields start at their
    /// defaults and are filled in by the engine's first recompute.
    pub fn build(self, id: String, code: String) -> LedgerRecord {
        LedgerRecord {
            id,
            code,
            date: self.date,
            counterparty: self.counterparty,
            description: self.description,
            currency: tradebook_utils::normalize_currency(&self.currency),
            base_amount: self.base_amount.unwrap_or(0.0),
            paid_amount: self.paid_amount.unwrap_or(0.0),
            percent: self.percent,
            exchange_rate: self.exchange_rate,
            due_date: self.due_date,
            weight: self.weight,
            company: self.company,
            notes: self.notes,
            payment_method: self.payment_method,
            half_paid: self.half_paid,
            cleared: self.cleared,
            source_module: None,
            source_tab: None,
            commission: None,
            final_amount: 0.0,
            outstanding_amount: 0.0,
            converted_amount: None,
            status: PaymentStatus::default(),
        }
    }
}

/// Partial update of a record's base fields
///
/// `Some(value)` replaces a field; `None` leaves it untouched. The
/// clearable optionals use a nested Option: `Some(None)` clears them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub counterparty: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub base_amount: Option<f64>,
    #[serde(default)]
    pub paid_amount: Option<f64>,
    #[serde(default)]
    pub percent: Option<Option<f64>>,
    #[serde(default)]
    pub exchange_rate: Option<Option<f64>>,
    #[serde(default)]
    pub due_date: Option<Option<String>>,
    #[serde(default)]
    pub weight: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default)]
    pub half_paid: Option<bool>,
    #[serde(default)]
    pub cleared: Option<bool>,
}

impl RecordPatch {
    /// Merge this patch over a record's base fields.
    ///
    /// Changing the currency drops a rate the patch does not itself
    /// supply, so a stale rate never survives a currency switch.
    pub fn apply_to(&self, record: &mut LedgerRecord) {
        if let Some(ref code) = self.code {
            record.code = code.clone();
        }
        if let Some(ref date) = self.date {
            record.date = date.clone();
        }
        if let Some(ref counterparty) = self.counterparty {
            record.counterparty = counterparty.clone();
        }
        if let Some(ref description) = self.description {
            record.description = description.clone();
        }
        if let Some(ref currency) = self.currency {
            let normalized = tradebook_utils::normalize_currency(currency);
            if normalized != record.currency && self.exchange_rate.is_none() {
                record.exchange_rate = None;
            }
            record.currency = normalized;
        }
        if let Some(base_amount) = self.base_amount {
            record.base_amount = base_amount;
        }
        if let Some(paid_amount) = self.paid_amount {
            record.paid_amount = paid_amount;
        }
        if let Some(percent) = self.percent {
            record.percent = percent;
        }
        if let Some(exchange_rate) = self.exchange_rate {
            record.exchange_rate = exchange_rate;
        }
        if let Some(ref due_date) = self.due_date {
            record.due_date = due_date.clone();
        }
        if let Some(ref weight) = self.weight {
            record.weight = Some(weight.clone());
        }
        if let Some(ref company) = self.company {
            record.company = Some(company.clone());
        }
        if let Some(ref notes) = self.notes {
            record.notes = Some(notes.clone());
        }
        if let Some(ref payment_method) = self.payment_method {
            record.payment_method = Some(payment_method.clone());
        }
        if let Some(half_paid) = self.half_paid {
            record.half_paid = half_paid;
        }
        if let Some(cleared) = self.cleared {
            record.cleared = cleared;
        }
    }
}

// ==================== Tests ====================
