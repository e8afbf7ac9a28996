//! Core types and data structures for statement normalization

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::amount::MonetaryAmount;
use crate::schema::{self, SchemaVariant};

/// Date notations seen in statement periods
const PERIOD_DATE_FORMATS: &[&str] = &["%d.%m.%Y", "%d/%m/%Y", "%Y-%m-%d"];

/// Unprocessed statement as delivered by upstream extraction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawStatement {
    /// Identifier assigned by the data source
    #[serde(default)]
    pub id: String,
    /// Free-text name of the reporting bank
    #[serde(default)]
    pub bank: String,
    /// Structural classifier (`"41"`, `"42"`, ...), when known
    #[serde(default)]
    pub segment_code: Option<String>,
    /// Account holder, when supplied alongside the payload
    #[serde(default)]
    pub title_holder: Option<String>,
    /// Holder's CPF/CNPJ, when supplied alongside the payload
    #[serde(default)]
    pub tax_id: Option<String>,
    /// Bank-specific extracted document
    #[serde(default)]
    pub payload: Value,
}

impl RawStatement {
    /// Create a new raw statement
    pub fn new(id: String, bank: String, segment_code: Option<String>, payload: Value) -> Self {
        Self {
            id,
            bank,
            segment_code,
            title_holder: None,
            tax_id: None,
            payload,
        }
    }

    pub fn with_title_holder(mut self, title_holder: String) -> Self {
        self.title_holder = Some(title_holder);
        self
    }

    pub fn with_tax_id(mut self, tax_id: String) -> Self {
        self.tax_id = Some(tax_id);
        self
    }

    /// Schema variant of this statement, recomputed on every call
    pub fn variant(&self) -> SchemaVariant {
        schema::resolve(&self.bank, self.segment_code.as_deref())
    }
}

/// A party appearing in a ranked list (depositor, payee, drawee)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Counterparty {
    pub name: String,
    /// CPF or CNPJ as printed in the source
    pub tax_id: String,
    pub amount: MonetaryAmount,
    pub transaction_count: u64,
}

impl Counterparty {
    pub fn new(name: String, tax_id: String, amount: MonetaryAmount, transaction_count: u64) -> Self {
        Self {
            name,
            tax_id,
            amount,
            transaction_count,
        }
    }
}

/// A named person linked to the holder (spouse, partner, director)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelatedParty {
    pub name: String,
    pub tax_id: String,
}

/// Analysed period, kept verbatim as printed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Period {
    pub start: Option<String>,
    pub end: Option<String>,
}

impl Period {
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.as_deref().and_then(parse_period_date)
    }

    pub fn end_date(&self) -> Option<NaiveDate> {
        self.end.as_deref().and_then(parse_period_date)
    }

    /// Days between start and end, when both dates parse
    pub fn days(&self) -> Option<i64> {
        Some((self.end_date()? - self.start_date()?).num_days())
    }
}

/// Parse a period date in any of the known notations
pub fn parse_period_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    PERIOD_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(raw, format).ok())
}

/// One row of a typed credit/debit breakdown
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CategoryBreakdown {
    pub kind: String,
    pub count: u64,
    pub amount: MonetaryAmount,
}

/// Amount and transaction count for one deposit channel
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelAmount {
    pub amount: MonetaryAmount,
    pub count: u64,
}

/// Deposits split by channel (check vs. cash)
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DepositBreakdown {
    pub total: MonetaryAmount,
    pub count: u64,
    pub check: ChannelAmount,
    pub cash: ChannelAmount,
}

/// Transfers with per-rail transaction counts
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransferBreakdown {
    pub total: MonetaryAmount,
    pub count: u64,
    pub ted: u64,
    pub doc: u64,
    pub pix: u64,
    pub other: u64,
}

/// Payments, with the share spent on collection slips
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PaymentBreakdown {
    pub total: MonetaryAmount,
    pub count: u64,
    pub collection: MonetaryAmount,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Credits {
    pub total: MonetaryAmount,
    pub categories: Vec<CategoryBreakdown>,
    pub deposits: DepositBreakdown,
    pub transfers: TransferBreakdown,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Debits {
    pub total: MonetaryAmount,
    pub categories: Vec<CategoryBreakdown>,
    pub payments: PaymentBreakdown,
    pub transfers: TransferBreakdown,
}

/// A generically named amount with its display label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledAmount {
    /// Canonical field name (`campo_a`..`campo_e`)
    pub field: String,
    pub label: String,
    pub amount: MonetaryAmount,
}

/// Normalized view of one statement, fully populated regardless of variant
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedStatement {
    pub id: String,
    pub variant: SchemaVariant,
    pub bank: String,
    pub segment_code: Option<String>,
    pub title_holder: String,
    pub tax_id: String,
    pub period: Period,
    pub credits: Credits,
    pub debits: Debits,
    /// Credits minus debits; may be negative
    pub balance: MonetaryAmount,
    /// Credits plus debits per day of the period, zero when the period is unknown
    pub average_daily_movement: MonetaryAmount,
    /// Declared monthly income (individuals)
    pub declared_income: MonetaryAmount,
    /// Declared monthly revenue (companies)
    pub declared_revenue: MonetaryAmount,
    pub spouse: Option<RelatedParty>,
    pub partner: Option<RelatedParty>,
    pub city: Option<String>,
    pub deposit_locations: Vec<String>,
    pub top_depositors: Vec<Counterparty>,
    pub top_payees: Vec<Counterparty>,
    /// Drawees of paid collection slips
    pub bill_payments: Vec<Counterparty>,
    pub segment_fields: Vec<LabeledAmount>,
    pub risk_indicators: Vec<String>,
    pub suspected_crimes: Vec<String>,
    pub suspicious_activities: Vec<String>,
    pub company_affiliations: Vec<String>,
    pub notes: Vec<String>,
    pub final_remarks: Vec<String>,
}

impl NormalizedStatement {
    /// Credits plus debits
    pub fn total_volume(&self) -> MonetaryAmount {
        &self.credits.total + &self.debits.total
    }

    pub fn has_risk(&self) -> bool {
        !self.risk_indicators.is_empty()
    }

    pub fn has_crimes(&self) -> bool {
        !self.suspected_crimes.is_empty()
    }

    pub fn location_count(&self) -> usize {
        self.deposit_locations.len()
    }

    /// Declared income plus declared revenue
    pub fn declared_earnings(&self) -> MonetaryAmount {
        &self.declared_income + &self.declared_revenue
    }

    /// Sum of all labelled segment fields
    pub fn segment_volume(&self) -> MonetaryAmount {
        self.segment_fields.iter().map(|field| &field.amount).sum()
    }

    /// False when every monetary figure is zero and every list is empty,
    /// which callers should present as "no data available".
    pub fn has_data(&self) -> bool {
        let amounts = [
            &self.credits.total,
            &self.debits.total,
            &self.declared_income,
            &self.declared_revenue,
        ];
        let lists = [
            self.deposit_locations.len(),
            self.credits.categories.len(),
            self.debits.categories.len(),
            self.top_depositors.len(),
            self.top_payees.len(),
            self.bill_payments.len(),
            self.segment_fields.len(),
            self.risk_indicators.len(),
            self.suspected_crimes.len(),
            self.suspicious_activities.len(),
            self.company_affiliations.len(),
            self.notes.len(),
            self.final_remarks.len(),
        ];
        amounts.iter().any(|amount| !amount.is_zero()) || lists.iter().any(|len| *len > 0)
    }
}

/// Errors raised by statement data sources
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Statement source unavailable: {0}")]
    Unavailable(String),
    #[error("Statement not found: {0}")]
    NotFound(String),
}

/// Result type for data source operations
pub type SourceResult<T> = Result<T, SourceError>;
