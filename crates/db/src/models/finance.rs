//! Income and expense ledger entries.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use galeria_core::types::{DbId, Timestamp};

/// A row from the `finance_transactions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FinanceTransaction {
    pub id: DbId,
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: f64,
    pub currency: String,
    pub category: String,
    pub description: String,
    pub date: Timestamp,
    pub payment_method: String,
    pub payment_status: String,
    pub related_order_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub related_artwork_id: Option<DbId>,
    pub invoice_number: Option<String>,
    pub receipt_url: Option<String>,
    pub receipt_public_id: Option<String>,
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub is_recurring: bool,
    pub recurrence_frequency: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTransaction {
    #[serde(rename = "type")]
    pub transaction_type: String,
    pub amount: f64,
    pub currency: Option<String>,
    pub category: String,
    pub description: String,
    pub date: Option<Timestamp>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub related_order_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub related_artwork_id: Option<DbId>,
    pub invoice_number: Option<String>,
    pub receipt_url: Option<String>,
    pub receipt_public_id: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_frequency: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTransaction {
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    pub amount: Option<f64>,
    pub currency: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub date: Option<Timestamp>,
    pub payment_method: Option<String>,
    pub payment_status: Option<String>,
    pub related_order_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub related_artwork_id: Option<DbId>,
    pub invoice_number: Option<String>,
    pub receipt_url: Option<String>,
    pub receipt_public_id: Option<String>,
    pub notes: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_recurring: Option<bool>,
    pub recurrence_frequency: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    pub transaction_type: Option<String>,
    pub category: Option<String>,
    pub payment_status: Option<String>,
    pub payment_method: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// Per-category total inside a period.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
    pub count: i64,
}
