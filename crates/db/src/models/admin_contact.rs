//! Back-office CRM contacts (clients and suppliers) and their history.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use galeria_core::types::{DbId, Timestamp};

/// A row from the `admin_contacts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminContact {
    pub id: DbId,
    #[serde(rename = "type")]
    pub contact_type: String,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<serde_json::Value>,
    pub category: String,
    pub tags: Vec<String>,
    pub supplier_info: Option<serde_json::Value>,
    pub client_info: Option<serde_json::Value>,
    pub last_contact_date: Option<Timestamp>,
    pub next_follow_up: Option<Timestamp>,
    pub preferred_contact_method: Option<String>,
    pub notes: Option<String>,
    pub is_active: bool,
    pub is_favorite: bool,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A contact row with derived totals from its history and from finance.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AdminContactSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub contact: AdminContact,
    pub total_purchases: f64,
    pub total_supplies: f64,
    pub purchase_count: i64,
    pub transaction_income: f64,
    pub transaction_expense: f64,
    pub transaction_count: i64,
}

/// A row from the `admin_contact_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactHistoryEntry {
    pub id: DbId,
    pub contact_id: DbId,
    pub kind: String,
    pub date: Timestamp,
    pub description: Option<String>,
    pub amount: f64,
    pub artwork_id: Option<DbId>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A contact with its full history, as returned by the detail endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct AdminContactDetail {
    #[serde(flatten)]
    pub contact: AdminContactSummary,
    pub history: Vec<ContactHistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdminContact {
    #[serde(rename = "type")]
    pub contact_type: String,
    pub name: String,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<serde_json::Value>,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub supplier_info: Option<serde_json::Value>,
    pub client_info: Option<serde_json::Value>,
    pub last_contact_date: Option<Timestamp>,
    pub next_follow_up: Option<Timestamp>,
    pub preferred_contact_method: Option<String>,
    pub notes: Option<String>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAdminContact {
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    pub name: Option<String>,
    pub company: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<serde_json::Value>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub supplier_info: Option<serde_json::Value>,
    pub client_info: Option<serde_json::Value>,
    pub last_contact_date: Option<Timestamp>,
    pub next_follow_up: Option<Timestamp>,
    pub preferred_contact_method: Option<String>,
    pub notes: Option<String>,
    pub is_active: Option<bool>,
    pub is_favorite: Option<bool>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateHistoryEntry {
    pub date: Option<Timestamp>,
    pub description: Option<String>,
    #[serde(default)]
    pub amount: f64,
    pub artwork_id: Option<DbId>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AdminContactFilter {
    pub active: Option<bool>,
    pub contact_type: Option<String>,
    pub category: Option<String>,
    pub favorite: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// `(key, count)` pair used by the stats endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct GroupCount {
    pub key: String,
    pub count: i64,
}

/// A client ranked by purchase volume.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TopClient {
    pub id: DbId,
    pub name: String,
    pub company: Option<String>,
    pub total_purchases: f64,
    pub purchase_count: i64,
}
