//! The single `site_info` row.

use serde::Serialize;
use sqlx::FromRow;
use galeria_core::types::Timestamp;

/// Sections are kept as raw JSON and typed at the edges with
/// [`galeria_core::site_info`].
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SiteInfoRow {
    #[serde(skip)]
    pub id: i16,
    pub biography: serde_json::Value,
    pub contact: serde_json::Value,
    pub legal_pages: serde_json::Value,
    pub updated_by: String,
    pub last_updated: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
