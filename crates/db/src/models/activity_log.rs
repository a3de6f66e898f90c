//! Activity log entries written from domain events.

use serde::Serialize;
use sqlx::FromRow;
use galeria_core::types::{DbId, Timestamp};

/// A row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub user_id: Option<DbId>,
    pub action: String,
    pub event_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Insert payload.
#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub user_id: Option<DbId>,
    pub action: String,
    pub event_type: String,
    pub entity_type: Option<String>,
    pub entity_id: Option<DbId>,
    pub details: serde_json::Value,
}
