//! Agenda events.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use galeria_core::types::{DbId, Timestamp};

/// A row from the `agenda_events` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgendaEvent {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: String,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    pub all_day: bool,
    pub is_recurring: bool,
    pub recurrence: Option<serde_json::Value>,
    pub location: Option<serde_json::Value>,
    pub participants: serde_json::Value,
    pub related_artwork_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub reminders: serde_json::Value,
    pub color: String,
    pub status: String,
    pub notes: Option<String>,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAgendaEvent {
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub start_date: Timestamp,
    pub end_date: Timestamp,
    #[serde(default)]
    pub all_day: bool,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence: Option<serde_json::Value>,
    pub location: Option<serde_json::Value>,
    pub participants: Option<serde_json::Value>,
    pub related_artwork_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub reminders: Option<serde_json::Value>,
    pub color: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAgendaEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub all_day: Option<bool>,
    pub is_recurring: Option<bool>,
    pub recurrence: Option<serde_json::Value>,
    pub location: Option<serde_json::Value>,
    pub participants: Option<serde_json::Value>,
    pub related_artwork_id: Option<DbId>,
    pub related_contact_id: Option<DbId>,
    pub reminders: Option<serde_json::Value>,
    pub color: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AgendaEventFilter {
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub search: Option<String>,
}
