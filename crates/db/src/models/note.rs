//! Back-office notes with file attachments.

use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use galeria_core::types::{DbId, Timestamp};

/// One uploaded file attached to a note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub filename: String,
    pub url: String,
    pub public_id: String,
    pub mime_type: String,
    pub size: i64,
    pub uploaded_at: Timestamp,
}

/// A row from the `notes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub content: String,
    pub category: String,
    pub priority: String,
    pub reminders: serde_json::Value,
    pub attachments: Json<Vec<Attachment>>,
    pub related_type: Option<String>,
    pub related_id: Option<DbId>,
    pub is_pinned: bool,
    pub is_archived: bool,
    pub created_by: Option<DbId>,
    pub last_modified_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// `{type, id}` reference to another entity.
#[derive(Debug, Clone, Deserialize)]
pub struct RelatedTo {
    #[serde(rename = "type")]
    pub related_type: String,
    pub id: DbId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNote {
    pub title: String,
    #[serde(default)]
    pub content: String,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub reminders: Option<serde_json::Value>,
    pub related_to: Option<RelatedTo>,
    #[serde(default)]
    pub is_pinned: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNote {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub reminders: Option<serde_json::Value>,
    pub related_to: Option<RelatedTo>,
    pub is_pinned: Option<bool>,
    pub is_archived: Option<bool>,
}

#[derive(Debug, Clone, Default)]
pub struct NoteFilter {
    pub archived: bool,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub pinned: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,
}
