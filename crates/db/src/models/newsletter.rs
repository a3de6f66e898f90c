//! Newsletter subscriber model.

use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;
use galeria_core::newsletter::Preferences;
use galeria_core::types::{DbId, Timestamp};

/// A row from the `newsletter_subscribers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct NewsletterSubscriber {
    pub id: DbId,
    pub email: String,
    pub name: Option<String>,
    pub status: String,
    pub source: String,
    pub preferences: Json<Preferences>,
    pub subscribed_at: Timestamp,
    pub unsubscribed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}
