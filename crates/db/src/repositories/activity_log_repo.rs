//! Repository for the `activity_logs` table.

use sqlx::PgPool;
use galeria_core::types::DbId;

use crate::models::activity_log::{ActivityLog, CreateActivityLog};

const COLUMNS: &str =
    "id, user_id, action, event_type, entity_type, entity_id, details, created_at, updated_at";

pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append one entry, returning its id.
    pub async fn insert(pool: &PgPool, input: &CreateActivityLog) -> Result<DbId, sqlx::Error> {
        sqlx::query_scalar(
            "INSERT INTO activity_logs (user_id, action, event_type, entity_type, entity_id, details)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING id",
        )
        .bind(input.user_id)
        .bind(&input.action)
        .bind(&input.event_type)
        .bind(&input.entity_type)
        .bind(input.entity_id)
        .bind(&input.details)
        .fetch_one(pool)
        .await
    }

    /// Entries for one entity, newest first.
    pub async fn list_for_entity(
        pool: &PgPool,
        entity_type: &str,
        entity_id: DbId,
    ) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs
             WHERE entity_type = $1 AND entity_id = $2
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(entity_type)
            .bind(entity_id)
            .fetch_all(pool)
            .await
    }

    /// Most recent entries across the platform.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<ActivityLog>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM activity_logs ORDER BY created_at DESC, id DESC LIMIT $1"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }
}
