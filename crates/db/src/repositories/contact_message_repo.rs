//! Repository for the `contact_messages` table.

use sqlx::PgPool;
use galeria_core::contact::{STATUS_NEW, STATUS_READ, STATUS_REPLIED};
use galeria_core::types::DbId;

use crate::models::contact_message::{ContactMessage, CreateContactMessage};

const COLUMNS: &str = "id, name, email, phone, subject, message, status, ip_address, \
                        user_agent, notes, replied_at, replied_by, created_at, updated_at";

pub struct ContactMessageRepo;

impl ContactMessageRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactMessage,
    ) -> Result<ContactMessage, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_messages (name, email, phone, subject, message, ip_address, user_agent)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.ip_address)
            .bind(&input.user_agent)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM contact_messages WHERE id = $1");
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactMessage>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_messages
             WHERE ($1::TEXT IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn count(pool: &PgPool, status: Option<&str>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*)::BIGINT FROM contact_messages WHERE ($1::TEXT IS NULL OR status = $1)",
        )
        .bind(status)
        .fetch_one(pool)
        .await
    }

    /// Move a `new` message to `read`. Other statuses are left alone.
    pub async fn mark_read(pool: &PgPool, id: DbId) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET status = CASE WHEN status = $2 THEN $3 ELSE status END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(STATUS_NEW)
            .bind(STATUS_READ)
            .fetch_optional(pool)
            .await
    }

    /// Set the status; `replied` also stamps `replied_at` and `replied_by`.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        notes: Option<&str>,
        actor: DbId,
    ) -> Result<Option<ContactMessage>, sqlx::Error> {
        let query = format!(
            "UPDATE contact_messages SET
                status = $2,
                notes = COALESCE($3, notes),
                replied_at = CASE WHEN $2 = $5 THEN NOW() ELSE replied_at END,
                replied_by = CASE WHEN $2 = $5 THEN $4 ELSE replied_by END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactMessage>(&query)
            .bind(id)
            .bind(status)
            .bind(notes)
            .bind(actor)
            .bind(STATUS_REPLIED)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
