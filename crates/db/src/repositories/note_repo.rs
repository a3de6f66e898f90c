//! Repository for the `notes` table.

use sqlx::types::Json;
use sqlx::PgPool;
use galeria_core::notes::{SORT_OLDEST, SORT_PRIORITY, SORT_TITLE};
use galeria_core::types::DbId;

use crate::models::note::{Attachment, CreateNote, Note, NoteFilter, UpdateNote};

const COLUMNS: &str = "id, title, content, category, priority, reminders, attachments, \
                        related_type, related_id, is_pinned, is_archived, created_by, \
                        last_modified_by, created_at, updated_at";

fn order_clause(sort: Option<&str>) -> String {
    let secondary = match sort {
        Some(SORT_OLDEST) => "created_at ASC, id ASC".to_string(),
        Some(SORT_PRIORITY) => format!(
            "{} DESC, created_at DESC",
            galeria_core::tasks::priority_rank_sql("priority")
        ),
        Some(SORT_TITLE) => "title ASC, id ASC".to_string(),
        _ => "created_at DESC, id DESC".to_string(),
    };
    format!("is_pinned DESC, {secondary}")
}

pub struct NoteRepo;

impl NoteRepo {
    pub async fn create(pool: &PgPool, input: &CreateNote, author: DbId) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (title, content, category, priority, reminders, related_type,
                related_id, is_pinned, created_by, last_modified_by)
             VALUES ($1, $2, COALESCE($3, 'general'), COALESCE($4, 'medium'),
                     COALESCE($5, '[]'::jsonb), $6, $7, $8, $9, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(&input.priority)
            .bind(&input.reminders)
            .bind(input.related_to.as_ref().map(|r| r.related_type.as_str()))
            .bind(input.related_to.as_ref().map(|r| r.id))
            .bind(input.is_pinned)
            .bind(author)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM notes WHERE id = $1");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Filtered listing, pinned notes first.
    pub async fn list(pool: &PgPool, filter: &NoteFilter) -> Result<Vec<Note>, sqlx::Error> {
        let order = order_clause(filter.sort.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE is_archived = $1
               AND ($2::TEXT IS NULL OR category = $2)
               AND ($3::TEXT IS NULL OR priority = $3)
               AND ($4::BOOL IS NULL OR is_pinned = $4)
               AND ($5::TEXT IS NULL
                    OR title ILIKE '%' || $5 || '%'
                    OR content ILIKE '%' || $5 || '%')
             ORDER BY {order}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(filter.archived)
            .bind(&filter.category)
            .bind(&filter.priority)
            .bind(filter.pinned)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    /// Unarchived high and urgent notes, most pressing first.
    pub async fn list_urgent(pool: &PgPool, limit: i64) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE is_archived = false AND priority IN ('high', 'urgent')
             ORDER BY {} DESC, created_at DESC
             LIMIT $1",
            galeria_core::tasks::priority_rank_sql("priority")
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateNote,
        modified_by: DbId,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET
                title = COALESCE($2, title),
                content = COALESCE($3, content),
                category = COALESCE($4, category),
                priority = COALESCE($5, priority),
                reminders = COALESCE($6, reminders),
                related_type = COALESCE($7, related_type),
                related_id = COALESCE($8, related_id),
                is_pinned = COALESCE($9, is_pinned),
                is_archived = COALESCE($10, is_archived),
                last_modified_by = $11
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.content)
            .bind(&input.category)
            .bind(&input.priority)
            .bind(&input.reminders)
            .bind(input.related_to.as_ref().map(|r| r.related_type.as_str()))
            .bind(input.related_to.as_ref().map(|r| r.id))
            .bind(input.is_pinned)
            .bind(input.is_archived)
            .bind(modified_by)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_pin(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query =
            format!("UPDATE notes SET is_pinned = NOT is_pinned WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn toggle_archive(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET is_archived = NOT is_archived WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Replace the attachment list.
    pub async fn set_attachments(
        pool: &PgPool,
        id: DbId,
        attachments: &[Attachment],
        modified_by: DbId,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "UPDATE notes SET attachments = $2, last_modified_by = $3
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .bind(Json(attachments))
            .bind(modified_by)
            .fetch_optional(pool)
            .await
    }

    /// Delete a note, returning it so its attachments can be destroyed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Note>, sqlx::Error> {
        let query = format!("DELETE FROM notes WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Note>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
