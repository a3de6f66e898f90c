//! Repository for the `tasks` table.

use chrono::Duration;
use sqlx::types::Json;
use sqlx::PgPool;
use galeria_core::tasks::{
    self, ChecklistItem, ACTIVE_STATUSES, DUE_TODAY, DUE_WEEK, SORT_NEWEST, SORT_PRIORITY,
    STATUS_FILTER_ACTIVE,
};
use galeria_core::types::{DbId, Timestamp};

use crate::models::task::{CreateTask, Task, TaskFilter, TaskStats, UpdateTask};

const COLUMNS: &str = "id, title, description, priority, status, due_date, completed_at, \
                        category, tags, checklist, related_event_id, related_contact_id, \
                        related_artwork_id, assigned_to, created_by, created_at, updated_at";

fn order_clause(sort: Option<&str>) -> String {
    match sort {
        Some(SORT_PRIORITY) => format!(
            "{} DESC, due_date ASC NULLS LAST, id ASC",
            tasks::priority_rank_sql("priority")
        ),
        Some(SORT_NEWEST) => "created_at DESC, id DESC".to_string(),
        _ => "due_date ASC NULLS LAST, id ASC".to_string(),
    }
}

pub struct TaskRepo;

impl TaskRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateTask,
        completed_at: Option<Timestamp>,
        created_by: DbId,
    ) -> Result<Task, sqlx::Error> {
        let query = format!(
            "INSERT INTO tasks (title, description, priority, status, due_date, completed_at,
                category, tags, checklist, related_event_id, related_contact_id,
                related_artwork_id, assigned_to, created_by)
             VALUES ($1, $2, COALESCE($3, 'medium'), COALESCE($4, 'pending'), $5, $6,
                     COALESCE($7, 'other'), $8, $9, $10, $11, $12, $13, $14)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(&input.status)
            .bind(input.due_date)
            .bind(completed_at)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(Json(&input.checklist))
            .bind(input.related_event_id)
            .bind(input.related_contact_id)
            .bind(input.related_artwork_id)
            .bind(input.assigned_to)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tasks WHERE id = $1");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Filtered listing. Due-date windows and the overdue flag are evaluated
    /// relative to `now`.
    pub async fn list(
        pool: &PgPool,
        filter: &TaskFilter,
        now: Timestamp,
    ) -> Result<Vec<Task>, sqlx::Error> {
        let statuses: Option<Vec<String>> = match filter.status.as_deref() {
            Some(STATUS_FILTER_ACTIVE) => {
                Some(ACTIVE_STATUSES.iter().map(|s| s.to_string()).collect())
            }
            Some(status) => Some(vec![status.to_string()]),
            None => None,
        };
        let (today_start, today_end) = galeria_core::agenda::day_bounds(now);
        let (due_from, due_to) = match filter.due.as_deref() {
            Some(DUE_TODAY) => (Some(today_start), Some(today_end)),
            Some(DUE_WEEK) => (Some(today_start), Some(today_start + Duration::days(7))),
            _ => (None, None),
        };

        let order = order_clause(filter.sort.as_deref());
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE ($1::TEXT[] IS NULL OR status = ANY($1))
               AND ($2::TEXT IS NULL OR priority = $2)
               AND ($3::TEXT IS NULL OR category = $3)
               AND ($4::TIMESTAMPTZ IS NULL OR due_date >= $4)
               AND ($5::TIMESTAMPTZ IS NULL OR due_date < $5)
               AND (NOT $6 OR (due_date < $7 AND status NOT IN ('completed', 'cancelled')))
               AND ($8::TEXT IS NULL
                    OR title ILIKE '%' || $8 || '%'
                    OR description ILIKE '%' || $8 || '%'
                    OR $8 = ANY(tags))
             ORDER BY {order}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(statuses)
            .bind(&filter.priority)
            .bind(&filter.category)
            .bind(due_from)
            .bind(due_to)
            .bind(filter.overdue)
            .bind(now)
            .bind(&filter.search)
            .fetch_all(pool)
            .await
    }

    /// Open tasks, most pressing first.
    pub async fn list_pending(pool: &PgPool, limit: i64) -> Result<Vec<Task>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM tasks
             WHERE status IN ('pending', 'in_progress')
             ORDER BY {} DESC, due_date ASC NULLS LAST, id ASC
             LIMIT $1",
            tasks::priority_rank_sql("priority")
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn stats(pool: &PgPool, now: Timestamp) -> Result<TaskStats, sqlx::Error> {
        let (today_start, today_end) = galeria_core::agenda::day_bounds(now);
        sqlx::query_as::<_, TaskStats>(
            "SELECT COUNT(*)::BIGINT AS total,
                    COUNT(*) FILTER (WHERE status = 'pending')::BIGINT AS pending,
                    COUNT(*) FILTER (WHERE status = 'in_progress')::BIGINT AS in_progress,
                    COUNT(*) FILTER (WHERE status = 'completed')::BIGINT AS completed,
                    COUNT(*) FILTER (WHERE status = 'cancelled')::BIGINT AS cancelled,
                    COUNT(*) FILTER (WHERE due_date < $1
                        AND status NOT IN ('completed', 'cancelled'))::BIGINT AS overdue,
                    COUNT(*) FILTER (WHERE due_date >= $2 AND due_date < $3
                        AND status NOT IN ('completed', 'cancelled'))::BIGINT AS due_today,
                    COUNT(*) FILTER (WHERE priority = 'urgent'
                        AND status NOT IN ('completed', 'cancelled'))::BIGINT AS urgent
             FROM tasks",
        )
        .bind(now)
        .bind(today_start)
        .bind(today_end)
        .fetch_one(pool)
        .await
    }

    /// Apply a patch. `completed_at` is always written as given, since it is
    /// derived from the resulting status by the caller.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTask,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                priority = COALESCE($4, priority),
                status = COALESCE($5, status),
                due_date = COALESCE($6, due_date),
                category = COALESCE($7, category),
                tags = COALESCE($8, tags),
                checklist = COALESCE($9, checklist),
                related_event_id = COALESCE($10, related_event_id),
                related_contact_id = COALESCE($11, related_contact_id),
                related_artwork_id = COALESCE($12, related_artwork_id),
                assigned_to = COALESCE($13, assigned_to),
                completed_at = $14
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.priority)
            .bind(&input.status)
            .bind(input.due_date)
            .bind(&input.category)
            .bind(&input.tags)
            .bind(input.checklist.as_ref().map(Json))
            .bind(input.related_event_id)
            .bind(input.related_contact_id)
            .bind(input.related_artwork_id)
            .bind(input.assigned_to)
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
        completed_at: Option<Timestamp>,
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!(
            "UPDATE tasks SET status = $2, completed_at = $3 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(status)
            .bind(completed_at)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_checklist(
        pool: &PgPool,
        id: DbId,
        checklist: &[ChecklistItem],
    ) -> Result<Option<Task>, sqlx::Error> {
        let query = format!("UPDATE tasks SET checklist = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, Task>(&query)
            .bind(id)
            .bind(Json(checklist))
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
