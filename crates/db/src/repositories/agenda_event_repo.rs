//! Repository for the `agenda_events` table.

use sqlx::PgPool;
use galeria_core::agenda::{STATUS_CANCELLED, STATUS_SCHEDULED};
use galeria_core::types::{DbId, Timestamp};

use crate::models::agenda_event::{
    AgendaEvent, AgendaEventFilter, CreateAgendaEvent, UpdateAgendaEvent,
};

const COLUMNS: &str = "id, title, description, event_type, start_date, end_date, all_day, \
                        is_recurring, recurrence, location, participants, related_artwork_id, \
                        related_contact_id, reminders, color, status, notes, created_by, \
                        created_at, updated_at";

pub struct AgendaEventRepo;

impl AgendaEventRepo {
    /// Insert an event. `event_type` and `color` are resolved by the caller.
    pub async fn create(
        pool: &PgPool,
        input: &CreateAgendaEvent,
        event_type: &str,
        color: &str,
        created_by: DbId,
    ) -> Result<AgendaEvent, sqlx::Error> {
        let query = format!(
            "INSERT INTO agenda_events (title, description, event_type, start_date, end_date,
                all_day, is_recurring, recurrence, location, participants, related_artwork_id,
                related_contact_id, reminders, color, notes, created_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, '[]'::jsonb), $11, $12,
                     COALESCE($13, '[]'::jsonb), $14, $15, $16)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgendaEvent>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(event_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.all_day)
            .bind(input.is_recurring)
            .bind(&input.recurrence)
            .bind(&input.location)
            .bind(&input.participants)
            .bind(input.related_artwork_id)
            .bind(input.related_contact_id)
            .bind(&input.reminders)
            .bind(color)
            .bind(&input.notes)
            .bind(created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<AgendaEvent>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM agenda_events WHERE id = $1");
        sqlx::query_as::<_, AgendaEvent>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Filtered listing. A date window selects events overlapping it.
    pub async fn list(
        pool: &PgPool,
        filter: &AgendaEventFilter,
        limit: i64,
    ) -> Result<Vec<AgendaEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agenda_events
             WHERE ($1::TEXT IS NULL OR event_type = $1)
               AND ($2::TEXT IS NULL OR status = $2)
               AND ($3::TIMESTAMPTZ IS NULL OR end_date >= $3)
               AND ($4::TIMESTAMPTZ IS NULL OR start_date <= $4)
               AND ($5::TEXT IS NULL
                    OR title ILIKE '%' || $5 || '%'
                    OR description ILIKE '%' || $5 || '%'
                    OR notes ILIKE '%' || $5 || '%')
             ORDER BY start_date ASC, id ASC
             LIMIT $6"
        );
        sqlx::query_as::<_, AgendaEvent>(&query)
            .bind(&filter.event_type)
            .bind(&filter.status)
            .bind(filter.start_date)
            .bind(filter.end_date)
            .bind(&filter.search)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Non-cancelled events overlapping `[from, to)`.
    pub async fn list_overlapping(
        pool: &PgPool,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<AgendaEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agenda_events
             WHERE start_date < $2 AND end_date >= $1 AND status <> $3
             ORDER BY start_date ASC, id ASC"
        );
        sqlx::query_as::<_, AgendaEvent>(&query)
            .bind(from)
            .bind(to)
            .bind(STATUS_CANCELLED)
            .fetch_all(pool)
            .await
    }

    /// Scheduled events starting at or after `now`.
    pub async fn list_upcoming(
        pool: &PgPool,
        now: Timestamp,
        limit: i64,
    ) -> Result<Vec<AgendaEvent>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM agenda_events
             WHERE start_date >= $1 AND status = $2
             ORDER BY start_date ASC, id ASC
             LIMIT $3"
        );
        sqlx::query_as::<_, AgendaEvent>(&query)
            .bind(now)
            .bind(STATUS_SCHEDULED)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateAgendaEvent,
    ) -> Result<Option<AgendaEvent>, sqlx::Error> {
        let query = format!(
            "UPDATE agenda_events SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                event_type = COALESCE($4, event_type),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                all_day = COALESCE($7, all_day),
                is_recurring = COALESCE($8, is_recurring),
                recurrence = COALESCE($9, recurrence),
                location = COALESCE($10, location),
                participants = COALESCE($11, participants),
                related_artwork_id = COALESCE($12, related_artwork_id),
                related_contact_id = COALESCE($13, related_contact_id),
                reminders = COALESCE($14, reminders),
                color = COALESCE($15, color),
                status = COALESCE($16, status),
                notes = COALESCE($17, notes)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, AgendaEvent>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.event_type)
            .bind(input.start_date)
            .bind(input.end_date)
            .bind(input.all_day)
            .bind(input.is_recurring)
            .bind(&input.recurrence)
            .bind(&input.location)
            .bind(&input.participants)
            .bind(input.related_artwork_id)
            .bind(input.related_contact_id)
            .bind(&input.reminders)
            .bind(&input.color)
            .bind(&input.status)
            .bind(&input.notes)
            .fetch_optional(pool)
            .await
    }

    pub async fn set_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<AgendaEvent>, sqlx::Error> {
        let query =
            format!("UPDATE agenda_events SET status = $2 WHERE id = $1 RETURNING {COLUMNS}");
        sqlx::query_as::<_, AgendaEvent>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM agenda_events WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
