//! Handlers for `/admin/agenda/events` and the calendar views.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use galeria_core::agenda::{
    day_bounds, default_color, validate_participants, validate_status, validate_time_range,
    validate_type,
    DEFAULT_LIST_LIMIT, DEFAULT_UPCOMING_LIMIT, MAX_TITLE_LENGTH, VALID_RECURRENCE_PATTERNS,
};
use galeria_core::finance::month_range;
use galeria_core::pagination::{clamp_limit, MAX_PAGE_LIMIT};
use galeria_core::types::{DbId, Timestamp};
use galeria_core::validation::{validate_choice, validate_required_text};
use galeria_db::models::agenda_event::{
    AgendaEvent, AgendaEventFilter, CreateAgendaEvent, UpdateAgendaEvent,
};
use galeria_db::repositories::AgendaEventRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{parse_date_param, DateBound, LimitParams};
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_EVENT_TYPE: &str = "other";

// ----- Request / response types -----

#[derive(Debug, Deserialize)]
pub struct EventListParams {
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub search: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct EventStatusRequest {
    pub status: String,
}

/// Compact event shape consumed by the calendar widget.
#[derive(Debug, Serialize)]
pub struct CalendarEntry {
    pub id: DbId,
    pub title: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub all_day: bool,
    #[serde(rename = "type")]
    pub event_type: String,
    pub color: String,
    pub status: String,
}

impl From<AgendaEvent> for CalendarEntry {
    fn from(event: AgendaEvent) -> Self {
        Self {
            id: event.id,
            title: event.title,
            start: event.start_date,
            end: event.end_date,
            all_day: event.all_day,
            event_type: event.event_type,
            color: event.color,
            status: event.status,
        }
    }
}

// ----- Handlers -----

/// GET /api/v1/admin/agenda/events
pub async fn list_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> AppResult<Json<DataResponse<Vec<AgendaEvent>>>> {
    if let Some(t) = params.event_type.as_deref() {
        validate_type(t).map_err(AppError::validation)?;
    }
    if let Some(s) = params.status.as_deref() {
        validate_status(s).map_err(AppError::validation)?;
    }
    let filter = AgendaEventFilter {
        start_date: parse_date_param("start_date", params.start_date.as_deref(), DateBound::Start)?,
        end_date: parse_date_param("end_date", params.end_date.as_deref(), DateBound::End)?,
        event_type: params.event_type,
        status: params.status,
        search: params.search.filter(|s| !s.trim().is_empty()),
    };
    let limit = clamp_limit(params.limit, DEFAULT_LIST_LIMIT, MAX_PAGE_LIMIT);

    let events = AgendaEventRepo::list(&state.pool, &filter, limit).await?;
    Ok(Json(DataResponse::new(events)))
}

/// GET /api/v1/admin/agenda/calendar/{year}/{month}
pub async fn calendar_month(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((year, month)): Path<(i32, u32)>,
) -> AppResult<Json<DataResponse<Vec<CalendarEntry>>>> {
    let (from, to) = month_range(year, month)
        .ok_or_else(|| AppError::validation("Month must be between 1 and 12"))?;
    let events = AgendaEventRepo::list_overlapping(&state.pool, from, to).await?;
    Ok(Json(DataResponse::new(
        events.into_iter().map(CalendarEntry::from).collect(),
    )))
}

/// GET /api/v1/admin/agenda/events/upcoming?limit=5
pub async fn upcoming_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<AgendaEvent>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_UPCOMING_LIMIT, MAX_PAGE_LIMIT);
    let events = AgendaEventRepo::list_upcoming(&state.pool, chrono::Utc::now(), limit).await?;
    Ok(Json(DataResponse::new(events)))
}

/// GET /api/v1/admin/agenda/events/today
pub async fn today_events(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AgendaEvent>>>> {
    let (from, to) = day_bounds(chrono::Utc::now());
    let events = AgendaEventRepo::list_overlapping(&state.pool, from, to).await?;
    Ok(Json(DataResponse::new(events)))
}

/// GET /api/v1/admin/agenda/events/{id}
pub async fn get_event(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AgendaEvent>>> {
    let event = AgendaEventRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AgendaEvent", id))?;
    Ok(Json(DataResponse::new(event)))
}

/// POST /api/v1/admin/agenda/events
///
/// Without an explicit color the event takes its type's default.
pub async fn create_event(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAgendaEvent>,
) -> AppResult<(StatusCode, Json<DataResponse<AgendaEvent>>)> {
    validate_required_text("title", &input.title, MAX_TITLE_LENGTH)
        .map_err(AppError::validation)?;
    let event_type = input
        .event_type
        .clone()
        .unwrap_or_else(|| DEFAULT_EVENT_TYPE.to_string());
    validate_type(&event_type).map_err(AppError::validation)?;
    validate_time_range(input.start_date, input.end_date).map_err(AppError::validation)?;
    validate_recurrence(input.recurrence.as_ref())?;
    if let Some(participants) = input.participants.as_ref() {
        validate_participants(participants).map_err(AppError::validation)?;
    }

    let color = input
        .color
        .clone()
        .filter(|c| !c.trim().is_empty())
        .unwrap_or_else(|| default_color(&event_type).to_string());

    let event =
        AgendaEventRepo::create(&state.pool, &input, &event_type, &color, admin.user_id).await?;

    tracing::info!(event_id = event.id, event_type = %event.event_type, "Agenda event created");
    state.publish(
        "agenda_event.created",
        "agenda_event",
        event.id,
        Some(admin.user_id),
        serde_json::json!({ "title": event.title, "start_date": event.start_date }),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(event))))
}

/// PUT /api/v1/admin/agenda/events/{id}
pub async fn update_event(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAgendaEvent>,
) -> AppResult<Json<DataResponse<AgendaEvent>>> {
    if let Some(title) = input.title.as_deref() {
        validate_required_text("title", title, MAX_TITLE_LENGTH).map_err(AppError::validation)?;
    }
    if let Some(t) = input.event_type.as_deref() {
        validate_type(t).map_err(AppError::validation)?;
    }
    if let Some(s) = input.status.as_deref() {
        validate_status(s).map_err(AppError::validation)?;
    }
    validate_recurrence(input.recurrence.as_ref())?;
    if let Some(participants) = input.participants.as_ref() {
        validate_participants(participants).map_err(AppError::validation)?;
    }

    if input.start_date.is_some() || input.end_date.is_some() {
        let current = AgendaEventRepo::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::not_found("AgendaEvent", id))?;
        validate_time_range(
            input.start_date.unwrap_or(current.start_date),
            input.end_date.unwrap_or(current.end_date),
        )
        .map_err(AppError::validation)?;
    }

    let event = AgendaEventRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("AgendaEvent", id))?;

    tracing::info!(event_id = id, "Agenda event updated");
    state.publish(
        "agenda_event.updated",
        "agenda_event",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );

    Ok(Json(DataResponse::new(event)))
}

/// DELETE /api/v1/admin/agenda/events/{id}
pub async fn delete_event(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AgendaEventRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("AgendaEvent", id));
    }
    tracing::info!(event_id = id, "Agenda event deleted");
    state.publish(
        "agenda_event.deleted",
        "agenda_event",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/admin/agenda/events/{id}/status
pub async fn update_event_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<EventStatusRequest>,
) -> AppResult<Json<DataResponse<AgendaEvent>>> {
    validate_status(&input.status).map_err(AppError::validation)?;
    let event = AgendaEventRepo::set_status(&state.pool, id, &input.status)
        .await?
        .ok_or_else(|| AppError::not_found("AgendaEvent", id))?;

    tracing::info!(event_id = id, status = %input.status, "Agenda event status changed");
    state.publish(
        "agenda_event.status_changed",
        "agenda_event",
        id,
        Some(admin.user_id),
        serde_json::json!({ "status": input.status }),
    );

    Ok(Json(DataResponse::new(event)))
}

// ----- Helpers -----

fn validate_recurrence(recurrence: Option<&serde_json::Value>) -> AppResult<()> {
    if let Some(pattern) = recurrence
        .and_then(|r| r.get("pattern"))
        .and_then(serde_json::Value::as_str)
    {
        validate_choice("recurrence pattern", pattern, VALID_RECURRENCE_PATTERNS)
            .map_err(AppError::validation)?;
    }
    Ok(())
}
