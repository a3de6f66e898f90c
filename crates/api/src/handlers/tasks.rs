//! Handlers for `/admin/agenda/tasks`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use galeria_core::pagination::{clamp_limit, MAX_PAGE_LIMIT};
use galeria_core::tasks::{
    completed_at_for, toggle_checklist_item, validate_category, validate_priority,
    validate_status, DUE_TODAY, DUE_WEEK, MAX_TITLE_LENGTH, PRIORITY_MEDIUM, SORT_DUE_DATE,
    SORT_NEWEST, SORT_PRIORITY, STATUS_FILTER_ACTIVE, STATUS_PENDING,
};
use galeria_core::types::DbId;
use galeria_core::validation::{validate_choice, validate_required_text};
use galeria_db::models::task::{CreateTask, TaskFilter, TaskStats, TaskView, UpdateTask};
use galeria_db::repositories::TaskRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_PENDING_LIMIT: i64 = 5;

// ----- Request / response types -----

#[derive(Debug, Deserialize)]
pub struct TaskListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due: Option<String>,
    #[serde(default)]
    pub overdue: bool,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TaskStatusRequest {
    pub status: String,
}

// ----- Handlers -----

/// GET /api/v1/admin/agenda/tasks
pub async fn list_tasks(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TaskListParams>,
) -> AppResult<Json<DataResponse<Vec<TaskView>>>> {
    if let Some(status) = params.status.as_deref().filter(|s| *s != STATUS_FILTER_ACTIVE) {
        validate_status(status).map_err(AppError::validation)?;
    }
    if let Some(p) = params.priority.as_deref() {
        validate_priority(p).map_err(AppError::validation)?;
    }
    if let Some(c) = params.category.as_deref() {
        validate_category(c).map_err(AppError::validation)?;
    }
    if let Some(due) = params.due.as_deref() {
        validate_choice("due", due, &[DUE_TODAY, DUE_WEEK]).map_err(AppError::validation)?;
    }
    if let Some(sort) = params.sort.as_deref() {
        validate_choice("sort", sort, &[SORT_DUE_DATE, SORT_PRIORITY, SORT_NEWEST])
            .map_err(AppError::validation)?;
    }

    let filter = TaskFilter {
        status: params.status,
        priority: params.priority,
        category: params.category,
        due: params.due,
        overdue: params.overdue,
        search: params.search.filter(|s| !s.trim().is_empty()),
        sort: params.sort,
    };
    let now = chrono::Utc::now();
    let tasks = TaskRepo::list(&state.pool, &filter, now).await?;

    Ok(Json(DataResponse::new(
        tasks.into_iter().map(|t| TaskView::new(t, now)).collect(),
    )))
}

/// GET /api/v1/admin/agenda/tasks/stats
pub async fn task_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<TaskStats>>> {
    let stats = TaskRepo::stats(&state.pool, chrono::Utc::now()).await?;
    Ok(Json(DataResponse::new(stats)))
}

/// GET /api/v1/admin/agenda/tasks/pending?limit=5
///
/// Open tasks, most pressing first.
pub async fn pending_tasks(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<TaskView>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_PENDING_LIMIT, MAX_PAGE_LIMIT);
    let now = chrono::Utc::now();
    let tasks = TaskRepo::list_pending(&state.pool, limit).await?;
    Ok(Json(DataResponse::new(
        tasks.into_iter().map(|t| TaskView::new(t, now)).collect(),
    )))
}

/// GET /api/v1/admin/agenda/tasks/{id}
pub async fn get_task(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<TaskView>>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    Ok(Json(DataResponse::new(TaskView::new(task, chrono::Utc::now()))))
}

/// POST /api/v1/admin/agenda/tasks
pub async fn create_task(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateTask>,
) -> AppResult<(StatusCode, Json<DataResponse<TaskView>>)> {
    validate_required_text("title", &input.title, MAX_TITLE_LENGTH)
        .map_err(AppError::validation)?;
    validate_optional_fields(
        input.priority.as_deref(),
        input.status.as_deref(),
        input.category.as_deref(),
    )?;

    let now = chrono::Utc::now();
    let status = input.status.as_deref().unwrap_or(STATUS_PENDING);
    let completed_at = completed_at_for(status, None, now);
    let task = TaskRepo::create(&state.pool, &input, completed_at, admin.user_id).await?;

    tracing::info!(
        task_id = task.id,
        priority = input.priority.as_deref().unwrap_or(PRIORITY_MEDIUM),
        "Task created",
    );
    state.publish(
        "task.created",
        "task",
        task.id,
        Some(admin.user_id),
        serde_json::json!({ "title": task.title }),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(TaskView::new(task, now)))))
}

/// PUT /api/v1/admin/agenda/tasks/{id}
pub async fn update_task(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTask>,
) -> AppResult<Json<DataResponse<TaskView>>> {
    if let Some(title) = input.title.as_deref() {
        validate_required_text("title", title, MAX_TITLE_LENGTH).map_err(AppError::validation)?;
    }
    validate_optional_fields(
        input.priority.as_deref(),
        input.status.as_deref(),
        input.category.as_deref(),
    )?;

    let current = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    let now = chrono::Utc::now();
    let status = input.status.as_deref().unwrap_or(&current.status);
    let completed_at = completed_at_for(status, current.completed_at, now);

    let task = TaskRepo::update(&state.pool, id, &input, completed_at)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;

    tracing::info!(task_id = id, "Task updated");
    state.publish(
        "task.updated",
        "task",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );

    Ok(Json(DataResponse::new(TaskView::new(task, now))))
}

/// DELETE /api/v1/admin/agenda/tasks/{id}
pub async fn delete_task(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !TaskRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("Task", id));
    }
    tracing::info!(task_id = id, "Task deleted");
    state.publish("task.deleted", "task", id, Some(admin.user_id), serde_json::json!({}));
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/admin/agenda/tasks/{id}/status
pub async fn update_task_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<TaskStatusRequest>,
) -> AppResult<Json<DataResponse<TaskView>>> {
    validate_status(&input.status).map_err(AppError::validation)?;
    let current = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;

    let now = chrono::Utc::now();
    let completed_at = completed_at_for(&input.status, current.completed_at, now);
    let task = TaskRepo::set_status(&state.pool, id, &input.status, completed_at)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;

    tracing::info!(task_id = id, status = %input.status, "Task status changed");
    state.publish(
        "task.status_changed",
        "task",
        id,
        Some(admin.user_id),
        serde_json::json!({ "from": current.status, "to": input.status }),
    );

    Ok(Json(DataResponse::new(TaskView::new(task, now))))
}

/// PATCH /api/v1/admin/agenda/tasks/{id}/checklist/{index}
pub async fn toggle_checklist(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, index)): Path<(DbId, usize)>,
) -> AppResult<Json<DataResponse<TaskView>>> {
    let task = TaskRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;

    let now = chrono::Utc::now();
    let mut checklist = task.checklist.0;
    if !toggle_checklist_item(&mut checklist, index, now) {
        return Err(AppError::NotFound(format!(
            "Checklist item #{index} not found on task {id}"
        )));
    }

    let task = TaskRepo::set_checklist(&state.pool, id, &checklist)
        .await?
        .ok_or_else(|| AppError::not_found("Task", id))?;
    Ok(Json(DataResponse::new(TaskView::new(task, now))))
}

// ----- Helpers -----

fn validate_optional_fields(
    priority: Option<&str>,
    status: Option<&str>,
    category: Option<&str>,
) -> AppResult<()> {
    if let Some(p) = priority {
        validate_priority(p).map_err(AppError::validation)?;
    }
    if let Some(s) = status {
        validate_status(s).map_err(AppError::validation)?;
    }
    if let Some(c) = category {
        validate_category(c).map_err(AppError::validation)?;
    }
    Ok(())
}
