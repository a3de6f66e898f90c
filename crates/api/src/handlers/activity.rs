//! Handler for `/admin/activity`: the persisted platform event feed.

use axum::extract::{Query, State};
use axum::Json;
use galeria_core::pagination::{clamp_limit, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT};
use galeria_db::models::activity_log::ActivityLog;
use galeria_db::repositories::ActivityLogRepo;

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/admin/activity?limit
pub async fn recent_activity(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityLog>>>> {
    let limit = clamp_limit(params.limit, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT);
    let entries = ActivityLogRepo::list_recent(&state.pool, limit).await?;
    Ok(Json(DataResponse::new(entries)))
}
