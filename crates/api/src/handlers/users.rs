//! Handlers for `/users`: admin listing plus self-service profile updates.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use galeria_core::error::CoreError;
use galeria_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use galeria_core::roles::VALID_ROLES;
use galeria_core::types::DbId;
use galeria_core::validation::validate_optional_choice;
use galeria_db::models::user::{UpdateUser, UserResponse};
use galeria_db::repositories::{SessionRepo, UserRepo};

use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UserListParams {
    pub role: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// GET /api/v1/users
pub async fn list_users(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<DataResponse<Page<UserResponse>>>> {
    let role = params.role.as_deref();
    validate_optional_choice("role", role, VALID_ROLES).map_err(AppError::validation)?;

    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let users = UserRepo::list(&state.pool, role, limit, offset).await?;
    let total = UserRepo::count(&state.pool, role).await?;

    Ok(Json(DataResponse::new(Page {
        items: users.into_iter().map(UserResponse::from).collect(),
        total,
        limit,
        offset,
    })))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    auth.ensure_self_or_admin(Some(id))?;
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;
    Ok(Json(DataResponse::new(user.into())))
}

/// PUT /api/v1/users/{id}
pub async fn update_user(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUser>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    auth.ensure_self_or_admin(Some(id))?;
    if let Some(name) = &input.name {
        galeria_core::validation::validate_required_text("name", name, 100)
            .map_err(AppError::validation)?;
    }

    let user = UserRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("User", id))?;

    state.publish("user.updated", "user", id, Some(auth.user_id), serde_json::json!({}));
    Ok(Json(DataResponse::new(user.into())))
}

/// DELETE /api/v1/users/{id}
///
/// Soft delete: the account is deactivated and its sessions revoked.
pub async fn deactivate_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "Admins cannot deactivate their own account".into(),
        ));
    }
    if !UserRepo::deactivate(&state.pool, id).await? {
        return Err(AppError::not_found("User", id));
    }
    SessionRepo::revoke_all_for_user(&state.pool, id).await?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deactivated");
    state.publish("user.deleted", "user", id, Some(admin.user_id), serde_json::json!({}));
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/users/change-password
pub async fn change_password(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password_strength(&input.new_password, MIN_PASSWORD_LENGTH)
        .map_err(AppError::validation)?;

    let user = UserRepo::find_by_id(&state.pool, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("User", auth.user_id))?;

    let matches = verify_password(&input.current_password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !matches {
        return Err(AppError::BadRequest("Current password is incorrect".into()));
    }

    let password_hash = hash_password(&input.new_password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    if !UserRepo::update_password(&state.pool, user.id, &password_hash).await? {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "User",
            id: user.id,
        }));
    }

    state.publish(
        "user.password_changed",
        "user",
        user.id,
        Some(user.id),
        serde_json::json!({}),
    );
    Ok(StatusCode::NO_CONTENT)
}
