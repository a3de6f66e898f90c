//! Handlers for `/contact`: the public contact form and its admin inbox.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::Deserialize;
use validator::Validate;
use galeria_core::contact::{validate_status, validate_subject, VALID_STATUSES};
use galeria_core::pagination::{clamp_limit, clamp_offset, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT};
use galeria_core::types::DbId;
use galeria_core::validation::validate_optional_choice;
use galeria_db::models::contact_message::{ContactMessage, CreateContactMessage};
use galeria_db::repositories::ContactMessageRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{client_ip, user_agent};
use crate::middleware::rbac::RequireAdmin;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct ContactRequest {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,
    #[validate(length(max = 30, message = "cannot exceed 30 characters"))]
    pub phone: Option<String>,
    pub subject: String,
    #[validate(length(min = 1, max = 2000, message = "must be 1-2000 characters"))]
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct ContactListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateContactStatusRequest {
    pub status: String,
    pub notes: Option<String>,
}

/// POST /api/v1/contact
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ContactRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ContactMessage>>)> {
    input.validate()?;
    validate_subject(&input.subject).map_err(AppError::validation)?;

    let message = ContactMessageRepo::create(
        &state.pool,
        &CreateContactMessage {
            name: input.name.trim().to_string(),
            email: input.email.trim().to_lowercase(),
            phone: input.phone.filter(|p| !p.trim().is_empty()),
            subject: input.subject,
            message: input.message,
            ip_address: client_ip(&headers),
            user_agent: user_agent(&headers),
        },
    )
    .await?;

    state.mailer.notify_contact_message(
        &message.name,
        &message.email,
        message.phone.as_deref(),
        &message.subject,
        &message.message,
    );

    tracing::info!(contact_id = message.id, subject = %message.subject, "Contact message received");
    state.publish(
        "contact.created",
        "contact_message",
        message.id,
        None,
        serde_json::json!({ "subject": message.subject }),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(message))))
}

/// GET /api/v1/contact
pub async fn list(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ContactListParams>,
) -> AppResult<Json<DataResponse<Page<ContactMessage>>>> {
    let status = params.status.as_deref();
    validate_optional_choice("status", status, VALID_STATUSES).map_err(AppError::validation)?;
    let limit = clamp_limit(params.limit, DEFAULT_ADMIN_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = ContactMessageRepo::list(&state.pool, status, limit, offset).await?;
    let total = ContactMessageRepo::count(&state.pool, status).await?;

    Ok(Json(DataResponse::new(Page {
        items,
        total,
        limit,
        offset,
    })))
}

/// GET /api/v1/contact/{id}
///
/// Opening a `new` message marks it `read`.
pub async fn get(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    let message = ContactMessageRepo::mark_read(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("ContactMessage", id))?;
    Ok(Json(DataResponse::new(message)))
}

/// PATCH /api/v1/contact/{id}/status
pub async fn update_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateContactStatusRequest>,
) -> AppResult<Json<DataResponse<ContactMessage>>> {
    validate_status(&input.status).map_err(AppError::validation)?;

    let message = ContactMessageRepo::update_status(
        &state.pool,
        id,
        &input.status,
        input.notes.as_deref(),
        admin.user_id,
    )
    .await?
    .ok_or_else(|| AppError::not_found("ContactMessage", id))?;

    tracing::info!(contact_id = id, status = %input.status, "Contact message status updated");
    state.publish(
        "contact.status_changed",
        "contact_message",
        id,
        Some(admin.user_id),
        serde_json::json!({ "status": input.status }),
    );

    Ok(Json(DataResponse::new(message)))
}

/// DELETE /api/v1/contact/{id}
pub async fn delete(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !ContactMessageRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("ContactMessage", id));
    }
    state.publish(
        "contact.deleted",
        "contact_message",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );
    Ok(StatusCode::NO_CONTENT)
}
