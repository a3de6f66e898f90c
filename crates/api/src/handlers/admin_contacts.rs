//! Handlers for `/admin/contacts`: the clients and suppliers address book.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};
use galeria_core::crm::{
    history_kind_for, parse_active_filter, validate_category, validate_contact_method,
    validate_rating, validate_type, TOP_CLIENTS_LIMIT, VALID_SORTS,
};
use galeria_core::types::DbId;
use galeria_core::validation::{validate_choice, validate_email, validate_required_text};
use galeria_db::models::admin_contact::{
    AdminContact, AdminContactDetail, AdminContactFilter, AdminContactSummary,
    ContactHistoryEntry, CreateAdminContact, CreateHistoryEntry, GroupCount, TopClient,
    UpdateAdminContact,
};
use galeria_db::repositories::AdminContactRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_NAME_LENGTH: usize = 200;

// ----- Request / response types -----

#[derive(Debug, Deserialize)]
pub struct ContactListParams {
    /// `true` (default), `false` or `all`.
    pub active: Option<String>,
    #[serde(rename = "type")]
    pub contact_type: Option<String>,
    pub category: Option<String>,
    pub favorite: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactTotals {
    pub total: i64,
    pub active: i64,
    pub favorites: i64,
}

#[derive(Debug, Serialize)]
pub struct ContactStats {
    pub by_type: Vec<GroupCount>,
    pub by_category: Vec<GroupCount>,
    pub totals: ContactTotals,
    pub top_clients: Vec<TopClient>,
}

// ----- Handlers -----

/// GET /api/v1/admin/contacts
pub async fn list_contacts(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<ContactListParams>,
) -> AppResult<Json<DataResponse<Vec<AdminContactSummary>>>> {
    if let Some(t) = params.contact_type.as_deref() {
        validate_type(t).map_err(AppError::validation)?;
    }
    if let Some(c) = params.category.as_deref() {
        validate_category(c).map_err(AppError::validation)?;
    }
    if let Some(s) = params.sort.as_deref() {
        validate_choice("sort", s, VALID_SORTS).map_err(AppError::validation)?;
    }

    let filter = AdminContactFilter {
        active: parse_active_filter(params.active.as_deref()),
        contact_type: params.contact_type,
        category: params.category,
        favorite: params.favorite,
        search: params.search.filter(|s| !s.trim().is_empty()),
        sort: params.sort,
    };
    let contacts = AdminContactRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(contacts)))
}

/// GET /api/v1/admin/contacts/stats
pub async fn contact_stats(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ContactStats>>> {
    let (by_type, by_category, (total, active, favorites), top_clients) = tokio::try_join!(
        AdminContactRepo::count_by_type(&state.pool),
        AdminContactRepo::count_by_category(&state.pool),
        AdminContactRepo::totals(&state.pool),
        AdminContactRepo::top_clients(&state.pool, TOP_CLIENTS_LIMIT),
    )?;

    Ok(Json(DataResponse::new(ContactStats {
        by_type,
        by_category,
        totals: ContactTotals {
            total,
            active,
            favorites,
        },
        top_clients,
    })))
}

/// GET /api/v1/admin/contacts/{id}
pub async fn get_contact(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdminContactDetail>>> {
    let contact = AdminContactRepo::find_summary(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AdminContact", id))?;
    let history = AdminContactRepo::history_for(&state.pool, id).await?;
    Ok(Json(DataResponse::new(AdminContactDetail { contact, history })))
}

/// POST /api/v1/admin/contacts
pub async fn create_contact(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAdminContact>,
) -> AppResult<(StatusCode, Json<DataResponse<AdminContact>>)> {
    validate_type(&input.contact_type).map_err(AppError::validation)?;
    validate_required_text("name", &input.name, MAX_NAME_LENGTH).map_err(AppError::validation)?;
    validate_fields(
        input.email.as_deref(),
        input.category.as_deref(),
        input.preferred_contact_method.as_deref(),
        input.supplier_info.as_ref(),
    )?;

    let contact = AdminContactRepo::create(&state.pool, &input, admin.user_id).await?;

    tracing::info!(contact_id = contact.id, contact_type = %contact.contact_type, "Admin contact created");
    state.publish(
        "admin_contact.created",
        "admin_contact",
        contact.id,
        Some(admin.user_id),
        serde_json::json!({ "name": contact.name, "type": contact.contact_type }),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(contact))))
}

/// PUT /api/v1/admin/contacts/{id}
pub async fn update_contact(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAdminContact>,
) -> AppResult<Json<DataResponse<AdminContact>>> {
    if let Some(t) = input.contact_type.as_deref() {
        validate_type(t).map_err(AppError::validation)?;
    }
    if let Some(name) = input.name.as_deref() {
        validate_required_text("name", name, MAX_NAME_LENGTH).map_err(AppError::validation)?;
    }
    validate_fields(
        input.email.as_deref(),
        input.category.as_deref(),
        input.preferred_contact_method.as_deref(),
        input.supplier_info.as_ref(),
    )?;

    let contact = AdminContactRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("AdminContact", id))?;

    tracing::info!(contact_id = id, "Admin contact updated");
    state.publish(
        "admin_contact.updated",
        "admin_contact",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );

    Ok(Json(DataResponse::new(contact)))
}

/// DELETE /api/v1/admin/contacts/{id}
pub async fn delete_contact(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !AdminContactRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("AdminContact", id));
    }
    tracing::info!(contact_id = id, "Admin contact deleted");
    state.publish(
        "admin_contact.deleted",
        "admin_contact",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );
    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/admin/contacts/{id}/favorite
pub async fn toggle_favorite(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdminContact>>> {
    let contact = AdminContactRepo::toggle_favorite(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AdminContact", id))?;
    Ok(Json(DataResponse::new(contact)))
}

/// PATCH /api/v1/admin/contacts/{id}/active
pub async fn toggle_active(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AdminContact>>> {
    let contact = AdminContactRepo::toggle_active(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AdminContact", id))?;
    tracing::info!(contact_id = id, is_active = contact.is_active, "Admin contact toggled");
    Ok(Json(DataResponse::new(contact)))
}

/// POST /api/v1/admin/contacts/{id}/history
///
/// Clients record purchases; suppliers and mixed contacts record supplies.
pub async fn add_history(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateHistoryEntry>,
) -> AppResult<(StatusCode, Json<DataResponse<ContactHistoryEntry>>)> {
    if !input.amount.is_finite() || input.amount < 0.0 {
        return Err(AppError::validation("Amount must be non-negative"));
    }
    let contact = AdminContactRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("AdminContact", id))?;

    let kind = history_kind_for(&contact.contact_type);
    let entry = AdminContactRepo::add_history(&state.pool, id, kind, &input).await?;
    tracing::info!(contact_id = id, kind = kind.as_str(), amount = entry.amount, "History entry added");

    Ok((StatusCode::CREATED, Json(DataResponse::new(entry))))
}

/// DELETE /api/v1/admin/contacts/{id}/history/{history_id}
pub async fn delete_history(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, history_id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if !AdminContactRepo::delete_history(&state.pool, id, history_id).await? {
        return Err(AppError::not_found("ContactHistoryEntry", history_id));
    }
    Ok(StatusCode::NO_CONTENT)
}

// ----- Helpers -----

fn validate_fields(
    email: Option<&str>,
    category: Option<&str>,
    contact_method: Option<&str>,
    supplier_info: Option<&serde_json::Value>,
) -> AppResult<()> {
    if let Some(email) = email.filter(|e| !e.trim().is_empty()) {
        validate_email(email.trim()).map_err(AppError::validation)?;
    }
    if let Some(category) = category {
        validate_category(category).map_err(AppError::validation)?;
    }
    if let Some(method) = contact_method {
        validate_contact_method(method).map_err(AppError::validation)?;
    }
    if let Some(rating) = supplier_info
        .and_then(|info| info.get("rating"))
        .and_then(serde_json::Value::as_i64)
    {
        let rating = i32::try_from(rating).unwrap_or(i32::MAX);
        validate_rating(rating).map_err(AppError::validation)?;
    }
    Ok(())
}
