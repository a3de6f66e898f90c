//! Handlers for `/digital-art`: print products derived from original artworks.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use galeria_core::artwork::validate_sort;
use galeria_core::digital_art::{
    parse_availability_filter, set_size_availability, validate_product_type, validate_sizes,
};
use galeria_core::types::DbId;
use galeria_core::validation::validate_required_text;
use galeria_db::models::digital_art::{
    CreateDigitalArt, DigitalArt, DigitalArtFilter, DigitalArtWithOriginal, UpdateDigitalArt,
};
use galeria_db::repositories::{ArtworkRepo, DigitalArtRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

const MAX_TITLE_LENGTH: usize = 200;

#[derive(Debug, Deserialize)]
pub struct DigitalArtListParams {
    /// `true` (default), `false` or `all`.
    pub available: Option<String>,
    pub featured: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub available: bool,
}

#[derive(Debug, Deserialize)]
pub struct SizeAvailabilityRequest {
    pub size_index: usize,
    pub available: bool,
}

/// GET /api/v1/digital-art
pub async fn list_digital_art(
    State(state): State<AppState>,
    Query(params): Query<DigitalArtListParams>,
) -> AppResult<Json<DataResponse<Vec<DigitalArtWithOriginal>>>> {
    if let Some(sort) = params.sort.as_deref() {
        validate_sort(sort).map_err(AppError::validation)?;
    }
    let filter = DigitalArtFilter {
        available: parse_availability_filter(params.available.as_deref()),
        featured: params.featured,
        search: params.search.filter(|s| !s.trim().is_empty()),
        sort: params.sort,
    };
    let items = DigitalArtRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(items)))
}

/// GET /api/v1/digital-art/{id}
pub async fn get_digital_art(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DigitalArtWithOriginal>>> {
    DigitalArtRepo::increment_views(&state.pool, id).await?;
    let item = DigitalArtRepo::find_with_original(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("DigitalArt", id))?;
    Ok(Json(DataResponse::new(item)))
}

/// GET /api/v1/digital-art/by-original/{artwork_id}
pub async fn list_by_original(
    State(state): State<AppState>,
    Path(artwork_id): Path<DbId>,
) -> AppResult<Json<DataResponse<Vec<DigitalArt>>>> {
    let items = DigitalArtRepo::list_by_original(&state.pool, artwork_id).await?;
    Ok(Json(DataResponse::new(items)))
}

/// POST /api/v1/digital-art
pub async fn create_digital_art(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreateDigitalArt>,
) -> AppResult<(StatusCode, Json<DataResponse<DigitalArt>>)> {
    validate_required_text("title", &input.title, MAX_TITLE_LENGTH)
        .map_err(AppError::validation)?;
    validate_required_text("image_url", &input.image_url, 2048).map_err(AppError::validation)?;
    if let Some(product_type) = input.product_type.as_deref() {
        validate_product_type(product_type).map_err(AppError::validation)?;
    }
    validate_sizes(&input.sizes).map_err(AppError::validation)?;

    let original = ArtworkRepo::find_by_id(&state.pool, input.original_artwork_id)
        .await?
        .ok_or_else(|| AppError::not_found("Artwork", input.original_artwork_id))?;
    if input.original_title.is_none() {
        input.original_title = Some(original.title);
    }

    let item = DigitalArtRepo::create(&state.pool, &input).await?;

    tracing::info!(
        digital_art_id = item.id,
        original_artwork_id = item.original_artwork_id,
        "Digital art created",
    );
    state.publish(
        "digital_art.created",
        "digital_art",
        item.id,
        Some(admin.user_id),
        serde_json::json!({ "title": item.title }),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(item))))
}

/// PUT /api/v1/digital-art/{id}
pub async fn update_digital_art(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateDigitalArt>,
) -> AppResult<Json<DataResponse<DigitalArt>>> {
    if let Some(title) = input.title.as_deref() {
        validate_required_text("title", title, MAX_TITLE_LENGTH).map_err(AppError::validation)?;
    }
    if let Some(product_type) = input.product_type.as_deref() {
        validate_product_type(product_type).map_err(AppError::validation)?;
    }
    if let Some(sizes) = input.sizes.as_deref() {
        validate_sizes(sizes).map_err(AppError::validation)?;
    }
    if let Some(original_id) = input.original_artwork_id {
        ArtworkRepo::find_by_id(&state.pool, original_id)
            .await?
            .ok_or_else(|| AppError::not_found("Artwork", original_id))?;
    }

    let item = DigitalArtRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("DigitalArt", id))?;

    tracing::info!(digital_art_id = id, "Digital art updated");
    state.publish(
        "digital_art.updated",
        "digital_art",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );

    Ok(Json(DataResponse::new(item)))
}

/// DELETE /api/v1/digital-art/{id}
pub async fn delete_digital_art(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if !DigitalArtRepo::delete(&state.pool, id).await? {
        return Err(AppError::not_found("DigitalArt", id));
    }

    tracing::info!(digital_art_id = id, "Digital art deleted");
    state.publish(
        "digital_art.deleted",
        "digital_art",
        id,
        Some(admin.user_id),
        serde_json::json!({}),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/digital-art/{id}/availability
pub async fn update_availability(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<AvailabilityRequest>,
) -> AppResult<Json<DataResponse<DigitalArt>>> {
    let item = DigitalArtRepo::set_availability(&state.pool, id, input.available)
        .await?
        .ok_or_else(|| AppError::not_found("DigitalArt", id))?;
    tracing::info!(digital_art_id = id, available = input.available, "Availability changed");
    Ok(Json(DataResponse::new(item)))
}

/// PATCH /api/v1/digital-art/{id}/size-availability
pub async fn update_size_availability(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SizeAvailabilityRequest>,
) -> AppResult<Json<DataResponse<DigitalArt>>> {
    let item = DigitalArtRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("DigitalArt", id))?;

    let mut sizes = item.sizes.0;
    if !set_size_availability(&mut sizes, input.size_index, input.available) {
        return Err(AppError::NotFound(format!(
            "Size #{} not found on digital art {id}",
            input.size_index
        )));
    }

    let item = DigitalArtRepo::set_sizes(&state.pool, id, &sizes)
        .await?
        .ok_or_else(|| AppError::not_found("DigitalArt", id))?;
    tracing::info!(
        digital_art_id = id,
        size_index = input.size_index,
        available = input.available,
        "Size availability changed",
    );
    Ok(Json(DataResponse::new(item)))
}
