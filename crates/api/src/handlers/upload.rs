//! Handlers for `/upload`: direct image uploads for the admin panel.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use galeria_core::media::{thumbnail_url, ARTWORKS_FOLDER};

use crate::error::{AppError, AppResult};
use crate::handlers::upload_image;
use crate::integrations::cloudinary::ResourceKind;
use crate::middleware::rbac::RequireAdmin;
use crate::multipart::MultipartForm;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub url: String,
    pub public_id: String,
    pub thumbnail_url: String,
}

/// POST /api/v1/upload/image
pub async fn upload(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<UploadResponse>>)> {
    let mut form = MultipartForm::read(multipart).await?;
    let file = form
        .take_file("image")
        .ok_or_else(|| AppError::BadRequest("Missing 'image' file field".into()))?;

    let asset = upload_image(&state, file, ARTWORKS_FOLDER).await?;

    Ok((
        StatusCode::CREATED,
        Json(DataResponse::new(UploadResponse {
            thumbnail_url: thumbnail_url(&asset.secure_url),
            url: asset.secure_url,
            public_id: asset.public_id,
        })),
    ))
}

/// DELETE /api/v1/upload/image/{*public_id}
///
/// Public ids contain the folder (`artworks/abc`), hence the wildcard.
pub async fn delete(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(public_id): Path<String>,
) -> AppResult<StatusCode> {
    let public_id = public_id.trim_start_matches('/');
    if public_id.is_empty() {
        return Err(AppError::BadRequest("public_id is required".into()));
    }
    state.media()?.destroy(public_id, ResourceKind::Image).await?;
    tracing::info!(public_id, "Image deleted");
    Ok(StatusCode::NO_CONTENT)
}
