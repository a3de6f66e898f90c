//! Handlers for `/admin/notes`, including file attachments.

use axum::extract::{Multipart, Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use galeria_core::media::NOTES_FOLDER;
use galeria_core::notes::{
    is_image_mime, validate_attachment, validate_category, validate_related_type,
    MAX_TITLE_LENGTH, URGENT_LIMIT, VALID_SORTS,
};
use galeria_core::tasks::validate_priority;
use galeria_core::types::DbId;
use galeria_core::validation::{validate_choice, validate_required_text};
use galeria_db::models::note::{Attachment, CreateNote, Note, NoteFilter, UpdateNote};
use galeria_db::repositories::NoteRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::destroy_asset;
use crate::integrations::cloudinary::ResourceKind;
use crate::middleware::rbac::RequireAdmin;
use crate::multipart::MultipartForm;
use crate::response::DataResponse;
use crate::state::AppState;

const FALLBACK_MIME: &str = "application/octet-stream";

#[derive(Debug, Deserialize)]
pub struct NoteListParams {
    #[serde(default)]
    pub archived: bool,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub pinned: Option<bool>,
    pub search: Option<String>,
    pub sort: Option<String>,
}

/// GET /api/v1/admin/notes
pub async fn list_notes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<NoteListParams>,
) -> AppResult<Json<DataResponse<Vec<Note>>>> {
    if let Some(c) = params.category.as_deref() {
        validate_category(c).map_err(AppError::validation)?;
    }
    if let Some(p) = params.priority.as_deref() {
        validate_priority(p).map_err(AppError::validation)?;
    }
    if let Some(s) = params.sort.as_deref() {
        validate_choice("sort", s, VALID_SORTS).map_err(AppError::validation)?;
    }
    let filter = NoteFilter {
        archived: params.archived,
        category: params.category,
        priority: params.priority,
        pinned: params.pinned,
        search: params.search.filter(|s| !s.trim().is_empty()),
        sort: params.sort,
    };
    let notes = NoteRepo::list(&state.pool, &filter).await?;
    Ok(Json(DataResponse::new(notes)))
}

/// GET /api/v1/admin/notes/urgent
pub async fn urgent_notes(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<Note>>>> {
    let notes = NoteRepo::list_urgent(&state.pool, URGENT_LIMIT).await?;
    Ok(Json(DataResponse::new(notes)))
}

/// GET /api/v1/admin/notes/{id}
pub async fn get_note(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Note>>> {
    Ok(Json(DataResponse::new(find_note(&state, id).await?)))
}

/// POST /api/v1/admin/notes
pub async fn create_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateNote>,
) -> AppResult<(StatusCode, Json<DataResponse<Note>>)> {
    validate_required_text("title", &input.title, MAX_TITLE_LENGTH)
        .map_err(AppError::validation)?;
    validate_fields(
        input.category.as_deref(),
        input.priority.as_deref(),
        input.related_to.as_ref().map(|r| r.related_type.as_str()),
    )?;

    let note = NoteRepo::create(&state.pool, &input, admin.user_id).await?;

    tracing::info!(note_id = note.id, "Note created");
    state.publish(
        "note.created",
        "note",
        note.id,
        Some(admin.user_id),
        serde_json::json!({ "title": note.title }),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(note))))
}

/// PUT /api/v1/admin/notes/{id}
pub async fn update_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateNote>,
) -> AppResult<Json<DataResponse<Note>>> {
    if let Some(title) = input.title.as_deref() {
        validate_required_text("title", title, MAX_TITLE_LENGTH).map_err(AppError::validation)?;
    }
    validate_fields(
        input.category.as_deref(),
        input.priority.as_deref(),
        input.related_to.as_ref().map(|r| r.related_type.as_str()),
    )?;

    let note = NoteRepo::update(&state.pool, id, &input, admin.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Note", id))?;

    tracing::info!(note_id = id, "Note updated");
    state.publish("note.updated", "note", id, Some(admin.user_id), serde_json::json!({}));

    Ok(Json(DataResponse::new(note)))
}

/// DELETE /api/v1/admin/notes/{id}
///
/// Hosted attachment files are removed along with the note.
pub async fn delete_note(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let note = NoteRepo::delete(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Note", id))?;

    let removals = note
        .attachments
        .iter()
        .map(|a| destroy_asset(&state, &a.public_id, resource_kind(&a.mime_type)));
    futures::future::join_all(removals).await;

    tracing::info!(note_id = id, attachments = note.attachments.len(), "Note deleted");
    state.publish("note.deleted", "note", id, Some(admin.user_id), serde_json::json!({}));

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/admin/notes/{id}/pin
pub async fn toggle_pin(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Note>>> {
    let note = NoteRepo::toggle_pin(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Note", id))?;
    Ok(Json(DataResponse::new(note)))
}

/// PATCH /api/v1/admin/notes/{id}/archive
pub async fn toggle_archive(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Note>>> {
    let note = NoteRepo::toggle_archive(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Note", id))?;
    tracing::info!(note_id = id, archived = note.is_archived, "Note archive toggled");
    Ok(Json(DataResponse::new(note)))
}

/// POST /api/v1/admin/notes/{id}/attachments
///
/// Multipart with a single `file` field.
pub async fn add_attachment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<DataResponse<Note>>)> {
    let note = find_note(&state, id).await?;

    let mut form = MultipartForm::read(multipart).await?;
    let file = form
        .take_file("file")
        .ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    let mime_type = file
        .content_type
        .clone()
        .unwrap_or_else(|| FALLBACK_MIME.to_string());
    let size = file.bytes.len();
    validate_attachment(&mime_type, size).map_err(AppError::validation)?;

    let kind = resource_kind(&mime_type);
    let asset = state
        .media()?
        .upload(file.bytes, &file.filename, NOTES_FOLDER, kind)
        .await?;

    let mut attachments = note.attachments.0;
    attachments.push(Attachment {
        id: uuid::Uuid::now_v7().to_string(),
        filename: file.filename,
        url: asset.secure_url,
        public_id: asset.public_id,
        mime_type,
        size: i64::try_from(size).unwrap_or(i64::MAX),
        uploaded_at: chrono::Utc::now(),
    });

    let note = NoteRepo::set_attachments(&state.pool, id, &attachments, admin.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Note", id))?;
    tracing::info!(note_id = id, size, "Note attachment added");

    Ok((StatusCode::CREATED, Json(DataResponse::new(note))))
}

/// DELETE /api/v1/admin/notes/{id}/attachments/{attachment_id}
pub async fn delete_attachment(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path((id, attachment_id)): Path<(DbId, String)>,
) -> AppResult<Json<DataResponse<Note>>> {
    let note = find_note(&state, id).await?;

    let mut attachments = note.attachments.0;
    let position = attachments
        .iter()
        .position(|a| a.id == attachment_id)
        .ok_or_else(|| {
            AppError::NotFound(format!("Attachment {attachment_id} not found on note {id}"))
        })?;
    let removed = attachments.remove(position);

    let note = NoteRepo::set_attachments(&state.pool, id, &attachments, admin.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Note", id))?;
    destroy_asset(&state, &removed.public_id, resource_kind(&removed.mime_type)).await;
    tracing::info!(note_id = id, attachment_id = %attachment_id, "Note attachment removed");

    Ok(Json(DataResponse::new(note)))
}

// ----- Helpers -----

async fn find_note(state: &AppState, id: DbId) -> AppResult<Note> {
    NoteRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Note", id))
}

fn resource_kind(mime_type: &str) -> ResourceKind {
    if is_image_mime(mime_type) {
        ResourceKind::Image
    } else {
        ResourceKind::Raw
    }
}

fn validate_fields(
    category: Option<&str>,
    priority: Option<&str>,
    related_type: Option<&str>,
) -> AppResult<()> {
    if let Some(c) = category {
        validate_category(c).map_err(AppError::validation)?;
    }
    if let Some(p) = priority {
        validate_priority(p).map_err(AppError::validation)?;
    }
    if let Some(t) = related_type {
        validate_related_type(t).map_err(AppError::validation)?;
    }
    Ok(())
}
