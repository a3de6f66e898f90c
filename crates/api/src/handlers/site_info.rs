//! Handlers for `/siteinfo`: biography, contact details and legal pages.
//!
//! Updates are JSON merge patches applied to the stored documents, then
//! re-parsed into the typed sections so defaults and validation hold.

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use galeria_core::media::SITE_FOLDER;
use galeria_core::site_info::{
    merge_patch, validate_biography, validate_contact, Biography, ContactInfo, LegalPage,
    LegalPages, MAX_BIOGRAPHY_LENGTH, SYSTEM_UPDATER,
};
use galeria_core::types::{DbId, Timestamp};
use galeria_core::validation::validate_required_text;
use galeria_db::models::site_info::SiteInfoRow;
use galeria_db::repositories::{SiteInfoRepo, UserRepo};

use crate::error::{AppError, AppResult};
use crate::handlers::{destroy_asset, upload_image};
use crate::integrations::cloudinary::ResourceKind;
use crate::middleware::rbac::RequireAdmin;
use crate::multipart::{MultipartForm, UploadedFile};
use crate::response::DataResponse;
use crate::state::AppState;

// ----- Request / response types -----

#[derive(Debug, Clone, Serialize)]
pub struct SiteInfo {
    pub biography: Biography,
    pub contact: ContactInfo,
    pub legal_pages: LegalPages,
    pub last_updated: Timestamp,
    pub updated_by: String,
}

/// Partial update; each present section is merged into the stored one.
#[derive(Debug, Default, Deserialize)]
pub struct SiteInfoPatch {
    pub biography: Option<Value>,
    pub contact: Option<Value>,
    pub legal_pages: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct LegalPageRequest {
    pub title: Option<String>,
    pub content: String,
}

#[derive(Clone, Copy)]
enum LegalKind {
    Privacy,
    Terms,
}

// ----- Handlers -----

/// GET /api/v1/siteinfo
pub async fn get_site_info(State(state): State<AppState>) -> AppResult<Json<DataResponse<SiteInfo>>> {
    Ok(Json(DataResponse::new(load(&state).await?)))
}

/// GET /api/v1/siteinfo/biography
pub async fn get_biography(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Biography>>> {
    Ok(Json(DataResponse::new(load(&state).await?.biography)))
}

/// GET /api/v1/siteinfo/contact
pub async fn get_contact(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ContactInfo>>> {
    Ok(Json(DataResponse::new(load(&state).await?.contact)))
}

/// GET /api/v1/siteinfo/legal
pub async fn get_legal(State(state): State<AppState>) -> AppResult<Json<DataResponse<LegalPages>>> {
    Ok(Json(DataResponse::new(load(&state).await?.legal_pages)))
}

/// GET /api/v1/siteinfo/legal/privacy
pub async fn get_privacy(
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<LegalPage>>> {
    Ok(Json(DataResponse::new(load(&state).await?.legal_pages.privacy_policy)))
}

/// GET /api/v1/siteinfo/legal/terms
pub async fn get_terms(State(state): State<AppState>) -> AppResult<Json<DataResponse<LegalPage>>> {
    Ok(Json(DataResponse::new(
        load(&state).await?.legal_pages.terms_and_conditions,
    )))
}

/// PUT /api/v1/siteinfo
///
/// Accepts JSON, or multipart with a `data` JSON field and an optional
/// `profile_image` file that replaces the current profile picture.
pub async fn update_site_info(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    request: Request,
) -> AppResult<Json<DataResponse<SiteInfo>>> {
    let (patch, profile_image) = read_patch(&state, request).await?;
    let row = current_row(&state).await?;

    let mut biography = row.biography;
    let mut contact = row.contact;
    let mut legal_pages = row.legal_pages;
    if let Some(p) = &patch.biography {
        merge_patch(&mut biography, p);
    }
    if let Some(p) = &patch.contact {
        merge_patch(&mut contact, p);
    }
    if let Some(p) = &patch.legal_pages {
        merge_patch(&mut legal_pages, p);
    }

    let mut biography: Biography = parse_section("biography", biography)?;
    let contact: ContactInfo = parse_section("contact", contact)?;
    let legal_pages: LegalPages = parse_section("legal_pages", legal_pages)?;
    validate_biography(&biography).map_err(AppError::validation)?;
    validate_contact(&contact).map_err(AppError::validation)?;

    let mut replaced_image = None;
    if let Some(file) = profile_image {
        let asset = upload_image(&state, file, SITE_FOLDER).await?;
        replaced_image = biography.profile_image.public_id.take();
        biography.profile_image.url = Some(asset.secure_url);
        biography.profile_image.public_id = Some(asset.public_id);
    }

    let saved = save(&state, admin.user_id, &biography, &contact, &legal_pages).await?;

    if let Some(old) = replaced_image {
        destroy_asset(&state, &old, ResourceKind::Image).await;
    }

    tracing::info!(user_id = admin.user_id, "Site info updated");
    state.publish(
        "site_info.updated",
        "site_info",
        1,
        Some(admin.user_id),
        serde_json::json!({
            "biography": patch.biography.is_some(),
            "contact": patch.contact.is_some(),
            "legal_pages": patch.legal_pages.is_some(),
        }),
    );

    Ok(Json(DataResponse::new(saved)))
}

/// PUT /api/v1/siteinfo/legal/privacy
pub async fn update_privacy(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<LegalPageRequest>,
) -> AppResult<Json<DataResponse<LegalPage>>> {
    update_legal(&state, admin.user_id, LegalKind::Privacy, input).await
}

/// PUT /api/v1/siteinfo/legal/terms
pub async fn update_terms(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<LegalPageRequest>,
) -> AppResult<Json<DataResponse<LegalPage>>> {
    update_legal(&state, admin.user_id, LegalKind::Terms, input).await
}

// ----- Helpers -----

async fn update_legal(
    state: &AppState,
    user_id: DbId,
    kind: LegalKind,
    input: LegalPageRequest,
) -> AppResult<Json<DataResponse<LegalPage>>> {
    validate_required_text("content", &input.content, MAX_BIOGRAPHY_LENGTH * 20)
        .map_err(AppError::validation)?;
    let mut info = load(state).await?;

    let page = match kind {
        LegalKind::Privacy => &mut info.legal_pages.privacy_policy,
        LegalKind::Terms => &mut info.legal_pages.terms_and_conditions,
    };
    if let Some(title) = input.title.filter(|t| !t.trim().is_empty()) {
        page.title = title;
    }
    page.content = input.content;
    page.last_updated = Some(chrono::Utc::now());
    let page = page.clone();

    save(state, user_id, &info.biography, &info.contact, &info.legal_pages).await?;

    let section = match kind {
        LegalKind::Privacy => "privacy_policy",
        LegalKind::Terms => "terms_and_conditions",
    };
    tracing::info!(user_id, section, "Legal page updated");
    state.publish(
        "site_info.updated",
        "site_info",
        1,
        Some(user_id),
        serde_json::json!({ "legal_page": section }),
    );

    Ok(Json(DataResponse::new(page)))
}

/// Fetch the singleton row, creating it with default sections on first use.
async fn current_row(state: &AppState) -> AppResult<SiteInfoRow> {
    let row = SiteInfoRepo::get_or_create(
        &state.pool,
        &to_value(&Biography::default())?,
        &to_value(&ContactInfo::default())?,
        &to_value(&LegalPages::default())?,
    )
    .await?;
    Ok(row)
}

async fn load(state: &AppState) -> AppResult<SiteInfo> {
    to_site_info(current_row(state).await?)
}

async fn save(
    state: &AppState,
    user_id: DbId,
    biography: &Biography,
    contact: &ContactInfo,
    legal_pages: &LegalPages,
) -> AppResult<SiteInfo> {
    let updated_by = UserRepo::find_by_id(&state.pool, user_id)
        .await?
        .map(|u| u.name)
        .unwrap_or_else(|| SYSTEM_UPDATER.to_string());

    let row = SiteInfoRepo::save(
        &state.pool,
        &to_value(biography)?,
        &to_value(contact)?,
        &to_value(legal_pages)?,
        &updated_by,
    )
    .await?;
    to_site_info(row)
}

fn to_site_info(row: SiteInfoRow) -> AppResult<SiteInfo> {
    Ok(SiteInfo {
        biography: parse_section("biography", row.biography)?,
        contact: parse_section("contact", row.contact)?,
        legal_pages: parse_section("legal_pages", row.legal_pages)?,
        last_updated: row.last_updated,
        updated_by: row.updated_by,
    })
}

fn parse_section<T: serde::de::DeserializeOwned>(name: &str, value: Value) -> AppResult<T> {
    serde_json::from_value(value).map_err(|e| AppError::validation(format!("Invalid {name}: {e}")))
}

fn to_value<T: Serialize>(section: &T) -> AppResult<Value> {
    serde_json::to_value(section).map_err(|e| AppError::InternalError(e.to_string()))
}

async fn read_patch(
    state: &AppState,
    request: Request,
) -> AppResult<(SiteInfoPatch, Option<UploadedFile>)> {
    let is_multipart = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("multipart/form-data"));

    if is_multipart {
        let multipart = Multipart::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let mut form = MultipartForm::read(multipart).await?;
        let image = form.take_file("profile_image");
        let patch = form.json_field::<SiteInfoPatch>("data")?.unwrap_or_default();
        Ok((patch, image))
    } else {
        let Json(patch) = Json::<SiteInfoPatch>::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok((patch, None))
    }
}
