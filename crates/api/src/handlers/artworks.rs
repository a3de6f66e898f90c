//! Handlers for the artwork catalog.
//!
//! Create and update accept either a JSON body or a multipart form carrying
//! an `image` file plus the same JSON under a `data` text field.

use std::collections::HashSet;

use axum::extract::{FromRequest, Multipart, Path, Query, Request, State};
use axum::http::{header, StatusCode};
use axum::Json;
use serde::Deserialize;
use galeria_core::artwork::{
    compute_final_price, validate_category, validate_pricing, validate_sort, validate_year,
    DEFAULT_ARTIST, DEFAULT_CURRENCY, DISCOUNT_PERCENTAGE,
};
use galeria_core::artwork_code::{is_valid_code, next_code_or_fallback};
use galeria_core::media::{extract_public_id, thumbnail_url, ARTWORKS_FOLDER};
use galeria_core::pagination::{clamp_limit, clamp_offset, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT};
use galeria_core::slug::{pick_unique_slug, slugify};
use galeria_core::types::DbId;
use galeria_core::validation::validate_required_text;
use galeria_db::models::artwork::{
    Artwork, ArtworkFilter, CreateArtwork, GalleryImage, UpdateArtwork, UpdateArtworkStatus,
};
use galeria_db::repositories::ArtworkRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::{destroy_asset, upload_image};
use crate::integrations::cloudinary::ResourceKind;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::multipart::{MultipartForm, UploadedFile};
use crate::query::LimitParams;
use crate::response::{DataResponse, Page};
use crate::state::AppState;

const MAX_TITLE_LENGTH: usize = 200;
const FEATURED_LIMIT: i64 = 6;

// ----- Request / response types -----

#[derive(Debug, Deserialize)]
pub struct ArtworkListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub available: Option<bool>,
    pub sort: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Body of create and update. Every field is optional so the same shape
/// serves as a patch; create enforces its required fields itself.
#[derive(Debug, Default, Deserialize)]
pub struct ArtworkInput {
    pub code: Option<String>,
    pub title: Option<String>,
    pub artist: Option<String>,
    pub description: Option<String>,
    pub year: Option<i32>,
    pub technique: Option<String>,
    pub dimensions: Option<String>,
    pub category: Option<String>,
    /// An already hosted image, used when no file is uploaded.
    pub image_url: Option<String>,
    pub image_public_id: Option<String>,
    pub gallery: Option<Vec<GalleryImage>>,
    pub base_price: Option<f64>,
    pub currency: Option<String>,
    pub has_discount: Option<bool>,
    pub discount: Option<f64>,
    pub discount_type: Option<String>,
    pub is_available: Option<bool>,
    pub tags: Option<Vec<String>>,
    pub featured: Option<bool>,
    pub meta_title: Option<String>,
    pub meta_description: Option<String>,
    pub slug: Option<String>,
}

/// Main image columns resolved from an upload or a supplied URL.
struct MainImage {
    url: String,
    public_id: Option<String>,
    thumbnail: String,
}

// ----- Handlers -----

/// GET /api/v1/artworks
pub async fn list_artworks(
    State(state): State<AppState>,
    Query(params): Query<ArtworkListParams>,
) -> AppResult<Json<DataResponse<Page<Artwork>>>> {
    if let Some(sort) = params.sort.as_deref() {
        validate_sort(sort).map_err(AppError::validation)?;
    }

    let filter = ArtworkFilter {
        category: params.category,
        search: params.search.filter(|s| !s.trim().is_empty()),
        available: params.available,
        sort: params.sort,
    };
    let limit = clamp_limit(params.limit, DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);

    let items = ArtworkRepo::list(&state.pool, &filter, limit, offset).await?;
    let total = ArtworkRepo::count(&state.pool, &filter).await?;

    Ok(Json(DataResponse::new(Page {
        items,
        total,
        limit,
        offset,
    })))
}

/// GET /api/v1/artworks/featured
pub async fn list_featured(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<Artwork>>>> {
    let limit = clamp_limit(params.limit, FEATURED_LIMIT, MAX_PAGE_LIMIT);
    let artworks = ArtworkRepo::list_featured(&state.pool, limit).await?;
    Ok(Json(DataResponse::new(artworks)))
}

/// GET /api/v1/artworks/{id}
///
/// Counts as a view.
pub async fn get_artwork(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<Artwork>>> {
    ArtworkRepo::increment_views(&state.pool, id).await?;
    let artwork = ArtworkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Artwork", id))?;
    Ok(Json(DataResponse::new(artwork)))
}

/// GET /api/v1/artworks/slug/{slug}
pub async fn get_artwork_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<Json<DataResponse<Artwork>>> {
    let artwork = ArtworkRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Artwork with slug '{slug}' not found")))?;
    Ok(Json(DataResponse::new(artwork)))
}

/// POST /api/v1/artworks
pub async fn create_artwork(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    request: Request,
) -> AppResult<(StatusCode, Json<DataResponse<Artwork>>)> {
    let (input, file) = read_artwork_body(&state, request).await?;

    let title = input.title.clone().unwrap_or_default();
    validate_required_text("title", &title, MAX_TITLE_LENGTH).map_err(AppError::validation)?;
    let category = input
        .category
        .clone()
        .ok_or_else(|| AppError::validation("category is required"))?;
    validate_category(&category).map_err(AppError::validation)?;
    if let Some(year) = input.year {
        validate_year(year).map_err(AppError::validation)?;
    }

    let base_price = input
        .base_price
        .ok_or_else(|| AppError::validation("base_price is required"))?;
    let has_discount = input.has_discount.unwrap_or(false);
    let discount = input.discount.unwrap_or(0.0);
    let discount_type = input
        .discount_type
        .clone()
        .unwrap_or_else(|| DISCOUNT_PERCENTAGE.to_string());
    validate_pricing(base_price, discount, &discount_type).map_err(AppError::validation)?;

    let code = match input.code.as_deref() {
        Some(code) => {
            if !is_valid_code(code) {
                return Err(AppError::validation(format!(
                    "Invalid artwork code '{code}'. Expected two letters and three digits"
                )));
            }
            code.to_string()
        }
        None => {
            let existing = ArtworkRepo::all_codes(&state.pool).await?;
            next_code_or_fallback(&existing, chrono::Utc::now().timestamp_millis())
        }
    };

    let generated_slug = input.slug.is_none();
    let slug = unique_slug(
        &state,
        input.slug.as_deref().unwrap_or(&title),
        None,
    )
    .await?;

    let (meta_title, meta_description) = if generated_slug {
        (
            input.meta_title.clone().or_else(|| Some(title.clone())),
            input
                .meta_description
                .clone()
                .or_else(|| input.description.clone()),
        )
    } else {
        (input.meta_title.clone(), input.meta_description.clone())
    };

    let image = resolve_main_image(&state, file, &input).await?;

    let create = CreateArtwork {
        code,
        title,
        artist: input
            .artist
            .clone()
            .unwrap_or_else(|| DEFAULT_ARTIST.to_string()),
        description: input.description.clone(),
        year: input.year,
        technique: input.technique.clone(),
        dimensions: input.dimensions.clone(),
        category,
        main_image_url: image.as_ref().map(|i| i.url.clone()),
        main_image_public_id: image.as_ref().and_then(|i| i.public_id.clone()),
        thumbnail_url: image.as_ref().map(|i| i.thumbnail.clone()),
        gallery: input.gallery.clone().unwrap_or_default(),
        base_price,
        currency: input
            .currency
            .clone()
            .unwrap_or_else(|| DEFAULT_CURRENCY.to_string()),
        has_discount,
        discount,
        final_price: compute_final_price(base_price, has_discount, discount, &discount_type),
        discount_type,
        is_available: input.is_available.unwrap_or(true),
        tags: input.tags.clone().unwrap_or_default(),
        featured: input.featured.unwrap_or(false),
        meta_title,
        meta_description,
        slug,
    };

    let artwork = ArtworkRepo::create(&state.pool, &create).await?;

    tracing::info!(artwork_id = artwork.id, code = %artwork.code, "Artwork created");
    state.publish(
        "artwork.created",
        "artwork",
        artwork.id,
        Some(admin.user_id),
        serde_json::json!({ "code": artwork.code, "title": artwork.title }),
    );

    Ok((StatusCode::CREATED, Json(DataResponse::new(artwork))))
}

/// PUT /api/v1/artworks/{id}
pub async fn update_artwork(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    request: Request,
) -> AppResult<Json<DataResponse<Artwork>>> {
    let (input, file) = read_artwork_body(&state, request).await?;

    let existing = ArtworkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Artwork", id))?;

    if let Some(title) = input.title.as_deref() {
        validate_required_text("title", title, MAX_TITLE_LENGTH).map_err(AppError::validation)?;
    }
    if let Some(category) = input.category.as_deref() {
        validate_category(category).map_err(AppError::validation)?;
    }
    if let Some(year) = input.year {
        validate_year(year).map_err(AppError::validation)?;
    }
    if let Some(code) = input.code.as_deref() {
        if !is_valid_code(code) {
            return Err(AppError::validation(format!(
                "Invalid artwork code '{code}'. Expected two letters and three digits"
            )));
        }
    }

    // Pricing is validated and recomputed on the merged values.
    let base_price = input.base_price.unwrap_or(existing.base_price);
    let has_discount = input.has_discount.unwrap_or(existing.has_discount);
    let discount = input.discount.unwrap_or(existing.discount);
    let discount_type = input
        .discount_type
        .clone()
        .unwrap_or_else(|| existing.discount_type.clone());
    validate_pricing(base_price, discount, &discount_type).map_err(AppError::validation)?;

    let title_changed = input
        .title
        .as_deref()
        .is_some_and(|t| t != existing.title);
    let slug = match (input.slug.as_deref(), input.title.as_deref()) {
        (Some(requested), _) => Some(unique_slug(&state, requested, Some(id)).await?),
        (None, Some(title)) if title_changed => Some(unique_slug(&state, title, Some(id)).await?),
        _ => None,
    };

    let image = if file.is_some() || input.image_url.is_some() {
        resolve_main_image(&state, file, &input).await?
    } else {
        None
    };

    let update = UpdateArtwork {
        code: input.code,
        title: input.title,
        artist: input.artist,
        description: input.description,
        year: input.year,
        technique: input.technique,
        dimensions: input.dimensions,
        category: input.category,
        main_image_url: image.as_ref().map(|i| i.url.clone()),
        main_image_public_id: image.as_ref().and_then(|i| i.public_id.clone()),
        thumbnail_url: image.as_ref().map(|i| i.thumbnail.clone()),
        gallery: input.gallery,
        base_price: Some(base_price),
        currency: input.currency,
        has_discount: Some(has_discount),
        discount: Some(discount),
        final_price: Some(compute_final_price(
            base_price,
            has_discount,
            discount,
            &discount_type,
        )),
        discount_type: Some(discount_type),
        tags: input.tags,
        featured: input.featured,
        meta_title: input.meta_title,
        meta_description: input.meta_description,
        slug,
    };

    let artwork = ArtworkRepo::update(&state.pool, id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("Artwork", id))?;

    // The replaced image is removed only after the row points at the new one.
    if let (Some(new), Some(old)) = (image.as_ref(), existing.main_image_public_id.as_deref()) {
        if new.public_id.as_deref() != Some(old) {
            destroy_asset(&state, old, ResourceKind::Image).await;
        }
    }

    tracing::info!(artwork_id = id, "Artwork updated");
    state.publish(
        "artwork.updated",
        "artwork",
        id,
        Some(admin.user_id),
        serde_json::json!({ "code": artwork.code }),
    );

    Ok(Json(DataResponse::new(artwork)))
}

/// DELETE /api/v1/artworks/{id}
///
/// Also removes the main and gallery images from the media host.
pub async fn delete_artwork(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let artwork = ArtworkRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Artwork", id))?;

    let public_ids: Vec<String> = artwork
        .main_image_public_id
        .iter()
        .cloned()
        .chain(artwork.gallery.0.iter().filter_map(|g| g.public_id.clone()))
        .collect();
    futures::future::join_all(
        public_ids
            .iter()
            .map(|public_id| destroy_asset(&state, public_id, ResourceKind::Image)),
    )
    .await;

    ArtworkRepo::delete(&state.pool, id).await?;

    tracing::info!(artwork_id = id, images = public_ids.len(), "Artwork deleted");
    state.publish(
        "artwork.deleted",
        "artwork",
        id,
        Some(admin.user_id),
        serde_json::json!({ "code": artwork.code }),
    );

    Ok(StatusCode::NO_CONTENT)
}

/// PATCH /api/v1/artworks/{id}/status
pub async fn update_artwork_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateArtworkStatus>,
) -> AppResult<Json<DataResponse<Artwork>>> {
    let artwork = ArtworkRepo::update_status(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::not_found("Artwork", id))?;

    tracing::info!(
        artwork_id = id,
        is_available = artwork.is_available,
        is_sold = artwork.is_sold,
        is_reserved = artwork.is_reserved,
        "Artwork status updated",
    );
    state.publish(
        "artwork.status_changed",
        "artwork",
        id,
        Some(admin.user_id),
        serde_json::json!({
            "is_available": artwork.is_available,
            "is_sold": artwork.is_sold,
            "is_reserved": artwork.is_reserved,
        }),
    );

    Ok(Json(DataResponse::new(artwork)))
}

/// POST /api/v1/artworks/{id}/like
pub async fn toggle_like(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<serde_json::Value>>> {
    let artwork = ArtworkRepo::toggle_like(&state.pool, id, auth.user_id)
        .await?
        .ok_or_else(|| AppError::not_found("Artwork", id))?;

    Ok(Json(DataResponse::new(serde_json::json!({
        "liked": artwork.likes.contains(&auth.user_id),
        "likes": artwork.likes.len(),
    }))))
}

// ----- Helpers -----

/// Split a JSON or multipart body into the input and an optional image.
async fn read_artwork_body(
    state: &AppState,
    request: Request,
) -> AppResult<(ArtworkInput, Option<UploadedFile>)> {
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
        let image = form.take_file("image");
        let input = form.json_field::<ArtworkInput>("data")?.unwrap_or_default();
        Ok((input, image))
    } else {
        let Json(input) = Json::<ArtworkInput>::from_request(request, state)
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        Ok((input, None))
    }
}

/// Upload `file` when present, else fall back to `image_url` from the input.
async fn resolve_main_image(
    state: &AppState,
    file: Option<UploadedFile>,
    input: &ArtworkInput,
) -> AppResult<Option<MainImage>> {
    if let Some(file) = file {
        let asset = upload_image(state, file, ARTWORKS_FOLDER).await?;
        return Ok(Some(MainImage {
            thumbnail: thumbnail_url(&asset.secure_url),
            url: asset.secure_url,
            public_id: Some(asset.public_id),
        }));
    }
    Ok(input.image_url.as_deref().map(|url| MainImage {
        url: url.to_string(),
        public_id: input
            .image_public_id
            .clone()
            .or_else(|| extract_public_id(url)),
        thumbnail: thumbnail_url(url),
    }))
}

/// Slugify `source` and make it unique among artworks other than `exclude_id`.
async fn unique_slug(state: &AppState, source: &str, exclude_id: Option<DbId>) -> AppResult<String> {
    let base = slugify(source);
    if base.is_empty() {
        return Err(AppError::validation("Slug must contain letters or digits"));
    }
    let taken: HashSet<String> = ArtworkRepo::slugs_with_prefix(&state.pool, &base, exclude_id)
        .await?
        .into_iter()
        .collect();
    Ok(pick_unique_slug(
        &base,
        &taken,
        chrono::Utc::now().timestamp_millis(),
    ))
}
