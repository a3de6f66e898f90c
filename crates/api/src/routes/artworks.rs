//! Route definitions for the artwork catalog and its print derivatives.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{artworks, digital_art};
use crate::multipart::MAX_UPLOAD_BODY_BYTES;
use crate::state::AppState;

/// Artwork routes mounted at `/artworks`.
///
/// ```text
/// GET    /               -> list_artworks
/// POST   /               -> create_artwork (admin, JSON or multipart)
/// GET    /featured       -> list_featured
/// GET    /slug/{slug}    -> get_artwork_by_slug
/// GET    /{id}           -> get_artwork
/// PUT    /{id}           -> update_artwork (admin, JSON or multipart)
/// DELETE /{id}           -> delete_artwork (admin)
/// PATCH  /{id}/status    -> update_artwork_status (admin)
/// POST   /{id}/like      -> toggle_like (auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(artworks::list_artworks).post(artworks::create_artwork),
        )
        .route("/featured", get(artworks::list_featured))
        .route("/slug/{slug}", get(artworks::get_artwork_by_slug))
        .route(
            "/{id}",
            get(artworks::get_artwork)
                .put(artworks::update_artwork)
                .delete(artworks::delete_artwork),
        )
        .route("/{id}/status", patch(artworks::update_artwork_status))
        .route("/{id}/like", post(artworks::toggle_like))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}

/// Digital art routes mounted at `/digital-art`.
///
/// ```text
/// GET    /                            -> list_digital_art
/// POST   /                            -> create_digital_art (admin)
/// GET    /by-original/{artwork_id}    -> list_by_original
/// GET    /{id}                        -> get_digital_art
/// PUT    /{id}                        -> update_digital_art (admin)
/// DELETE /{id}                        -> delete_digital_art (admin)
/// PATCH  /{id}/availability           -> update_availability (admin)
/// PATCH  /{id}/size-availability      -> update_size_availability (admin)
/// ```
pub fn digital_art_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(digital_art::list_digital_art).post(digital_art::create_digital_art),
        )
        .route(
            "/by-original/{artwork_id}",
            get(digital_art::list_by_original),
        )
        .route(
            "/{id}",
            get(digital_art::get_digital_art)
                .put(digital_art::update_digital_art)
                .delete(digital_art::delete_digital_art),
        )
        .route("/{id}/availability", patch(digital_art::update_availability))
        .route(
            "/{id}/size-availability",
            patch(digital_art::update_size_availability),
        )
}
