//! Route definitions for public site content and visitor intake.

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, patch, post};
use axum::Router;

use crate::handlers::{contact, newsletter, site_info, stats, upload};
use crate::multipart::MAX_UPLOAD_BODY_BYTES;
use crate::state::AppState;

/// Site content routes mounted at `/siteinfo`.
///
/// ```text
/// GET /                 -> get_site_info
/// PUT /                 -> update_site_info (admin, JSON or multipart)
/// GET /biography        -> get_biography
/// GET /contact          -> get_contact
/// GET /legal            -> get_legal
/// GET /legal/privacy    -> get_privacy
/// PUT /legal/privacy    -> update_privacy (admin)
/// GET /legal/terms      -> get_terms
/// PUT /legal/terms      -> update_terms (admin)
/// ```
pub fn site_info_router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(site_info::get_site_info).put(site_info::update_site_info),
        )
        .route("/biography", get(site_info::get_biography))
        .route("/contact", get(site_info::get_contact))
        .route("/legal", get(site_info::get_legal))
        .route(
            "/legal/privacy",
            get(site_info::get_privacy).put(site_info::update_privacy),
        )
        .route(
            "/legal/terms",
            get(site_info::get_terms).put(site_info::update_terms),
        )
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}

/// Contact form routes mounted at `/contact`.
///
/// ```text
/// POST   /              -> submit (public)
/// GET    /              -> list (admin)
/// GET    /{id}          -> get (admin, marks read)
/// DELETE /{id}          -> delete (admin)
/// PATCH  /{id}/status   -> update_status (admin)
/// ```
pub fn contact_router() -> Router<AppState> {
    Router::new()
        .route("/", get(contact::list).post(contact::submit))
        .route("/{id}", get(contact::get).delete(contact::delete))
        .route("/{id}/status", patch(contact::update_status))
}

/// Newsletter routes mounted at `/newsletter`.
///
/// ```text
/// POST   /subscribe               -> subscribe
/// DELETE /unsubscribe/{email}     -> unsubscribe
/// GET    /subscribers             -> list_subscribers (admin)
/// ```
pub fn newsletter_router() -> Router<AppState> {
    Router::new()
        .route("/subscribe", post(newsletter::subscribe))
        .route("/unsubscribe/{email}", delete(newsletter::unsubscribe))
        .route("/subscribers", get(newsletter::list_subscribers))
}

/// Dashboard statistics mounted at `/stats` (admin).
///
/// ```text
/// GET /dashboard   -> dashboard
/// GET /sales       -> sales
/// GET /artworks    -> artworks
/// ```
pub fn stats_router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(stats::dashboard))
        .route("/sales", get(stats::sales))
        .route("/artworks", get(stats::artworks))
}

/// Direct image upload routes mounted at `/upload` (admin).
///
/// ```text
/// POST   /image                -> upload
/// DELETE /image/{*public_id}   -> delete
/// ```
pub fn upload_router() -> Router<AppState> {
    Router::new()
        .route("/image", post(upload::upload))
        .route("/image/{*public_id}", delete(upload::delete))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BODY_BYTES))
}
