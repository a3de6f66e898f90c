use axum::routing::{get, post};
use axum::Router;

use crate::handlers::users;
use crate::state::AppState;

/// User account routes mounted at `/users`.
///
/// ```text
/// GET    /                  -> list_users (admin)
/// POST   /change-password   -> change_password
/// GET    /{id}              -> get_user (admin or self)
/// PUT    /{id}              -> update_user (admin or self)
/// DELETE /{id}              -> deactivate_user (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users))
        .route("/change-password", post(users::change_password))
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::deactivate_user),
        )
}
