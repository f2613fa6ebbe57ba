//! Route definitions for the `/baby` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::baby;
use crate::state::AppState;

/// Routes mounted at `/baby`.
///
/// ```text
/// GET    /        -> list_babies
/// POST   /create  -> create_baby
/// GET    /{id}    -> get_baby
/// PUT    /{id}    -> update_baby
/// DELETE /{id}    -> delete_baby (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(baby::list_babies))
        .route("/create", post(baby::create_baby))
        .route(
            "/{id}",
            get(baby::get_baby)
                .put(baby::update_baby)
                .delete(baby::delete_baby),
        )
}
