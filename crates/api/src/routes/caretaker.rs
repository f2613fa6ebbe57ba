//! Route definitions for the `/caretaker` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::caretaker;
use crate::state::AppState;

/// Routes mounted at `/caretaker` (family admins only).
///
/// ```text
/// GET    /      -> list_caretakers
/// POST   /      -> create_caretaker
/// PUT    /{id}  -> update_caretaker
/// DELETE /{id}  -> delete_caretaker
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(caretaker::list_caretakers).post(caretaker::create_caretaker),
        )
        .route(
            "/{id}",
            put(caretaker::update_caretaker).delete(caretaker::delete_caretaker),
        )
}
