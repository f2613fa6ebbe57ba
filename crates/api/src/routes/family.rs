//! Route definitions for `/family` and the `/setup` wizard.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{family, setup};
use crate::state::AppState;

/// Routes mounted at `/family`.
///
/// ```text
/// GET  /                -> get_current (member)
/// PUT  /                -> update_current (admin)
/// GET  /by-slug/{slug}  -> get_by_slug (public)
/// GET  /check-slug      -> check_slug (public)
/// GET  /list            -> list (sysadmin)
/// PUT  /{id}            -> admin_update (sysadmin)
/// POST /setup-link      -> create_setup_link (sysadmin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(family::get_current).put(family::update_current))
        .route("/by-slug/{slug}", get(family::get_by_slug))
        .route("/check-slug", get(family::check_slug))
        .route("/list", get(family::list))
        .route("/setup-link", post(family::create_setup_link))
        .route("/{id}", put(family::admin_update))
}

/// Routes mounted at `/setup`.
///
/// ```text
/// POST /start  -> start_setup (setup token or account without a family)
/// ```
pub fn setup_router() -> Router<AppState> {
    Router::new().route("/start", post(setup::start_setup))
}
