//! Route definitions for `/settings` and `/units`.

use axum::routing::get;
use axum::Router;

use crate::handlers::{settings, units};
use crate::state::AppState;

/// Routes mounted at `/settings`.
///
/// ```text
/// GET /  -> get_settings (member)
/// PUT /  -> update_settings (admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route(
        "/",
        get(settings::get_settings).put(settings::update_settings),
    )
}

/// Routes mounted at `/units` (public).
pub fn units_router() -> Router<AppState> {
    Router::new().route("/", get(units::list_units))
}
