//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::auth;
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /caretaker    -> caretaker_login
/// POST /sysadmin     -> sysadmin_login
/// POST /setup-token  -> setup_token_login
/// GET  /me           -> me (requires auth)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/caretaker", post(auth::caretaker_login))
        .route("/sysadmin", post(auth::sysadmin_login))
        .route("/setup-token", post(auth::setup_token_login))
        .route("/me", get(auth::me))
}
