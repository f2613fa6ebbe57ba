//! Bearer-token authentication extractor.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use babycontrol_core::error::CoreError;

use crate::auth::jwt::{validate_token, Principal};
use crate::error::AppError;
use crate::state::AppState;

/// Any caller holding a valid token.
///
/// ```ignore
/// async fn me(Identity(principal): Identity) -> AppResult<Json<Principal>> {
///     Ok(Json(principal))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Identity(pub Principal);

impl FromRequestParts<AppState> for Identity {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let principal = claims.principal().ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized("Malformed token claims".into()))
        })?;

        Ok(Identity(principal))
    }
}
