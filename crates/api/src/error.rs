use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use babycontrol_billing::BillingError;
use babycontrol_core::billing::ExpirationInfo;
use babycontrol_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{ "success": false, "error", "code" }`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The family's account has lapsed; the body carries `expirationInfo`.
    #[error("Access expired")]
    Expired(Box<ExpirationInfo>),

    #[error("Billing error: {0}")]
    Billing(#[from] BillingError),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let reason = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field} {reason}")
            })
            .collect::<Vec<_>>()
            .join("; ");
        AppError::Core(CoreError::Validation(message))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Expired(info) => {
                let body = json!({
                    "success": false,
                    "error": "Your family's access has expired",
                    "code": "ACCESS_EXPIRED",
                    "expirationInfo": info,
                });
                return (StatusCode::FORBIDDEN, axum::Json(body)).into_response();
            }

            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Missing(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
                CoreError::Validation(msg) => {
                    (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
                CoreError::Unauthorized(msg) => {
                    (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
                CoreError::Gone(msg) => (StatusCode::GONE, "GONE", msg.clone()),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "INTERNAL_ERROR",
                        "An internal error occurred".to_string(),
                    )
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Billing(BillingError::InvalidId(_)) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                "Invalid payment reference".to_string(),
            ),
            AppError::Billing(err) => {
                tracing::error!(error = %err, "Payment provider error");
                (
                    StatusCode::BAD_GATEWAY,
                    "BILLING_ERROR",
                    "The payment provider request failed".to_string(),
                )
            }
            AppError::ServiceUnavailable(msg) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "SERVICE_UNAVAILABLE",
                msg.clone(),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Classify a sqlx error into an HTTP status, error code, and message.
///
/// - `RowNotFound` maps to 404.
/// - Unique constraint violations (constraint name starting with `uq_`) map to 409.
/// - Everything else maps to 500 with a sanitized message.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    match err {
        sqlx::Error::RowNotFound => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        ),
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique constraint violation: error code 23505
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return (StatusCode::CONFLICT, "CONFLICT", conflict_message(constraint));
                }
            }
            tracing::error!(error = %db_err, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
        other => {
            tracing::error!(error = %other, "Database error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            )
        }
    }
}

/// Human-readable message for known unique constraints.
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_families_slug" => "This URL is already taken".to_string(),
        "uq_accounts_email" => "An account with this email already exists".to_string(),
        "uq_caretakers_family_login_id" => {
            "Login ID is already in use in this family".to_string()
        }
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn gone_maps_to_410() {
        let (status, body) = render(AppError::Core(CoreError::Gone("used".into()))).await;
        assert_eq!(status, StatusCode::GONE);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "GONE");
    }

    #[tokio::test]
    async fn expired_carries_expiration_info() {
        let info = ExpirationInfo {
            kind: "TRIAL_EXPIRED",
            date: None,
            account_id: 3,
            family_slug: Some("smith".into()),
            can_update: true,
        };
        let (status, body) = render(AppError::Expired(Box::new(info))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["expirationInfo"]["type"], "TRIAL_EXPIRED");
        assert_eq!(body["expirationInfo"]["familySlug"], "smith");
        assert_eq!(body["expirationInfo"]["canUpdate"], true);
    }

    #[tokio::test]
    async fn unavailable_maps_to_503() {
        let (status, body) = render(AppError::ServiceUnavailable("off".into())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"], "off");
    }

    #[tokio::test]
    async fn invalid_payment_id_is_a_bad_request() {
        let err = AppError::Billing(BillingError::InvalidId("cs_1/../x".into()));
        let (status, body) = render(err).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid payment reference");
    }

    #[tokio::test]
    async fn internal_message_is_sanitized() {
        let (status, body) = render(AppError::InternalError("secret detail".into())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "An internal error occurred");
    }
}
