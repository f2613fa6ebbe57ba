//! Shared response envelope for API handlers.
//!
//! Successful responses use `{ "success": true, "data": ... }`; errors are
//! rendered by [`crate::error::AppError`] with `success: false`.

use axum::Json;
use serde::Serialize;

/// Standard `{ "success": true, "data": T }` response envelope.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

/// Wrap `data` in a successful envelope.
pub fn ok<T: Serialize>(data: T) -> Json<DataResponse<T>> {
    Json(DataResponse {
        success: true,
        data,
    })
}

/// Payload for endpoints that only acknowledge an action.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn message(text: impl Into<String>) -> Json<DataResponse<MessageResponse>> {
    ok(MessageResponse {
        message: text.into(),
    })
}
