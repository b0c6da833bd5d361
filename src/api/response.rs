//! Uniform JSON envelope for every API response.
//!
//! ```json
//! { "success": true, "statusCode": 200, "status": "OK", "message": "...", "data": { ... } }
//! ```

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub status_code: u16,
    pub status: String,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Builds an envelope; `success` is derived from the status code (< 400).
    pub fn new(code: StatusCode, data: Option<T>, message: impl Into<String>) -> Self {
        Self {
            success: code.as_u16() < 400,
            status_code: code.as_u16(),
            status: code.canonical_reason().unwrap_or("Unknown").to_string(),
            message: message.into(),
            data,
        }
    }

    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::OK, Some(data), message)
    }

    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::new(StatusCode::CREATED, Some(data), message)
    }
}

impl ApiResponse<()> {
    /// Envelope without payload (`data: null`).
    pub fn empty(code: StatusCode, message: impl Into<String>) -> Self {
        Self::new(code, None, message)
    }

    pub fn error(code: StatusCode, message: impl Into<String>) -> Self {
        Self::new(code, None, message)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let code =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (code, Json(self)).into_response()
    }
}
