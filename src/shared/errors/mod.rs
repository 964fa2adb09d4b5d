// Shared errors
pub mod auth_error;
pub mod tour_error;

pub use auth_error::*;
pub use tour_error::*;

use axum::{http::StatusCode, Json};
use serde_json::json;

/// 에러 응답 본문 생성 ({"error": message})
/// Build the JSON error body shared by every domain error
pub fn error_body(status: StatusCode, message: impl Into<String>) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(json!({ "error": message.into() })))
}
