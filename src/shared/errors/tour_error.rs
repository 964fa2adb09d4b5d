use thiserror::Error;
use axum::{http::StatusCode, Json};
use uuid::Uuid;
use crate::shared::errors::error_body;

/// 투어 관련 에러
/// Tour-related errors
#[derive(Error, Debug)]
pub enum TourError {
    #[error("Tour not found: id={id}")]
    NotFound { id: Uuid },

    /// 이미지 누락
    #[error("No file uploaded")]
    MissingImage,

    #[error("{0}")]
    Validation(String),

    /// 외부 미디어 호스트 실패
    /// Media host upload/delete failed
    #[error("Upload image failed: {0}")]
    Media(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<TourError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: TourError) -> Self {
        let status = match &err {
            TourError::NotFound { .. } => StatusCode::NOT_FOUND,
            TourError::MissingImage | TourError::Validation(_) => StatusCode::BAD_REQUEST,
            TourError::Media(_) => StatusCode::BAD_GATEWAY,
            TourError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!("tour request failed: {}", err);
        }
        match err {
            TourError::DatabaseError(_) => error_body(status, "Internal server error"),
            other => error_body(status, other.to_string()),
        }
    }
}
