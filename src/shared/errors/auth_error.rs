use thiserror::Error;
use axum::{http::StatusCode, Json};
use uuid::Uuid;
use crate::shared::errors::error_body;

/// 인증 관련 에러
/// Authentication-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    /// 이메일이 이미 존재함
    /// Email already registered
    #[error("Credentials taken")]
    DuplicateIdentity { email: String },

    /// 잘못된 이메일 또는 비밀번호 (어느 쪽인지 노출하지 않음)
    /// Invalid email or password; never says which
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// 잘못된 또는 만료된 토큰
    /// Malformed, expired or badly signed token
    #[error("Invalid or expired token")]
    TokenInvalid,

    /// 토큰이 제공되지 않음
    /// Token not provided
    #[error("Token not provided")]
    MissingToken,

    /// 서명은 유효하지만 저장된 해시와 불일치 (재사용/로그아웃된 토큰)
    /// Valid signature but stale or revoked refresh token
    #[error("Refresh Token not matched! Access denied")]
    RefreshRejected,

    /// 사용자를 찾을 수 없음
    #[error("User not found: id={id}")]
    IdentityNotFound { id: Uuid },

    /// 권한 없음 (역할/서비스 키)
    #[error("{0}")]
    Forbidden(String),

    /// 입력값 검증 실패
    #[error("{0}")]
    Validation(String),

    /// 비밀번호 해싱 실패
    #[error("Failed to hash password: {0}")]
    PasswordHashingFailed(String),

    /// 데이터베이스 에러
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// 서명 설정 에러
    /// Signing misconfiguration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// 내부 서버 에러
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::DuplicateIdentity { .. }
            | AuthError::InvalidCredentials
            | AuthError::RefreshRejected
            | AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::TokenInvalid | AuthError::MissingToken => StatusCode::UNAUTHORIZED,
            AuthError::IdentityNotFound { .. } => StatusCode::NOT_FOUND,
            AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::PasswordHashingFailed(_)
            | AuthError::DatabaseError(_)
            | AuthError::Configuration(_)
            | AuthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// AuthError를 HTTP 응답으로 변환
/// 500 계열은 상세 내용을 로그에만 남김
impl From<AuthError> for (StatusCode, Json<serde_json::Value>) {
    fn from(err: AuthError) -> Self {
        let status = err.status();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("auth request failed: {}", err);
            return error_body(status, "Internal server error");
        }
        error_body(status, err.to_string())
    }
}
