use thiserror::Error;

/// 클라이언트 에러
/// Errors surfaced to dashboard callers
#[derive(Error, Debug)]
pub enum ClientError {
    /// 세션 복구 불가 (다시 로그인 필요)
    /// The session could not be recovered; the caller must log in again
    #[error("Session expired, please log in again")]
    SessionExpired,

    #[error("Not logged in")]
    NotAuthenticated,

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("{0}")]
    Validation(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Session file error: {0}")]
    SessionFile(#[from] serde_json::Error),
}

impl ClientError {
    /// API 에러의 HTTP 상태 코드
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
