use std::path::Path;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use crate::client::error::ClientError;
use crate::domains::auth::models::{AuthResponse, UserResponse};
use crate::domains::auth::services::JwtService;

/// 세션 에러 플래그 (서버측 refresh 실패)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionError {
    RefreshFailed,
}

/// 클라이언트 세션 상태
/// Client view of the session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Anonymous,
    Authenticated,
    /// Access Token 만료, 다음 요청 전에 refresh 필요
    RefreshPending,
    Revoked,
}

/// 로그인 세션 (파일로 저장 가능)
/// Login session: current token pair, identity summary and the error flag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_at: i64,
    pub user: UserResponse,
    #[serde(default)]
    pub error: Option<SessionError>,
}

impl Session {
    pub fn from_auth(response: AuthResponse) -> Self {
        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at: response.expires_at,
            user: response.identity_summary,
            error: None,
        }
    }

    /// Access Token에 포함된 exp 기준 만료 여부 (읽을 수 없는 토큰은 만료로 취급)
    pub fn access_expired_at(&self, now: DateTime<Utc>) -> bool {
        match JwtService::peek_claims(&self.access_token) {
            Ok(claims) => claims.is_expired_at(now),
            Err(_) => true,
        }
    }

    pub fn state_at(&self, now: DateTime<Utc>) -> SessionState {
        if self.error.is_some() {
            SessionState::Revoked
        } else if self.access_expired_at(now) {
            SessionState::RefreshPending
        } else {
            SessionState::Authenticated
        }
    }
}

/// 세션 파일 로드 (없으면 None)
/// Load a session saved by `save_session_file`
pub fn load_session_file(path: &Path) -> Result<Option<Session>, ClientError> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = std::fs::read_to_string(path)?;
    Ok(Some(serde_json::from_str(&raw)?))
}

/// 세션 파일 저장 (세션이 없으면 파일 삭제)
/// refresh 로 토큰이 바뀔 수 있으므로 매 명령 후 호출
pub fn save_session_file(path: &Path, session: Option<&Session>) -> Result<(), ClientError> {
    match session {
        Some(session) => std::fs::write(path, serde_json::to_string_pretty(session)?)?,
        None if path.exists() => std::fs::remove_file(path)?,
        None => {}
    }
    Ok(())
}
