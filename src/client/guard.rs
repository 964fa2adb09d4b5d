use chrono::Utc;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use crate::client::api::ApiClient;
use crate::client::error::ClientError;
use crate::client::session::{Session, SessionError, SessionState};

/// 세션 가드
/// Attaches the current access token to every request, refreshes lazily and
/// forces logout once the session cannot be recovered.
///
/// - `current_session`: Access Token 만료 시 refresh 1회 (실패하면 에러 플래그)
/// - `send`: 에러 플래그가 있으면 요청 없이 강제 로그아웃 후 `SessionExpired`
/// - 401 응답: refresh 1회 후 재시도 1회, 그래도 실패하면 강제 로그아웃
pub struct SessionGuard {
    api: ApiClient,
    session: Option<Session>,
}

impl SessionGuard {
    pub fn new(api: ApiClient, session: Option<Session>) -> Self {
        Self { api, session }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn into_session(self) -> Option<Session> {
        self.session
    }

    pub(crate) fn clear_session(&mut self) {
        self.session = None;
    }

    pub fn state(&self) -> SessionState {
        match &self.session {
            Some(session) => session.state_at(Utc::now()),
            None => SessionState::Anonymous,
        }
    }

    /// 로그인 (기존 세션은 교체)
    pub async fn login(&mut self, email: &str, password: &str) -> Result<&Session, ClientError> {
        let session = self.api.login(email, password).await?;
        info!(user_id = %session.user.id, "logged in");
        Ok(self.session.insert(session))
    }

    /// 현재 세션 조회 (만료된 Access Token은 여기서 refresh)
    /// Lazy retrieval: an expired access token triggers exactly one refresh call.
    /// A failed refresh sets the error flag instead of returning an error.
    pub async fn current_session(&mut self) -> Result<&Session, ClientError> {
        let needs_refresh = match &self.session {
            None => return Err(ClientError::NotAuthenticated),
            Some(session) => session.state_at(Utc::now()) == SessionState::RefreshPending,
        };

        if needs_refresh {
            self.refresh_session().await;
        }
        self.session.as_ref().ok_or(ClientError::NotAuthenticated)
    }

    /// refresh 1회 시도. 성공 여부 반환 (재시도 없음)
    async fn refresh_session(&mut self) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        match self.api.refresh(&session.refresh_token).await {
            Ok(auth) => {
                *session = Session::from_auth(auth);
                debug!(user_id = %session.user.id, "session refreshed");
                true
            }
            Err(e) => {
                warn!(user_id = %session.user.id, "refresh failed: {}", e);
                session.error = Some(SessionError::RefreshFailed);
                false
            }
        }
    }

    /// 강제 로그아웃: 서버 세션 폐기 (실패 무시) 후 로컬 세션 삭제
    /// The access token is usually expired here, so revocation goes through
    /// the refresh token. The server accepts it even after it was superseded.
    async fn force_logout(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        if let Err(e) = self.api.logout(&session.refresh_token).await {
            debug!("server-side logout failed during forced logout: {}", e);
        }
        info!(user_id = %session.user.id, "session expired, logged out");
    }

    /// 유효한 Access Token 확보 (에러 플래그면 강제 로그아웃)
    async fn access_token(&mut self) -> Result<String, ClientError> {
        let (flagged, token) = {
            let session = self.current_session().await?;
            (session.error.is_some(), session.access_token.clone())
        };
        if flagged {
            self.force_logout().await;
            return Err(ClientError::SessionExpired);
        }
        Ok(token)
    }

    /// 인증 요청 전송
    /// Send an authenticated request built by `build`. The builder runs again
    /// for the single retry after a 401.
    pub async fn send<T, F>(&mut self, build: F) -> Result<T, ClientError>
    where
        T: DeserializeOwned,
        F: Fn(&ApiClient) -> Result<RequestBuilder, ClientError>,
    {
        let token = self.access_token().await?;
        let response = build(&self.api)?.bearer_auth(&token).send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return ApiClient::read(response).await;
        }

        // 401: refresh 1회 + 재시도 1회
        if !self.refresh_session().await {
            self.force_logout().await;
            return Err(ClientError::SessionExpired);
        }
        let token = self.access_token().await?;
        let response = build(&self.api)?.bearer_auth(&token).send().await?;
        if response.status() == StatusCode::UNAUTHORIZED {
            self.force_logout().await;
            return Err(ClientError::SessionExpired);
        }
        ApiClient::read(response).await
    }
}
