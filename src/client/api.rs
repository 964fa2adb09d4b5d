use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use url::Url;
use uuid::Uuid;
use crate::client::error::ClientError;
use crate::client::session::Session;
use crate::domains::auth::models::{AuthResponse, LoginRequest, LogoutByIdRequest, MessageResponse};
use crate::shared::middleware::auth::SERVICE_KEY_HEADER;

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

// Tour Admin API 클라이언트 (토큰 관리 없음, SessionGuard가 사용)
// Thin HTTP client for the tour admin API; token handling lives in SessionGuard
#[derive(Debug, Clone)]
pub struct ApiClient {
    http_client: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // 클라이언트 생성
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        // 상대 경로 결합을 위해 끝에 '/' 보장
        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let http_client = reqwest::Client::builder()
            .user_agent("tour-admin/1.0")
            .build()?;

        Ok(Self { http_client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// 경로 기반 요청 생성 ("auth/login", "tour/list" 등)
    pub fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        let url = self.base_url.join(path.trim_start_matches('/'))?;
        debug!("{} {}", method, url);
        Ok(self.http_client.request(method, url))
    }

    /// 응답 본문 파싱 (실패 상태는 {"error"} 메시지와 함께 Api 에러로)
    /// Decode a success body, or turn `{"error": ...}` into `ClientError::Api`
    pub async fn read<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&body)
                .map(|b| b.error)
                .unwrap_or(body);
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(response.json::<T>().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session, ClientError> {
        let response = self
            .request(Method::POST, "auth/login")?
            .json(&LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await?;

        let auth: AuthResponse = Self::read(response).await?;
        Ok(Session::from_auth(auth))
    }

    /// Refresh Token으로 새 토큰 쌍 요청
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, ClientError> {
        let response = self
            .request(Method::POST, "auth/refresh")?
            .bearer_auth(refresh_token)
            .send()
            .await?;

        Self::read(response).await
    }

    /// 로그아웃 (Access Token 또는 Refresh Token)
    pub async fn logout(&self, token: &str) -> Result<MessageResponse, ClientError> {
        let response = self
            .request(Method::POST, "auth/logout")?
            .bearer_auth(token)
            .send()
            .await?;

        Self::read(response).await
    }

    /// 관리용 로그아웃 (서비스 키 필요)
    pub async fn logout_by_id(&self, user_id: Uuid, service_key: &str) -> Result<MessageResponse, ClientError> {
        let response = self
            .request(Method::POST, "auth/logout-by-id")?
            .header(SERVICE_KEY_HEADER, service_key)
            .json(&LogoutByIdRequest { user_id })
            .send()
            .await?;

        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_paths_under_base_prefix() {
        let client = ApiClient::new("http://localhost:8000/v1").unwrap();
        let request = client.request(Method::GET, "/tour/list").unwrap().build().unwrap();
        assert_eq!(request.url().as_str(), "http://localhost:8000/v1/tour/list");
    }

    #[test]
    fn rejects_bad_base_url() {
        assert!(matches!(ApiClient::new("not a url"), Err(ClientError::Url(_))));
    }
}
