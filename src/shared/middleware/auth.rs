use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    Json,
};
use uuid::Uuid;
use crate::domains::auth::models::{Role, TokenKind};
use crate::shared::services::AppState;
use crate::shared::errors::AuthError;
use crate::shared::utils::constant_time_eq;

type Rejection = (StatusCode, Json<serde_json::Value>);

/// 서비스 간 호출용 헤더
pub const SERVICE_KEY_HEADER: &str = "X-Service-Key";

/// "Authorization: Bearer <token>" 에서 토큰 추출
fn bearer_token(parts: &Parts) -> Result<&str, AuthError> {
    let header = parts
        .headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?
        .to_str()
        .map_err(|_| AuthError::TokenInvalid)?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::TokenInvalid)
}

/// 인증된 사용자 정보 (Access Token에서 추출)
/// Authenticated user information (extracted from a valid access token)
///
/// 사용법:
/// ```ignore
/// pub async fn get_me(
///     State(app_state): State<AppState>,
///     authenticated_user: AuthenticatedUser,
/// ) -> Result<...> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state
            .auth_state
            .jwt_service
            .validate(token, TokenKind::Access)?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
            email: claims.email,
        })
    }
}

/// Refresh Token 소지자 (서명/만료만 여기서 확인, 해시 비교는 서비스에서)
/// Raw refresh token taken from the Authorization header
#[derive(Debug, Clone)]
pub struct RefreshBearer {
    pub user_id: Uuid,
    pub refresh_token: String,
}

#[async_trait]
impl FromRequestParts<AppState> for RefreshBearer {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let claims = state
            .auth_state
            .jwt_service
            .validate(token, TokenKind::Refresh)?;

        Ok(RefreshBearer {
            user_id: claims.sub,
            refresh_token: token.to_string(),
        })
    }
}

/// 로그아웃 요청자 (Access Token 또는 서명이 유효한 Refresh Token)
/// Caller allowed to end a session. A refresh token counts even when it has
/// been superseded, so a client holding a rotated-out token can still revoke.
#[derive(Debug, Clone)]
pub struct SessionBearer {
    pub user_id: Uuid,
    pub kind: TokenKind,
}

#[async_trait]
impl FromRequestParts<AppState> for SessionBearer {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let jwt_service = &state.auth_state.jwt_service;

        let (claims, kind) = match jwt_service.validate(token, TokenKind::Access) {
            Ok(claims) => (claims, TokenKind::Access),
            Err(access_err) => match jwt_service.validate(token, TokenKind::Refresh) {
                Ok(claims) => (claims, TokenKind::Refresh),
                Err(_) => return Err(access_err.into()),
            },
        };

        Ok(SessionBearer {
            user_id: claims.sub,
            kind,
        })
    }
}

/// Admin 역할 가드 (역할은 토큰이 아니라 저장소에서 확인)
/// Role gate: the caller must hold a valid access token and the Admin role
#[derive(Debug, Clone)]
pub struct AdminUser {
    pub user_id: Uuid,
    pub email: String,
}

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let authenticated = AuthenticatedUser::from_request_parts(parts, state).await?;
        let user = state
            .auth_state
            .auth_service
            .get_user_info(authenticated.user_id)
            .await?;

        if user.role != Role::Admin {
            return Err(AuthError::Forbidden("Access denied!".to_string()).into());
        }

        Ok(AdminUser {
            user_id: user.id,
            email: user.email,
        })
    }
}

/// 서비스 간 인증 (X-Service-Key == SERVICE_API_KEY)
/// Service-to-service caller; refused outright when no key is configured
#[derive(Debug, Clone)]
pub struct ServiceCaller;

#[async_trait]
impl FromRequestParts<AppState> for ServiceCaller {
    type Rejection = Rejection;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let denied = || AuthError::Forbidden("Service authentication required".to_string());

        let expected = state.auth_state.service_api_key.as_deref().ok_or_else(denied)?;
        let presented = parts
            .headers
            .get(SERVICE_KEY_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(denied)?;

        if !constant_time_eq(presented.as_bytes(), expected.as_bytes()) {
            tracing::warn!("logout-by-id rejected: bad service key");
            return Err(denied().into());
        }
        Ok(ServiceCaller)
    }
}
