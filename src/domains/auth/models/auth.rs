use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use crate::domains::auth::models::user::{Role, UserResponse};

// 회원가입 요청 모델
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = SignupRequest)]
pub struct SignupRequest {
    /// Email address
    /// 이메일 주소
    #[schema(example = "a@x.com")]
    pub email: String,

    /// Password (will be hashed)
    /// 비밀번호 (해싱됨)
    #[schema(example = "pw123456")]
    pub password: String,

    #[schema(example = "A")]
    pub first_name: String,

    #[schema(example = "B")]
    pub last_name: String,

    pub role: Role,
}

// 로그인 요청 모델
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = LoginRequest)]
pub struct LoginRequest {
    /// Email address
    /// 이메일 주소
    #[schema(example = "a@x.com")]
    pub email: String,

    /// Password
    /// 비밀번호
    #[schema(example = "pw123456")]
    pub password: String,
}

/// 토큰 쌍 + 사용자 요약 (signup/login/refresh 공통 응답)
/// Token pair and identity summary returned by signup, login and refresh
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = AuthResponse)]
pub struct AuthResponse {
    /// JWT Access Token (짧은 수명)
    /// JWT Access Token (short lifetime)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub access_token: String,

    /// JWT Refresh Token (긴 수명, 해시만 DB에 저장)
    /// JWT Refresh Token (long lifetime, only its hash is stored)
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub refresh_token: String,

    /// Access Token 만료 시각 (Unix timestamp, 초)
    /// Access token expiry (Unix seconds)
    #[schema(example = 1700003600)]
    pub expires_at: i64,

    pub identity_summary: UserResponse,
}

/// 관리용 로그아웃 요청 (서비스 키 필요)
/// Administrative logout request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = LogoutByIdRequest)]
pub struct LogoutByIdRequest {
    pub user_id: Uuid,
}

/// 단순 메시지 응답
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(as = MessageResponse)]
pub struct MessageResponse {
    #[schema(example = "Logout successfully")]
    pub message: String,
}
