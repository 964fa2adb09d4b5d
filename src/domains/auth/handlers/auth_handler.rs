use crate::domains::auth::models::{
    AuthResponse, LoginRequest, LogoutByIdRequest, MessageResponse, SignupRequest, UserResponse,
};
use crate::shared::services::AppState;
use crate::shared::middleware::auth::{AuthenticatedUser, RefreshBearer, ServiceCaller, SessionBearer};
use axum::{extract::State, http::StatusCode, Json};

type ApiError = (StatusCode, Json<serde_json::Value>);

#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created and logged in", body = AuthResponse),
        (status = 400, description = "Invalid signup data"),
        (status = 403, description = "Credentials taken"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn signup(
    State(app_state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), ApiError> {
    // Service 호출 (계정 생성 + 토큰 발급)
    let response = app_state.auth_state.auth_service.signup(request).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// 로그인 핸들러
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 403, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(app_state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = app_state.auth_state.auth_service.login(request).await?;
    Ok(Json(response))
}

/// 토큰 갱신 핸들러 (Authorization: Bearer <refresh token>)
/// Refresh token handler
#[utoipa::path(
    post,
    path = "/auth/refresh",
    responses(
        (status = 200, description = "Token pair rotated", body = AuthResponse),
        (status = 401, description = "Missing, malformed or expired refresh token"),
        (status = 403, description = "Refresh token superseded or revoked"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(app_state): State<AppState>,
    bearer: RefreshBearer,
) -> Result<Json<AuthResponse>, ApiError> {
    let response = app_state
        .auth_state
        .auth_service
        .refresh(&bearer.refresh_token)
        .await?;

    Ok(Json(response))
}

/// 로그아웃 핸들러
/// Logout handler. Accepts an access token or a refresh token whose signature
/// is still valid, so a client whose refresh was rejected can still revoke.
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 401, description = "Invalid token"),
        (status = 404, description = "Identity no longer exists"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(app_state): State<AppState>,
    bearer: SessionBearer,
) -> Result<Json<MessageResponse>, ApiError> {
    tracing::debug!(user_id = %bearer.user_id, kind = ?bearer.kind, "logout requested");
    app_state
        .auth_state
        .auth_service
        .logout(bearer.user_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Logout successfully".to_string(),
    }))
}

/// 관리용 로그아웃 (X-Service-Key 필요)
/// Revoke an identity's session on behalf of another service
#[utoipa::path(
    post,
    path = "/auth/logout-by-id",
    request_body = LogoutByIdRequest,
    params(
        ("X-Service-Key" = String, Header, description = "Shared service key")
    ),
    responses(
        (status = 200, description = "Logout successful", body = MessageResponse),
        (status = 403, description = "Service authentication required"),
        (status = 404, description = "Identity not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Auth"
)]
pub async fn logout_by_id(
    State(app_state): State<AppState>,
    _caller: ServiceCaller,
    Json(request): Json<LogoutByIdRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    app_state
        .auth_state
        .auth_service
        .logout(request.user_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Logout successfully".to_string(),
    }))
}

#[utoipa::path(
    get,
    path = "/auth/me",
    responses(
        (status = 200, description = "User info retrieved successfully", body = UserResponse),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Auth"
)]
pub async fn get_me(
    State(app_state): State<AppState>,
    authenticated_user: AuthenticatedUser,
) -> Result<Json<UserResponse>, ApiError> {
    // Service 호출 (비즈니스 로직)
    let user = app_state
        .auth_state
        .auth_service
        .get_user_info(authenticated_user.user_id)
        .await?;

    Ok(Json(user.into()))
}
