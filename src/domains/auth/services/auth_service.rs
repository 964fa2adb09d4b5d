use std::sync::Arc;
use crate::shared::database::{CredentialStore, StoreError};
use crate::shared::errors::AuthError;
use crate::shared::utils::constant_time_eq;
use crate::domains::auth::models::{
    AuthResponse, LoginRequest, NewUser, SignupRequest, TokenKind, User, UserResponse,
};
use crate::domains::auth::services::{JwtService, TokenPair};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use argon2::password_hash::{rand_core::OsRng, SaltString};
use tracing::{info, warn};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

/// 존재하지 않는 이메일 로그인 시 검증에 쓰는 비밀번호
const DUMMY_PASSWORD: &str = "tour-admin-dummy-password";

// 인증 서비스 (세션 수명주기 컨트롤러)
// AuthService: login / refresh / logout over a single identity's session.
//
// 상태 전이:
// - login:   Anonymous -> Authenticated (hash 저장)
// - refresh: Authenticated/Expired -> Authenticated (hash 교체) 또는 Revoked
// - logout:  any -> Revoked (hash 삭제, 멱등)
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn CredentialStore>,
    jwt_service: JwtService,
    // 알 수 없는 이메일도 같은 argon2 비용을 치르도록 하는 고정 해시
    dummy_hash: Option<Arc<str>>,
}

impl AuthService {
    pub fn new(users: Arc<dyn CredentialStore>, jwt_service: JwtService) -> Self {
        let dummy_hash = match Self::hash_password(DUMMY_PASSWORD) {
            Ok(hash) => Some(Arc::from(hash)),
            Err(e) => {
                warn!("failed to prepare dummy password hash: {}", e);
                None
            }
        };

        Self {
            users,
            jwt_service,
            dummy_hash,
        }
    }

    fn db_error(context: &str, e: anyhow::Error) -> AuthError {
        AuthError::DatabaseError(format!("{}: {:#}", context, e))
    }

    // 회원가입 (가입 직후 로그인 상태로 토큰 발급)
    pub async fn signup(&self, request: SignupRequest) -> Result<AuthResponse, AuthError> {
        Self::validate_signup(&request)?;

        let password_hash = Self::hash_password(&request.password)?;
        let email = request.email.trim().to_string();

        let user = self
            .users
            .create_user(NewUser {
                email: email.clone(),
                password_hash,
                first_name: request.first_name.trim().to_string(),
                last_name: request.last_name.trim().to_string(),
                role: request.role,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(_) => AuthError::DuplicateIdentity { email },
                StoreError::Other(e) => Self::db_error("Failed to create user", e),
            })?;

        info!(user_id = %user.id, role = %user.role, "user signed up");
        self.start_session(&user).await
    }

    // 로그인
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, AuthError> {
        let user = self
            .users
            .find_by_email(request.email.trim())
            .await
            .map_err(|e| Self::db_error("Failed to fetch user", e))?;

        let Some(user) = user else {
            // 응답 시간으로 이메일 존재 여부가 드러나지 않게 검증 1회 수행
            if let Some(dummy_hash) = &self.dummy_hash {
                let _ = Self::verify_password(&request.password, dummy_hash);
            }
            return Err(AuthError::InvalidCredentials);
        };

        if let Err(e) = Self::verify_password(&request.password, &user.password_hash) {
            warn!(user_id = %user.id, "login rejected");
            return Err(e);
        }

        info!(user_id = %user.id, "user logged in");
        self.start_session(&user).await
    }

    /// 토큰 쌍 발급 후 Refresh Token 해시 저장 (이전 토큰은 모두 무효)
    async fn start_session(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let pair = self.jwt_service.issue_token_pair(user.id, &user.email)?;
        let hash = JwtService::hash_refresh_token(&pair.refresh_token);

        let stored = self
            .users
            .set_refresh_hash(user.id, Some(&hash))
            .await
            .map_err(|e| Self::db_error("Failed to store refresh token hash", e))?;
        if !stored {
            return Err(AuthError::IdentityNotFound { id: user.id });
        }

        Ok(Self::response(pair, user))
    }

    /// Refresh Token 검증 및 새 토큰 쌍 발급 (Rotation)
    /// Validate the presented refresh token, compare with the stored hash, rotate.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AuthError> {
        // 1. 서명 + 만료 검증
        let claims = self.jwt_service.validate(refresh_token, TokenKind::Refresh)?;

        // 2. 저장된 해시와 비교
        let user = self
            .users
            .find_by_id(claims.sub)
            .await
            .map_err(|e| Self::db_error("Failed to fetch user", e))?
            .ok_or(AuthError::RefreshRejected)?;

        let stored_hash = user.hashed_rt.clone().ok_or_else(|| {
            warn!(user_id = %user.id, "refresh rejected: no active session");
            AuthError::RefreshRejected
        })?;

        let presented_hash = JwtService::hash_refresh_token(refresh_token);
        if !constant_time_eq(presented_hash.as_bytes(), stored_hash.as_bytes()) {
            warn!(user_id = %user.id, "refresh rejected: token superseded or revoked");
            return Err(AuthError::RefreshRejected);
        }

        // 3. 새 토큰 발급 후 compare-and-set 으로 교체
        // 동시에 같은 토큰으로 refresh 하면 먼저 저장한 쪽만 성공
        let pair = self.jwt_service.issue_token_pair(user.id, &user.email)?;
        let new_hash = JwtService::hash_refresh_token(&pair.refresh_token);

        let rotated = self
            .users
            .swap_refresh_hash(user.id, &stored_hash, &new_hash)
            .await
            .map_err(|e| Self::db_error("Failed to rotate refresh token", e))?;
        if !rotated {
            warn!(user_id = %user.id, "refresh rejected: lost rotation race");
            return Err(AuthError::RefreshRejected);
        }

        info!(user_id = %user.id, "tokens refreshed");
        Ok(Self::response(pair, &user))
    }

    /// 로그아웃 - 저장된 해시 삭제 (멱등)
    /// Logout clears the stored hash unconditionally; repeating it is a no-op.
    pub async fn logout(&self, user_id: Uuid) -> Result<(), AuthError> {
        let found = self
            .users
            .set_refresh_hash(user_id, None)
            .await
            .map_err(|e| Self::db_error("Failed to clear refresh token hash", e))?;

        if !found {
            return Err(AuthError::IdentityNotFound { id: user_id });
        }

        info!(user_id = %user_id, "user logged out");
        Ok(())
    }

    pub async fn get_user_info(&self, user_id: Uuid) -> Result<User, AuthError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(|e| Self::db_error("Failed to fetch user", e))?
            .ok_or(AuthError::IdentityNotFound { id: user_id })
    }

    fn response(pair: TokenPair, user: &User) -> AuthResponse {
        AuthResponse {
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
            expires_at: pair.expires_at,
            identity_summary: UserResponse::from(user),
        }
    }

    fn validate_signup(request: &SignupRequest) -> Result<(), AuthError> {
        let email = request.email.trim();
        let valid_email = match email.split_once('@') {
            Some((local, domain)) => !local.is_empty() && domain.contains('.') && !email.contains(' '),
            None => false,
        };
        if !valid_email {
            return Err(AuthError::Validation("email must be a valid email address".to_string()));
        }
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }
        if request.first_name.trim().is_empty() || request.last_name.trim().is_empty() {
            return Err(AuthError::Validation("firstName and lastName should not be empty".to_string()));
        }
        Ok(())
    }

    fn hash_password(password: &str) -> Result<String, AuthError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AuthError::PasswordHashingFailed(e.to_string()))?
            .to_string();

        Ok(password_hash)
    }

    fn verify_password(password: &str, password_hash: &str) -> Result<(), AuthError> {
        let parsed_hash = PasswordHash::new(password_hash)
            .map_err(|e| AuthError::Internal(format!("Invalid stored password hash: {}", e)))?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| AuthError::InvalidCredentials)
    }
}
