// src/domains/auth/services/jwt_service.rs
use crate::shared::config::JwtConfig;
use crate::shared::errors::AuthError;
use crate::domains::auth::models::jwt::{Claims, TokenKind};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use sha2::{Sha256, Digest};
use uuid::Uuid;

/// 발급된 토큰 쌍
/// Freshly signed access + refresh token pair
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    /// Access Token 만료 시각 (Unix 초)
    pub expires_at: i64,
}

#[derive(Clone)]
struct SigningKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl SigningKeys {
    fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }
}

/// JWT 서비스 (Token Issuer + Token Validator)
/// Issues and validates both token kinds. Each kind has its own secret and TTL.
#[derive(Clone)]
pub struct JwtService {
    access: SigningKeys,
    refresh: SigningKeys,
}

impl JwtService {
    /// JWT Service 생성
    pub fn new(config: &JwtConfig) -> Self {
        Self {
            access: SigningKeys::new(&config.access_secret, config.access_ttl),
            refresh: SigningKeys::new(&config.refresh_secret, config.refresh_ttl),
        }
    }

    fn keys(&self, kind: TokenKind) -> &SigningKeys {
        match kind {
            TokenKind::Access => &self.access,
            TokenKind::Refresh => &self.refresh,
        }
    }

    /// 토큰 쌍 발급 (현재 시각 기준)
    /// Issue an access + refresh token pair for an identity
    pub fn issue_token_pair(&self, user_id: Uuid, email: &str) -> Result<TokenPair, AuthError> {
        self.issue_token_pair_at(user_id, email, Utc::now())
    }

    pub fn issue_token_pair_at(
        &self,
        user_id: Uuid,
        email: &str,
        now: DateTime<Utc>,
    ) -> Result<TokenPair, AuthError> {
        let access_claims = Claims::new(user_id, email.to_string(), now, self.access.ttl);
        let refresh_claims = Claims::new(user_id, email.to_string(), now, self.refresh.ttl);

        Ok(TokenPair {
            access_token: self.sign(&access_claims, TokenKind::Access)?,
            refresh_token: self.sign(&refresh_claims, TokenKind::Refresh)?,
            expires_at: access_claims.exp,
        })
    }

    fn sign(&self, claims: &Claims, kind: TokenKind) -> Result<String, AuthError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.keys(kind).encoding_key)
            .map_err(|e| AuthError::Configuration(format!("Failed to sign {:?} token: {}", kind, e)))
    }

    /// 토큰 검증 (서명 + 만료)
    /// Verify signature against the kind's secret, then check expiry
    pub fn validate(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        self.validate_at(token, kind, Utc::now())
    }

    pub fn validate_at(
        &self,
        token: &str,
        kind: TokenKind,
        now: DateTime<Utc>,
    ) -> Result<Claims, AuthError> {
        let claims = decode::<Claims>(token, &self.keys(kind).decoding_key, &Self::validation())
            .map_err(|_| AuthError::TokenInvalid)?
            .claims;

        // 만료 비교는 Claims::is_expired_at 한 곳에서만
        if claims.is_expired_at(now) {
            return Err(AuthError::TokenInvalid);
        }
        Ok(claims)
    }

    fn validation() -> Validation {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation
    }

    /// 서명 검증 없이 Claims 읽기 (클라이언트에서 만료 시각 확인용)
    /// Read claims without verifying the signature. Only for client-side expiry checks.
    pub fn peek_claims(token: &str) -> Result<Claims, AuthError> {
        let mut validation = Self::validation();
        validation.insecure_disable_signature_validation();

        decode::<Claims>(token, &DecodingKey::from_secret(&[]), &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::TokenInvalid)
    }

    /// Refresh Token 해싱 (DB 저장용)
    /// Hash Refresh Token (for database storage)
    pub fn hash_refresh_token(token: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}
