use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 토큰 종류 (서로 다른 secret과 TTL 사용)
/// Token kind. Each kind is signed with its own secret and never interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// JWT Claims (토큰에 포함될 데이터)
/// Fixed claim schema checked at decode time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// 사용자 ID
    /// Subject identity id
    pub sub: Uuid,

    /// 이메일
    pub email: String,

    /// 발급 시간 (Unix timestamp, 초)
    /// Issued at (Unix seconds)
    pub iat: i64,

    /// 만료 시간 (Unix timestamp, 초)
    /// Expires at (Unix seconds)
    pub exp: i64,

    /// 토큰 고유 ID (같은 초에 발급된 토큰도 서로 달라짐)
    /// Unique token id, keeps tokens minted in the same second distinct
    pub jti: Uuid,
}

impl Claims {
    /// 새 Claims 생성 (만료 시간 자동 계산)
    /// Create claims valid from `now` for `ttl`
    pub fn new(sub: Uuid, email: String, now: DateTime<Utc>, ttl: Duration) -> Self {
        let iat = now.timestamp();
        Self {
            sub,
            email,
            iat,
            exp: iat + ttl.num_seconds(),
            jti: Uuid::new_v4(),
        }
    }

    /// 만료 여부 판단 (서버/클라이언트 공통, 유일한 만료 비교 지점)
    /// A token is expired once `now` reaches `exp`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}
