use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;
use crate::domains::auth::models::user::{NewUser, User};
use crate::shared::database::repositories::StoreError;

/// Credential Store 인터페이스
/// Keyed record store for identities and their current refresh-token hash.
///
/// 구현체:
/// - `UserRepository`: PostgreSQL
/// - `InMemoryUserRepository`: 개발/테스트용
///
/// 모든 갱신은 행 단위로 원자적이어야 함 (per-row atomic updates).
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// 사용자 생성. 이메일 중복 시 `StoreError::Duplicate`
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Refresh Token 해시를 무조건 덮어씀 (login/logout)
    /// Returns false when no row exists for `id`.
    async fn set_refresh_hash(&self, id: Uuid, hash: Option<&str>) -> Result<bool>;

    /// 저장된 해시가 `expected`일 때만 `new`로 교체 (refresh rotation)
    /// Compare-and-set; returns false when the stored hash no longer matches.
    async fn swap_refresh_hash(&self, id: Uuid, expected: &str, new: &str) -> Result<bool>;
}
