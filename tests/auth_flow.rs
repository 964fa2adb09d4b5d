// =====================================================
// 세션 수명주기 통합 테스트 (login / refresh / logout)
// =====================================================

mod common;
use common::*;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::Barrier;
use tour_admin::domains::auth::models::{LoginRequest, NewUser, Role, TokenKind, User};
use tour_admin::domains::auth::services::{AuthService, JwtService};
use tour_admin::shared::database::{CredentialStore, InMemoryUserRepository, StoreError};
use tour_admin::shared::errors::AuthError;
use uuid::Uuid;

fn login(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: email.to_string(),
        password: password.to_string(),
    }
}

/// 가입 직후 로그인 성공, 토큰의 sub 는 같은 identity
#[tokio::test]
async fn test_login_after_signup_yields_same_identity() {
    let (auth, _) = auth_service();
    let jwt = jwt_service(Duration::minutes(5));

    let signed_up = auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();
    let logged_in = auth.login(login("a@x.com", PASSWORD)).await.unwrap();

    let access = jwt.validate(&logged_in.access_token, TokenKind::Access).unwrap();
    let refresh = jwt.validate(&logged_in.refresh_token, TokenKind::Refresh).unwrap();
    assert_eq!(access.sub, signed_up.identity_summary.id);
    assert_eq!(refresh.sub, signed_up.identity_summary.id);
    assert_eq!(logged_in.expires_at, access.exp);
    assert_eq!(logged_in.identity_summary.email, "a@x.com");
}

/// 시나리오: refresh -> 이전 토큰 재사용 거부 -> 새 토큰은 성공
#[tokio::test]
async fn test_rotation_scenario() {
    let (auth, _) = auth_service();
    auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();

    let first = auth.login(login("a@x.com", PASSWORD)).await.unwrap();
    let second = auth.refresh(&first.refresh_token).await.unwrap();
    assert_ne!(second.refresh_token, first.refresh_token);

    // replay
    assert_eq!(auth.refresh(&first.refresh_token).await.unwrap_err(), AuthError::RefreshRejected);

    let third = auth.refresh(&second.refresh_token).await.unwrap();
    assert_eq!(third.identity_summary.id, first.identity_summary.id);
}

/// 새 로그인은 이전 세션의 refresh token 을 무효화
#[tokio::test]
async fn test_new_login_supersedes_previous_refresh_token() {
    let (auth, _) = auth_service();
    let signup = auth.signup(signup_request("a@x.com", Role::Admin)).await.unwrap();
    auth.login(login("a@x.com", PASSWORD)).await.unwrap();

    assert_eq!(auth.refresh(&signup.refresh_token).await.unwrap_err(), AuthError::RefreshRejected);
}

#[tokio::test]
async fn test_refresh_after_logout_is_rejected() {
    let (auth, users) = auth_service();
    let session = auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();

    auth.logout(session.identity_summary.id).await.unwrap();

    let user = users.find_by_id(session.identity_summary.id).await.unwrap().unwrap();
    assert!(user.hashed_rt.is_none());
    assert_eq!(auth.refresh(&session.refresh_token).await.unwrap_err(), AuthError::RefreshRejected);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let (auth, _) = auth_service();
    let session = auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();
    let id = session.identity_summary.id;

    assert!(auth.logout(id).await.is_ok());
    assert!(auth.logout(id).await.is_ok());
}

#[tokio::test]
async fn test_logout_unknown_identity() {
    let (auth, _) = auth_service();
    let id = uuid::Uuid::new_v4();
    assert_eq!(auth.logout(id).await.unwrap_err(), AuthError::IdentityNotFound { id });
}

/// 만료 경계: exp 시각 정확히는 거부, 1초 전은 허용
#[tokio::test]
async fn test_refresh_token_expiry_boundary() {
    let jwt = jwt_service(Duration::minutes(5));
    let pair = jwt.issue_token_pair(uuid::Uuid::new_v4(), "a@x.com").unwrap();
    let exp = JwtService::peek_claims(&pair.refresh_token)
        .unwrap()
        .expires_at()
        .unwrap();

    assert!(jwt.validate_at(&pair.refresh_token, TokenKind::Refresh, exp - Duration::seconds(1)).is_ok());
    assert_eq!(
        jwt.validate_at(&pair.refresh_token, TokenKind::Refresh, exp).unwrap_err(),
        AuthError::TokenInvalid
    );
}

/// 잘못된 비밀번호와 없는 이메일은 같은 에러
#[tokio::test]
async fn test_invalid_credentials_do_not_reveal_email() {
    let (auth, _) = auth_service();
    auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();

    let wrong_password = auth.login(login("a@x.com", "wrong-password")).await.unwrap_err();
    let unknown_email = auth.login(login("nobody@x.com", PASSWORD)).await.unwrap_err();

    assert_eq!(wrong_password, AuthError::InvalidCredentials);
    assert_eq!(unknown_email, AuthError::InvalidCredentials);
    assert_eq!(wrong_password.to_string(), unknown_email.to_string());
}

#[tokio::test]
async fn test_duplicate_signup() {
    let (auth, _) = auth_service();
    auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();

    let err = auth.signup(signup_request("a@x.com", Role::Admin)).await.unwrap_err();
    assert!(matches!(err, AuthError::DuplicateIdentity { .. }));
}

/// 같은 refresh token 으로 동시에 refresh 하면 하나만 성공
#[tokio::test]
async fn test_concurrent_refresh_has_single_winner() {
    let (auth, _) = auth_service();
    let session = auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let auth = auth.clone();
            let token = session.refresh_token.clone();
            tokio::spawn(async move { auth.refresh(&token).await })
        })
        .collect();

    let mut winners = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => winners += 1,
            Err(e) => assert_eq!(e, AuthError::RefreshRejected),
        }
    }
    assert_eq!(winners, 1);
}

/// find_by_id 직후 모든 호출자가 모일 때까지 대기하는 저장소
/// Every refresh reads the same stored hash before any of them rotates it.
struct LockstepStore {
    inner: InMemoryUserRepository,
    barrier: Barrier,
    swaps: AtomicUsize,
}

impl LockstepStore {
    fn new(racers: usize) -> Self {
        Self {
            inner: InMemoryUserRepository::new(),
            barrier: Barrier::new(racers),
            swaps: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CredentialStore for LockstepStore {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        self.inner.create_user(user).await
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.inner.find_by_email(email).await
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        let user = self.inner.find_by_id(id).await?;
        self.barrier.wait().await;
        Ok(user)
    }

    async fn set_refresh_hash(&self, id: Uuid, hash: Option<&str>) -> anyhow::Result<bool> {
        self.inner.set_refresh_hash(id, hash).await
    }

    async fn swap_refresh_hash(&self, id: Uuid, expected: &str, new: &str) -> anyhow::Result<bool> {
        self.swaps.fetch_add(1, Ordering::SeqCst);
        self.inner.swap_refresh_hash(id, expected, new).await
    }
}

/// 두 요청이 같은 해시를 읽은 뒤에도 compare-and-set 으로 하나만 교체
#[tokio::test]
async fn test_interleaved_refresh_is_decided_by_compare_and_set() {
    let store = Arc::new(LockstepStore::new(2));
    let auth = AuthService::new(store.clone(), jwt_service(Duration::minutes(5)));
    let session = auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();

    let (a, b) = tokio::join!(
        auth.refresh(&session.refresh_token),
        auth.refresh(&session.refresh_token)
    );

    // 둘 다 해시 비교를 통과하고 교체까지 도달
    assert_eq!(store.swaps.load(Ordering::SeqCst), 2);
    assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);

    let (winner, loser) = if a.is_ok() { (a, b) } else { (b, a) };
    assert_eq!(loser.unwrap_err(), AuthError::RefreshRejected);

    let user = store.inner.find_by_email("a@x.com").await.unwrap().unwrap();
    assert_eq!(
        user.hashed_rt,
        Some(JwtService::hash_refresh_token(&winner.unwrap().refresh_token))
    );
}

/// Access / Refresh 토큰은 서로 대체 불가
#[tokio::test]
async fn test_token_kinds_are_not_interchangeable() {
    let (auth, _) = auth_service();
    let session = auth.signup(signup_request("a@x.com", Role::User)).await.unwrap();

    assert_eq!(auth.refresh(&session.access_token).await.unwrap_err(), AuthError::TokenInvalid);
}
