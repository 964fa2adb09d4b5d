// =====================================================
// 클라이언트 SessionGuard 통합 테스트 (실제 서버 대상)
// =====================================================

mod common;
use common::*;

use chrono::Duration;
use tour_admin::client::{ApiClient, ClientError, SessionGuard, SessionState};
use tour_admin::domains::auth::models::Role;
use tour_admin::domains::auth::services::JwtService;
use tour_admin::domains::tour::models::TourInput;
use tour_admin::shared::config::JwtConfig;

fn tour_input(name: &str) -> TourInput {
    TourInput {
        name: name.to_string(),
        description: "Rice terraces trek".to_string(),
        location: "Lao Cai".to_string(),
        price: 120.0,
        duration: 3.0,
    }
}

/// 가입 후 로그인된 SessionGuard 생성
async fn logged_in_guard(server: &TestServer, email: &str, role: Role) -> SessionGuard {
    let http = reqwest::Client::new();
    let response = http
        .post(server.url("/auth/signup"))
        .json(&signup_request(email, role))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let api = ApiClient::new(&server.base_url).unwrap();
    let mut guard = SessionGuard::new(api, None);
    guard.login(email, PASSWORD).await.unwrap();
    guard
}

async fn wait_for_access_expiry() {
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
}

#[tokio::test]
async fn test_requests_without_session() {
    let server = spawn_server(Duration::minutes(5), None).await;
    let mut guard = SessionGuard::new(ApiClient::new(&server.base_url).unwrap(), None);

    assert_eq!(guard.state(), SessionState::Anonymous);
    assert!(matches!(guard.list_tours(None).await, Err(ClientError::NotAuthenticated)));
    assert!(guard.logout().await.is_ok());
}

#[tokio::test]
async fn test_dashboard_operations() {
    let server = spawn_server(Duration::minutes(5), None).await;
    let mut guard = logged_in_guard(&server, "admin@x.com", Role::Admin).await;
    assert_eq!(guard.state(), SessionState::Authenticated);

    let me = guard.me().await.unwrap();
    assert_eq!(me.email, "admin@x.com");

    let tour = guard.create_tour(&tour_input("Sapa"), &png("sapa.png")).await.unwrap();
    let tours = guard.list_tours(Some("SAP")).await.unwrap();
    assert_eq!(tours.len(), 1);
    assert_eq!(tours[0].id, tour.id);

    let updated = guard.update_tour(tour.id, &tour_input("Sapa Trek")).await.unwrap();
    assert_eq!(updated.name, "Sapa Trek");
    assert_eq!(guard.get_tour(tour.id).await.unwrap().name, "Sapa Trek");

    let image = guard.upload_tour_image(tour.id, &png("new.png")).await.unwrap();
    assert_ne!(image.image_public_id, tour.image_public_id);

    guard.logout().await.unwrap();
    assert!(guard.session().is_none());
}

#[tokio::test]
async fn test_client_side_validation() {
    let server = spawn_server(Duration::minutes(5), None).await;
    let mut guard = logged_in_guard(&server, "admin@x.com", Role::Admin).await;

    let mut bad = tour_input("Sapa");
    bad.price = 0.0;
    assert!(matches!(
        guard.create_tour(&bad, &png("a.png")).await,
        Err(ClientError::Validation(_))
    ));

    let mut text = png("notes.txt");
    text.content_type = "text/plain".to_string();
    assert!(matches!(
        guard.create_tour(&tour_input("Sapa"), &text).await,
        Err(ClientError::Validation(_))
    ));
}

#[tokio::test]
async fn test_api_errors_pass_through() {
    let server = spawn_server(Duration::minutes(5), None).await;
    let mut guard = logged_in_guard(&server, "user@x.com", Role::User).await;

    let err = guard
        .create_tour(&tour_input("Sapa"), &png("a.png"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(403));

    let err = guard.get_tour(uuid::Uuid::new_v4()).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    // 세션은 유지
    assert_eq!(guard.state(), SessionState::Authenticated);
}

/// Access Token 만료 후 다음 요청 전에 자동 refresh
#[tokio::test]
async fn test_lazy_refresh_after_access_expiry() {
    let server = spawn_server(Duration::seconds(1), None).await;
    let mut guard = logged_in_guard(&server, "a@x.com", Role::User).await;
    let before = guard.session().unwrap().clone();

    wait_for_access_expiry().await;
    assert_eq!(guard.state(), SessionState::RefreshPending);

    guard.list_tours(None).await.unwrap();
    let after = guard.session().unwrap();
    assert_ne!(after.refresh_token, before.refresh_token);
    assert_eq!(after.user.id, before.user.id);
    assert!(after.error.is_none());
}

/// 서버에서 세션이 폐기되면 refresh 실패 -> 에러 플래그 -> 강제 로그아웃
#[tokio::test]
async fn test_failed_refresh_forces_logout() {
    let server = spawn_server(Duration::seconds(1), Some(SERVICE_KEY)).await;
    let mut guard = logged_in_guard(&server, "a@x.com", Role::User).await;
    let session = guard.session().unwrap().clone();

    // 다른 경로에서 서버 세션 폐기
    let api = ApiClient::new(&server.base_url).unwrap();
    api.logout_by_id(session.user.id, SERVICE_KEY).await.unwrap();

    wait_for_access_expiry().await;
    let current = guard.current_session().await.unwrap();
    assert!(current.error.is_some());
    assert_eq!(guard.state(), SessionState::Revoked);

    assert!(matches!(guard.list_tours(None).await, Err(ClientError::SessionExpired)));
    assert!(guard.session().is_none());
    assert_eq!(guard.state(), SessionState::Anonymous);
}

/// 다른 곳에서 토큰이 교체되면 강제 로그아웃이 그 세션까지 폐기
#[tokio::test]
async fn test_forced_logout_revokes_server_session() {
    let server = spawn_server(Duration::seconds(1), None).await;
    let mut guard = logged_in_guard(&server, "a@x.com", Role::User).await;

    // 같은 계정으로 다른 클라이언트가 로그인 (저장된 해시 교체)
    let api = ApiClient::new(&server.base_url).unwrap();
    let other = api.login("a@x.com", PASSWORD).await.unwrap();

    wait_for_access_expiry().await;
    assert!(matches!(guard.list_tours(None).await, Err(ClientError::SessionExpired)));
    assert!(guard.session().is_none());

    let err = api.refresh(&other.refresh_token).await.unwrap_err();
    assert_eq!(err.status(), Some(403));
}

/// 401 응답이면 refresh 1회 후 재시도
#[tokio::test]
async fn test_unauthorized_response_refreshes_and_retries() {
    let server = spawn_server(Duration::minutes(5), None).await;
    let guard = logged_in_guard(&server, "a@x.com", Role::User).await;
    let mut session = guard.session().unwrap().clone();

    // 만료되지 않았지만 서버가 거부하는 Access Token (다른 secret 으로 서명)
    let foreign = JwtService::new(&JwtConfig {
        access_secret: "some-other-access-secret-some-other".to_string(),
        refresh_secret: "some-other-refresh-secret-some-other".to_string(),
        access_ttl: Duration::minutes(5),
        refresh_ttl: Duration::days(1),
    });
    session.access_token = foreign
        .issue_token_pair(session.user.id, &session.user.email)
        .unwrap()
        .access_token;

    let mut guard = SessionGuard::new(guard.api().clone(), Some(session.clone()));
    assert_eq!(guard.state(), SessionState::Authenticated);

    guard.list_tours(None).await.unwrap();
    assert_ne!(guard.session().unwrap().access_token, session.access_token);
}

/// 폐기된 refresh token 만 남은 세션은 SessionExpired
#[tokio::test]
async fn test_revoked_refresh_token_expires_session() {
    let server = spawn_server(Duration::minutes(5), None).await;
    let mut guard = logged_in_guard(&server, "a@x.com", Role::User).await;
    let stale = guard.session().unwrap().clone();

    // 로그아웃으로 서버 세션 폐기 후, 이전 세션으로 새 가드 구성
    guard.logout().await.unwrap();
    let mut session = stale;
    session.access_token = "not-a-jwt".to_string();
    let mut guard = SessionGuard::new(ApiClient::new(&server.base_url).unwrap(), Some(session));

    // 읽을 수 없는 토큰 -> refresh 시도 -> 거부 -> 에러 플래그 -> 강제 로그아웃
    assert!(matches!(guard.list_tours(None).await, Err(ClientError::SessionExpired)));
    assert!(guard.session().is_none());
}
