// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 인메모리 저장소 + 가짜 미디어 호스트로 실제 라우터를 띄워서 테스트
// PostgreSQL / Cloudinary 불필요
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let server = spawn_server(Duration::minutes(5), Some(SERVICE_KEY)).await;
//     // server.base_url 로 요청...
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::Duration;
use parking_lot::Mutex;
use tokio::net::TcpListener;

use tour_admin::domains::auth::models::{Role, SignupRequest};
use tour_admin::domains::auth::services::{AuthService, JwtService};
use tour_admin::routes::create_router;
use tour_admin::shared::clients::{ImageUpload, MediaHost, UploadedImage};
use tour_admin::shared::config::JwtConfig;
use tour_admin::shared::database::{InMemoryTourRepository, InMemoryUserRepository};
use tour_admin::shared::services::AppState;

// 테스트용 상수
pub const AT_SECRET: &str = "test-access-secret-test-access-secret";
pub const RT_SECRET: &str = "test-refresh-secret-test-refresh-secret";
pub const SERVICE_KEY: &str = "test-service-key";
pub const PASSWORD: &str = "pw123456";

pub fn jwt_config(access_ttl: Duration) -> JwtConfig {
    JwtConfig {
        access_secret: AT_SECRET.to_string(),
        refresh_secret: RT_SECRET.to_string(),
        access_ttl,
        refresh_ttl: Duration::days(7),
    }
}

pub fn jwt_service(access_ttl: Duration) -> JwtService {
    JwtService::new(&jwt_config(access_ttl))
}

/// 인메모리 저장소 기반 AuthService
pub fn auth_service() -> (AuthService, Arc<InMemoryUserRepository>) {
    let users = Arc::new(InMemoryUserRepository::new());
    let service = AuthService::new(users.clone(), jwt_service(Duration::minutes(5)));
    (service, users)
}

pub fn signup_request(email: &str, role: Role) -> SignupRequest {
    SignupRequest {
        email: email.to_string(),
        password: PASSWORD.to_string(),
        first_name: "A".to_string(),
        last_name: "B".to_string(),
        role,
    }
}

pub fn png(name: &str) -> ImageUpload {
    ImageUpload {
        bytes: vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A],
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
    }
}

/// 가짜 미디어 호스트 (업로드/삭제 기록)
#[derive(Default)]
pub struct FakeMediaHost {
    uploads: Mutex<u32>,
    pub deleted: Mutex<Vec<String>>,
}

#[async_trait]
impl MediaHost for FakeMediaHost {
    async fn upload(&self, image: ImageUpload) -> Result<UploadedImage> {
        let mut uploads = self.uploads.lock();
        *uploads += 1;
        Ok(UploadedImage {
            url: format!("https://media.test/tours/{}/{}", *uploads, image.file_name),
            public_id: format!("tours/img-{}", *uploads),
        })
    }

    async fn delete(&self, public_id: &str) -> Result<()> {
        self.deleted.lock().push(public_id.to_string());
        Ok(())
    }
}

/// 실행 중인 테스트 서버
pub struct TestServer {
    pub base_url: String,
    pub media: Arc<FakeMediaHost>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// 127.0.0.1 임의 포트에 라우터 실행
pub async fn spawn_server(access_ttl: Duration, service_key: Option<&str>) -> TestServer {
    let media = Arc::new(FakeMediaHost::default());
    let state = AppState::new(
        Arc::new(InMemoryUserRepository::new()),
        Arc::new(InMemoryTourRepository::new()),
        media.clone(),
        jwt_service(access_ttl),
        service_key.map(str::to_string),
    );
    let app = create_router().with_state(state);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind test listener");
    let addr = listener.local_addr().expect("Failed to read local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Test server crashed");
    });

    TestServer {
        base_url: format!("http://{}", addr),
        media,
    }
}
