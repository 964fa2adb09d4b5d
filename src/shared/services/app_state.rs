use std::sync::Arc;
use crate::shared::config::AppConfig;
use crate::shared::clients::{CloudinaryClient, MediaHost};
use crate::shared::database::{
    CredentialStore, Database, InMemoryTourRepository, InMemoryUserRepository, TourRepository,
    TourStore, UserRepository,
};
use crate::domains::auth::services::state::AuthState;
use crate::domains::auth::services::JwtService;
use crate::domains::tour::services::state::TourState;
use anyhow::Result;
use tracing::info;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 각 도메인의 State를 조합하여 전체 애플리케이션 상태를 관리
#[derive(Clone)]
pub struct AppState {
    pub auth_state: AuthState,
    pub tour_state: TourState,
}

impl AppState {
    /// 저장소/미디어 호스트를 직접 주입 (테스트, 인메모리 실행)
    /// Assemble the state from already-built collaborators
    pub fn new(
        users: Arc<dyn CredentialStore>,
        tours: Arc<dyn TourStore>,
        media: Arc<dyn MediaHost>,
        jwt_service: JwtService,
        service_api_key: Option<String>,
    ) -> Self {
        Self {
            auth_state: AuthState::new(users, jwt_service, service_api_key),
            tour_state: TourState::new(tours, media),
        }
    }

    /// Create AppState from configuration
    /// DATABASE_URL이 있으면 PostgreSQL (마이그레이션 포함), 없으면 인메모리 저장소
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        // 1. 공유 서비스 생성 (JWT, 미디어 호스트)
        let jwt_service = JwtService::new(&config.jwt);
        let media: Arc<dyn MediaHost> = Arc::new(CloudinaryClient::new(config.cloudinary.clone())?);

        // 2. 저장소 선택
        let (users, tours): (Arc<dyn CredentialStore>, Arc<dyn TourStore>) = match &config.database_url {
            Some(db_url) => {
                let db = Database::new(db_url).await?;
                db.initialize().await?;
                info!("Using PostgreSQL stores");
                (
                    Arc::new(UserRepository::new(db.pool().clone())),
                    Arc::new(TourRepository::new(db.pool().clone())),
                )
            }
            None => (
                Arc::new(InMemoryUserRepository::new()),
                Arc::new(InMemoryTourRepository::new()),
            ),
        };

        // 3. AppState 조합
        Ok(Self::new(users, tours, media, jwt_service, config.service_api_key.clone()))
    }
}
