// Auth domain state
// 인증 도메인 상태
use std::sync::Arc;
use crate::shared::database::CredentialStore;
use crate::domains::auth::services::{AuthService, JwtService};

/// Auth domain state
/// 인증 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: AuthService,
    pub jwt_service: JwtService,
    /// logout-by-id 호출에 필요한 서비스 키 (없으면 항상 거부)
    pub service_api_key: Option<Arc<str>>,
}

impl AuthState {
    /// Create AuthState with credential store and JWT service
    pub fn new(
        users: Arc<dyn CredentialStore>,
        jwt_service: JwtService,
        service_api_key: Option<String>,
    ) -> Self {
        Self {
            auth_service: AuthService::new(users, jwt_service.clone()),
            jwt_service,
            service_api_key: service_api_key.map(Arc::from),
        }
    }
}
