use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use tour_admin::routes::create_router;
use tour_admin::shared::config::AppConfig;
use tour_admin::shared::services::AppState;

// Import models for OpenAPI schema
use tour_admin::domains::auth::models::*;
use tour_admin::domains::tour::models::*;

// OpenAPI 스키마 정의: Swagger 문서 자동 생성
#[derive(OpenApi)]
#[openapi(
    paths(
        tour_admin::domains::auth::handlers::auth_handler::signup,
        tour_admin::domains::auth::handlers::auth_handler::login,
        tour_admin::domains::auth::handlers::auth_handler::refresh,
        tour_admin::domains::auth::handlers::auth_handler::logout,
        tour_admin::domains::auth::handlers::auth_handler::logout_by_id,
        tour_admin::domains::auth::handlers::auth_handler::get_me,
        tour_admin::domains::tour::handlers::tour_handler::create_tour,
        tour_admin::domains::tour::handlers::tour_handler::update_tour,
        tour_admin::domains::tour::handlers::tour_handler::get_tour,
        tour_admin::domains::tour::handlers::tour_handler::upload_tour_image,
        tour_admin::domains::tour::handlers::tour_handler::list_tours
    ),
    components(schemas(
        SignupRequest,
        LoginRequest,
        AuthResponse,
        LogoutByIdRequest,
        MessageResponse,
        UserResponse,
        Role,
        Tour,
        TourInput,
        UpdateTourRequest,
        TourImage,
        CreateTourForm,
        TourImageForm,
        TourEnvelope,
        TourListEnvelope,
        TourImageEnvelope
    )),
    modifiers(
        &SecurityAddon
    ),
    tags(
        (name = "Auth", description = "Authentication API endpoints (access/refresh token rotation)"),
        (name = "Tours", description = "Tour management API endpoints")
    ),
    info(
        title = "Tour Admin API",
        description = "Admin API for managing tours",
        version = "1.0.0"
    )
)]
struct ApiDoc;

// Security scheme 정의: Swagger UI에서 "Authorize" 버튼 추가
struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "BearerAuth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ])
        .allow_credentials(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 로깅 초기화 (RUST_LOG 우선)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tour_admin=info,tower_http=info")),
        )
        .init();

    // 설정 로드 (잘못된 값이면 시작 실패)
    let config = AppConfig::from_env()?;

    // AppState 생성 (DB 연결 + 모든 Service 초기화)
    let app_state = AppState::from_config(&config)
        .await
        .context("Failed to initialize AppState")?;

    // Router 생성
    let app = Router::new()
        .merge(create_router())
        .merge(
            SwaggerUi::new("/api")
                .url("/api-docs/openapi.json", ApiDoc::openapi())
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors_origins))
        .with_state(app_state);

    // 서버 시작
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server running on http://{}", addr);
    info!("Swagger UI available at http://{}/api", addr);

    // 서버 실행
    axum::serve(listener, app).await?;
    Ok(())
}
