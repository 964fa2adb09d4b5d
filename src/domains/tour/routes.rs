// Tour domain routes
// 투어 도메인 라우터
use axum::{extract::DefaultBodyLimit, routing::{get, post, put}, Router};
use crate::domains::tour::handlers::tour_handler;
use crate::shared::services::AppState;

/// multipart 업로드 최대 크기
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Create tour router
/// 투어 라우터 생성
pub fn create_tour_router() -> Router<AppState> {
    Router::new()
        .route("/create", post(tour_handler::create_tour))
        .route("/update", put(tour_handler::update_tour))
        .route("/detail/:tour_id", get(tour_handler::get_tour))
        .route("/upload-image/:tour_id", post(tour_handler::upload_tour_image))
        .route("/list", get(tour_handler::list_tours))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
}
