use anyhow::Result;
use async_trait::async_trait;
use uuid::Uuid;
use crate::domains::tour::models::{NewTour, Tour, TourImage, TourInput};

/// 투어 저장소 인터페이스 (소유자 ID로 범위 지정)
/// Resource store for tours, scoped by owner identity id
#[async_trait]
pub trait TourStore: Send + Sync {
    async fn create(&self, tour: NewTour) -> Result<Tour>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>>;

    /// 소유자의 투어 목록 (최신순), search는 이름/지역 부분 일치
    async fn list_by_owner(&self, user_id: Uuid, search: Option<&str>) -> Result<Vec<Tour>>;

    /// 필드 수정. 없으면 None
    async fn update(&self, id: Uuid, input: &TourInput) -> Result<Option<Tour>>;

    /// 이미지 교체. 없으면 None
    async fn set_image(&self, id: Uuid, image: &TourImage) -> Result<Option<Tour>>;
}

/// 검색어 정규화 (공백만 있으면 검색하지 않음)
pub(crate) fn normalize_search(search: Option<&str>) -> Option<String> {
    search
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}
