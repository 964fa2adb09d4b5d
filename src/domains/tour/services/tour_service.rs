use std::sync::Arc;
use crate::shared::clients::{ImageUpload, MediaHost};
use crate::shared::database::TourStore;
use crate::shared::errors::TourError;
use crate::domains::tour::models::{NewTour, Tour, TourImage, TourInput, UpdateTourRequest};
use tracing::{info, warn};
use uuid::Uuid;

/// 투어 서비스
/// TourService: CRUD over tours owned by the calling user, images kept on the media host
#[derive(Clone)]
pub struct TourService {
    tours: Arc<dyn TourStore>,
    media: Arc<dyn MediaHost>,
}

impl TourService {
    pub fn new(tours: Arc<dyn TourStore>, media: Arc<dyn MediaHost>) -> Self {
        Self { tours, media }
    }

    fn db_error(context: &str, e: anyhow::Error) -> TourError {
        TourError::DatabaseError(format!("{}: {:#}", context, e))
    }

    fn require_image(image: Option<ImageUpload>) -> Result<ImageUpload, TourError> {
        let image = image.ok_or(TourError::MissingImage)?;
        if image.bytes.is_empty() {
            return Err(TourError::MissingImage);
        }
        if !image.content_type.starts_with("image/") {
            return Err(TourError::Validation("Only image files are allowed".to_string()));
        }
        Ok(image)
    }

    /// 새 투어 생성 (이미지를 먼저 업로드)
    pub async fn create_tour(
        &self,
        user_id: Uuid,
        input: TourInput,
        image: Option<ImageUpload>,
    ) -> Result<Tour, TourError> {
        input.validate().map_err(TourError::Validation)?;
        let image = Self::require_image(image)?;

        // 1. 미디어 호스트에 업로드
        let uploaded = self
            .media
            .upload(image)
            .await
            .map_err(|e| TourError::Media(format!("{:#}", e)))?;

        // 2. DB 저장 (실패 시 업로드한 이미지 정리)
        let created = self
            .tours
            .create(NewTour {
                input,
                image_url: uploaded.url,
                image_public_id: uploaded.public_id.clone(),
                user_id,
            })
            .await;

        match created {
            Ok(tour) => {
                info!(tour_id = %tour.id, user_id = %user_id, "tour created");
                Ok(tour)
            }
            Err(e) => {
                if let Err(cleanup) = self.media.delete(&uploaded.public_id).await {
                    warn!("Failed to remove orphaned image {}: {:#}", uploaded.public_id, cleanup);
                }
                Err(Self::db_error("Failed to create tour", e))
            }
        }
    }

    /// 소유한 투어만 반환 (다른 사용자의 투어는 NotFound)
    async fn owned_tour(&self, user_id: Uuid, tour_id: Uuid) -> Result<Tour, TourError> {
        let tour = self.get_tour(tour_id).await?;
        if tour.user_id != user_id {
            return Err(TourError::NotFound { id: tour_id });
        }
        Ok(tour)
    }

    pub async fn update_tour(&self, user_id: Uuid, request: UpdateTourRequest) -> Result<Tour, TourError> {
        request.input.validate().map_err(TourError::Validation)?;
        self.owned_tour(user_id, request.tour_id).await?;

        let tour = self
            .tours
            .update(request.tour_id, &request.input)
            .await
            .map_err(|e| Self::db_error("Failed to update tour", e))?
            .ok_or(TourError::NotFound { id: request.tour_id })?;

        info!(tour_id = %tour.id, "tour updated");
        Ok(tour)
    }

    pub async fn get_tour(&self, tour_id: Uuid) -> Result<Tour, TourError> {
        self.tours
            .find_by_id(tour_id)
            .await
            .map_err(|e| Self::db_error("Failed to fetch tour", e))?
            .ok_or(TourError::NotFound { id: tour_id })
    }

    /// 이미지 교체: 새 이미지 업로드 -> 레코드 갱신 -> 이전 이미지 삭제 (best effort)
    pub async fn upload_tour_image(
        &self,
        user_id: Uuid,
        tour_id: Uuid,
        image: Option<ImageUpload>,
    ) -> Result<TourImage, TourError> {
        let image = Self::require_image(image)?;
        let tour = self.owned_tour(user_id, tour_id).await?;

        let uploaded = self
            .media
            .upload(image)
            .await
            .map_err(|e| TourError::Media(format!("{:#}", e)))?;

        let new_image = TourImage {
            image_url: uploaded.url,
            image_public_id: uploaded.public_id,
        };
        self.tours
            .set_image(tour_id, &new_image)
            .await
            .map_err(|e| Self::db_error("Failed to update tour image", e))?
            .ok_or(TourError::NotFound { id: tour_id })?;

        if !tour.image_public_id.is_empty() {
            if let Err(e) = self.media.delete(&tour.image_public_id).await {
                warn!("Failed to delete old image {}: {:#}", tour.image_public_id, e);
            }
        }

        info!(tour_id = %tour_id, "tour image replaced");
        Ok(new_image)
    }

    /// 로그인 사용자의 투어 목록
    pub async fn list_tours(&self, user_id: Uuid, search: Option<&str>) -> Result<Vec<Tour>, TourError> {
        self.tours
            .list_by_owner(user_id, search)
            .await
            .map_err(|e| Self::db_error("Failed to list tours", e))
    }
}
