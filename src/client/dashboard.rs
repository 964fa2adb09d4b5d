// Dashboard operations (모든 요청은 SessionGuard 경유)
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use tracing::info;
use uuid::Uuid;
use crate::client::error::ClientError;
use crate::client::guard::SessionGuard;
use crate::domains::auth::models::{MessageResponse, UserResponse};
use crate::domains::tour::models::{DataResponse, Tour, TourImage, TourInput, UpdateTourRequest};
use crate::shared::clients::ImageUpload;

/// 이미지 검증 (서버와 동일 규칙)
fn check_image(image: &ImageUpload) -> Result<(), ClientError> {
    if image.bytes.is_empty() {
        return Err(ClientError::Validation("Image is required".to_string()));
    }
    if !image.content_type.starts_with("image/") {
        return Err(ClientError::Validation("Only image files are allowed".to_string()));
    }
    Ok(())
}

fn image_part(image: &ImageUpload) -> Result<Part, ClientError> {
    Ok(Part::bytes(image.bytes.clone())
        .file_name(image.file_name.clone())
        .mime_str(&image.content_type)?)
}

impl SessionGuard {
    /// 로그인 사용자 정보 (GET /auth/me)
    pub async fn me(&mut self) -> Result<UserResponse, ClientError> {
        self.send(|api| api.request(Method::GET, "auth/me")).await
    }

    /// 내 투어 목록 (검색어: 이름/지역)
    pub async fn list_tours(&mut self, search: Option<&str>) -> Result<Vec<Tour>, ClientError> {
        let response: DataResponse<Vec<Tour>> = self
            .send(|api| {
                let request = api.request(Method::GET, "tour/list")?;
                Ok(match search {
                    Some(search) => request.query(&[("search", search)]),
                    None => request,
                })
            })
            .await?;
        Ok(response.data)
    }

    pub async fn get_tour(&mut self, tour_id: Uuid) -> Result<Tour, ClientError> {
        let path = format!("tour/detail/{}", tour_id);
        let response: DataResponse<Tour> = self
            .send(|api| api.request(Method::GET, &path))
            .await?;
        Ok(response.data)
    }

    pub async fn create_tour(&mut self, input: &TourInput, image: &ImageUpload) -> Result<Tour, ClientError> {
        input.validate().map_err(ClientError::Validation)?;
        check_image(image)?;

        let response: DataResponse<Tour> = self
            .send(|api| {
                let form = Form::new()
                    .text("name", input.name.clone())
                    .text("description", input.description.clone())
                    .text("location", input.location.clone())
                    .text("price", input.price.to_string())
                    .text("duration", input.duration.to_string())
                    .part("image", image_part(image)?);
                Ok(api.request(Method::POST, "tour/create")?.multipart(form))
            })
            .await?;

        info!(tour_id = %response.data.id, "tour created");
        Ok(response.data)
    }

    pub async fn update_tour(&mut self, tour_id: Uuid, input: &TourInput) -> Result<Tour, ClientError> {
        input.validate().map_err(ClientError::Validation)?;

        let body = UpdateTourRequest {
            tour_id,
            input: input.clone(),
        };
        let response: DataResponse<Tour> = self
            .send(|api| Ok(api.request(Method::PUT, "tour/update")?.json(&body)))
            .await?;
        Ok(response.data)
    }

    pub async fn upload_tour_image(&mut self, tour_id: Uuid, image: &ImageUpload) -> Result<TourImage, ClientError> {
        check_image(image)?;

        let path = format!("tour/upload-image/{}", tour_id);
        let response: DataResponse<TourImage> = self
            .send(|api| {
                let form = Form::new().part("image", image_part(image)?);
                Ok(api.request(Method::POST, &path)?.multipart(form))
            })
            .await?;
        Ok(response.data)
    }

    /// 로그아웃 (서버 세션 폐기 후 로컬 세션 삭제)
    /// Logging out an already-expired session is not an error.
    pub async fn logout(&mut self) -> Result<(), ClientError> {
        if self.session().is_none() {
            return Ok(());
        }

        let result: Result<MessageResponse, ClientError> = self
            .send(|api| api.request(Method::POST, "auth/logout"))
            .await;
        self.clear_session();

        match result {
            Ok(_) | Err(ClientError::SessionExpired) => Ok(()),
            Err(e) => Err(e),
        }
    }
}
