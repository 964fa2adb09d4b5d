use std::collections::HashMap;
use crate::domains::tour::models::{
    CreateTourForm, DataResponse, Tour, TourEnvelope, TourImage, TourImageEnvelope, TourImageForm,
    TourInput, TourListEnvelope, TourListQuery,
    UpdateTourRequest,
};
use crate::shared::clients::ImageUpload;
use crate::shared::errors::TourError;
use crate::shared::middleware::auth::{AdminUser, AuthenticatedUser};
use crate::shared::services::AppState;
use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

type ApiError = (StatusCode, Json<serde_json::Value>);

/// multipart 본문 파싱 결과 (텍스트 필드 + 이미지)
#[derive(Debug, Default)]
struct TourMultipart {
    fields: HashMap<String, String>,
    image: Option<ImageUpload>,
}

impl TourMultipart {
    async fn read(mut multipart: Multipart) -> Result<Self, TourError> {
        let invalid = |e: axum::extract::multipart::MultipartError| {
            TourError::Validation(format!("Invalid multipart body: {}", e))
        };

        let mut form = TourMultipart::default();
        while let Some(field) = multipart.next_field().await.map_err(invalid)? {
            let name = field.name().unwrap_or_default().to_string();
            if name == "image" {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(invalid)?;
                form.image = Some(ImageUpload {
                    bytes: bytes.to_vec(),
                    file_name,
                    content_type,
                });
            } else {
                let value = field.text().await.map_err(invalid)?;
                form.fields.insert(name, value);
            }
        }
        Ok(form)
    }

    fn text(&self, name: &str) -> Result<String, TourError> {
        self.fields
            .get(name)
            .map(|v| v.trim().to_string())
            .ok_or_else(|| TourError::Validation(format!("{} is required", name)))
    }

    fn number(&self, name: &str) -> Result<f64, TourError> {
        self.text(name)?
            .parse::<f64>()
            .map_err(|_| TourError::Validation(format!("{} must be a number", name)))
    }

    fn tour_input(&self) -> Result<TourInput, TourError> {
        Ok(TourInput {
            name: self.text("name")?,
            description: self.text("description")?,
            location: self.text("location")?,
            price: self.number("price")?,
            duration: self.number("duration")?,
        })
    }
}

/// 투어 생성 (Admin)
/// Create a tour; the image is uploaded to the media host first
#[utoipa::path(
    post,
    path = "/tour/create",
    request_body(content = CreateTourForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Tour created", body = TourEnvelope),
        (status = 400, description = "Invalid fields or no file uploaded"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied!"),
        (status = 502, description = "Media host failure")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Tours"
)]
pub async fn create_tour(
    State(app_state): State<AppState>,
    admin: AdminUser,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DataResponse<Tour>>), ApiError> {
    let form = TourMultipart::read(multipart).await?;
    let input = form.tour_input()?;

    let tour = app_state
        .tour_state
        .tour_service
        .create_tour(admin.user_id, input, form.image)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse::new(tour, "Create tour successfully"))))
}

#[utoipa::path(
    put,
    path = "/tour/update",
    request_body = UpdateTourRequest,
    responses(
        (status = 200, description = "Tour updated", body = TourEnvelope),
        (status = 400, description = "Invalid fields"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied!"),
        (status = 404, description = "Tour not found")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Tours"
)]
pub async fn update_tour(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Json(request): Json<UpdateTourRequest>,
) -> Result<Json<DataResponse<Tour>>, ApiError> {
    let tour = app_state
        .tour_state
        .tour_service
        .update_tour(admin.user_id, request)
        .await?;

    Ok(Json(DataResponse::new(tour, "Update tour successfully")))
}

#[utoipa::path(
    get,
    path = "/tour/detail/{tour_id}",
    params(
        ("tour_id" = Uuid, Path, description = "Tour id")
    ),
    responses(
        (status = 200, description = "Tour found", body = TourEnvelope),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Tour not found")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Tours"
)]
pub async fn get_tour(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    Path(tour_id): Path<Uuid>,
) -> Result<Json<DataResponse<Tour>>, ApiError> {
    let tour = app_state.tour_state.tour_service.get_tour(tour_id).await?;
    Ok(Json(DataResponse::new(tour, "Get tour successfully")))
}

/// 투어 이미지 교체 (Admin)
#[utoipa::path(
    post,
    path = "/tour/upload-image/{tour_id}",
    params(
        ("tour_id" = Uuid, Path, description = "Tour id")
    ),
    request_body(content = TourImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image replaced", body = TourImageEnvelope),
        (status = 400, description = "No file uploaded"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Access denied!"),
        (status = 404, description = "Tour not found"),
        (status = 502, description = "Media host failure")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Tours"
)]
pub async fn upload_tour_image(
    State(app_state): State<AppState>,
    admin: AdminUser,
    Path(tour_id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<DataResponse<TourImage>>, ApiError> {
    let form = TourMultipart::read(multipart).await?;

    let image = app_state
        .tour_state
        .tour_service
        .upload_tour_image(admin.user_id, tour_id, form.image)
        .await?;

    Ok(Json(DataResponse::new(image, "Upload image successfully")))
}

/// 로그인 사용자의 투어 목록 (최신순)
#[utoipa::path(
    get,
    path = "/tour/list",
    params(TourListQuery),
    responses(
        (status = 200, description = "Caller's tours, newest first", body = TourListEnvelope),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("BearerAuth" = [])
    ),
    tag = "Tours"
)]
pub async fn list_tours(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Query(query): Query<TourListQuery>,
) -> Result<Json<DataResponse<Vec<Tour>>>, ApiError> {
    let tours = app_state
        .tour_state
        .tour_service
        .list_tours(user.user_id, query.search.as_deref())
        .await?;

    Ok(Json(DataResponse::new(tours, "Get tours successfully")))
}
