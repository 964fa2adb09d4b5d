use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// 투어 모델 (DB 레코드)
/// Tour record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tour {
    pub id: Uuid,
    #[schema(example = "Ha Long Bay Cruise")]
    pub name: String,
    #[schema(example = "Two days among the limestone islands")]
    pub description: String,
    #[schema(example = "Quang Ninh")]
    pub location: String,
    #[schema(example = 199.5)]
    pub price: f64,
    /// 기간 (일)
    /// Duration in days
    #[schema(example = 2.0)]
    pub duration: f64,
    pub image_url: String,
    pub image_public_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// 소유자 (생성한 사용자)
    pub user_id: Uuid,
}

/// 투어 입력값 (생성/수정 공통)
/// Editable tour fields shared by create and update
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TourInput {
    pub name: String,
    pub description: String,
    pub location: String,
    pub price: f64,
    pub duration: f64,
}

impl TourInput {
    /// 입력값 검증
    /// name/location >= 2 chars, description >= 5 chars, price/duration > 0
    pub fn validate(&self) -> Result<(), String> {
        let mut problems = Vec::new();

        if self.name.trim().chars().count() < 2 {
            problems.push("name must be at least 2 characters");
        }
        if self.location.trim().chars().count() < 2 {
            problems.push("location must be at least 2 characters");
        }
        if self.description.trim().chars().count() < 5 {
            problems.push("description must be at least 5 characters");
        }
        if !(self.price.is_finite() && self.price > 0.0) {
            problems.push("price must be a positive number");
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            problems.push("duration must be a positive number");
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems.join(", "))
        }
    }
}

/// 새 투어 데이터 (이미지 업로드 후)
#[derive(Debug, Clone)]
pub struct NewTour {
    pub input: TourInput,
    pub image_url: String,
    pub image_public_id: String,
    pub user_id: Uuid,
}

/// 투어 수정 요청
/// Update request (JSON body of PUT /tour/update)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(as = UpdateTourRequest)]
pub struct UpdateTourRequest {
    pub tour_id: Uuid,
    #[serde(flatten)]
    pub input: TourInput,
}

/// 목록 조회 쿼리
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TourListQuery {
    /// 이름/지역 부분 검색 (대소문자 무시)
    pub search: Option<String>,
}

/// 업로드된 이미지 정보
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TourImage {
    pub image_url: String,
    pub image_public_id: String,
}

/// 공통 응답 래퍼 ({data, message})
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[aliases(TourEnvelope = DataResponse<Tour>, TourListEnvelope = DataResponse<Vec<Tour>>, TourImageEnvelope = DataResponse<TourImage>)]
pub struct DataResponse<T> {
    pub data: T,
    pub message: String,
}

impl<T> DataResponse<T> {
    pub fn new(data: T, message: &str) -> Self {
        Self {
            data,
            message: message.to_string(),
        }
    }
}

/// 투어 생성 multipart 폼 (문서용)
/// multipart/form-data body of POST /tour/create
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreateTourForm {
    pub name: String,
    pub description: String,
    pub location: String,
    pub price: f64,
    pub duration: f64,
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

/// 이미지 교체 multipart 폼 (문서용)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct TourImageForm {
    #[schema(value_type = String, format = Binary)]
    pub image: Vec<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> TourInput {
        TourInput {
            name: "Sapa".to_string(),
            description: "Rice terraces trek".to_string(),
            location: "Lao Cai".to_string(),
            price: 120.0,
            duration: 3.0,
        }
    }

    #[test]
    fn accepts_valid_input() {
        assert!(input().validate().is_ok());
    }

    #[test]
    fn reports_every_problem() {
        let bad = TourInput {
            name: "S".to_string(),
            description: "shrt".to_string(),
            location: " ".to_string(),
            price: 0.0,
            duration: f64::NAN,
        };
        let message = bad.validate().unwrap_err();
        for field in ["name", "location", "description", "price", "duration"] {
            assert!(message.contains(field), "missing {} in {}", field, message);
        }
    }

    #[test]
    fn update_request_flattens_fields() {
        let json = serde_json::json!({
            "tourId": Uuid::nil(),
            "name": "Sapa",
            "description": "Rice terraces trek",
            "location": "Lao Cai",
            "price": 120.0,
            "duration": 3
        });
        let request: UpdateTourRequest = serde_json::from_value(json).unwrap();
        assert_eq!(request.tour_id, Uuid::nil());
        assert_eq!(request.input, input());
    }
}
