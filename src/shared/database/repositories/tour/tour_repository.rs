use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use crate::domains::tour::models::{NewTour, Tour, TourImage, TourInput};
use crate::shared::database::repositories::tour::{normalize_search, TourStore};

const TOUR_COLUMNS: &str = "id, name, description, location, price, duration, image_url, \
                            image_public_id, created_at, updated_at, user_id";

/// PostgreSQL 기반 투어 저장소
pub struct TourRepository {
    pool: PgPool,
}

impl TourRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 목록 조회 쿼리 ($2가 NULL이면 전체 목록)
    /// strpos 는 `%`, `_`, `\` 를 문자 그대로 비교 (LIKE 패턴 아님)
    fn list_query() -> String {
        format!(
            r#"
            SELECT {}
            FROM tours
            WHERE user_id = $1
              AND ($2::TEXT IS NULL OR strpos(LOWER(name), $2) > 0 OR strpos(LOWER(location), $2) > 0)
            ORDER BY created_at DESC
            "#,
            TOUR_COLUMNS
        )
    }

    fn map_row(row: &PgRow) -> Tour {
        Tour {
            id: row.get("id"),
            name: row.get("name"),
            description: row.get("description"),
            location: row.get("location"),
            price: row.get("price"),
            duration: row.get("duration"),
            image_url: row.get("image_url"),
            image_public_id: row.get("image_public_id"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            user_id: row.get("user_id"),
        }
    }
}

#[async_trait]
impl TourStore for TourRepository {
    async fn create(&self, tour: NewTour) -> Result<Tour> {
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO tours (id, name, description, location, price, duration, image_url, image_public_id, created_at, updated_at, user_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9, $10)
            RETURNING {}
            "#,
            TOUR_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&tour.input.name)
        .bind(&tour.input.description)
        .bind(&tour.input.location)
        .bind(tour.input.price)
        .bind(tour.input.duration)
        .bind(&tour.image_url)
        .bind(&tour.image_public_id)
        .bind(Utc::now())
        .bind(tour.user_id)
        .fetch_one(&self.pool)
        .await
        .context("Failed to create tour")?;

        Ok(Self::map_row(&row))
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tour>> {
        let row = sqlx::query(&format!("SELECT {} FROM tours WHERE id = $1", TOUR_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch tour")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn list_by_owner(&self, user_id: Uuid, search: Option<&str>) -> Result<Vec<Tour>> {
        let rows = sqlx::query(&Self::list_query())
            .bind(user_id)
            .bind(normalize_search(search))
            .fetch_all(&self.pool)
            .await
            .context("Failed to list tours")?;

        Ok(rows.iter().map(Self::map_row).collect())
    }

    async fn update(&self, id: Uuid, input: &TourInput) -> Result<Option<Tour>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE tours
            SET name = $2, description = $3, location = $4, price = $5, duration = $6, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TOUR_COLUMNS
        ))
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.location)
        .bind(input.price)
        .bind(input.duration)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update tour")?;

        Ok(row.as_ref().map(Self::map_row))
    }

    async fn set_image(&self, id: Uuid, image: &TourImage) -> Result<Option<Tour>> {
        let row = sqlx::query(&format!(
            r#"
            UPDATE tours
            SET image_url = $2, image_public_id = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            TOUR_COLUMNS
        ))
        .bind(id)
        .bind(&image.image_url)
        .bind(&image.image_public_id)
        .fetch_optional(&self.pool)
        .await
        .context("Failed to update tour image")?;

        Ok(row.as_ref().map(Self::map_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_query_matches_search_literally() {
        let query = TourRepository::list_query();
        assert!(!query.contains("LIKE"));
        assert!(query.contains("strpos(LOWER(name), $2) > 0"));
        assert!(query.contains("strpos(LOWER(location), $2) > 0"));
        assert!(query.contains("ORDER BY created_at DESC"));
    }
}
