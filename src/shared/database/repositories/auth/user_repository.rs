use sqlx::{PgPool, Row};
use sqlx::postgres::PgRow;
use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;
use crate::domains::auth::models::user::{NewUser, Role, User};
use crate::shared::database::repositories::{is_unique_violation, CredentialStore, StoreError};

const USER_COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, role, hashed_rt, created_at, updated_at";

/// PostgreSQL 기반 Credential Store
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: &PgRow) -> Result<User> {
        let role: String = row.get("role");
        Ok(User {
            id: row.get("id"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            first_name: row.get("first_name"),
            last_name: row.get("last_name"),
            role: role.parse::<Role>().map_err(|e| anyhow!(e))?,
            hashed_rt: row.get("hashed_rt"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        })
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let now = Utc::now();
        let row = sqlx::query(&format!(
            r#"
            INSERT INTO users (id, email, password_hash, first_name, last_name, role, hashed_rt, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, NULL, $7, $7)
            RETURNING {}
            "#,
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(user.email.clone())
            } else {
                StoreError::Other(anyhow::Error::new(e).context("Failed to create user"))
            }
        })?;

        Ok(Self::map_row(&row)?)
    }

    // 이메일로 사용자 조회 (로그인용)
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by email")?;

        row.as_ref().map(Self::map_row).transpose()
    }

    // ID로 사용자 조회
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let row = sqlx::query(&format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to fetch user by id")?;

        row.as_ref().map(Self::map_row).transpose()
    }

    async fn set_refresh_hash(&self, id: Uuid, hash: Option<&str>) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE users
            SET hashed_rt = $2, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(hash)
        .execute(&self.pool)
        .await
        .context("Failed to update refresh token hash")?;

        Ok(result.rows_affected() == 1)
    }

    async fn swap_refresh_hash(&self, id: Uuid, expected: &str, new: &str) -> Result<bool> {
        // 단일 행 UPDATE로 compare-and-set (동시 refresh 중 하나만 성공)
        let result = sqlx::query(
            r#"
            UPDATE users
            SET hashed_rt = $3, updated_at = NOW()
            WHERE id = $1 AND hashed_rt = $2
            "#,
        )
        .bind(id)
        .bind(expected)
        .bind(new)
        .execute(&self.pool)
        .await
        .context("Failed to rotate refresh token hash")?;

        Ok(result.rows_affected() == 1)
    }
}
