// All repositories module
pub mod auth;
pub mod tour;

// Re-export all repositories for convenience
pub use auth::*;
pub use tour::*;

use thiserror::Error;

/// 저장소 공통 에러 (중복 키는 도메인 에러로 구분해야 하므로 별도 variant)
/// Store error; unique violations are surfaced separately from other failures
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// PostgreSQL unique_violation 여부
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}
