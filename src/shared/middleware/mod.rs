// Request extractors (인증 가드)
pub mod auth;

pub use auth::*;
