// Auth repositories (Credential Store)
pub mod credential_store;
pub mod user_repository;
pub mod in_memory_user_repository;

pub use credential_store::*;
pub use user_repository::*;
pub use in_memory_user_repository::*;
