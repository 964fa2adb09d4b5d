use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::HashMap;
use uuid::Uuid;
use crate::domains::auth::models::user::{NewUser, User};
use crate::shared::database::repositories::{CredentialStore, StoreError};

/// 인메모리 Credential Store (DATABASE_URL 미설정 시, 테스트용)
/// In-memory credential store. One write lock per mutation keeps updates atomic.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryUserRepository {
    async fn create_user(&self, user: NewUser) -> Result<User, StoreError> {
        let mut users = self.users.write();
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::Duplicate(user.email));
        }

        let now = Utc::now();
        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            password_hash: user.password_hash,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            hashed_rt: None,
            created_at: now,
            updated_at: now,
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.users.read().values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        Ok(self.users.read().get(&id).cloned())
    }

    async fn set_refresh_hash(&self, id: Uuid, hash: Option<&str>) -> Result<bool> {
        let mut users = self.users.write();
        match users.get_mut(&id) {
            Some(user) => {
                user.hashed_rt = hash.map(str::to_string);
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn swap_refresh_hash(&self, id: Uuid, expected: &str, new: &str) -> Result<bool> {
        let mut users = self.users.write();
        match users.get_mut(&id) {
            Some(user) if user.hashed_rt.as_deref() == Some(expected) => {
                user.hashed_rt = Some(new.to_string());
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::models::user::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn rejects_duplicate_email() {
        let store = InMemoryUserRepository::new();
        store.create_user(new_user("a@x.com")).await.unwrap();
        let err = store.create_user(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(email) if email == "a@x.com"));
    }

    #[tokio::test]
    async fn swap_only_succeeds_against_current_hash() {
        let store = InMemoryUserRepository::new();
        let user = store.create_user(new_user("a@x.com")).await.unwrap();

        assert!(store.set_refresh_hash(user.id, Some("h1")).await.unwrap());
        assert!(store.swap_refresh_hash(user.id, "h1", "h2").await.unwrap());
        // 같은 오래된 해시로 두 번째 교체 시도는 실패
        assert!(!store.swap_refresh_hash(user.id, "h1", "h3").await.unwrap());

        let stored = store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.hashed_rt.as_deref(), Some("h2"));
    }

    #[tokio::test]
    async fn set_hash_reports_missing_rows() {
        let store = InMemoryUserRepository::new();
        assert!(!store.set_refresh_hash(Uuid::new_v4(), None).await.unwrap());
    }
}
