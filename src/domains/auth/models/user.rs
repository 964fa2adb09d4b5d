use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;

/// 사용자 역할
/// User role (Admin can manage tours, User can only read)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "Admin",
            Role::User => "User",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Admin" => Ok(Role::Admin),
            "User" => Ok(Role::User),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

/// 사용자 모델 (Credential Store 레코드)
/// User record as held by the credential store
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// 현재 유효한 Refresh Token의 해시 (로그아웃 시 None)
    /// Hash of the single outstanding refresh token, None when logged out
    pub hashed_rt: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 사용자 생성 데이터
/// Data for a new user row
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
}

/// 사용자 요약 정보 (비밀번호/토큰 해시 제외)
/// Identity summary returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    #[schema(example = "a@x.com")]
    pub email: String,
    pub role: Role,
    #[schema(example = "A")]
    pub first_name: String,
    #[schema(example = "B")]
    pub last_name: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            role: user.role,
            first_name: user.first_name,
            last_name: user.last_name,
        }
    }
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        user.clone().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_text() {
        for role in [Role::Admin, Role::User] {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn summary_serializes_camel_case() {
        let summary = UserResponse {
            id: Uuid::nil(),
            email: "a@x.com".to_string(),
            role: Role::User,
            first_name: "A".to_string(),
            last_name: "B".to_string(),
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["firstName"], "A");
        assert_eq!(json["lastName"], "B");
        assert_eq!(json["role"], "User");
    }
}
