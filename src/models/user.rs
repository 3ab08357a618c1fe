use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub role: Option<String>,
    pub confirmed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub role: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct UserGroup {
    pub name: String,
    pub description: String,
}

/// Groups the authorizers know about. Group names compare case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Group {
    User,
    Admin,
}

impl Group {
    pub fn name(&self) -> &'static str {
        match self {
            Group::User => "User",
            Group::Admin => "Admin",
        }
    }

    pub fn is_member(&self, groups: &[String]) -> bool {
        groups
            .iter()
            .any(|group| group.eq_ignore_ascii_case(self.name()))
    }
}

pub const DEFAULT_ROLE: &str = "User";
