use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// User account as stored
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub approved: bool,
    pub profile_icon: Option<String>,
    pub created_at: DateTime<Utc>,
    pub approved_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn new(username: &str, password_hash: String, is_admin: bool, approved: bool) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash,
            is_admin,
            approved,
            profile_icon: None,
            created_at: now,
            approved_at: approved.then_some(now),
        }
    }
}

/// User as returned over the API, without credentials
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: Uuid,
    pub username: String,
    pub is_admin: bool,
    pub approved: bool,
    pub profile_icon: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            is_admin: user.is_admin,
            approved: user.approved,
            profile_icon: user.profile_icon.clone(),
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InviteCode {
    pub code: String,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub used_by: Option<Uuid>,
    pub used_at: Option<DateTime<Utc>>,
}

impl InviteCode {
    pub fn new(created_by: Uuid) -> Self {
        let code = Uuid::new_v4().simple().to_string()[..8].to_ascii_uppercase();
        Self {
            code,
            created_by,
            created_at: Utc::now(),
            used_by: None,
            used_at: None,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used_by.is_some()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub invite_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: PublicUser,
    pub token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub profile_icon: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatusFilter {
    Pending,
    Approved,
}

impl UserStatusFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserStatusFilter::Pending => !user.approved,
            UserStatusFilter::Approved => user.approved,
        }
    }
}
