use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::ids::UserId;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown role: {0}")]
pub struct RoleParseError(String);

/// Fixed at registration; decides which route subtree a user may visit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Student,
    Admin,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Student => f.write_str("student"),
            UserRole::Admin => f.write_str("admin"),
        }
    }
}

impl FromStr for UserRole {
    type Err = RoleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "student" => Ok(UserRole::Student),
            "admin" => Ok(UserRole::Admin),
            _ => Err(RoleParseError(s.to_owned())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Emails compare case-insensitively, including non-ASCII letters.
    #[must_use]
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.trim().to_lowercase()
    }
}

/// The resident user together with the session token issued at sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

impl AuthUser {
    /// Attach a fresh opaque token. Tokens are not secrets; nothing verifies them.
    #[must_use]
    pub fn sign_in(user: User, now: DateTime<Utc>) -> Self {
        let token = format!(
            "local-token-{}-{}",
            uuid::Uuid::new_v4().simple(),
            now.timestamp_millis()
        );
        Self { user, token }
    }

    #[must_use]
    pub fn role(&self) -> UserRole {
        self.user.role
    }
}
