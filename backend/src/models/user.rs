//! Models for user accounts and the passwordless login exchange.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
/// A user account, created on first login with a given email.
///
/// There is no registration step and no credential beyond the email
/// itself (trust-on-first-use). Rows are never mutated or deleted.
pub struct User {
    pub id: String,
    /// Normalized (trimmed, lowercased) email address; unique.
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn new(email: String) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
/// Payload for `POST /auth/login`.
pub struct LoginPayload {
    pub email: String,
}

#[derive(Debug, Serialize)]
/// Data returned by a successful login.
pub struct LoginData {
    pub user: User,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_camel_case() {
        let user = User::new("a@b.com".to_string());
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "a@b.com");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("created_at").is_none());
    }
}
