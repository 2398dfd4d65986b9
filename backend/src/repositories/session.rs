//! Repository functions for the bearer-token session lifecycle.

use chrono::Utc;
use sqlx::PgPool;

use crate::models::{session::Session, user::User};
use crate::repositories::user as user_repo;

pub async fn insert(pool: &PgPool, session: &Session) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO sessions (id, token, user_id, expires_at) VALUES ($1, $2, $3, $4)")
        .bind(&session.id)
        .bind(&session.token)
        .bind(&session.user_id)
        .bind(session.expires_at)
        .execute(pool)
        .await
        .map(|_| ())
}

pub async fn find_by_token(pool: &PgPool, token: &str) -> Result<Option<Session>, sqlx::Error> {
    sqlx::query_as::<_, Session>(
        "SELECT id, token, user_id, expires_at FROM sessions WHERE token = $1",
    )
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn delete_by_id(pool: &PgPool, session_id: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(session_id)
        .execute(pool)
        .await
        .map(|_| ())
}

/// Deletes the session for a token. Returns `false` when no row matched,
/// which callers treat as a non-fatal no-op.
pub async fn delete_by_token(pool: &PgPool, token: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Resolves a token to its owning user.
///
/// Expiry is enforced lazily here: an expired session row is deleted on
/// detection and the token then behaves as if it never existed.
pub async fn validate_token(pool: &PgPool, token: &str) -> Result<Option<User>, sqlx::Error> {
    let Some(session) = find_by_token(pool, token).await? else {
        return Ok(None);
    };

    if session.is_expired(Utc::now()) {
        delete_by_id(pool, &session.id).await?;
        return Ok(None);
    }

    user_repo::find_by_id(pool, &session.user_id).await
}
