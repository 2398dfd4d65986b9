//! Repository functions for user lookup and trust-on-first-use creation.

use sqlx::PgPool;

use crate::models::user::User;

pub async fn find_by_id(pool: &PgPool, user_id: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, email, created_at FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT id, email, created_at FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Returns the user for a normalized email, creating one if absent.
///
/// The email column is unique, so two concurrent first logins race at the
/// insert; the loser's `ON CONFLICT DO NOTHING` returns no row and we fall
/// back to reading the winner's.
pub async fn find_or_create_by_email(pool: &PgPool, email: &str) -> Result<User, sqlx::Error> {
    if let Some(user) = find_by_email(pool, email).await? {
        return Ok(user);
    }

    let user = User::new(email.to_string());
    let inserted = sqlx::query_as::<_, User>(
        "INSERT INTO users (id, email, created_at) VALUES ($1, $2, $3) \
         ON CONFLICT (email) DO NOTHING \
         RETURNING id, email, created_at",
    )
    .bind(&user.id)
    .bind(&user.email)
    .bind(user.created_at)
    .fetch_optional(pool)
    .await?;

    match inserted {
        Some(user) => Ok(user),
        None => find_by_email(pool, email)
            .await?
            .ok_or(sqlx::Error::RowNotFound),
    }
}
