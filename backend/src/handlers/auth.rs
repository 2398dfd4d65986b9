use axum::{
    extract::{Extension, State},
    http::{header, HeaderMap},
    Json,
};
use chrono::{Duration, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    handlers::ApiJson,
    middleware::auth::parse_bearer_token,
    models::{
        session::Session,
        user::{LoginData, LoginPayload, User},
        ApiResponse,
    },
    repositories::{session as session_repo, user as user_repo},
    utils::token::generate_session_token,
    validation::rules,
};

/// `POST /auth/login` — passwordless login.
///
/// Normalizes the email, resolves or creates the user, and issues a fresh
/// session token. A user may hold any number of concurrently active
/// sessions.
pub async fn login(
    State((pool, config)): State<(PgPool, Config)>,
    ApiJson(payload): ApiJson<LoginPayload>,
) -> Result<Json<ApiResponse<LoginData>>, AppError> {
    let email = payload.email.trim().to_lowercase();
    rules::validate_email(&email)?;

    let user = user_repo::find_or_create_by_email(&pool, &email).await?;

    let token = generate_session_token();
    let expires_at = Utc::now() + Duration::days(config.session_expiry_days);
    let session = Session::new(token.clone(), user.id.clone(), expires_at);
    session_repo::insert(&pool, &session).await?;

    tracing::debug!(user_id = %user.id, "issued session token");

    Ok(Json(ApiResponse::ok(LoginData { user, token })))
}

/// `POST /auth/logout` — deletes the session for the presented token.
///
/// Deliberately not behind the auth gate: a client logging out with an
/// expired (or already-deleted) token must still get a 200, so only the
/// header's presence is checked before the delete. A token with no
/// matching row is a no-op, not an error.
pub async fn logout(
    State((pool, _config)): State<(PgPool, Config)>,
    headers: HeaderMap,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_bearer_token)
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))?;

    let deleted = session_repo::delete_by_token(&pool, token).await?;
    if !deleted {
        tracing::debug!("logout for a session that was already gone");
    }
    Ok(Json(ApiResponse::ok(Value::Null)))
}

/// `GET /auth/me` — returns the user resolved by the auth middleware.
pub async fn me(Extension(user): Extension<User>) -> Result<Json<ApiResponse<User>>, AppError> {
    Ok(Json(ApiResponse::ok(user)))
}
