//! Session lifecycle tests against a real database.
//!
//! Skipped (pass trivially) when `TEST_DATABASE_URL` is unset.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use tower::ServiceExt;

use prodlist_backend::app::build_app;
use prodlist_backend::models::session::Session;
use prodlist_backend::repositories::{session as session_repo, user as user_repo};
use prodlist_backend::utils::token::generate_session_token;

#[path = "support/mod.rs"]
mod support;

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

async fn login(app: &Router, email: &str) -> (String, String) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header("content-type", "application/json")
                .body(Body::from(format!(r#"{{"email": "{email}"}}"#)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let user_id = json["data"]["user"]["id"].as_str().unwrap().to_string();
    let token = json["data"]["token"].as_str().unwrap().to_string();
    assert_eq!(token.len(), 64);
    (user_id, token)
}

#[tokio::test]
async fn repeated_login_reuses_the_user_row() {
    let Some(pool) = support::test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = build_app(pool, support::test_config());
    let email = support::unique_email("repeat");

    let (first_id, first_token) = login(&app, &email).await;
    let (second_id, second_token) = login(&app, &email).await;

    assert_eq!(first_id, second_id);
    // Multi-device: both sessions stay active.
    assert_ne!(first_token, second_token);
}

#[tokio::test]
async fn login_normalizes_email_before_lookup() {
    let Some(pool) = support::test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = build_app(pool, support::test_config());
    let email = support::unique_email("case");

    let (first_id, _) = login(&app, &email).await;
    let shouty = format!("  {}  ", email.to_uppercase());
    let (second_id, _) = login(&app, &shouty).await;

    assert_eq!(first_id, second_id);
}

#[tokio::test]
async fn me_returns_the_session_owner() {
    let Some(pool) = support::test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = build_app(pool, support::test_config());
    let email = support::unique_email("me");
    let (user_id, token) = login(&app, &email).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["data"]["id"], user_id.as_str());
    assert_eq!(json["data"]["email"], email.to_lowercase());
}

#[tokio::test]
async fn logout_invalidates_the_token() {
    let Some(pool) = support::test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = build_app(pool.clone(), support::test_config());
    let email = support::unique_email("logout");
    let (_, token) = login(&app, &email).await;

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"].is_null());

    let user = session_repo::validate_token(&pool, &token)
        .await
        .expect("validate after logout");
    assert!(user.is_none());

    // The same token now behaves like it never existed.
    let response = app
        .oneshot(
            Request::builder()
                .uri("/auth/me")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Invalid or expired session");
}

#[tokio::test]
async fn logout_with_expired_token_still_succeeds() {
    let Some(pool) = support::test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let app = build_app(pool.clone(), support::test_config());
    let email = support::unique_email("logout-expired");
    let user = user_repo::find_or_create_by_email(&pool, &email)
        .await
        .expect("create user");

    let token = generate_session_token();
    let expired = Session::new(
        token.clone(),
        user.id.clone(),
        Utc::now() - Duration::days(1),
    );
    session_repo::insert(&pool, &expired).await.expect("insert session");

    // An expired session still logs out cleanly: the row is deleted and
    // the client gets a 200, not the gate's 401.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    assert!(json["data"].is_null());

    assert!(session_repo::find_by_token(&pool, &token)
        .await
        .expect("lookup after logout")
        .is_none());

    // A second logout with the now-absent token is a non-fatal no-op.
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/logout")
                .header("Authorization", format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn expired_session_is_purged_on_validation() {
    let Some(pool) = support::test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let email = support::unique_email("expired");
    let user = user_repo::find_or_create_by_email(&pool, &email)
        .await
        .expect("create user");

    let token = generate_session_token();
    let expired = Session::new(
        token.clone(),
        user.id.clone(),
        Utc::now() - Duration::days(1),
    );
    session_repo::insert(&pool, &expired).await.expect("insert session");

    // First validation detects expiry, deletes the row, and yields no user.
    let resolved = session_repo::validate_token(&pool, &token)
        .await
        .expect("validate expired");
    assert!(resolved.is_none());

    let row = session_repo::find_by_token(&pool, &token)
        .await
        .expect("lookup after purge");
    assert!(row.is_none());
}

#[tokio::test]
async fn unexpired_validation_does_not_mutate() {
    let Some(pool) = support::test_pool().await else {
        eprintln!("skipping: TEST_DATABASE_URL not set");
        return;
    };
    let email = support::unique_email("active");
    let user = user_repo::find_or_create_by_email(&pool, &email)
        .await
        .expect("create user");

    let token = generate_session_token();
    let session = Session::new(
        token.clone(),
        user.id.clone(),
        Utc::now() + Duration::days(30),
    );
    session_repo::insert(&pool, &session).await.expect("insert session");

    for _ in 0..3 {
        let resolved = session_repo::validate_token(&pool, &token)
            .await
            .expect("validate active")
            .expect("user resolved");
        assert_eq!(resolved.id, user.id);
    }

    assert!(session_repo::find_by_token(&pool, &token)
        .await
        .expect("lookup")
        .is_some());
}
