#![allow(dead_code)]

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use prodlist_backend::config::Config;

/// Connects to `TEST_DATABASE_URL` and applies migrations. Returns `None`
/// when the variable is unset so DB-backed tests skip instead of failing
/// on machines without a Postgres instance.
pub async fn test_pool() -> Option<PgPool> {
    let url = std::env::var("TEST_DATABASE_URL").ok()?;
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await
        .expect("connect to TEST_DATABASE_URL");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("run migrations");
    Some(pool)
}

/// A pool that never connects; requests that are rejected before any
/// database access can run against it.
pub fn lazy_pool() -> PgPool {
    PgPoolOptions::new()
        .connect_lazy("postgres://localhost:1/unreachable")
        .expect("build lazy pool")
}

pub fn test_config() -> Config {
    Config {
        database_url: String::new(),
        port: 0,
        session_expiry_days: 30,
    }
}

/// Fresh email per test so parallel tests never collide on the unique
/// email column.
pub fn unique_email(prefix: &str) -> String {
    format!("{}+{}@example.com", prefix, Uuid::new_v4())
}
