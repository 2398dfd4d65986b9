use axum::{
    http::Method,
    middleware as axum_middleware,
    routing::{get, post, put},
    Router,
};
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware as auth_middleware;
use crate::{config::Config, error::AppError, handlers};

/// Assembles the full application router. Shared between `main` and the
/// integration tests.
pub fn build_app(pool: PgPool, config: Config) -> Router {
    // Routes that manage the session itself and so sit outside the gate:
    // logout must succeed for an expired token, which the gate would
    // reject with 401 before the handler ran.
    let public_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/logout", post(handlers::auth::logout));

    // Session-protected routes
    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route(
            "/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/products/reorder",
            put(handlers::products::reorder_products),
        )
        .route(
            "/products/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            (pool.clone(), config.clone()),
            auth_middleware::auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .fallback(fallback_not_found)
        .method_not_allowed_fallback(fallback_method_not_allowed)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods([
                            Method::GET,
                            Method::POST,
                            Method::PUT,
                            Method::DELETE,
                            Method::OPTIONS,
                        ])
                        .allow_headers(Any)
                        .max_age(std::time::Duration::from_secs(24 * 60 * 60)),
                ),
        )
        .with_state((pool, config))
}

async fn fallback_not_found() -> AppError {
    AppError::NotFound("Resource not found".to_string())
}

async fn fallback_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
