use axum::{
    extract::{Extension, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use sqlx::PgPool;

use crate::{
    config::Config,
    error::AppError,
    handlers::ApiJson,
    models::{
        product::{CreateProductPayload, Product, UpdateProductPayload},
        user::User,
        ApiResponse,
    },
    repositories::product as product_repo,
    validation::rules,
};

pub async fn list_products(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(user): Extension<User>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let products = product_repo::list_for_user(&pool, &user.id).await?;
    Ok(Json(ApiResponse::ok(products)))
}

pub async fn get_product(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let product = product_repo::find_owned(&pool, &id, &user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;
    Ok(Json(ApiResponse::ok(product)))
}

pub async fn create_product(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(user): Extension<User>,
    ApiJson(payload): ApiJson<CreateProductPayload>,
) -> Result<(StatusCode, Json<ApiResponse<Product>>), AppError> {
    rules::validate_product_name(&payload.name)?;
    rules::validate_amount(payload.amount)?;

    let name = payload.name.trim();
    let comment = normalize_comment(payload.comment.as_deref());

    let product =
        product_repo::insert(&pool, &user.id, name, payload.amount, comment.as_deref()).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(product))))
}

/// `PUT /products/{id}` — partial update. Fields absent from the payload
/// keep their stored value; an explicit `"comment": null` clears the
/// comment. The item's position never changes here.
pub async fn update_product(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<UpdateProductPayload>,
) -> Result<Json<ApiResponse<Product>>, AppError> {
    let existing = product_repo::find_owned(&pool, &id, &user.id)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    let name = match &payload.name {
        Some(name) => {
            rules::validate_product_name(name)?;
            name.trim().to_string()
        }
        None => existing.name,
    };

    let amount = match payload.amount {
        Some(amount) => {
            rules::validate_amount(amount)?;
            amount
        }
        None => existing.amount,
    };

    let comment = match &payload.comment {
        Some(comment) => normalize_comment(comment.as_deref()),
        None => existing.comment,
    };

    let product = product_repo::update(&pool, &id, &user.id, &name, amount, comment.as_deref())
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(ApiResponse::ok(product)))
}

pub async fn delete_product(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(user): Extension<User>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    let deleted = product_repo::delete(&pool, &id, &user.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Product not found".to_string()));
    }
    Ok(Json(ApiResponse::ok(Value::Null)))
}

/// `PUT /products/reorder` — atomically reassigns every position.
///
/// The submitted id list must be exactly a permutation of the caller's
/// current items; on any mismatch the stored order is left untouched.
pub async fn reorder_products(
    State((pool, _config)): State<(PgPool, Config)>,
    Extension(user): Extension<User>,
    ApiJson(payload): ApiJson<Value>,
) -> Result<Json<ApiResponse<Vec<Product>>>, AppError> {
    let ordered_ids = parse_reorder_payload(&payload)?;

    let current = product_repo::list_for_user(&pool, &user.id).await?;
    let owned_ids: Vec<String> = current.into_iter().map(|p| p.id).collect();

    if !product_repo::is_permutation_of(&ordered_ids, &owned_ids) {
        return Err(AppError::Validation(
            "Invalid product IDs in order".to_string(),
        ));
    }

    product_repo::apply_order(&pool, &user.id, &ordered_ids).await?;

    let products = product_repo::list_for_user(&pool, &user.id).await?;
    Ok(Json(ApiResponse::ok(products)))
}

fn parse_reorder_payload(payload: &Value) -> Result<Vec<String>, AppError> {
    let invalid = || AppError::Validation("Invalid order data".to_string());
    let items = payload
        .get("orderedIds")
        .and_then(Value::as_array)
        .ok_or_else(invalid)?;
    items
        .iter()
        .map(|v| v.as_str().map(str::to_owned).ok_or_else(invalid))
        .collect()
}

/// Trims a submitted comment; whitespace-only collapses to `None` (stored
/// as NULL).
fn normalize_comment(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reorder_payload_requires_an_array_of_strings() {
        assert!(parse_reorder_payload(&json!({})).is_err());
        assert!(parse_reorder_payload(&json!({ "orderedIds": "a" })).is_err());
        assert!(parse_reorder_payload(&json!({ "orderedIds": [1, 2] })).is_err());

        let ids = parse_reorder_payload(&json!({ "orderedIds": ["b", "a"] })).unwrap();
        assert_eq!(ids, vec!["b".to_string(), "a".to_string()]);

        let empty = parse_reorder_payload(&json!({ "orderedIds": [] })).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn comment_normalization_trims_and_nulls() {
        assert_eq!(normalize_comment(None), None);
        assert_eq!(normalize_comment(Some("")), None);
        assert_eq!(normalize_comment(Some("   ")), None);
        assert_eq!(normalize_comment(Some("  blue  ")), Some("blue".to_string()));
    }
}
