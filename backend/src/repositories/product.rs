//! Repository functions for the per-user ordered product collection.

use std::collections::HashSet;

use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::product::Product;

const PRODUCT_COLUMNS: &str =
    "id, name, amount, comment, sort_order, user_id, created_at, updated_at";

pub async fn list_for_user(pool: &PgPool, user_id: &str) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = $1 ORDER BY sort_order ASC",
    ))
    .bind(user_id)
    .fetch_all(pool)
    .await
}

/// Fetches a product only when it exists and belongs to the user. A row
/// owned by someone else is indistinguishable from a missing one.
pub async fn find_owned(
    pool: &PgPool,
    id: &str,
    user_id: &str,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND user_id = $2",
    ))
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Inserts a product at the end of the user's list: `max(sort_order) + 1`,
/// or 0 when the list is empty. The position is computed inside the insert
/// statement so it reflects the table state at write time.
pub async fn insert(
    pool: &PgPool,
    user_id: &str,
    name: &str,
    amount: f64,
    comment: Option<&str>,
) -> Result<Product, sqlx::Error> {
    let now = Utc::now();
    sqlx::query_as::<_, Product>(&format!(
        "INSERT INTO products (id, name, amount, comment, sort_order, user_id, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, \
                 (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM products WHERE user_id = $5), \
                 $5, $6, $6) \
         RETURNING {PRODUCT_COLUMNS}",
    ))
    .bind(Uuid::new_v4().to_string())
    .bind(name)
    .bind(amount)
    .bind(comment)
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await
}

/// Rewrites the mutable columns of an owned product. `sort_order` is never
/// touched here; only a reorder call changes positions.
pub async fn update(
    pool: &PgPool,
    id: &str,
    user_id: &str,
    name: &str,
    amount: f64,
    comment: Option<&str>,
) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(&format!(
        "UPDATE products SET name = $1, amount = $2, comment = $3, updated_at = $4 \
         WHERE id = $5 AND user_id = $6 \
         RETURNING {PRODUCT_COLUMNS}",
    ))
    .bind(name)
    .bind(amount)
    .bind(comment)
    .bind(Utc::now())
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Deletes an owned product. Survivors keep their positions; the resulting
/// gap persists until the next reorder.
pub async fn delete(pool: &PgPool, id: &str, user_id: &str) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1 AND user_id = $2")
        .bind(id)
        .bind(user_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Assigns `sort_order = index` for each id at its submitted position,
/// inside a single transaction so readers never observe a partially
/// renumbered list.
pub async fn apply_order(
    pool: &PgPool,
    user_id: &str,
    ordered_ids: &[String],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    let now = Utc::now();

    for (index, id) in ordered_ids.iter().enumerate() {
        sqlx::query(
            "UPDATE products SET sort_order = $1, updated_at = $2 WHERE id = $3 AND user_id = $4",
        )
        .bind(index as i32)
        .bind(now)
        .bind(id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Whether `submitted` is exactly a permutation of `owned`: same length,
/// every id owned, no duplicates.
pub fn is_permutation_of(submitted: &[String], owned: &[String]) -> bool {
    if submitted.len() != owned.len() {
        return false;
    }
    let owned_set: HashSet<&str> = owned.iter().map(String::as_str).collect();
    let mut seen: HashSet<&str> = HashSet::with_capacity(submitted.len());
    submitted
        .iter()
        .all(|id| owned_set.contains(id.as_str()) && seen.insert(id.as_str()))
}
