//! Models for products, the per-user ordered items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
/// A product row owned by exactly one user.
///
/// `sort_order` is the item's position in the user's list. Creation appends
/// at `max + 1`; deletion leaves a gap; only a reorder call reassigns the
/// whole set back to the dense `0..count` sequence.
pub struct Product {
    pub id: String,
    pub name: String,
    pub amount: f64,
    pub comment: Option<String>,
    /// Position within the owning user's list, exposed as `order` on the wire.
    #[serde(rename = "order")]
    pub sort_order: i32,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
/// Payload for `POST /products`.
pub struct CreateProductPayload {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub comment: Option<String>,
}

#[derive(Debug, Deserialize)]
/// Payload for `PUT /products/{id}`. Absent fields are left untouched.
pub struct UpdateProductPayload {
    pub name: Option<String>,
    pub amount: Option<f64>,
    /// Outer `None` means the field was absent; `Some(None)` means an
    /// explicit `null` that clears the stored comment.
    #[serde(default, deserialize_with = "double_option")]
    pub comment: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}
