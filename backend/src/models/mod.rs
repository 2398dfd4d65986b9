//! Data models shared across database access and API handlers.

use serde::Serialize;

pub mod product;
pub mod session;
pub mod user;

/// Success half of the uniform response envelope.
///
/// The failure half (`{"success": false, "error": ...}`) is produced by
/// [`crate::error::AppError`].
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
