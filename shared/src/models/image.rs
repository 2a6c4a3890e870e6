//! Image Model

use serde::{Deserialize, Serialize};

/// A product image attached to a base product. `file_path` is relative
/// to the media directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Image {
    pub id: i64,
    pub base_product_id: i64,
    pub file_path: String,
    pub alt_text: String,
    pub active: bool,
}

/// A stored upload waiting to be linked to a base product.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub file_path: String,
    pub alt_text: String,
}
