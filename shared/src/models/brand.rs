//! Brand Model

use serde::{Deserialize, Serialize};

/// A manufacturer brand. Brands are soft-deleted: `active` is flipped
/// instead of removing the row, so historical products keep their link.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub active: bool,
}

/// Payload for creating a brand
#[derive(Debug, Clone, Deserialize)]
pub struct BrandCreate {
    pub name: String,
}

/// Payload for updating a brand (partial)
#[derive(Debug, Clone, Deserialize)]
pub struct BrandUpdate {
    pub name: Option<String>,
}
