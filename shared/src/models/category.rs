//! Category Model

use serde::{Deserialize, Serialize};

/// A product category. Products can belong to several categories at
/// once; assignment lives in a junction table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub active: bool,
}

/// Payload for creating a category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryCreate {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Payload for updating a category (partial)
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
}
