//! Base Product Model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Brand, Category, Image};

/// A base product: the brand/model pairing that variants hang off.
///
/// `specs` is a free-form JSON object stored as a JSON column; the
/// filter layer reaches into it with `json_extract`. The `brand`,
/// `categories` and `images` fields are hydrated by the repository
/// after the row itself is fetched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct BaseProduct {
    pub id: i64,
    pub model_name: String,
    pub slug: String,
    pub long_description: String,
    pub brand_id: i64,
    #[cfg_attr(feature = "db", sqlx(json))]
    pub specs: Value,
    pub user_last_modified: Option<i64>,
    pub active: bool,
    pub creation_date: i64,
    pub update_date: i64,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub brand: Option<Brand>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub categories: Vec<Category>,
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub images: Vec<Image>,
}

/// Create base product payload
#[derive(Debug, Clone, Deserialize)]
pub struct BaseProductCreate {
    pub model_name: String,
    #[serde(default)]
    pub long_description: String,
    pub brand_id: i64,
    pub categories: Vec<i64>,
    pub specs: Value,
}

/// Update base product payload (partial). `remove_images` names image
/// ids to detach; removals are applied before any new uploads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BaseProductUpdate {
    pub model_name: Option<String>,
    pub long_description: Option<String>,
    pub brand_id: Option<i64>,
    pub categories: Option<Vec<i64>>,
    pub specs: Option<Value>,
    #[serde(default)]
    pub remove_images: Vec<i64>,
}
