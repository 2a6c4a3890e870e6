//! Product Variant Model

use serde::{Deserialize, Serialize};

use super::Discount;

/// Physical condition of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    New,
    OpenBox,
    Refurbished,
    Used,
}

impl Condition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Condition::New => "new",
            Condition::OpenBox => "open_box",
            Condition::Refurbished => "refurbished",
            Condition::Used => "used",
        }
    }
}

/// Availability of a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    OnTheWay,
    Importing,
    OutOfStock,
}

impl StockStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockStatus::InStock => "in_stock",
            StockStatus::OnTheWay => "on_the_way",
            StockStatus::Importing => "importing",
            StockStatus::OutOfStock => "out_of_stock",
        }
    }
}

/// A sellable variant of a base product: a concrete condition and
/// price. Only published variants show up on public listings; the
/// `discount` relation is hydrated by the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductVariant {
    pub id: i64,
    pub base_product_id: i64,
    /// Price in minor currency units, always positive.
    pub price: i64,
    pub description: String,
    pub condition: Condition,
    pub stock_status: StockStatus,
    pub is_published: bool,
    pub active: bool,
    pub user_last_modified: Option<i64>,
    pub creation_date: i64,
    pub update_date: i64,

    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub discount: Option<Discount>,
}

/// Create variant payload
#[derive(Debug, Clone, Deserialize)]
pub struct ProductVariantCreate {
    pub base_product_id: i64,
    pub price: i64,
    #[serde(default)]
    pub description: String,
    pub condition: Condition,
    pub stock_status: StockStatus,
}

/// Update variant payload (partial)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductVariantUpdate {
    pub price: Option<i64>,
    pub description: Option<String>,
    pub condition: Option<Condition>,
    pub stock_status: Option<StockStatus>,
}
