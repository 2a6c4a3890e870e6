//! Discount Model

use serde::{Deserialize, Serialize};

/// A discounted price attached to a single product variant.
/// At most one discount row exists per variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Discount {
    pub id: i64,
    pub product_variant_id: i64,
    pub discount_price: i64,
    pub active: bool,
    pub creation_date: i64,
    pub update_date: i64,
}

/// Payload for creating a discount
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountCreate {
    pub product_variant_id: i64,
    pub discount_price: i64,
}

/// Payload for updating a discount (partial)
#[derive(Debug, Clone, Deserialize)]
pub struct DiscountUpdate {
    pub discount_price: Option<i64>,
}
