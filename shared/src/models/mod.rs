//! Entity Models
//!
//! One module per catalog entity, each carrying the persisted entity
//! struct plus its create/update payloads. Relation fields populated by
//! application code are skipped by `FromRow`.

mod base_product;
mod brand;
mod category;
mod discount;
mod image;
mod product_variant;
mod user;

pub use base_product::{BaseProduct, BaseProductCreate, BaseProductUpdate};
pub use brand::{Brand, BrandCreate, BrandUpdate};
pub use category::{Category, CategoryCreate, CategoryUpdate};
pub use discount::{Discount, DiscountCreate, DiscountUpdate};
pub use image::{Image, NewImage};
pub use product_variant::{
    Condition, ProductVariant, ProductVariantCreate, ProductVariantUpdate, StockStatus,
};
pub use user::{User, UserCreate, UserUpdate};
