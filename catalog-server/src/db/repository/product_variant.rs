//! Product Variant Repository

use super::filter::{VariantFilterParams, variant_query};
use super::{RepoError, RepoResult};
use shared::models::{Discount, ProductVariant, ProductVariantCreate, ProductVariantUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, base_product_id, price, description, condition, stock_status, is_published, active, user_last_modified, creation_date, update_date";

pub async fn list(
    pool: &SqlitePool,
    params: &VariantFilterParams,
) -> RepoResult<Vec<ProductVariant>> {
    let mut variants = variant_query(params)
        .build_query_as::<ProductVariant>()
        .fetch_all(pool)
        .await?;

    for variant in &mut variants {
        hydrate(pool, variant).await?;
    }
    Ok(variants)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductVariant>> {
    let variant = sqlx::query_as::<_, ProductVariant>(&format!(
        "SELECT {COLUMNS} FROM product_variant WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match variant {
        Some(mut v) => {
            hydrate(pool, &mut v).await?;
            Ok(Some(v))
        }
        None => Ok(None),
    }
}

pub async fn create(
    pool: &SqlitePool,
    data: ProductVariantCreate,
    user_id: i64,
) -> RepoResult<ProductVariant> {
    require_active_base_product(pool, data.base_product_id).await?;

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO product_variant (base_product_id, price, description, condition, stock_status, is_published, active, user_last_modified, creation_date, update_date) VALUES (?1, ?2, ?3, ?4, ?5, 0, 1, ?6, ?7, ?7) RETURNING id",
    )
    .bind(data.base_product_id)
    .bind(data.price)
    .bind(&data.description)
    .bind(data.condition.as_str())
    .bind(data.stock_status.as_str())
    .bind(user_id)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product variant".into()))
}

pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: ProductVariantUpdate,
    user_id: i64,
) -> RepoResult<ProductVariant> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product_variant SET price = COALESCE(?1, price), description = COALESCE(?2, description), condition = COALESCE(?3, condition), stock_status = COALESCE(?4, stock_status), user_last_modified = ?5, update_date = ?6 WHERE id = ?7",
    )
    .bind(data.price)
    .bind(&data.description)
    .bind(data.condition.map(|c| c.as_str()))
    .bind(data.stock_status.map(|s| s.as_str()))
    .bind(user_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!(
            "Product variant {id} not found"
        )));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product variant {id} not found")))
}

pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> RepoResult<ProductVariant> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product variant {id} not found")))?;

    if current.active == active {
        let state = if active { "active" } else { "inactive" };
        return Err(RepoError::Conflict(format!(
            "Product variant {id} is already {state}"
        )));
    }

    sqlx::query("UPDATE product_variant SET active = ?1, update_date = ?2 WHERE id = ?3")
        .bind(active)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product variant {id} not found")))
}

pub async fn set_published(
    pool: &SqlitePool,
    id: i64,
    published: bool,
) -> RepoResult<ProductVariant> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product variant {id} not found")))?;

    if current.is_published == published {
        let state = if published {
            "published"
        } else {
            "unpublished"
        };
        return Err(RepoError::Conflict(format!(
            "Product variant {id} is already {state}"
        )));
    }

    sqlx::query("UPDATE product_variant SET is_published = ?1, update_date = ?2 WHERE id = ?3")
        .bind(published)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product variant {id} not found")))
}

async fn require_active_base_product(pool: &SqlitePool, base_product_id: i64) -> RepoResult<()> {
    let active = sqlx::query_scalar::<_, bool>("SELECT active FROM base_product WHERE id = ?")
        .bind(base_product_id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| {
            RepoError::Validation(format!("Base product {base_product_id} does not exist"))
        })?;

    if !active {
        return Err(RepoError::Validation(format!(
            "Base product {base_product_id} is inactive"
        )));
    }
    Ok(())
}

async fn hydrate(pool: &SqlitePool, variant: &mut ProductVariant) -> RepoResult<()> {
    variant.discount = sqlx::query_as::<_, Discount>(
        "SELECT id, product_variant_id, discount_price, active, creation_date, update_date FROM discount WHERE product_variant_id = ? AND active = 1",
    )
    .bind(variant.id)
    .fetch_optional(pool)
    .await?;
    Ok(())
}
