//! Discount Repository

use super::{RepoError, RepoResult};
use shared::models::{Discount, DiscountCreate, DiscountUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, product_variant_id, discount_price, active, creation_date, update_date";

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Discount>> {
    let discounts = sqlx::query_as::<_, Discount>(&format!(
        "SELECT {COLUMNS} FROM discount ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(discounts)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Discount>> {
    let discount = sqlx::query_as::<_, Discount>(&format!(
        "SELECT {COLUMNS} FROM discount WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(discount)
}

/// Attach a discount to a variant. The one-to-one constraint surfaces
/// as a duplicate error if the variant already has one.
pub async fn create(pool: &SqlitePool, data: DiscountCreate) -> RepoResult<Discount> {
    let variant_active =
        sqlx::query_scalar::<_, bool>("SELECT active FROM product_variant WHERE id = ?")
            .bind(data.product_variant_id)
            .fetch_optional(pool)
            .await?
            .ok_or_else(|| {
                RepoError::Validation(format!(
                    "Product variant {} does not exist",
                    data.product_variant_id
                ))
            })?;
    if !variant_active {
        return Err(RepoError::Validation(format!(
            "Product variant {} is inactive",
            data.product_variant_id
        )));
    }

    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO discount (product_variant_id, discount_price, active, creation_date, update_date) VALUES (?1, ?2, 1, ?3, ?3) RETURNING id",
    )
    .bind(data.product_variant_id)
    .bind(data.discount_price)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create discount".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: DiscountUpdate) -> RepoResult<Discount> {
    let rows = sqlx::query(
        "UPDATE discount SET discount_price = COALESCE(?1, discount_price), update_date = ?2 WHERE id = ?3",
    )
    .bind(data.discount_price)
    .bind(shared::util::now_millis())
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Discount {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))
}

pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> RepoResult<Discount> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))?;

    if current.active == active {
        let state = if active { "active" } else { "inactive" };
        return Err(RepoError::Conflict(format!(
            "Discount {id} is already {state}"
        )));
    }

    sqlx::query("UPDATE discount SET active = ?1, update_date = ?2 WHERE id = ?3")
        .bind(active)
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Discount {id} not found")))
}
