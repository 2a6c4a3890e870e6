//! Brand Repository

use super::{RepoError, RepoResult};
use crate::utils::slug::slugify;
use shared::models::{Brand, BrandCreate, BrandUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, slug, active";

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Brand>> {
    let brands = sqlx::query_as::<_, Brand>(&format!(
        "SELECT {COLUMNS} FROM brand ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(brands)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Brand>> {
    let brand = sqlx::query_as::<_, Brand>(&format!(
        "SELECT {COLUMNS} FROM brand WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(brand)
}

pub async fn create(pool: &SqlitePool, data: BrandCreate) -> RepoResult<Brand> {
    let slug = slugify(&data.name);
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO brand (name, slug, active) VALUES (?1, ?2, 1) RETURNING id",
    )
    .bind(&data.name)
    .bind(&slug)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create brand".into()))
}

/// Partial update. The slug is generated once at creation and kept
/// stable on rename.
pub async fn update(pool: &SqlitePool, id: i64, data: BrandUpdate) -> RepoResult<Brand> {
    let rows = sqlx::query("UPDATE brand SET name = COALESCE(?1, name) WHERE id = ?2")
        .bind(&data.name)
        .bind(id)
        .execute(pool)
        .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Brand {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Brand {id} not found")))
}

/// Flip the active flag. Setting the flag to its current value is a
/// conflict, so repeated toggles surface instead of silently passing.
pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> RepoResult<Brand> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Brand {id} not found")))?;

    if current.active == active {
        let state = if active { "active" } else { "inactive" };
        return Err(RepoError::Conflict(format!("Brand {id} is already {state}")));
    }

    sqlx::query("UPDATE brand SET active = ?1 WHERE id = ?2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Brand {id} not found")))
}
