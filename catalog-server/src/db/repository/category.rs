//! Category Repository

use super::{RepoError, RepoResult};
use crate::utils::slug::slugify;
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

const COLUMNS: &str = "id, name, slug, description, active";

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let categories = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category ORDER BY name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(categories)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let category = sqlx::query_as::<_, Category>(&format!(
        "SELECT {COLUMNS} FROM category WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(category)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let slug = slugify(&data.name);
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO category (name, slug, description, active) VALUES (?1, ?2, ?3, 1) RETURNING id",
    )
    .bind(&data.name)
    .bind(&slug)
    .bind(&data.description)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

/// Partial update; the slug stays stable on rename.
pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let rows = sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), description = COALESCE(?2, description) WHERE id = ?3",
    )
    .bind(&data.name)
    .bind(&data.description)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> RepoResult<Category> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))?;

    if current.active == active {
        let state = if active { "active" } else { "inactive" };
        return Err(RepoError::Conflict(format!(
            "Category {id} is already {state}"
        )));
    }

    sqlx::query("UPDATE category SET active = ?1 WHERE id = ?2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}
