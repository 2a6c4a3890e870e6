//! User Repository

use super::{RepoError, RepoResult};
use shared::models::User;
use sqlx::SqlitePool;

const COLUMNS: &str =
    "id, email, password_hash, first_name, last_name, is_staff, is_active, last_access, creation_date";

pub async fn list(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM user ORDER BY email"
    ))
    .fetch_all(pool)
    .await?;
    Ok(users)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM user WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM user WHERE email = ?"))
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

/// Insert a new account. The password arrives already hashed.
pub async fn create(
    pool: &SqlitePool,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
    is_staff: bool,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO user (email, password_hash, first_name, last_name, is_staff, is_active, creation_date) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6) RETURNING id",
    )
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(is_staff)
    .bind(now)
    .fetch_one(pool)
    .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Partial update; `password_hash` replaces the stored hash when set.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    email: Option<&str>,
    password_hash: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> RepoResult<User> {
    let rows = sqlx::query(
        "UPDATE user SET email = COALESCE(?1, email), password_hash = COALESCE(?2, password_hash), first_name = COALESCE(?3, first_name), last_name = COALESCE(?4, last_name) WHERE id = ?5",
    )
    .bind(email)
    .bind(password_hash)
    .bind(first_name)
    .bind(last_name)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> RepoResult<User> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))?;

    if current.is_active == active {
        let state = if active { "active" } else { "inactive" };
        return Err(RepoError::Conflict(format!("User {id} is already {state}")));
    }

    sqlx::query("UPDATE user SET is_active = ?1 WHERE id = ?2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Stamp the last successful login.
pub async fn touch_last_access(pool: &SqlitePool, id: i64) -> RepoResult<()> {
    sqlx::query("UPDATE user SET last_access = ?1 WHERE id = ?2")
        .bind(shared::util::now_millis())
        .bind(id)
        .execute(pool)
        .await?;
    Ok(())
}
