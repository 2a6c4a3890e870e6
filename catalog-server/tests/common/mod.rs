//! Shared test fixtures: in-memory database, app state and a seeded
//! staff account.

use std::str::FromStr;
use std::sync::Arc;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

use catalog_server::auth::{JwtConfig, JwtService};
use catalog_server::core::{AppState, Config};
use catalog_server::services::MediaStore;
use shared::models::User;

pub async fn test_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .pragma("foreign_keys", "ON");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .unwrap();
    sqlx::migrate!("./migrations").run(&pool).await.unwrap();
    pool
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "integration-test-secret-32-chars-min".to_string(),
        access_minutes: 30,
        refresh_days: 7,
        issuer: "catalog-server".to_string(),
        audience: "catalog-clients".to_string(),
    }
}

/// Build an [`AppState`] over an in-memory database and a temporary
/// media directory. The `TempDir` must stay alive for the duration of
/// the test.
pub async fn test_state() -> (AppState, TempDir) {
    let dir = TempDir::new().unwrap();
    let pool = test_pool().await;
    let config = Config::with_overrides(dir.path().to_str().unwrap(), 0);

    let state = AppState {
        config: Arc::new(config),
        pool,
        jwt_service: Arc::new(JwtService::new(test_jwt_config())),
        media: Arc::new(MediaStore::new(dir.path().join("media")).unwrap()),
    };
    (state, dir)
}

/// Insert a staff account with a known password and return it.
pub async fn seed_staff_user(pool: &SqlitePool, email: &str, password: &str) -> User {
    let hash = catalog_server::utils::password::hash_password(password).unwrap();
    catalog_server::db::repository::user::create(pool, email, &hash, "Test", "Staff", true)
        .await
        .unwrap()
}

/// Issue a valid access token for a user.
pub fn access_token_for(state: &AppState, user: &User) -> String {
    state
        .jwt_service
        .generate_access_token(user.id, &user.email, user.is_staff)
        .unwrap()
}
