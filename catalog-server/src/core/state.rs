//! Shared application state
//!
//! One [`AppState`] is built at startup and cloned into every request
//! via the router. All members are cheap to clone.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::core::Config;
use crate::db::DbService;
use crate::services::MediaStore;
use crate::utils::AppError;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: SqlitePool,
    pub jwt_service: Arc<JwtService>,
    pub media: Arc<MediaStore>,
}

impl AppState {
    /// Create directories, open the database and build the services.
    pub async fn initialize(config: &Config) -> Result<Self, AppError> {
        std::fs::create_dir_all(&config.work_dir)
            .map_err(|e| AppError::internal(format!("Failed to create work dir: {e}")))?;

        let db_path = config.database_path();
        let db_path = db_path
            .to_str()
            .ok_or_else(|| AppError::internal("Database path is not valid UTF-8"))?;
        let db = DbService::new(db_path).await?;

        let media = MediaStore::new(config.media_dir())?;

        Ok(Self {
            config: Arc::new(config.clone()),
            pool: db.pool,
            jwt_service: Arc::new(JwtService::new(config.jwt.clone())),
            media: Arc::new(media),
        })
    }
}
