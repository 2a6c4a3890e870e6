use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// Every item can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory for the database, media and logs |
/// | HTTP_PORT | 3000 | HTTP service port |
/// | ENVIRONMENT | development | development \| staging \| production |
/// | JWT_SECRET | (dev default) | Token signing secret |
/// | JWT_ACCESS_MINUTES | 30 | Access token lifetime |
/// | JWT_REFRESH_DAYS | 7 | Refresh token lifetime |
/// | JWT_ISSUER | catalog-server | Token issuer |
/// | JWT_AUDIENCE | catalog-clients | Token audience |
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory holding the database, media files and logs
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// JWT configuration
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
}

impl Config {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            jwt: JwtConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
        }
    }

    /// Override the working directory and port, typically for tests.
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// Path of the SQLite database file.
    pub fn database_path(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("catalog.db")
    }

    /// Root directory for uploaded media.
    pub fn media_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("media")
    }

    /// Directory for rolling log files.
    pub fn log_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("logs")
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
