//! Catalog Server - e-commerce catalog backend
//!
//! Manages brands, categories, base products with JSON specifications,
//! sellable variants, product images, discounts and user accounts, all
//! behind a JWT-authenticated REST API.
//!
//! # Module structure
//!
//! ```text
//! catalog-server/src/
//! ├── core/          # Configuration, state, server
//! ├── auth/          # JWT issuance, middleware, extractor
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool, migrations, repositories
//! ├── services/      # Media storage
//! └── utils/         # Errors, validation, slugs, logging
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod services;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService};
pub use core::{AppState, Config, Server};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______      __        __
  / ____/___ _/ /_____ _/ /___  ____ _
 / /   / __ `/ __/ __ `/ / __ \/ __ `/
/ /___/ /_/ / /_/ /_/ / / /_/ / /_/ /
\____/\__,_/\__/\__,_/_/\____/\__, /
                             /____/
    "#
    );
}

/// Load environment, create the working directory and start logging.
pub fn setup_environment() -> std::io::Result<Config> {
    dotenv::dotenv().ok();

    let config = Config::from_env();
    std::fs::create_dir_all(config.log_dir())?;
    let log_dir = config.log_dir();
    let log_level = if config.is_development() {
        "debug"
    } else {
        "info"
    };
    init_logger_with_file(Some(log_level), log_dir.to_str());

    Ok(config)
}
