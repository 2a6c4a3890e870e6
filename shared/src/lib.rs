//! Shared types for the catalog platform
//!
//! Entity models, create/update payloads and auth DTOs used by the
//! catalog server. Database derives (`sqlx::FromRow`) are gated behind
//! the `db` feature so non-server consumers stay lightweight.

pub mod auth;
pub mod models;
pub mod util;
