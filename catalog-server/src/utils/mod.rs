//! Utility modules: error types, validation helpers, slugs and logging.

pub mod error;
pub mod logger;
pub mod password;
pub mod result;
pub mod slug;
pub mod validation;

pub use error::{AppError, AppResponse};
pub use result::AppResult;
