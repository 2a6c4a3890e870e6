use super::error::AppError;

/// Application result alias used across handlers and services.
pub type AppResult<T> = Result<T, AppError>;
