//! User API Handlers
//!
//! Login, registration, token refresh and account management.

use std::time::Duration;

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::user;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::{
    MAX_NAME_LEN, validate_email, validate_optional_text, validate_password,
};
use crate::utils::{AppError, AppResult};
use shared::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use shared::models::{UserCreate, UserUpdate};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

/// POST /users/login
///
/// Exchanges credentials for an access/refresh token pair. Unknown
/// email and wrong password share one error message so accounts cannot
/// be enumerated.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim().to_lowercase();
    let account = user::find_by_email(&state.pool, &email).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        Some(account) => {
            if !account.is_active {
                return Err(AppError::forbidden("Account has been disabled"));
            }

            let password_valid = verify_password(&req.password, &account.password_hash)
                .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

            if !password_valid {
                tracing::warn!(email = %email, "Login failed: invalid credentials");
                return Err(AppError::invalid_credentials());
            }
            account
        }
        None => {
            tracing::warn!(email = %email, "Login failed: unknown email");
            return Err(AppError::invalid_credentials());
        }
    };

    user::touch_last_access(&state.pool, account.id).await?;

    let access = state
        .jwt_service
        .generate_access_token(account.id, &account.email, account.is_staff)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;
    let refresh = state
        .jwt_service
        .generate_refresh_token(account.id, &account.email, account.is_staff)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = account.id, email = %account.email, "User logged in");

    Ok(Json(LoginResponse {
        access,
        refresh,
        user: account.to_info(),
    }))
}

/// POST /users/register
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<Value>> {
    let email = payload.email.trim().to_lowercase();
    validate_email(&email)?;
    validate_password(&payload.password)?;
    if payload.first_name.len() > MAX_NAME_LEN {
        return Err(AppError::validation("first_name is too long"));
    }
    if payload.last_name.len() > MAX_NAME_LEN {
        return Err(AppError::validation("last_name is too long"));
    }

    if user::find_by_email(&state.pool, &email).await?.is_some() {
        return Err(AppError::conflict(format!(
            "An account with email {email} already exists"
        )));
    }

    let password_hash = hash_password(&payload.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let account = user::create(
        &state.pool,
        &email,
        &password_hash,
        &payload.first_name,
        &payload.last_name,
        false,
    )
    .await?;

    tracing::info!(user_id = account.id, email = %account.email, "User registered");

    Ok(Json(json!({
        "message": "User registered",
        "user": account.to_info(),
    })))
}

/// POST /users/token/refresh
///
/// Exchanges a valid refresh token for a fresh access token. The
/// account is re-checked so deactivation takes effect immediately.
pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> AppResult<Json<RefreshResponse>> {
    let claims = state
        .jwt_service
        .validate_refresh_token(&req.refresh)
        .map_err(|e| match e {
            crate::auth::JwtError::ExpiredToken => AppError::TokenExpired,
            _ => AppError::InvalidToken,
        })?;

    let user_id = claims
        .sub
        .parse::<i64>()
        .map_err(|_| AppError::InvalidToken)?;
    let account = user::get(&state.pool, user_id)
        .await?
        .ok_or(AppError::InvalidToken)?;
    if !account.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    let access = state
        .jwt_service
        .generate_access_token(account.id, &account.email, account.is_staff)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    Ok(Json(RefreshResponse { access }))
}

/// GET /users/list
pub async fn list(
    State(state): State<AppState>,
    _current_user: CurrentUser,
) -> AppResult<Json<Vec<UserInfo>>> {
    let users = user::list(&state.pool).await?;
    Ok(Json(users.iter().map(|u| u.to_info()).collect()))
}

/// PUT|PATCH /users/update/{id}
pub async fn update(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<Value>> {
    let email = match &payload.email {
        Some(raw) => {
            let normalized = raw.trim().to_lowercase();
            validate_email(&normalized)?;
            Some(normalized)
        }
        None => None,
    };
    validate_optional_text(&payload.first_name, "first_name", MAX_NAME_LEN)?;
    validate_optional_text(&payload.last_name, "last_name", MAX_NAME_LEN)?;

    let password_hash = match &payload.password {
        Some(password) => {
            validate_password(password)?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?,
            )
        }
        None => None,
    };

    let account = user::update(
        &state.pool,
        id,
        email.as_deref(),
        password_hash.as_deref(),
        payload.first_name.as_deref(),
        payload.last_name.as_deref(),
    )
    .await?;

    Ok(Json(json!({
        "message": "User updated",
        "user": account.to_info(),
    })))
}

/// POST /users/activate/{id}
pub async fn activate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let account = user::set_active(&state.pool, id, true).await?;
    Ok(Json(json!({
        "message": "User activated",
        "user": account.to_info(),
    })))
}

/// POST /users/deactivate/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let account = user::set_active(&state.pool, id, false).await?;
    Ok(Json(json!({
        "message": "User deactivated",
        "user": account.to_info(),
    })))
}
