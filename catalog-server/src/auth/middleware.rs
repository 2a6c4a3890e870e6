//! Authentication middleware
//!
//! Extracts and validates the bearer token from
//! `Authorization: Bearer <token>`, then injects [`CurrentUser`] into
//! request extensions for handlers and extractors downstream.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::AppState;
use crate::utils::AppError;

/// Routes reachable without a token: credential entry points only.
const PUBLIC_PATHS: &[&str] = &["/users/login", "/users/register", "/users/token/refresh"];

/// Require a valid access token on every route except the public ones.
///
/// | Failure | Response |
/// |---------|----------|
/// | Missing Authorization header | 401 Unauthorized |
/// | Expired token | 401 TokenExpired |
/// | Invalid or refresh-typed token | 401 InvalidToken |
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    // CORS preflight never carries credentials
    if req.method() == http::Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let path = req.uri().path();
    if PUBLIC_PATHS.contains(&path) || PUBLIC_PATHS.contains(&path.trim_end_matches('/')) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or(AppError::InvalidToken)?,
        None => {
            warn!(target: "security", uri = %req.uri(), "Missing authorization header");
            return Err(AppError::Unauthorized);
        }
    };

    match state.jwt_service.validate_access_token(token) {
        Ok(claims) => {
            let user = CurrentUser::try_from(claims).map_err(|_| AppError::InvalidToken)?;
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            warn!(target: "security", error = %e, uri = %req.uri(), "Token validation failed");
            match e {
                JwtError::ExpiredToken => Err(AppError::TokenExpired),
                _ => Err(AppError::InvalidToken),
            }
        }
    }
}
