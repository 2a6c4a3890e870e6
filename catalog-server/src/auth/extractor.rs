//! JWT Extractor
//!
//! Lets protected handlers take [`CurrentUser`] as an argument. The
//! auth middleware has normally already validated the token and stored
//! the user in request extensions; the extractor falls back to header
//! validation for routes wired without the middleware.

use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::AppState;
use crate::utils::AppError;

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let token = match auth_header {
            Some(header) => {
                JwtService::extract_from_header(header).ok_or(AppError::InvalidToken)?
            }
            None => {
                warn!(target: "security", uri = %parts.uri, "Missing authorization header");
                return Err(AppError::Unauthorized);
            }
        };

        match state.jwt_service.validate_access_token(token) {
            Ok(claims) => {
                let user = CurrentUser::try_from(claims).map_err(|_| AppError::InvalidToken)?;
                parts.extensions.insert(user.clone());
                Ok(user)
            }
            Err(e) => {
                warn!(target: "security", error = %e, uri = %parts.uri, "Token validation failed");
                match e {
                    JwtError::ExpiredToken => Err(AppError::TokenExpired),
                    _ => Err(AppError::InvalidToken),
                }
            }
        }
    }
}
