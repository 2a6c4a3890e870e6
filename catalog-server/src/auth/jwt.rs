//! JWT token service
//!
//! Issues and validates the two token kinds: short-lived access tokens
//! sent on every request and longer-lived refresh tokens exchanged for
//! new access tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// Signing secret, at least 32 bytes
    pub secret: String,
    /// Access token lifetime in minutes
    pub access_minutes: i64,
    /// Refresh token lifetime in days
    pub refresh_days: i64,
    /// Token issuer
    pub issuer: String,
    /// Token audience
    pub audience: String,
}

impl JwtConfig {
    /// Load from environment with development defaults.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            tracing::warn!("JWT_SECRET not set, using development default");
            "catalog-development-secret-change-in-production".to_string()
        });

        Self {
            secret,
            access_minutes: std::env::var("JWT_ACCESS_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            refresh_days: std::env::var("JWT_REFRESH_DAYS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(7),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "catalog-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "catalog-clients".to_string()),
        }
    }
}

/// Claims stored in each token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id (subject)
    pub sub: String,
    /// Account email
    pub email: String,
    /// Staff flag
    pub is_staff: bool,
    /// "access" or "refresh"
    pub token_type: String,
    /// Expiry timestamp (seconds)
    pub exp: i64,
    /// Issued-at timestamp (seconds)
    pub iat: i64,
    /// Issuer
    pub iss: String,
    /// Audience
    pub aud: String,
}

/// JWT errors
#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Wrong token type: expected {expected}, got {got}")]
    WrongTokenType { expected: &'static str, got: String },

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),
}

/// JWT token service
#[derive(Debug, Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn new(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    /// Issue a short-lived access token.
    pub fn generate_access_token(
        &self,
        user_id: i64,
        email: &str,
        is_staff: bool,
    ) -> Result<String, JwtError> {
        self.generate(
            user_id,
            email,
            is_staff,
            "access",
            Duration::minutes(self.config.access_minutes),
        )
    }

    /// Issue a refresh token.
    pub fn generate_refresh_token(
        &self,
        user_id: i64,
        email: &str,
        is_staff: bool,
    ) -> Result<String, JwtError> {
        self.generate(
            user_id,
            email,
            is_staff,
            "refresh",
            Duration::days(self.config.refresh_days),
        )
    }

    fn generate(
        &self,
        user_id: i64,
        email: &str,
        is_staff: bool,
        token_type: &str,
        lifetime: Duration,
    ) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            is_staff,
            token_type: token_type.to_string(),
            exp: (now + lifetime).timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    /// Validate and decode a token of either kind.
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                ErrorKind::InvalidToken => JwtError::InvalidToken(e.to_string()),
                _ => JwtError::InvalidToken(format!("Token validation failed: {e}")),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Validate a token and require the access kind. Refresh tokens are
    /// rejected here so they cannot be used to call the API directly.
    pub fn validate_access_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != "access" {
            return Err(JwtError::WrongTokenType {
                expected: "access",
                got: claims.token_type,
            });
        }
        Ok(claims)
    }

    /// Validate a token and require the refresh kind.
    pub fn validate_refresh_token(&self, token: &str) -> Result<Claims, JwtError> {
        let claims = self.validate_token(token)?;
        if claims.token_type != "refresh" {
            return Err(JwtError::WrongTokenType {
                expected: "refresh",
                got: claims.token_type,
            });
        }
        Ok(claims)
    }

    /// Extract the token from an Authorization header.
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ")
    }
}

/// Authenticated request identity, parsed from validated claims and
/// injected into request extensions by the auth middleware.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub email: String,
    pub is_staff: bool,
}

impl TryFrom<Claims> for CurrentUser {
    type Error = JwtError;

    fn try_from(claims: Claims) -> Result<Self, Self::Error> {
        let id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| JwtError::InvalidToken(format!("Malformed subject: {}", claims.sub)))?;
        Ok(Self {
            id,
            email: claims.email,
            is_staff: claims.is_staff,
        })
    }
}
