//! Auth DTOs
//!
//! Request/response payloads for the login and token-refresh endpoints.

use serde::{Deserialize, Serialize};

/// Login request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: short-lived access token, longer-lived refresh token
/// and a snapshot of the authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub user: UserInfo,
}

/// Token refresh request payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// Token refresh response: a fresh access token only; the refresh token
/// stays valid until its own expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// Public view of a user account (never carries the password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}
