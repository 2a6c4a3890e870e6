//! Authentication module
//!
//! JWT issuance and verification plus the request-side plumbing:
//! - [`JwtService`] issues and validates access/refresh tokens
//! - [`CurrentUser`] is the authenticated identity injected per request
//! - [`require_auth`] guards every non-public route

pub mod extractor;
pub mod jwt;
pub mod middleware;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;
