//! API route modules
//!
//! # Structure
//!
//! - [`users`] account management and auth endpoints
//! - [`brands`] brand management
//! - [`categories`] category management
//! - [`base_products`] base product catalog (multipart create/update)
//! - [`variants`] sellable product variants
//! - [`discounts`] per-variant discounts

pub mod base_products;
pub mod brands;
pub mod categories;
pub mod discounts;
pub mod users;
pub mod variants;

use axum::Router;
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{
    MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::core::AppState;

/// Custom request ID generator
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        let id = Uuid::new_v4().to_string();
        HeaderValue::from_str(&id).ok().map(RequestId::new)
    }
}

/// Build a router with all routes registered (no middleware, no state)
pub fn build_router() -> Router<AppState> {
    Router::new()
        .merge(users::router())
        .merge(brands::router())
        .merge(categories::router())
        .merge(base_products::router())
        .merge(variants::router())
        .merge(discounts::router())
}

/// Build the fully configured application with middleware and state.
/// Used by both the HTTP server and the integration tests.
pub fn build_app(state: AppState) -> Router {
    build_router()
        // CORS - handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - gzip responses
        .layer(CompressionLayer::new())
        // Trace - request logging at INFO level
        .layer(TraceLayer::new_for_http())
        // Request ID - unique ID per request, propagated to the response
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static("x-request-id"),
            XRequestId,
        ))
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            "x-request-id",
        )))
        // JWT authentication - injects CurrentUser before routes run
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            crate::auth::require_auth,
        ))
        .with_state(state)
}
