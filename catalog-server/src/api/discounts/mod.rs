//! Discount API module

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        // Nested routers can't match the prefix with a trailing slash,
        // so the list route is registered with its full path.
        .route("/products/discounts/", get(handler::list))
        .nest("/products/discounts", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/create/", post(handler::create))
        .route("/update/{id}", put(handler::update).patch(handler::update))
        .route("/activate/{id}", post(handler::activate))
        .route("/deactivate/{id}", post(handler::deactivate))
        .route("/{id}/", get(handler::detail))
}
