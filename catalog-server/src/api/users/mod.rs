//! User API module
//!
//! Login, registration and token refresh are public; everything else
//! sits behind the auth middleware.

mod handler;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::core::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/users", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handler::login))
        .route("/register", post(handler::register))
        .route("/token/refresh", post(handler::refresh))
        .route("/list", get(handler::list))
        .route("/update/{id}", put(handler::update).patch(handler::update))
        .route("/activate/{id}", post(handler::activate))
        .route("/deactivate/{id}", post(handler::deactivate))
}
