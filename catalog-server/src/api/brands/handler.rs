//! Brand API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::brand;
use crate::utils::AppResult;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::models::{Brand, BrandCreate, BrandUpdate};

/// GET /products/brands/
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Brand>>> {
    let brands = brand::list(&state.pool).await?;
    Ok(Json(brands))
}

/// POST /products/brands/create/
pub async fn create(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(payload): Json<BrandCreate>,
) -> AppResult<Json<Value>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;

    let brand = brand::create(&state.pool, payload).await?;
    Ok(Json(json!({
        "message": "Brand created",
        "brand": brand,
    })))
}

/// PUT|PATCH /products/brands/update/{id}
pub async fn update(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<BrandUpdate>,
) -> AppResult<Json<Value>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }

    let brand = brand::update(&state.pool, id, payload).await?;
    Ok(Json(json!({
        "message": "Brand updated",
        "brand": brand,
    })))
}

/// POST /products/brands/activate/{id}
pub async fn activate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let brand = brand::set_active(&state.pool, id, true).await?;
    Ok(Json(json!({
        "message": "Brand activated",
        "brand": brand,
    })))
}

/// POST /products/brands/deactivate/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let brand = brand::set_active(&state.pool, id, false).await?;
    Ok(Json(json!({
        "message": "Brand deactivated",
        "brand": brand,
    })))
}
