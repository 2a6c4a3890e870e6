//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::category;
use crate::utils::AppResult;
use crate::utils::validation::{
    MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_optional_text, validate_required_text,
};
use shared::models::{Category, CategoryCreate, CategoryUpdate};

/// GET /products/categories/
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::list(&state.pool).await?;
    Ok(Json(categories))
}

/// POST /products/categories/create/
pub async fn create(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Value>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    if !payload.description.is_empty() {
        validate_required_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;
    }

    let category = category::create(&state.pool, payload).await?;
    Ok(Json(json!({
        "message": "Category created",
        "category": category,
    })))
}

/// PUT|PATCH /products/categories/update/{id}
pub async fn update(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Value>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;

    let category = category::update(&state.pool, id, payload).await?;
    Ok(Json(json!({
        "message": "Category updated",
        "category": category,
    })))
}

/// POST /products/categories/activate/{id}
pub async fn activate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let category = category::set_active(&state.pool, id, true).await?;
    Ok(Json(json!({
        "message": "Category activated",
        "category": category,
    })))
}

/// POST /products/categories/deactivate/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let category = category::set_active(&state.pool, id, false).await?;
    Ok(Json(json!({
        "message": "Category deactivated",
        "category": category,
    })))
}
