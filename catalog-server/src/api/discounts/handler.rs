//! Discount API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::discount;
use crate::utils::validation::validate_price;
use crate::utils::{AppError, AppResult};
use shared::models::{Discount, DiscountCreate, DiscountUpdate};

/// GET /products/discounts/
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Discount>>> {
    let discounts = discount::list(&state.pool).await?;
    Ok(Json(discounts))
}

/// GET /products/discounts/{id}/
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Discount>> {
    let discount = discount::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Discount {id} not found")))?;
    Ok(Json(discount))
}

/// POST /products/discounts/create/
pub async fn create(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Json(payload): Json<DiscountCreate>,
) -> AppResult<Json<Value>> {
    validate_price(payload.discount_price, "discount_price")?;

    let discount = discount::create(&state.pool, payload).await?;
    Ok(Json(json!({
        "message": "Discount created",
        "discount": discount,
    })))
}

/// PUT|PATCH /products/discounts/update/{id}
pub async fn update(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<DiscountUpdate>,
) -> AppResult<Json<Value>> {
    if let Some(price) = payload.discount_price {
        validate_price(price, "discount_price")?;
    }

    let discount = discount::update(&state.pool, id, payload).await?;
    Ok(Json(json!({
        "message": "Discount updated",
        "discount": discount,
    })))
}

/// POST /products/discounts/activate/{id}
pub async fn activate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let discount = discount::set_active(&state.pool, id, true).await?;
    Ok(Json(json!({
        "message": "Discount activated",
        "discount": discount,
    })))
}

/// POST /products/discounts/deactivate/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let discount = discount::set_active(&state.pool, id, false).await?;
    Ok(Json(json!({
        "message": "Discount deactivated",
        "discount": discount,
    })))
}
