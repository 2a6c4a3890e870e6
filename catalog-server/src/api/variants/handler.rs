//! Product Variant API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::filter::VariantFilterParams;
use crate::db::repository::product_variant;
use crate::utils::validation::{MAX_DESCRIPTION_LEN, validate_optional_text, validate_price};
use crate::utils::{AppError, AppResult};
use shared::models::{ProductVariant, ProductVariantCreate, ProductVariantUpdate};

/// GET /products/variants/
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<VariantFilterParams>,
) -> AppResult<Json<Vec<ProductVariant>>> {
    let variants = product_variant::list(&state.pool, &params).await?;
    Ok(Json(variants))
}

/// GET /products/variants/{id}/
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductVariant>> {
    let variant = product_variant::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Product variant {id} not found")))?;
    Ok(Json(variant))
}

/// POST /products/variants/create/
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(payload): Json<ProductVariantCreate>,
) -> AppResult<Json<Value>> {
    validate_price(payload.price, "price")?;
    if payload.description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::validation("description is too long"));
    }

    let variant = product_variant::create(&state.pool, payload, current_user.id).await?;
    Ok(Json(json!({
        "message": "Product variant created",
        "product_variant": variant,
    })))
}

/// PUT|PATCH /products/variants/update/{id}
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<ProductVariantUpdate>,
) -> AppResult<Json<Value>> {
    if let Some(price) = payload.price {
        validate_price(price, "price")?;
    }
    validate_optional_text(&payload.description, "description", MAX_DESCRIPTION_LEN)?;

    let variant = product_variant::update(&state.pool, id, payload, current_user.id).await?;
    Ok(Json(json!({
        "message": "Product variant updated",
        "product_variant": variant,
    })))
}

/// POST /products/variants/activate/{id}
pub async fn activate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let variant = product_variant::set_active(&state.pool, id, true).await?;
    Ok(Json(json!({
        "message": "Product variant activated",
        "product_variant": variant,
    })))
}

/// POST /products/variants/deactivate/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let variant = product_variant::set_active(&state.pool, id, false).await?;
    Ok(Json(json!({
        "message": "Product variant deactivated",
        "product_variant": variant,
    })))
}

/// POST /products/variants/publish/{id}
pub async fn publish(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let variant = product_variant::set_published(&state.pool, id, true).await?;
    Ok(Json(json!({
        "message": "Product variant published",
        "product_variant": variant,
    })))
}

/// POST /products/variants/unpublish/{id}
pub async fn unpublish(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let variant = product_variant::set_published(&state.pool, id, false).await?;
    Ok(Json(json!({
        "message": "Product variant unpublished",
        "product_variant": variant,
    })))
}
