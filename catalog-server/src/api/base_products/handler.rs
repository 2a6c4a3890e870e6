//! Base Product API Handlers
//!
//! Create and update accept `multipart/form-data`: scalar fields plus
//! positional `image_N` / `alt_text_N` slots (N in 1..=4) and, on
//! update, `remove_images`. Uploaded files are written to the media
//! store first; if the database transaction then fails they are
//! deleted again, and files of removed images are deleted only after
//! the transaction commits.

use std::collections::HashMap;

use axum::{
    Json,
    extract::{Multipart, Path, Query, State},
};
use serde_json::{Value, json};

use crate::auth::CurrentUser;
use crate::core::AppState;
use crate::db::repository::base_product;
use crate::db::repository::filter::BaseProductFilterParams;
use crate::utils::validation::{
    MAX_ALT_TEXT_LEN, MAX_DESCRIPTION_LEN, MAX_NAME_LEN, validate_required_text,
    validate_specs_object,
};
use crate::utils::{AppError, AppResult};
use shared::models::{BaseProduct, BaseProductCreate, BaseProductUpdate, NewImage};

/// Number of positional image slots accepted per request.
const IMAGE_SLOTS: usize = 4;

/// Fields collected from the multipart body. Everything is optional at
/// parse time; create-vs-update requirements are enforced afterwards.
#[derive(Default)]
struct ProductForm {
    model_name: Option<String>,
    long_description: Option<String>,
    brand_id: Option<i64>,
    categories: Option<Vec<i64>>,
    specs: Option<Value>,
    remove_images: Vec<i64>,
    files: HashMap<usize, (String, Vec<u8>)>,
    alt_texts: HashMap<usize, String>,
}

/// Parse an id list sent either as a JSON array (`[1,2]`) or as a
/// single id repeated across form fields.
fn parse_id_list(existing: &mut Vec<i64>, value: &str, field: &str) -> AppResult<()> {
    let trimmed = value.trim();
    if trimmed.starts_with('[') {
        let ids: Vec<i64> = serde_json::from_str(trimmed)
            .map_err(|_| AppError::validation(format!("{field} must be a list of ids")))?;
        existing.extend(ids);
    } else if !trimmed.is_empty() {
        let id = trimmed
            .parse::<i64>()
            .map_err(|_| AppError::validation(format!("{field} must be a list of ids")))?;
        existing.push(id);
    }
    Ok(())
}

fn image_slot(name: &str, prefix: &str) -> Option<usize> {
    let n = name.strip_prefix(prefix)?.parse::<usize>().ok()?;
    (1..=IMAGE_SLOTS).contains(&n).then_some(n)
}

async fn parse_form(mut multipart: Multipart) -> AppResult<ProductForm> {
    let mut form = ProductForm::default();
    let mut categories: Vec<i64> = Vec::new();
    let mut categories_seen = false;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(|n| n.to_string()) else {
            continue;
        };

        if let Some(slot) = image_slot(&name, "image_") {
            let filename = field
                .file_name()
                .map(|f| f.to_string())
                .ok_or_else(|| AppError::validation(format!("{name} must be a file upload")))?;
            let bytes = field.bytes().await?;
            form.files.insert(slot, (filename, bytes.to_vec()));
            continue;
        }

        let text = field.text().await?;
        match name.as_str() {
            "model_name" => form.model_name = Some(text),
            "long_description" => form.long_description = Some(text),
            "brand" | "brand_id" => {
                let id = text
                    .trim()
                    .parse::<i64>()
                    .map_err(|_| AppError::validation("brand must be an id"))?;
                form.brand_id = Some(id);
            }
            "categories" => {
                categories_seen = true;
                parse_id_list(&mut categories, &text, "categories")?;
            }
            "specs" => {
                let value: Value = serde_json::from_str(&text)
                    .map_err(|_| AppError::validation("specs must be valid JSON"))?;
                form.specs = Some(value);
            }
            "remove_images" => {
                let mut ids = std::mem::take(&mut form.remove_images);
                parse_id_list(&mut ids, &text, "remove_images")?;
                form.remove_images = ids;
            }
            _ => {
                if let Some(slot) = image_slot(&name, "alt_text_") {
                    if text.len() > MAX_ALT_TEXT_LEN {
                        return Err(AppError::validation(format!("{name} is too long")));
                    }
                    form.alt_texts.insert(slot, text);
                }
                // Unknown fields are ignored
            }
        }
    }

    if categories_seen {
        form.categories = Some(categories);
    }
    Ok(form)
}

/// Write the uploaded slots to the media store, in slot order. Returns
/// the stored images; on any later failure the caller must delete them.
fn store_uploads(state: &AppState, form: &ProductForm) -> AppResult<Vec<NewImage>> {
    let mut stored = Vec::new();
    for slot in 1..=IMAGE_SLOTS {
        let Some((filename, bytes)) = form.files.get(&slot) else {
            continue;
        };
        let file_path = match state.media.save_image(filename, bytes) {
            Ok(path) => path,
            Err(e) => {
                discard_uploads(state, &stored);
                return Err(e);
            }
        };
        stored.push(NewImage {
            file_path,
            alt_text: form.alt_texts.get(&slot).cloned().unwrap_or_default(),
        });
    }
    Ok(stored)
}

fn discard_uploads(state: &AppState, stored: &[NewImage]) {
    for image in stored {
        state.media.delete(&image.file_path);
    }
}

/// GET /products/base-products/
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<BaseProductFilterParams>,
) -> AppResult<Json<Vec<BaseProduct>>> {
    let products = base_product::list(&state.pool, &params).await?;
    Ok(Json(products))
}

/// GET /products/base-products/{id_or_slug}/
pub async fn detail(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> AppResult<Json<BaseProduct>> {
    let product = base_product::find_by_id_or_slug(&state.pool, &key)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Base product {key} not found")))?;
    Ok(Json(product))
}

/// POST /products/base-products/create/
pub async fn create(
    State(state): State<AppState>,
    current_user: CurrentUser,
    multipart: Multipart,
) -> AppResult<Json<Value>> {
    let form = parse_form(multipart).await?;

    let model_name = form
        .model_name
        .clone()
        .ok_or_else(|| AppError::validation("model_name is required"))?;
    validate_required_text(&model_name, "model_name", MAX_NAME_LEN)?;
    let brand_id = form
        .brand_id
        .ok_or_else(|| AppError::validation("brand is required"))?;
    let categories = form
        .categories
        .clone()
        .ok_or_else(|| AppError::validation("categories is required"))?;
    let specs = form
        .specs
        .clone()
        .ok_or_else(|| AppError::validation("specs is required"))?;
    validate_specs_object(&specs)?;
    let long_description = form.long_description.clone().unwrap_or_default();
    if long_description.len() > MAX_DESCRIPTION_LEN {
        return Err(AppError::validation("long_description is too long"));
    }

    let images = store_uploads(&state, &form)?;
    let payload = BaseProductCreate {
        model_name,
        long_description,
        brand_id,
        categories,
        specs,
    };

    let product =
        match base_product::create(&state.pool, payload, &images, current_user.id).await {
            Ok(product) => product,
            Err(e) => {
                discard_uploads(&state, &images);
                return Err(e.into());
            }
        };

    tracing::info!(product_id = product.id, slug = %product.slug, "Base product created");

    Ok(Json(json!({
        "message": "Base product created",
        "base_product": product,
    })))
}

/// PUT|PATCH /products/base-products/update/{id}
pub async fn update(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(id): Path<i64>,
    multipart: Multipart,
) -> AppResult<Json<Value>> {
    let form = parse_form(multipart).await?;

    if let Some(model_name) = &form.model_name {
        validate_required_text(model_name, "model_name", MAX_NAME_LEN)?;
    }
    if let Some(description) = &form.long_description
        && description.len() > MAX_DESCRIPTION_LEN
    {
        return Err(AppError::validation("long_description is too long"));
    }
    if let Some(specs) = &form.specs {
        validate_specs_object(specs)?;
    }

    let images = store_uploads(&state, &form)?;
    let payload = BaseProductUpdate {
        model_name: form.model_name.clone(),
        long_description: form.long_description.clone(),
        brand_id: form.brand_id,
        categories: form.categories.clone(),
        specs: form.specs.clone(),
        remove_images: form.remove_images.clone(),
    };

    let (product, removed_paths) =
        match base_product::update(&state.pool, id, payload, &images, current_user.id).await {
            Ok(result) => result,
            Err(e) => {
                discard_uploads(&state, &images);
                return Err(e.into());
            }
        };

    // Only delete removed files once the transaction has committed
    for path in &removed_paths {
        state.media.delete(path);
    }

    Ok(Json(json!({
        "message": "Base product updated",
        "base_product": product,
    })))
}

/// POST /products/base-products/activate/{id}
pub async fn activate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let product = base_product::set_active(&state.pool, id, true).await?;
    Ok(Json(json!({
        "message": "Base product activated",
        "base_product": product,
    })))
}

/// POST /products/base-products/deactivate/{id}
pub async fn deactivate(
    State(state): State<AppState>,
    _current_user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Value>> {
    let product = base_product::set_active(&state.pool, id, false).await?;
    Ok(Json(json!({
        "message": "Base product deactivated",
        "base_product": product,
    })))
}
