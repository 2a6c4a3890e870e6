//! Base Product Repository
//!
//! Create and update run inside a single transaction covering the
//! product row, category links and image rows, so a failure at any
//! step leaves nothing behind.

use super::filter::{BaseProductFilterParams, product_query};
use super::{RepoError, RepoResult};
use crate::utils::slug::product_slug;
use shared::models::{BaseProduct, BaseProductCreate, BaseProductUpdate, Brand, Category, NewImage};
use sqlx::{SqliteConnection, SqlitePool};

const COLUMNS: &str = "id, model_name, slug, long_description, brand_id, specs, user_last_modified, active, creation_date, update_date";

pub async fn list(
    pool: &SqlitePool,
    params: &BaseProductFilterParams,
) -> RepoResult<Vec<BaseProduct>> {
    let mut products = product_query(params)
        .build_query_as::<BaseProduct>()
        .fetch_all(pool)
        .await?;

    for product in &mut products {
        hydrate(pool, product).await?;
    }
    Ok(products)
}

pub async fn get(pool: &SqlitePool, id: i64) -> RepoResult<Option<BaseProduct>> {
    let product = sqlx::query_as::<_, BaseProduct>(&format!(
        "SELECT {COLUMNS} FROM base_product WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    match product {
        Some(mut p) => {
            hydrate(pool, &mut p).await?;
            Ok(Some(p))
        }
        None => Ok(None),
    }
}

/// Look up by numeric id when the key parses as one, by slug otherwise.
pub async fn find_by_id_or_slug(pool: &SqlitePool, key: &str) -> RepoResult<Option<BaseProduct>> {
    if let Ok(id) = key.parse::<i64>() {
        return get(pool, id).await;
    }

    let product = sqlx::query_as::<_, BaseProduct>(&format!(
        "SELECT {COLUMNS} FROM base_product WHERE slug = ?"
    ))
    .bind(key)
    .fetch_optional(pool)
    .await?;

    match product {
        Some(mut p) => {
            hydrate(pool, &mut p).await?;
            Ok(Some(p))
        }
        None => Ok(None),
    }
}

pub async fn create(
    pool: &SqlitePool,
    data: BaseProductCreate,
    images: &[NewImage],
    user_id: i64,
) -> RepoResult<BaseProduct> {
    let mut tx = pool.begin().await?;

    let brand = require_active_brand(&mut *tx, data.brand_id).await?;
    require_active_categories(&mut *tx, &data.categories).await?;

    let slug = product_slug(&brand.name, &data.model_name);
    let specs = serde_json::to_string(&data.specs)
        .map_err(|e| RepoError::Validation(format!("specs is not serializable: {e}")))?;
    let now = shared::util::now_millis();

    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO base_product (model_name, slug, long_description, brand_id, specs, user_last_modified, active, creation_date, update_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1, ?7, ?7) RETURNING id",
    )
    .bind(&data.model_name)
    .bind(&slug)
    .bind(&data.long_description)
    .bind(data.brand_id)
    .bind(&specs)
    .bind(user_id)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    link_categories(&mut *tx, id, &data.categories).await?;
    insert_images(&mut *tx, id, images).await?;

    tx.commit().await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create base product".into()))
}

/// Partial update. Returns the updated product together with the file
/// paths of removed images so the caller can delete the files after
/// the transaction commits.
///
/// The slug is generated once at creation and never regenerated, so
/// renames do not break existing product URLs.
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    data: BaseProductUpdate,
    images: &[NewImage],
    user_id: i64,
) -> RepoResult<(BaseProduct, Vec<String>)> {
    let mut tx = pool.begin().await?;

    let exists = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM base_product WHERE id = ?")
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
    if exists == 0 {
        return Err(RepoError::NotFound(format!("Base product {id} not found")));
    }

    if let Some(brand_id) = data.brand_id {
        require_active_brand(&mut *tx, brand_id).await?;
    }
    if let Some(categories) = &data.categories {
        require_active_categories(&mut *tx, categories).await?;
    }

    let specs = match &data.specs {
        Some(value) => Some(
            serde_json::to_string(value)
                .map_err(|e| RepoError::Validation(format!("specs is not serializable: {e}")))?,
        ),
        None => None,
    };

    let now = shared::util::now_millis();
    sqlx::query(
        "UPDATE base_product SET model_name = COALESCE(?1, model_name), long_description = COALESCE(?2, long_description), brand_id = COALESCE(?3, brand_id), specs = COALESCE(?4, specs), user_last_modified = ?5, update_date = ?6 WHERE id = ?7",
    )
    .bind(&data.model_name)
    .bind(&data.long_description)
    .bind(data.brand_id)
    .bind(&specs)
    .bind(user_id)
    .bind(now)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(categories) = &data.categories {
        sqlx::query("DELETE FROM base_product_category WHERE base_product_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        link_categories(&mut *tx, id, categories).await?;
    }

    // Removals run before additions so a slot freed and refilled in the
    // same request behaves predictably.
    let removed_paths = remove_images(&mut *tx, id, &data.remove_images).await?;
    insert_images(&mut *tx, id, images).await?;

    tx.commit().await?;

    let product = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Base product {id} not found")))?;
    Ok((product, removed_paths))
}

pub async fn set_active(pool: &SqlitePool, id: i64, active: bool) -> RepoResult<BaseProduct> {
    let current = get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Base product {id} not found")))?;

    if current.active == active {
        let state = if active { "active" } else { "inactive" };
        return Err(RepoError::Conflict(format!(
            "Base product {id} is already {state}"
        )));
    }

    sqlx::query("UPDATE base_product SET active = ?1 WHERE id = ?2")
        .bind(active)
        .bind(id)
        .execute(pool)
        .await?;

    get(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Base product {id} not found")))
}

// ========== Transaction helpers ==========

async fn require_active_brand(conn: &mut SqliteConnection, brand_id: i64) -> RepoResult<Brand> {
    let brand = sqlx::query_as::<_, Brand>("SELECT id, name, slug, active FROM brand WHERE id = ?")
        .bind(brand_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| RepoError::Validation(format!("Brand {brand_id} does not exist")))?;

    if !brand.active {
        return Err(RepoError::Validation(format!("Brand {brand_id} is inactive")));
    }
    Ok(brand)
}

async fn require_active_categories(
    conn: &mut SqliteConnection,
    category_ids: &[i64],
) -> RepoResult<()> {
    if category_ids.is_empty() {
        return Err(RepoError::Validation(
            "categories must not be empty".to_string(),
        ));
    }
    for &category_id in category_ids {
        let active =
            sqlx::query_scalar::<_, bool>("SELECT active FROM category WHERE id = ?")
                .bind(category_id)
                .fetch_optional(&mut *conn)
                .await?
                .ok_or_else(|| {
                    RepoError::Validation(format!("Category {category_id} does not exist"))
                })?;
        if !active {
            return Err(RepoError::Validation(format!(
                "Category {category_id} is inactive"
            )));
        }
    }
    Ok(())
}

async fn link_categories(
    conn: &mut SqliteConnection,
    base_product_id: i64,
    category_ids: &[i64],
) -> RepoResult<()> {
    for &category_id in category_ids {
        sqlx::query(
            "INSERT OR IGNORE INTO base_product_category (base_product_id, category_id) VALUES (?1, ?2)",
        )
        .bind(base_product_id)
        .bind(category_id)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

async fn insert_images(
    conn: &mut SqliteConnection,
    base_product_id: i64,
    images: &[NewImage],
) -> RepoResult<()> {
    for image in images {
        sqlx::query(
            "INSERT INTO image (base_product_id, file_path, alt_text, active) VALUES (?1, ?2, ?3, 1)",
        )
        .bind(base_product_id)
        .bind(&image.file_path)
        .bind(&image.alt_text)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

/// Delete image rows scoped to the target product; an id belonging to
/// another product is rejected rather than silently skipped.
async fn remove_images(
    conn: &mut SqliteConnection,
    base_product_id: i64,
    image_ids: &[i64],
) -> RepoResult<Vec<String>> {
    let mut removed = Vec::with_capacity(image_ids.len());
    for &image_id in image_ids {
        let path = sqlx::query_scalar::<_, String>(
            "SELECT file_path FROM image WHERE id = ?1 AND base_product_id = ?2",
        )
        .bind(image_id)
        .bind(base_product_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| {
            RepoError::Validation(format!(
                "Image {image_id} does not belong to base product {base_product_id}"
            ))
        })?;

        sqlx::query("DELETE FROM image WHERE id = ?")
            .bind(image_id)
            .execute(&mut *conn)
            .await?;
        removed.push(path);
    }
    Ok(removed)
}

// ========== Hydration ==========

async fn hydrate(pool: &SqlitePool, product: &mut BaseProduct) -> RepoResult<()> {
    product.brand = sqlx::query_as::<_, Brand>("SELECT id, name, slug, active FROM brand WHERE id = ?")
        .bind(product.brand_id)
        .fetch_optional(pool)
        .await?;

    product.categories = sqlx::query_as::<_, Category>(
        "SELECT c.id, c.name, c.slug, c.description, c.active FROM category c JOIN base_product_category bc ON bc.category_id = c.id WHERE bc.base_product_id = ? ORDER BY c.name",
    )
    .bind(product.id)
    .fetch_all(pool)
    .await?;

    product.images = super::image::find_for_product(pool, product.id).await?;

    Ok(())
}
