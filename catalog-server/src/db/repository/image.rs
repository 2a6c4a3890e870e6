//! Image Repository
//!
//! Read-side helpers; image rows are written inside the base product
//! transactions so uploads and removals commit atomically with the
//! rest of the product mutation.

use super::RepoResult;
use shared::models::Image;
use sqlx::SqlitePool;

const COLUMNS: &str = "id, base_product_id, file_path, alt_text, active";

pub async fn find_for_product(pool: &SqlitePool, base_product_id: i64) -> RepoResult<Vec<Image>> {
    let images = sqlx::query_as::<_, Image>(&format!(
        "SELECT {COLUMNS} FROM image WHERE base_product_id = ? AND active = 1 ORDER BY id"
    ))
    .bind(base_product_id)
    .fetch_all(pool)
    .await?;
    Ok(images)
}
