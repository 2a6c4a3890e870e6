//! List endpoint filters
//!
//! Translates query parameters into SQL predicates composed with
//! [`sqlx::QueryBuilder`]. All supplied filters AND together; absent
//! parameters impose no constraint.
//!
//! Specification filters reach into the `specs` JSON column with
//! `json_extract`. A path missing from a product's specs yields NULL,
//! which never satisfies a predicate, so products without the spec are
//! filtered out rather than erroring.

use serde::Deserialize;
use sqlx::{QueryBuilder, Sqlite};

/// How a spec filter compares against the extracted JSON value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SpecMatch {
    /// Case-insensitive substring match over the text value.
    Contains,
    /// Exact numeric comparison.
    Exact,
}

/// Query parameters accepted by the base product list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct BaseProductFilterParams {
    pub slug: Option<String>,
    pub brand: Option<i64>,
    pub categories: Option<i64>,
    pub active: Option<bool>,
    pub model_name: Option<String>,
    pub brand_name: Option<String>,
    pub search: Option<String>,
    pub ordering: Option<String>,

    pub spec_processor_model: Option<String>,
    pub spec_processor_cores: Option<String>,
    pub spec_screen_size: Option<String>,
    pub spec_screen_resolution: Option<String>,
    pub spec_screen_refresh_rate: Option<String>,
    pub spec_memory_size: Option<String>,
    pub spec_memory_type: Option<String>,
    pub spec_graphics_model: Option<String>,
    pub spec_graphics_vram: Option<String>,
    pub spec_storage_size: Option<String>,
    pub spec_storage_type: Option<String>,
    pub spec_weight: Option<String>,
    pub spec_battery: Option<String>,
}

impl BaseProductFilterParams {
    /// Fixed table mapping each supplied spec parameter to its nested
    /// JSON path and match kind.
    fn spec_filters(&self) -> Vec<(&'static str, SpecMatch, &String)> {
        let table: [(&'static str, SpecMatch, &Option<String>); 13] = [
            ("$.processor.model", SpecMatch::Contains, &self.spec_processor_model),
            ("$.processor.cores", SpecMatch::Exact, &self.spec_processor_cores),
            ("$.screen.size", SpecMatch::Contains, &self.spec_screen_size),
            ("$.screen.resolution", SpecMatch::Contains, &self.spec_screen_resolution),
            ("$.screen.refresh_rate", SpecMatch::Contains, &self.spec_screen_refresh_rate),
            ("$.memory.size", SpecMatch::Contains, &self.spec_memory_size),
            ("$.memory.type", SpecMatch::Contains, &self.spec_memory_type),
            ("$.graphics.model", SpecMatch::Contains, &self.spec_graphics_model),
            ("$.graphics.vram", SpecMatch::Contains, &self.spec_graphics_vram),
            ("$.storage.size", SpecMatch::Contains, &self.spec_storage_size),
            ("$.storage.type", SpecMatch::Contains, &self.spec_storage_type),
            ("$.weight", SpecMatch::Contains, &self.spec_weight),
            ("$.battery", SpecMatch::Contains, &self.spec_battery),
        ];
        table
            .into_iter()
            .filter_map(|(path, kind, value)| value.as_ref().map(|v| (path, kind, v)))
            .collect()
    }
}

/// Query parameters accepted by the variant list endpoint.
#[derive(Debug, Default, Deserialize)]
pub struct VariantFilterParams {
    pub base_product: Option<i64>,
    pub slug: Option<String>,
    pub model_name: Option<String>,
    pub condition: Option<String>,
    pub stock_status: Option<String>,
    pub is_published: Option<bool>,
    pub active: Option<bool>,
    pub price_min: Option<i64>,
    pub price_max: Option<i64>,
    pub ordering: Option<String>,
}

const PRODUCT_ORDER_FIELDS: &[&str] = &["model_name", "creation_date", "update_date"];
const VARIANT_ORDER_FIELDS: &[&str] = &["price", "creation_date", "update_date"];

/// Resolve an `ordering` parameter against an allow-list. A leading
/// `-` selects descending order; unknown fields fall back to the
/// default.
fn order_clause(
    ordering: Option<&str>,
    allowed: &[&str],
    prefix: &str,
    default: &str,
) -> String {
    if let Some(raw) = ordering {
        let (field, dir) = match raw.strip_prefix('-') {
            Some(f) => (f, "DESC"),
            None => (raw, "ASC"),
        };
        if allowed.contains(&field) {
            return format!("{prefix}.{field} {dir}");
        }
    }
    format!("{prefix}.{default}")
}

/// Append a case-insensitive substring predicate for `expr`.
fn push_contains(qb: &mut QueryBuilder<'_, Sqlite>, expr: &str, value: &str) {
    qb.push(" AND LOWER(")
        .push(expr)
        .push(") LIKE '%' || LOWER(")
        .push_bind(value.to_string())
        .push(") || '%'");
}

/// Build the filtered base product SELECT.
pub fn product_query(params: &BaseProductFilterParams) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(
        "SELECT DISTINCT bp.id, bp.model_name, bp.slug, bp.long_description, bp.brand_id, bp.specs, bp.user_last_modified, bp.active, bp.creation_date, bp.update_date FROM base_product bp JOIN brand b ON b.id = bp.brand_id",
    );
    if params.categories.is_some() {
        qb.push(" JOIN base_product_category bc ON bc.base_product_id = bp.id");
    }
    qb.push(" WHERE 1 = 1");

    if let Some(slug) = &params.slug {
        qb.push(" AND bp.slug = ").push_bind(slug.clone());
    }
    if let Some(brand) = params.brand {
        qb.push(" AND bp.brand_id = ").push_bind(brand);
    }
    if let Some(category) = params.categories {
        qb.push(" AND bc.category_id = ").push_bind(category);
    }
    if let Some(active) = params.active {
        qb.push(" AND bp.active = ").push_bind(active);
    }
    if let Some(model_name) = &params.model_name {
        push_contains(&mut qb, "bp.model_name", model_name);
    }
    if let Some(brand_name) = &params.brand_name {
        push_contains(&mut qb, "b.name", brand_name);
    }

    for (path, kind, value) in params.spec_filters() {
        match kind {
            SpecMatch::Contains => {
                let expr = format!("CAST(json_extract(bp.specs, '{path}') AS TEXT)");
                push_contains(&mut qb, &expr, value);
            }
            SpecMatch::Exact => {
                qb.push(format!(" AND json_extract(bp.specs, '{path}') = CAST("))
                    .push_bind(value.clone())
                    .push(" AS NUMERIC)");
            }
        }
    }

    if let Some(search) = &params.search {
        qb.push(" AND (LOWER(bp.model_name) LIKE '%' || LOWER(")
            .push_bind(search.clone())
            .push(") || '%' OR LOWER(bp.long_description) LIKE '%' || LOWER(")
            .push_bind(search.clone())
            .push(") || '%')");
    }

    qb.push(" ORDER BY ");
    qb.push(order_clause(
        params.ordering.as_deref(),
        PRODUCT_ORDER_FIELDS,
        "bp",
        "creation_date DESC",
    ));
    qb
}

/// Build the filtered product variant SELECT.
pub fn variant_query(params: &VariantFilterParams) -> QueryBuilder<'static, Sqlite> {
    let mut qb = QueryBuilder::new(
        "SELECT pv.id, pv.base_product_id, pv.price, pv.description, pv.condition, pv.stock_status, pv.is_published, pv.active, pv.user_last_modified, pv.creation_date, pv.update_date FROM product_variant pv JOIN base_product bp ON bp.id = pv.base_product_id WHERE 1 = 1",
    );

    if let Some(base_product) = params.base_product {
        qb.push(" AND pv.base_product_id = ").push_bind(base_product);
    }
    if let Some(slug) = &params.slug {
        push_contains(&mut qb, "bp.slug", slug);
    }
    if let Some(model_name) = &params.model_name {
        push_contains(&mut qb, "bp.model_name", model_name);
    }
    if let Some(condition) = &params.condition {
        qb.push(" AND pv.condition = ").push_bind(condition.clone());
    }
    if let Some(stock_status) = &params.stock_status {
        qb.push(" AND pv.stock_status = ").push_bind(stock_status.clone());
    }
    if let Some(published) = params.is_published {
        qb.push(" AND pv.is_published = ").push_bind(published);
    }
    if let Some(active) = params.active {
        qb.push(" AND pv.active = ").push_bind(active);
    }
    if let Some(price_min) = params.price_min {
        qb.push(" AND pv.price >= ").push_bind(price_min);
    }
    if let Some(price_max) = params.price_max {
        qb.push(" AND pv.price <= ").push_bind(price_max);
    }

    qb.push(" ORDER BY ");
    qb.push(order_clause(
        params.ordering.as_deref(),
        VARIANT_ORDER_FIELDS,
        "pv",
        "price ASC",
    ));
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_filter_builds_bare_query() {
        let qb = product_query(&BaseProductFilterParams::default());
        let sql = qb.sql();
        assert!(sql.contains("WHERE 1 = 1"));
        assert!(!sql.contains("json_extract"));
        assert!(sql.ends_with("ORDER BY bp.creation_date DESC"));
    }

    #[test]
    fn spec_filter_maps_to_json_path() {
        let params = BaseProductFilterParams {
            spec_processor_model: Some("i5".into()),
            ..Default::default()
        };
        let sql = product_query(&params).sql().to_string();
        assert!(sql.contains("json_extract(bp.specs, '$.processor.model')"));
        assert!(sql.contains("LIKE"));
    }

    #[test]
    fn numeric_spec_filter_is_exact() {
        let params = BaseProductFilterParams {
            spec_processor_cores: Some("8".into()),
            ..Default::default()
        };
        let sql = product_query(&params).sql().to_string();
        assert!(sql.contains("json_extract(bp.specs, '$.processor.cores') = CAST("));
        assert!(!sql.contains("'$.processor.cores') AS TEXT"));
    }

    #[test]
    fn brand_name_filter_matches_brand_table() {
        let params = BaseProductFilterParams {
            brand_name: Some("leno".into()),
            ..Default::default()
        };
        let sql = product_query(&params).sql().to_string();
        assert!(sql.contains("LOWER(b.name) LIKE"));
    }

    #[test]
    fn search_spans_name_and_description() {
        let params = BaseProductFilterParams {
            search: Some("thinkpad".into()),
            ..Default::default()
        };
        let sql = product_query(&params).sql().to_string();
        assert!(sql.contains("LOWER(bp.model_name) LIKE"));
        assert!(sql.contains("OR LOWER(bp.long_description) LIKE"));
    }

    #[test]
    fn search_ands_with_structured_filters() {
        let params = BaseProductFilterParams {
            search: Some("thinkpad".into()),
            spec_memory_type: Some("ddr5".into()),
            brand_name: Some("leno".into()),
            ..Default::default()
        };
        let sql = product_query(&params).sql().to_string();
        assert!(sql.contains("AND LOWER(b.name) LIKE"));
        assert!(sql.contains("json_extract(bp.specs, '$.memory.type')"));
        assert!(sql.contains("AND (LOWER(bp.model_name) LIKE"));
    }

    #[test]
    fn category_filter_joins_junction_table() {
        let params = BaseProductFilterParams {
            categories: Some(3),
            ..Default::default()
        };
        let sql = product_query(&params).sql().to_string();
        assert!(sql.contains("JOIN base_product_category"));
        assert!(sql.contains("bc.category_id = "));
    }

    #[test]
    fn ordering_honors_allow_list_and_direction() {
        let params = BaseProductFilterParams {
            ordering: Some("-model_name".into()),
            ..Default::default()
        };
        let sql = product_query(&params).sql().to_string();
        assert!(sql.ends_with("ORDER BY bp.model_name DESC"));

        let params = BaseProductFilterParams {
            ordering: Some("specs".into()),
            ..Default::default()
        };
        let sql = product_query(&params).sql().to_string();
        assert!(sql.ends_with("ORDER BY bp.creation_date DESC"));
    }

    #[test]
    fn variant_default_ordering_is_price_asc() {
        let sql = variant_query(&VariantFilterParams::default()).sql().to_string();
        assert!(sql.ends_with("ORDER BY pv.price ASC"));
    }

    #[test]
    fn variant_price_range_combines() {
        let params = VariantFilterParams {
            price_min: Some(1_000_000),
            price_max: Some(2_000_000),
            ..Default::default()
        };
        let sql = variant_query(&params).sql().to_string();
        assert!(sql.contains("pv.price >= "));
        assert!(sql.contains("pv.price <= "));
    }
}
