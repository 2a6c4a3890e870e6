//! Slug generation
//!
//! URL-safe identifiers derived from entity names. Slugs are generated
//! once at creation and never regenerated on rename, so bookmarked
//! URLs keep working.

/// Turn arbitrary text into a lowercase hyphen-separated slug.
///
/// Alphanumerics are kept, everything else collapses to a single
/// hyphen; leading and trailing hyphens are stripped.
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut last_hyphen = true;
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_hyphen = false;
        } else if !last_hyphen {
            slug.push('-');
            last_hyphen = true;
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Slug for a base product: the brand name joined with the model name.
pub fn product_slug(brand_name: &str, model_name: &str) -> String {
    slugify(&format!("{brand_name}-{model_name}"))
}
