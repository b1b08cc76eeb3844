//! Slug generation and catalog tree rules.

use crate::error::CoreError;
use crate::types::DbId;

/// Maximum slug length in bytes (matches `VARCHAR(160)`).
pub const MAX_SLUG_LEN: usize = 160;

/// Derive a URL slug from a display name.
///
/// Lowercases ASCII letters and digits, collapses every other run of
/// characters into a single `-`, and trims dashes from both ends. Non-ASCII
/// letters are dropped rather than transliterated.
///
/// # Examples
///
/// ```
/// use storehub_core::naming::slugify;
///
/// assert_eq!(slugify("Summer Sale 2026"), "summer-sale-2026");
/// assert_eq!(slugify("  T-Shirts & Tops "), "t-shirts-tops");
/// ```
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;

    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }

    slug.truncate(MAX_SLUG_LEN);
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// Resolve the slug to store: an explicit slug is normalized, otherwise one
/// is derived from `name`. Fails when nothing usable remains.
pub fn resolve_slug(explicit: Option<&str>, name: &str) -> Result<String, CoreError> {
    let slug = slugify(explicit.unwrap_or(name));
    if slug.is_empty() {
        return Err(CoreError::Validation(format!(
            "Cannot derive a slug from '{name}'"
        )));
    }
    Ok(slug)
}

/// Reject a category parent that would create a cycle.
///
/// `parent_ancestors` is the chain from `new_parent` up to the root,
/// including `new_parent` itself.
pub fn validate_parent(
    category_id: DbId,
    new_parent: Option<DbId>,
    parent_ancestors: &[DbId],
) -> Result<(), CoreError> {
    let Some(parent) = new_parent else {
        return Ok(());
    };
    if parent == category_id || parent_ancestors.contains(&category_id) {
        return Err(CoreError::Validation(
            "A category cannot be moved under itself or one of its descendants".into(),
        ));
    }
    Ok(())
}
