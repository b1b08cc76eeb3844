//! Object key and public URL conventions.
//!
//! Keys look like `{prefix}/{store_id}/{uuid}.webp`; the public URL is the
//! virtual-hosted S3 form `https://{bucket}.s3.{region}.amazonaws.com/{key}`.

use storehub_core::image_pipeline::WEBP_EXTENSION;
use storehub_core::types::DbId;

/// Key for a new image belonging to `store_id`.
pub fn image_key(prefix: &str, store_id: DbId, id: uuid::Uuid) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        format!("{store_id}/{id}.{WEBP_EXTENSION}")
    } else {
        format!("{prefix}/{store_id}/{id}.{WEBP_EXTENSION}")
    }
}

pub fn s3_base_url(bucket: &str, region: &str) -> String {
    format!("https://{bucket}.s3.{region}.amazonaws.com/")
}

/// Public URL for `key`.
pub fn s3_public_url(bucket: &str, region: &str, key: &str) -> String {
    format!("{}{key}", s3_base_url(bucket, region))
}

/// Extract the key from a public URL, requiring it to sit under `prefix`.
///
/// Returns `None` for URLs on another host, keys outside the prefix, and
/// keys containing `..` segments.
pub fn key_under_prefix(base_url: &str, prefix: &str, url: &str) -> Option<String> {
    let key = url.strip_prefix(base_url)?;
    let key = key.split(['?', '#']).next().unwrap_or_default();
    let prefix = prefix.trim_matches('/');
    if key.is_empty() || key.split('/').any(|seg| seg == ".." || seg.is_empty()) {
        return None;
    }
    if !prefix.is_empty() && !key.starts_with(&format!("{prefix}/")) {
        return None;
    }
    Some(key.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://shop-media.s3.eu-west-1.amazonaws.com/";

    #[test]
    fn key_layout() {
        let id = uuid::Uuid::nil();
        assert_eq!(
            image_key("uploads", 4, id),
            format!("uploads/4/{id}.webp")
        );
        assert_eq!(image_key("/uploads/", 4, id), format!("uploads/4/{id}.webp"));
        assert_eq!(image_key("", 4, id), format!("4/{id}.webp"));
    }

    #[test]
    fn url_layout() {
        assert_eq!(
            s3_public_url("shop-media", "eu-west-1", "uploads/1/a.webp"),
            "https://shop-media.s3.eu-west-1.amazonaws.com/uploads/1/a.webp"
        );
    }

    #[test]
    fn key_round_trips_through_url() {
        let url = format!("{BASE}uploads/1/a.webp");
        assert_eq!(
            key_under_prefix(BASE, "uploads", &url).as_deref(),
            Some("uploads/1/a.webp")
        );
    }

    #[test]
    fn rejects_foreign_and_escaping_urls() {
        assert!(key_under_prefix(BASE, "uploads", "https://evil.example.com/uploads/1/a.webp").is_none());
        assert!(key_under_prefix(BASE, "uploads", &format!("{BASE}other/1/a.webp")).is_none());
        assert!(key_under_prefix(BASE, "uploads", &format!("{BASE}uploads/../secret")).is_none());
        assert!(key_under_prefix(BASE, "uploads", BASE).is_none());
    }

    #[test]
    fn query_string_is_ignored() {
        let url = format!("{BASE}uploads/1/a.webp?v=2");
        assert_eq!(
            key_under_prefix(BASE, "uploads", &url).as_deref(),
            Some("uploads/1/a.webp")
        );
    }
}
