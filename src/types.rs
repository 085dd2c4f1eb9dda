//! Core types for pixabay-sampler

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Mapping from color name to its integer target count
pub type ColorQuota = HashMap<String, usize>;

/// One image hit as returned by the search API.
///
/// Every field except `id` and `tags` is passthrough data the engine never
/// inspects; it is carried along and handed to the persistence sink. Missing
/// fields default rather than fail deserialization, since the API omits some
/// counters for certain content types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageHit {
    /// Source-side identifier, unique within the API but duplicate-prone
    /// across pages and attempts until the engine deduplicates
    pub id: u64,
    /// URL of the image's page on the source site
    #[serde(rename = "pageURL", default)]
    pub page_url: String,
    /// Source-reported content type ("photo", "illustration", "vector")
    #[serde(rename = "type", default)]
    pub image_type: String,
    /// Raw comma-separated tag string
    #[serde(default)]
    pub tags: String,
    /// Image width in pixels
    #[serde(rename = "imageWidth", default)]
    pub image_width: i64,
    /// Image height in pixels
    #[serde(rename = "imageHeight", default)]
    pub image_height: i64,
    /// Image size in bytes
    #[serde(rename = "imageSize", default)]
    pub image_size: i64,
    /// View counter
    #[serde(default)]
    pub views: i64,
    /// Download counter
    #[serde(default)]
    pub downloads: i64,
    /// Collection counter
    #[serde(default)]
    pub collections: i64,
    /// Like counter
    #[serde(default)]
    pub likes: i64,
    /// Comment counter
    #[serde(default)]
    pub comments: i64,
    /// URL of the large rendition
    #[serde(rename = "largeImageURL", default)]
    pub large_image_url: String,
    /// Uploader's username
    #[serde(default)]
    pub user: String,
    /// Uploader's avatar URL
    #[serde(rename = "userImageURL", default)]
    pub user_image_url: String,
}

/// One parsed page of search results
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchPage {
    /// Total number of images the API reports for this query
    #[serde(default)]
    pub total: u64,
    /// Number of images actually reachable through the API for this query
    #[serde(rename = "totalHits", default)]
    pub total_hits: u64,
    /// The hit records on this page
    #[serde(default)]
    pub hits: Vec<ImageHit>,
}

/// The parameter variant selected for one fetch attempt.
///
/// Values come from fixed lookup tables indexed by the attempt counter (see
/// [`crate::fetcher::attempt_params`]), so they are all `'static`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttemptParams {
    /// Content-mode filter ("photo", "illustration", "vector", or "all")
    pub content_mode: &'static str,
    /// Whether the request is restricted to curated (editor's choice) images
    pub editors_choice: bool,
    /// Locale the query is issued under
    pub locale: &'static str,
}

/// Flat key-value parameter set for one search request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Color filter
    pub color: String,
    /// Content-mode filter
    pub content_mode: String,
    /// Page size
    pub per_page: u32,
    /// 1-based page number
    pub page: u32,
    /// Curated-only flag
    pub editors_choice: bool,
    /// Query locale
    pub locale: String,
}

impl SearchQuery {
    /// Build the query for one page of a parameter-varied attempt
    pub fn for_attempt(color: &str, params: AttemptParams, page: u32, per_page: u32) -> Self {
        Self {
            color: color.to_string(),
            content_mode: params.content_mode.to_string(),
            per_page,
            page,
            editors_choice: params.editors_choice,
            locale: params.locale.to_string(),
        }
    }

    /// Build the small probe query used to read a color's total population
    pub fn probe(color: &str, per_page: u32) -> Self {
        Self {
            color: color.to_string(),
            content_mode: "photo".to_string(),
            per_page,
            page: 1,
            editors_choice: false,
            locale: "en".to_string(),
        }
    }
}

/// One collected image: the raw hit plus the color it was fetched for and
/// the parameter variant it was fetched under
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// The raw API hit
    pub hit: ImageHit,
    /// The color partition this item was fetched for (attached by the
    /// fetcher; the API does not echo it back)
    pub color: String,
    /// Parameter variant active when this item was first seen
    pub variant: AttemptParams,
}

/// How the reconciliation loop terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Convergence {
    /// The working set reached the requested total exactly
    Converged,
    /// The round budget ran out first; the set is best-effort
    Exhausted,
}

/// Summary of one completed sampling run
#[derive(Debug, Clone)]
pub struct SampleReport {
    /// The total the caller asked for
    pub requested: usize,
    /// How many records the run actually produced
    pub collected: usize,
    /// Whether the reconciliation loop converged exactly
    pub convergence: Convergence,
    /// Final per-color record counts
    pub per_color: HashMap<String, usize>,
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_hit_deserializes_pixabay_payload() {
        let json = r#"{
            "id": 195893,
            "pageURL": "https://pixabay.com/photos/blossom-195893/",
            "type": "photo",
            "tags": "blossom, bloom, flower",
            "imageWidth": 4000,
            "imageHeight": 2250,
            "imageSize": 4731420,
            "views": 7671,
            "downloads": 6439,
            "collections": 4,
            "likes": 5,
            "comments": 2,
            "largeImageURL": "https://pixabay.com/get/large.jpg",
            "user": "Josch13",
            "userImageURL": "https://cdn.pixabay.com/user.jpg"
        }"#;

        let hit: ImageHit = serde_json::from_str(json).unwrap();
        assert_eq!(hit.id, 195893);
        assert_eq!(hit.image_type, "photo");
        assert_eq!(hit.tags, "blossom, bloom, flower");
        assert_eq!(hit.image_width, 4000);
        assert_eq!(hit.user, "Josch13");
    }

    #[test]
    fn image_hit_tolerates_missing_counters() {
        // Vector hits omit some counters; only id is mandatory
        let hit: ImageHit = serde_json::from_str(r#"{"id": 42}"#).unwrap();
        assert_eq!(hit.id, 42);
        assert_eq!(hit.views, 0);
        assert!(hit.tags.is_empty());
    }

    #[test]
    fn search_page_defaults_to_empty() {
        let page: SearchPage = serde_json::from_str("{}").unwrap();
        assert_eq!(page.total, 0);
        assert!(page.hits.is_empty());
    }

    #[test]
    fn probe_query_uses_fixed_shape() {
        let q = SearchQuery::probe("red", 3);
        assert_eq!(q.color, "red");
        assert_eq!(q.per_page, 3);
        assert_eq!(q.page, 1);
        assert_eq!(q.content_mode, "photo");
        assert!(!q.editors_choice);
    }
}
