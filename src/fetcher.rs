//! Per-color adaptive fetch loop
//!
//! A fixed query against the search API tends to return the same top results
//! on every call, so paging alone cannot reach an exact per-color count. The
//! fetcher escapes duplicate-heavy result sets by rotating request parameters
//! across attempts: content mode, the curated-only flag, and the query locale
//! all vary with the attempt counter. The rotation is expressed as fixed
//! lookup tables indexed by `attempt % len`, keeping the exact cyclic
//! behavior testable without a network.

use crate::client::SearchApi;
use crate::config::SamplingConfig;
use crate::types::{AttemptParams, ImageRecord, SearchQuery};
use std::collections::HashSet;

/// Content-mode rotation table
pub const CONTENT_MODES: [&str; 3] = ["photo", "illustration", "vector"];

/// Locale rotation table, used from attempt 5 onward
pub const LOCALES: [&str; 5] = ["ja", "ru", "de", "fr", "es"];

/// Attempt index that widens the content-mode filter to "all"
const ALL_MODES_ATTEMPT: u32 = 1;

/// Attempt index that restricts to curated (editor's choice) images
const CURATED_ATTEMPT: u32 = 4;

/// First attempt index that rotates away from the default locale
const LOCALE_ROTATION_START: u32 = 5;

/// Look up the parameter variant for one attempt index.
///
/// Pure function of the attempt counter; every attempt of every fetcher
/// invocation at the same index produces the same variant.
pub fn attempt_params(attempt: u32) -> AttemptParams {
    let content_mode = if attempt == ALL_MODES_ATTEMPT {
        "all"
    } else {
        CONTENT_MODES[attempt as usize % CONTENT_MODES.len()]
    };
    let locale = if attempt < LOCALE_ROTATION_START {
        "en"
    } else {
        LOCALES[attempt as usize % LOCALES.len()]
    };
    AttemptParams {
        content_mode,
        editors_choice: attempt == CURATED_ATTEMPT,
        locale,
    }
}

/// Fetch distinct images for one color until `required` distinct IDs are
/// collected or the attempt budget runs out.
///
/// Each attempt issues `pages_per_attempt` sequential page requests under
/// that attempt's parameter variant, deduplicating by ID against a seen-set
/// scoped to this call. `start_attempt` lets the reconciliation loop resume
/// past the variants an earlier pass already exhausted.
///
/// Returning fewer than `required` records is a soft shortfall, not an
/// error: the caller decides what to do with a best-effort result. Failed or
/// empty page fetches are skipped; the fetch primitive has already logged
/// them.
pub async fn fetch_color(
    api: &dyn SearchApi,
    color: &str,
    required: usize,
    start_attempt: u32,
    limits: &SamplingConfig,
) -> Vec<ImageRecord> {
    let mut seen: HashSet<u64> = HashSet::new();
    let mut collected: Vec<ImageRecord> = Vec::new();
    let mut attempt = start_attempt;

    while seen.len() < required && attempt < limits.max_attempts {
        let variant = attempt_params(attempt);

        for page in 1..=limits.pages_per_attempt {
            let query = SearchQuery::for_attempt(color, variant, page, limits.per_page);
            let Some(result) = api.search(&query).await else {
                continue;
            };

            let mut new_count = 0usize;
            for hit in result.hits {
                if seen.insert(hit.id) {
                    collected.push(ImageRecord {
                        hit,
                        color: color.to_string(),
                        variant,
                    });
                    new_count += 1;
                }
            }

            tracing::info!(
                color,
                page,
                attempt = attempt + 1,
                new_images = new_count,
                distinct = seen.len(),
                "fetched page"
            );

            if seen.len() >= required {
                break;
            }
        }

        attempt += 1;
    }

    if collected.len() < required {
        tracing::warn!(
            color,
            required,
            collected = collected.len(),
            "attempt budget exhausted before quota was met"
        );
    }

    collected
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SamplingConfig;
    use crate::test_support::{CountingApi, ScriptedApi};

    fn limits() -> SamplingConfig {
        SamplingConfig::default()
    }

    // -----------------------------------------------------------------------
    // Parameter rotation tables
    // -----------------------------------------------------------------------

    #[test]
    fn attempt_zero_uses_defaults() {
        let p = attempt_params(0);
        assert_eq!(p.content_mode, "photo");
        assert!(!p.editors_choice);
        assert_eq!(p.locale, "en");
    }

    #[test]
    fn attempt_one_widens_to_all_modes() {
        assert_eq!(attempt_params(1).content_mode, "all");
    }

    #[test]
    fn attempt_four_is_the_only_curated_attempt() {
        for attempt in 0..9 {
            assert_eq!(attempt_params(attempt).editors_choice, attempt == 4);
        }
    }

    #[test]
    fn content_mode_cycles_with_period_three() {
        assert_eq!(attempt_params(2).content_mode, "vector");
        assert_eq!(attempt_params(3).content_mode, "photo");
        assert_eq!(attempt_params(4).content_mode, "illustration");
        assert_eq!(attempt_params(5).content_mode, "vector");
        assert_eq!(attempt_params(6).content_mode, "photo");
    }

    #[test]
    fn locale_stays_default_until_attempt_five_then_cycles() {
        for attempt in 0..5 {
            assert_eq!(attempt_params(attempt).locale, "en");
        }
        assert_eq!(attempt_params(5).locale, "ja");
        assert_eq!(attempt_params(6).locale, "ru");
        assert_eq!(attempt_params(7).locale, "de");
        assert_eq!(attempt_params(8).locale, "fr");
    }

    // -----------------------------------------------------------------------
    // Fetch loop behavior
    // -----------------------------------------------------------------------

    #[tokio::test]
    async fn collects_at_least_required_distinct_ids() {
        let api = ScriptedApi::with_pool("red", 1..=600);
        let records = fetch_color(&api, "red", 150, 0, &limits()).await;

        // Whole pages are merged before the quota check, so the call can
        // overshoot; the reconciliation loop trims the excess later
        assert!(records.len() >= 150);
        let mut ids: Vec<u64> = records.iter().map(|r| r.hit.id).collect();
        let len_before = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len_before, "no duplicate IDs within one invocation");
    }

    #[tokio::test]
    async fn records_carry_color_and_attempt_variant() {
        let api = ScriptedApi::with_pool("blue", 1..=10);
        let records = fetch_color(&api, "blue", 5, 0, &limits()).await;

        assert!(!records.is_empty());
        for record in &records {
            assert_eq!(record.color, "blue");
            assert_eq!(record.variant, attempt_params(0));
        }
    }

    #[tokio::test]
    async fn stops_paging_early_once_quota_is_met() {
        let api = CountingApi::with_hits(1..=500);
        let records = fetch_color(&api, "red", 10, 0, &limits()).await;

        // First page already holds 200 hits, 10 of which satisfy the quota
        assert_eq!(api.calls(), 1);
        assert!(records.len() >= 10);
    }

    #[tokio::test]
    async fn performs_at_most_27_calls_when_api_yields_nothing_new() {
        let api = CountingApi::empty();
        let records = fetch_color(&api, "red", 50, 0, &limits()).await;

        assert!(records.is_empty());
        assert_eq!(api.calls(), 27, "9 attempts x 3 pages");
    }

    #[tokio::test]
    async fn failed_pages_are_skipped_not_fatal() {
        let api = CountingApi::failing();
        let records = fetch_color(&api, "red", 50, 0, &limits()).await;

        assert!(records.is_empty());
        assert_eq!(api.calls(), 27);
    }

    #[tokio::test]
    async fn start_attempt_consumes_remaining_budget_only() {
        let api = CountingApi::empty();
        fetch_color(&api, "red", 50, 3, &limits()).await;

        // Attempts 3 through 8: 6 attempts x 3 pages
        assert_eq!(api.calls(), 18);
    }

    #[tokio::test]
    async fn exhausted_pool_returns_soft_shortfall() {
        // Source holds only 20 distinct ids; quota of 50 cannot be met
        let api = ScriptedApi::with_pool("green", 1..=20);
        let records = fetch_color(&api, "green", 50, 0, &limits()).await;

        assert_eq!(records.len(), 20);
    }

    #[tokio::test]
    async fn zero_required_returns_immediately() {
        let api = CountingApi::with_hits(1..=100);
        let records = fetch_color(&api, "red", 0, 0, &limits()).await;

        assert!(records.is_empty());
        assert_eq!(api.calls(), 0);
    }
}
