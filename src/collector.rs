//! Concurrent per-color fan-out
//!
//! One task per color, no shared state between tasks: each fetcher owns its
//! own seen-ID set, so cross-color ID collisions are possible here and are
//! resolved later by the reconciliation loop's global deduplication.

use crate::client::SearchApi;
use crate::config::SamplingConfig;
use crate::fetcher::fetch_color;
use crate::types::{ColorQuota, ImageRecord};
use std::sync::Arc;

/// Launch one fetcher per color concurrently and flatten the joined results.
///
/// Faults are isolated per color: a task that panics (e.g. on a malformed
/// response shape) is logged and contributes nothing, while sibling colors'
/// in-flight work completes unaffected.
pub async fn collect(
    api: Arc<dyn SearchApi>,
    quotas: &ColorQuota,
    limits: &SamplingConfig,
) -> Vec<ImageRecord> {
    let mut handles = Vec::with_capacity(quotas.len());
    for (color, required) in quotas {
        let api = Arc::clone(&api);
        let color = color.clone();
        let required = *required;
        let limits = limits.clone();
        let task_color = color.clone();
        let handle = tokio::spawn(async move {
            fetch_color(api.as_ref(), &task_color, required, 0, &limits).await
        });
        handles.push((color, handle));
    }

    let mut flattened = Vec::new();
    for (color, handle) in handles {
        match handle.await {
            Ok(records) => {
                tracing::info!(color = %color, count = records.len(), "color fetch complete");
                flattened.extend(records);
            }
            Err(e) => {
                tracing::error!(
                    color = %color,
                    error = %e,
                    "color fetch task failed; siblings unaffected"
                );
            }
        }
    }

    flattened
}
