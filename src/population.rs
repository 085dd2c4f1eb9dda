//! Per-color population probe
//!
//! One small concurrent request per color reads the API's reported `total`
//! for that color. The resulting map feeds the quota calculator. A color
//! whose probe fails is simply omitted — the quota split then runs over the
//! colors that answered.

use crate::client::SearchApi;
use crate::types::SearchQuery;
use futures::future::join_all;
use std::collections::HashMap;

/// Probe every color's total image population concurrently.
///
/// Returns a map from color to its reported total; failed probes are logged
/// by the fetch primitive and leave their color out of the map.
pub async fn color_population(
    api: &dyn SearchApi,
    colors: &[String],
    probe_per_page: u32,
) -> HashMap<String, u64> {
    let probes = colors.iter().map(|color| async move {
        let page = api.search(&SearchQuery::probe(color, probe_per_page)).await;
        (color.clone(), page.map(|p| p.total))
    });

    let mut population = HashMap::with_capacity(colors.len());
    let mut total = 0u64;
    for (color, result) in join_all(probes).await {
        match result {
            Some(count) => {
                total += count;
                population.insert(color, count);
            }
            None => {
                tracing::warn!(color = %color, "population probe failed; color omitted");
            }
        }
    }

    tracing::info!(?population, total, "gathered color population");
    population
}
