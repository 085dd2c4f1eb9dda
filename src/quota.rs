//! Proportional quota calculation
//!
//! Converts raw per-color population counts into integer per-color targets.
//! Rounding drift is accepted here: the sum of quotas may differ from the
//! requested total by up to the number of colors, and the reconciliation
//! loop's termination condition absorbs the difference. No correction pass
//! forces exactness.

use crate::types::ColorQuota;
use crate::{Error, Result};
use std::collections::HashMap;

/// Compute per-color integer targets proportional to `total`.
///
/// Each color's quota is `round(population / total_population * total)`.
/// Returns [`Error::EmptyPopulation`] when the population sums to zero;
/// callers should pre-validate that the probe produced a non-empty map.
pub fn compute_quotas(population: &HashMap<String, u64>, total: usize) -> Result<ColorQuota> {
    let total_population: u64 = population.values().sum();
    if total_population == 0 {
        return Err(Error::EmptyPopulation);
    }

    let mut quotas = ColorQuota::with_capacity(population.len());
    for (color, count) in population {
        let proportion = *count as f64 / total_population as f64;
        let quota = (proportion * total as f64).round() as usize;
        quotas.insert(color.clone(), quota);
    }

    tracing::info!(total, ?quotas, "computed per-color quotas");
    Ok(quotas)
}
