//! Dedup/trim/backfill convergence loop
//!
//! After concurrent collection, the candidate set can hold duplicate IDs
//! (across attempts and across colors) and per-color counts that overshoot
//! or undershoot the quota. Each round deduplicates globally, randomly trims
//! overruns, and re-fetches underruns at advanced attempt offsets. The loop
//! is bounded: at most `max_reconcile_rounds` rounds, after which the set is
//! returned best-effort.
//!
//! Backfill merges newly fetched items without checking them against the
//! working set; the next round's dedup pass removes any overlap. Every round
//! re-iterates start attempts 3 through 8 per underrun color, accepting that
//! already-exhausted parameter variants may be queried again.

use crate::client::SearchApi;
use crate::config::SamplingConfig;
use crate::fetcher::fetch_color;
use crate::types::{ColorQuota, Convergence, ImageRecord};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Result of a convergence run
#[derive(Debug)]
pub struct ReconcileOutcome {
    /// The final working set
    pub records: Vec<ImageRecord>,
    /// Whether the requested total was reached exactly
    pub convergence: Convergence,
}

/// Repair the candidate set toward `total_required` within a bounded number
/// of rounds.
///
/// The random source used for trimming is injected so callers (and tests)
/// can seed it; trimming selects uniformly without replacement among the
/// overrunning color's current members.
pub async fn converge<R: Rng>(
    api: Arc<dyn SearchApi>,
    mut working: Vec<ImageRecord>,
    quotas: &ColorQuota,
    total_required: usize,
    limits: &SamplingConfig,
    rng: &mut R,
) -> ReconcileOutcome {
    let mut round = 0u32;

    // The raw candidate set can hold hidden duplicates even when its size
    // happens to match the target, so every run enters at least one
    // dedup/trim/backfill round before the size check.
    loop {
        tracing::info!(
            round = round + 1,
            size = working.len(),
            total_required,
            "reconciliation round"
        );

        working = dedup_by_id(working);
        trim_overruns(&mut working, quotas, rng);
        backfill_underruns(&api, &mut working, quotas, limits).await;

        round += 1;
        if working.len() == total_required || round >= limits.max_reconcile_rounds {
            break;
        }
    }

    // Backfill merges without deduplicating, so a run that exhausts its
    // round budget can leave overlap behind. Settle the set before handing
    // it back.
    if working.len() != total_required {
        working = dedup_by_id(working);
        trim_overruns(&mut working, quotas, rng);
    }

    let convergence = if working.len() == total_required {
        Convergence::Converged
    } else {
        Convergence::Exhausted
    };
    tracing::info!(
        rounds = round,
        size = working.len(),
        total_required,
        ?convergence,
        "reconciliation finished"
    );

    ReconcileOutcome {
        records: working,
        convergence,
    }
}

/// Remove items with duplicate IDs, keeping the first occurrence in the
/// set's current order
pub fn dedup_by_id(records: Vec<ImageRecord>) -> Vec<ImageRecord> {
    let mut seen: HashSet<u64> = HashSet::with_capacity(records.len());
    records
        .into_iter()
        .filter(|record| seen.insert(record.hit.id))
        .collect()
}

/// Count current working-set members per color
pub fn count_by_color(records: &[ImageRecord]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for record in records {
        *counts.entry(record.color.clone()).or_default() += 1;
    }
    counts
}

/// Remove random excess items from every overrunning color
fn trim_overruns<R: Rng>(working: &mut Vec<ImageRecord>, quotas: &ColorQuota, rng: &mut R) {
    let counts = count_by_color(working);
    for (color, quota) in quotas {
        let actual = counts.get(color).copied().unwrap_or(0);
        if actual > *quota {
            let excess = actual - quota;
            trim_color(working, color, excess, rng);
            tracing::info!(color = %color, removed = excess, quota = *quota, "trimmed overrun");
        }
    }
}

/// Uniformly-at-random remove `excess` members of `color`, without
/// replacement over that color's current members
fn trim_color<R: Rng>(working: &mut Vec<ImageRecord>, color: &str, excess: usize, rng: &mut R) {
    let member_indices: Vec<usize> = working
        .iter()
        .enumerate()
        .filter(|(_, record)| record.color == color)
        .map(|(index, _)| index)
        .collect();

    let doomed: HashSet<usize> = rand::seq::index::sample(rng, member_indices.len(), excess)
        .iter()
        .map(|position| member_indices[position])
        .collect();

    let mut index = 0;
    working.retain(|_| {
        let keep = !doomed.contains(&index);
        index += 1;
        keep
    });
}

/// Re-invoke the fetcher for every underrunning color, one concurrent task
/// per color, merging whatever comes back into the working set
async fn backfill_underruns(
    api: &Arc<dyn SearchApi>,
    working: &mut Vec<ImageRecord>,
    quotas: &ColorQuota,
    limits: &SamplingConfig,
) {
    let counts = count_by_color(working);

    let mut handles = Vec::new();
    for (color, quota) in quotas {
        let actual = counts.get(color).copied().unwrap_or(0);
        if actual >= *quota {
            continue;
        }
        let shortfall = quota - actual;
        let api = Arc::clone(api);
        let color = color.clone();
        let limits = limits.clone();
        handles.push(tokio::spawn(async move {
            let mut merged = Vec::new();
            for start_attempt in limits.backfill_start_attempt..limits.max_attempts {
                let batch = fetch_color(api.as_ref(), &color, shortfall, start_attempt, &limits).await;
                tracing::info!(
                    color = %color,
                    start_attempt,
                    added = batch.len(),
                    "backfill batch merged"
                );
                merged.extend(batch);
            }
            merged
        }));
    }

    for handle in handles {
        match handle.await {
            Ok(batch) => working.extend(batch),
            Err(e) => {
                tracing::error!(error = %e, "backfill task failed; siblings unaffected");
            }
        }
    }
}
