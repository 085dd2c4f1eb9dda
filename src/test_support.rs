//! Scripted [`SearchApi`] implementations shared across engine tests.

use crate::client::SearchApi;
use crate::fetcher::attempt_params;
use crate::types::{ImageHit, ImageRecord, SearchPage, SearchQuery};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Build a bare hit with the given ID
pub fn hit(id: u64) -> ImageHit {
    ImageHit {
        id,
        tags: "one, two, three".to_string(),
        ..ImageHit::default()
    }
}

/// Build a record as the fetcher would have produced it on attempt 0
pub fn record(id: u64, color: &str) -> ImageRecord {
    ImageRecord {
        hit: hit(id),
        color: color.to_string(),
        variant: attempt_params(0),
    }
}

/// A stateless fake API backed by a fixed pool of distinct IDs per color.
///
/// Every call slices the color's pool by the requested page and page size,
/// exactly like a real source whose result ordering never changes: repeated
/// attempts return the same IDs, and the pool size caps how many distinct
/// items the engine can ever obtain for that color.
pub struct ScriptedApi {
    pools: HashMap<String, Vec<u64>>,
    panic_on: Option<String>,
}

impl ScriptedApi {
    /// Empty API: every color yields an empty page
    pub fn new() -> Self {
        Self {
            pools: HashMap::new(),
            panic_on: None,
        }
    }

    /// Single-color pool constructor
    pub fn with_pool(color: &str, ids: impl IntoIterator<Item = u64>) -> Self {
        Self::new().pool(color, ids)
    }

    /// Add a pool for one color
    pub fn pool(mut self, color: &str, ids: impl IntoIterator<Item = u64>) -> Self {
        self.pools.insert(color.to_string(), ids.into_iter().collect());
        self
    }

    /// Panic on collection requests for the given color, simulating a
    /// category whose fetch sequence raises an unexpected fault.
    ///
    /// Small probe requests still answer normally, so the fault surfaces
    /// inside the per-color fetch task where it must be isolated.
    pub fn panic_on(mut self, color: &str) -> Self {
        self.panic_on = Some(color.to_string());
        self
    }
}

#[async_trait]
impl SearchApi for ScriptedApi {
    async fn search(&self, query: &SearchQuery) -> Option<SearchPage> {
        // Probe queries (tiny page size) stay well-behaved; see `panic_on`
        if self.panic_on.as_deref() == Some(query.color.as_str()) && query.per_page > 3 {
            panic!("scripted fault for color {}", query.color);
        }

        let pool = match self.pools.get(&query.color) {
            Some(pool) => pool,
            None => return Some(SearchPage::default()),
        };

        let start = (query.page.saturating_sub(1) as usize) * query.per_page as usize;
        let end = (start + query.per_page as usize).min(pool.len());
        let hits = if start < pool.len() {
            pool[start..end].iter().map(|id| hit(*id)).collect()
        } else {
            Vec::new()
        };

        Some(SearchPage {
            total: pool.len() as u64,
            total_hits: pool.len() as u64,
            hits,
        })
    }
}

enum CountingMode {
    /// Successful pages with no hits
    Empty,
    /// Every call fails at the transport level
    Failing,
    /// Pages sliced from a fixed hit list
    Hits(Vec<u64>),
}

/// A fake API that counts how many calls it receives
pub struct CountingApi {
    calls: AtomicUsize,
    mode: CountingMode,
}

impl CountingApi {
    /// Succeed on every call with zero hits
    pub fn empty() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            mode: CountingMode::Empty,
        }
    }

    /// Fail (return `None`) on every call
    pub fn failing() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            mode: CountingMode::Failing,
        }
    }

    /// Serve pages sliced from the given ID list
    pub fn with_hits(ids: impl IntoIterator<Item = u64>) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            mode: CountingMode::Hits(ids.into_iter().collect()),
        }
    }

    /// Number of search calls observed so far
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SearchApi for CountingApi {
    async fn search(&self, query: &SearchQuery) -> Option<SearchPage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.mode {
            CountingMode::Empty => Some(SearchPage::default()),
            CountingMode::Failing => None,
            CountingMode::Hits(ids) => {
                let start = (query.page.saturating_sub(1) as usize) * query.per_page as usize;
                let end = (start + query.per_page as usize).min(ids.len());
                let hits = if start < ids.len() {
                    ids[start..end].iter().map(|id| hit(*id)).collect()
                } else {
                    Vec::new()
                };
                Some(SearchPage {
                    total: ids.len() as u64,
                    total_hits: ids.len() as u64,
                    hits,
                })
            }
        }
    }
}
