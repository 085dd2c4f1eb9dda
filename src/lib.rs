//! # pixabay-sampler
//!
//! Library for collecting a fixed-size, color-balanced sample of images from
//! the Pixabay search API, normalizing descriptive tags, and persisting the
//! result into a SQLite star schema.
//!
//! ## Design Philosophy
//!
//! - **Quota-driven** - per-color targets are computed proportionally from
//!   the live population and converged on exactly where the source allows
//! - **Degrades gracefully** - transport failures, duplicate-heavy result
//!   sets, and starved categories shrink the sample instead of aborting it
//! - **Library-first** - no CLI or UI, purely a Rust crate for embedding
//! - **Injectable collaborators** - the HTTP transport, tag normalizer,
//!   persistence sink, and random source are all traits/parameters, so the
//!   engine is fully testable offline
//!
//! ## Quick Start
//!
//! ```no_run
//! use pixabay_sampler::{Config, ImageSampler};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut config = Config::default();
//!     config.api.key = "your-api-key".to_string();
//!     config.sampling.total_images = 4000;
//!
//!     let sampler = ImageSampler::new(config).await?;
//!     let report = sampler.run().await?;
//!
//!     println!(
//!         "collected {} of {} images ({:?})",
//!         report.collected, report.requested, report.convergence
//!     );
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// Pixabay API client and the injectable search capability
pub mod client;
/// Concurrent per-color collection
pub mod collector;
/// Configuration types
pub mod config;
/// Database persistence layer
pub mod db;
/// Error types
pub mod error;
/// Per-color adaptive fetch loop
pub mod fetcher;
/// Tag normalization collaborator
pub mod normalize;
/// Per-color population probe
pub mod population;
/// Proportional quota calculation
pub mod quota;
/// Dedup/trim/backfill convergence loop
pub mod reconcile;
/// Top-level sampling orchestrator
pub mod sampler;
/// Core types
pub mod types;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use client::{PixabayClient, SearchApi};
pub use config::{ApiConfig, Config, DatabaseConfig, SamplingConfig};
pub use db::{Database, ImageStore};
pub use error::{DatabaseError, Error, Result};
pub use normalize::{BasicLemmatizer, IdentityNormalizer, TagNormalizer};
pub use quota::compute_quotas;
pub use reconcile::ReconcileOutcome;
pub use sampler::ImageSampler;
pub use types::{
    AttemptParams, ColorQuota, Convergence, ImageHit, ImageRecord, SampleReport, SearchPage,
    SearchQuery,
};
