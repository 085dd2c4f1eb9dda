//! SQLite persistence layer
//!
//! A small star schema mirroring the collected data: `tags`, `users`, and
//! `image_types` dimension tables plus one `image_facts` row per image,
//! carrying three tag foreign keys. Dimension rows are resolved or created
//! on insert.
//!
//! Methods on [`Database`] are organized by domain:
//! - [`migrations`] — database lifecycle, schema migrations
//! - [`images`] — batch insert of collected records
//!
//! The acquisition engine never touches this module directly; it talks to
//! the [`ImageStore`] trait, for which [`Database`] is the production
//! implementation.

use crate::types::ImageRecord;
use crate::Result;
use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;

mod images;
mod migrations;


/// Sink accepting the final tabular record set.
///
/// Resolves/creates dimension entities and inserts one fact row per item.
/// The engine has no knowledge of the schema or transaction boundaries
/// behind this trait.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Persist a batch of collected records
    async fn insert_images(&self, records: &[ImageRecord]) -> Result<()>;
}

/// SQLite-backed image warehouse
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Close the database connection pool
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
