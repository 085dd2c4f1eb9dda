//! Batch insert of collected image records.

use crate::db::{Database, ImageStore};
use crate::error::DatabaseError;
use crate::types::ImageRecord;
use crate::{Error, Result};
use async_trait::async_trait;
use sqlx::{Sqlite, Transaction};

impl Database {
    /// Insert a batch of records inside one transaction.
    ///
    /// Dimension rows (tags, users, image types) are resolved or created as
    /// needed; one fact row is inserted per record. A record whose tag
    /// string does not split into exactly three tags aborts and rolls back
    /// the whole batch.
    pub async fn insert_images(&self, records: &[ImageRecord]) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let created_at = chrono::Utc::now().timestamp();

        for record in records {
            let tags: Vec<&str> = record
                .hit
                .tags
                .split(',')
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .collect();
            if tags.len() != 3 {
                // Dropping the transaction rolls the batch back
                return Err(Error::Database(DatabaseError::InvalidRecord(format!(
                    "image {} has {} tags, expected exactly 3",
                    record.hit.id,
                    tags.len()
                ))));
            }

            let tag1_id = Self::resolve_tag(&mut tx, tags[0]).await?;
            let tag2_id = Self::resolve_tag(&mut tx, tags[1]).await?;
            let tag3_id = Self::resolve_tag(&mut tx, tags[2]).await?;
            let user_id =
                Self::resolve_user(&mut tx, &record.hit.user, &record.hit.user_image_url).await?;
            let type_id = Self::resolve_image_type(&mut tx, &record.hit.image_type).await?;

            sqlx::query(
                r#"
                INSERT INTO image_facts (
                    user_id, type_id, tag1_id, tag2_id, tag3_id,
                    views, downloads, collections, likes, comments,
                    image_width, image_height, image_size,
                    large_image_url, page_url, created_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(user_id)
            .bind(type_id)
            .bind(tag1_id)
            .bind(tag2_id)
            .bind(tag3_id)
            .bind(record.hit.views)
            .bind(record.hit.downloads)
            .bind(record.hit.collections)
            .bind(record.hit.likes)
            .bind(record.hit.comments)
            .bind(record.hit.image_width)
            .bind(record.hit.image_height)
            .bind(record.hit.image_size)
            .bind(&record.hit.large_image_url)
            .bind(&record.hit.page_url)
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::info!(count = records.len(), "inserted image batch");
        Ok(())
    }

    async fn resolve_tag(tx: &mut Transaction<'_, Sqlite>, tag: &str) -> Result<i64> {
        sqlx::query("INSERT OR IGNORE INTO tags (tag) VALUES (?)")
            .bind(tag)
            .execute(&mut **tx)
            .await?;
        let id = sqlx::query_scalar("SELECT tag_id FROM tags WHERE tag = ?")
            .bind(tag)
            .fetch_one(&mut **tx)
            .await?;
        Ok(id)
    }

    async fn resolve_user(
        tx: &mut Transaction<'_, Sqlite>,
        user: &str,
        user_image_url: &str,
    ) -> Result<i64> {
        sqlx::query("INSERT OR IGNORE INTO users (user, user_image_url) VALUES (?, ?)")
            .bind(user)
            .bind(user_image_url)
            .execute(&mut **tx)
            .await?;
        let id = sqlx::query_scalar("SELECT user_id FROM users WHERE user = ?")
            .bind(user)
            .fetch_one(&mut **tx)
            .await?;
        Ok(id)
    }

    async fn resolve_image_type(tx: &mut Transaction<'_, Sqlite>, image_type: &str) -> Result<i64> {
        sqlx::query("INSERT OR IGNORE INTO image_types (type) VALUES (?)")
            .bind(image_type)
            .execute(&mut **tx)
            .await?;
        let id = sqlx::query_scalar("SELECT type_id FROM image_types WHERE type = ?")
            .bind(image_type)
            .fetch_one(&mut **tx)
            .await?;
        Ok(id)
    }

    /// Number of fact rows currently stored
    pub async fn count_facts(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM image_facts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of distinct tag entities currently stored
    pub async fn count_tags(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of distinct user entities currently stored
    pub async fn count_users(&self) -> Result<i64> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ImageStore for Database {
    async fn insert_images(&self, records: &[ImageRecord]) -> Result<()> {
        Database::insert_images(self, records).await
    }
}
