//! `SQLite` implementation of the `WishlistRepository` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use nxshelf_core::{RepositoryError, TitleId, WishlistEntry, WishlistRepository};

use super::{column_error, storage_error};

pub struct SqliteWishlistRepository {
    pool: SqlitePool,
}

impl SqliteWishlistRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WishlistRepository for SqliteWishlistRepository {
    async fn add(&self, entry: &WishlistEntry) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "INSERT OR IGNORE INTO wishlist (title_id, name, added_at) VALUES (?, ?, ?)",
        )
        .bind(entry.title_id.as_str())
        .bind(&entry.name)
        .bind(entry.added_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn remove(&self, id: &TitleId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM wishlist WHERE title_id = ?")
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn contains(&self, id: &TitleId) -> Result<bool, RepositoryError> {
        let found: Option<i64> = sqlx::query_scalar("SELECT 1 FROM wishlist WHERE title_id = ?")
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(found.is_some())
    }

    async fn list(&self) -> Result<Vec<WishlistEntry>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT title_id, name, added_at FROM wishlist ORDER BY added_at DESC, title_id ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_entry).collect()
    }
}

fn row_to_entry(row: &sqlx::sqlite::SqliteRow) -> Result<WishlistEntry, RepositoryError> {
    let title_id: String = row.try_get("title_id").map_err(column_error)?;
    let name: String = row.try_get("name").map_err(column_error)?;
    let added_at: DateTime<Utc> = row.try_get("added_at").map_err(column_error)?;

    Ok(WishlistEntry {
        title_id: TitleId::try_from(title_id)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
        name,
        added_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_database;
    use chrono::TimeZone;

    fn entry(id: &str, minute: u32) -> WishlistEntry {
        WishlistEntry {
            title_id: TitleId::parse(id).unwrap(),
            name: format!("Title {id}"),
            added_at: Utc.with_ymd_and_hms(2025, 3, 8, 12, minute, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_add_twice_keeps_one_entry() {
        let repo = SqliteWishlistRepository::new(setup_test_database().await.unwrap());
        assert!(repo.add(&entry("01001E500F7FC000", 0)).await.unwrap());
        assert!(!repo.add(&entry("01001E500F7FC000", 5)).await.unwrap());

        let list = repo.list().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].added_at, entry("01001E500F7FC000", 0).added_at);
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let repo = SqliteWishlistRepository::new(setup_test_database().await.unwrap());
        repo.add(&entry("0100AAAAAAAAA000", 1)).await.unwrap();
        repo.add(&entry("0100CCCCCCCCC000", 30)).await.unwrap();
        repo.add(&entry("0100BBBBBBBBB000", 10)).await.unwrap();

        let order: Vec<String> = repo
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title_id.to_string())
            .collect();
        assert_eq!(
            order,
            vec!["0100CCCCCCCCC000", "0100BBBBBBBBB000", "0100AAAAAAAAA000"]
        );
    }

    #[tokio::test]
    async fn test_remove_and_contains() {
        let repo = SqliteWishlistRepository::new(setup_test_database().await.unwrap());
        let id = TitleId::parse("01001E500F7FC000").unwrap();
        repo.add(&entry("01001E500F7FC000", 0)).await.unwrap();

        assert!(repo.contains(&id).await.unwrap());
        assert!(repo.remove(&id).await.unwrap());
        assert!(!repo.remove(&id).await.unwrap());
        assert!(!repo.contains(&id).await.unwrap());
    }
}
