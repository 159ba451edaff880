//! `SQLite` implementation of the `TitleRepository` trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use nxshelf_core::{
    CatalogQuery, CatalogSort, CatalogTitle, RepositoryError, TitleId, TitlePage, TitleRepository,
};

use super::{column_error, storage_error, to_i64, to_u64};

const SELECT_COLUMNS: &str = "SELECT id, name, version, size_bytes, release_date, base_id FROM titles";

/// `SQLite` implementation of the `TitleRepository` trait.
pub struct SqliteTitleRepository {
    pool: SqlitePool,
}

impl SqliteTitleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// `ORDER BY` clause for a sort option. Undated titles always come last.
const fn order_clause(sort: CatalogSort) -> &'static str {
    match sort {
        CatalogSort::NameAsc => "name COLLATE NOCASE ASC, id ASC",
        CatalogSort::NameDesc => "name COLLATE NOCASE DESC, id ASC",
        CatalogSort::ReleaseDateAsc => {
            "release_date IS NULL, release_date ASC, name COLLATE NOCASE ASC, id ASC"
        }
        CatalogSort::ReleaseDateDesc => {
            "release_date IS NULL, release_date DESC, name COLLATE NOCASE ASC, id ASC"
        }
        CatalogSort::SizeAsc => "size_bytes ASC, id ASC",
        CatalogSort::SizeDesc => "size_bytes DESC, id ASC",
    }
}

/// `LIKE` pattern matching `term` anywhere, with wildcards in `term` escaped.
fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl TitleRepository for SqliteTitleRepository {
    async fn replace_all(&self, titles: &[CatalogTitle]) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage_error)?;

        sqlx::query("DELETE FROM titles")
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;

        for title in titles {
            sqlx::query(
                r"
                INSERT OR REPLACE INTO titles (id, name, version, size_bytes, release_date, base_id)
                VALUES (?, ?, ?, ?, ?, ?)
                ",
            )
            .bind(title.id.as_str())
            .bind(&title.name)
            .bind(&title.version)
            .bind(to_i64(title.size_bytes))
            .bind(title.release_date)
            .bind(title.base_id.as_str())
            .execute(&mut *tx)
            .await
            .map_err(storage_error)?;
        }

        tx.commit().await.map_err(storage_error)?;
        tracing::debug!(target: "nxshelf.db", count = titles.len(), "Replaced titles");
        Ok(())
    }

    async fn get(&self, id: &TitleId) -> Result<Option<CatalogTitle>, RepositoryError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(row_to_title).transpose()
    }

    async fn page(&self, query: &CatalogQuery) -> Result<TitlePage, RepositoryError> {
        let pattern = query.search_term().map(like_pattern);
        let filter = "WHERE (?1 IS NULL OR name LIKE ?1 ESCAPE '\\')";

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM titles {filter}"))
            .bind(&pattern)
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;

        let sql = format!(
            "{SELECT_COLUMNS} {filter} ORDER BY {} LIMIT ?2 OFFSET ?3",
            order_clause(query.sort)
        );
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(i64::from(query.page_size))
            .bind(to_i64(query.offset()))
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        let items = rows.iter().map(row_to_title).collect::<Result<Vec<_>, _>>()?;
        Ok(TitlePage::new(items, query, to_u64(total)))
    }

    async fn related(&self, base_id: &TitleId) -> Result<Vec<CatalogTitle>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} WHERE base_id = ? ORDER BY id = base_id DESC, id ASC"
        ))
        .bind(base_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        rows.iter().map(row_to_title).collect()
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM titles")
            .fetch_one(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(to_u64(count))
    }
}

fn row_to_title(row: &sqlx::sqlite::SqliteRow) -> Result<CatalogTitle, RepositoryError> {
    let id: String = row.try_get("id").map_err(column_error)?;
    let name: String = row.try_get("name").map_err(column_error)?;
    let version: String = row.try_get("version").map_err(column_error)?;
    let size_bytes: i64 = row.try_get("size_bytes").map_err(column_error)?;
    let release_date: Option<NaiveDate> = row.try_get("release_date").map_err(column_error)?;
    let base_id: String = row.try_get("base_id").map_err(column_error)?;

    let decode = |raw: String| {
        TitleId::try_from(raw).map_err(|e| RepositoryError::Serialization(e.to_string()))
    };

    Ok(CatalogTitle {
        id: decode(id)?,
        name,
        version,
        size_bytes: to_u64(size_bytes),
        release_date,
        base_id: decode(base_id)?,
    })
}
