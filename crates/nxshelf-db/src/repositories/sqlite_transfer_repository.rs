//! `SQLite` implementation of the `TransferRepositoryPort` trait.

use std::path::PathBuf;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Row, SqlitePool};

use nxshelf_core::{
    RepositoryError, ResumeToken, TitleId, TransferError, TransferId, TransferItem,
    TransferRepositoryPort, TransferState,
};

use super::{column_error, storage_error, to_i64, to_u64};

/// `SQLite` implementation of the `TransferRepositoryPort` trait.
///
/// Resume tokens are stored base64-encoded and failures as JSON.
pub struct SqliteTransferRepository {
    pool: SqlitePool,
}

impl SqliteTransferRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransferRepositoryPort for SqliteTransferRepository {
    async fn save(&self, item: &TransferItem) -> Result<(), RepositoryError> {
        let error_json = item
            .error
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        let local_path = item
            .local_path
            .as_ref()
            .map(|p| p.to_string_lossy().into_owned());

        sqlx::query(
            r"
            INSERT INTO transfers (
                id, source_id, source_url, state, progress_fraction,
                bytes_written, total_bytes, resume_token, local_path, error,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                state = excluded.state,
                progress_fraction = excluded.progress_fraction,
                bytes_written = excluded.bytes_written,
                total_bytes = excluded.total_bytes,
                resume_token = excluded.resume_token,
                local_path = excluded.local_path,
                error = excluded.error,
                updated_at = excluded.updated_at
            ",
        )
        .bind(item.id.to_string())
        .bind(item.source_id.as_str())
        .bind(&item.source_url)
        .bind(item.state.as_str())
        .bind(item.progress_fraction)
        .bind(to_i64(item.bytes_written))
        .bind(item.total_bytes.map(to_i64))
        .bind(item.resume_token.as_ref().map(ResumeToken::to_base64))
        .bind(local_path)
        .bind(error_json)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }

    async fn get(&self, id: TransferId) -> Result<Option<TransferItem>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM transfers WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(storage_error)?;

        row.as_ref().map(row_to_item).transpose()
    }

    async fn list(&self) -> Result<Vec<TransferItem>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM transfers ORDER BY created_at DESC, id ASC")
            .fetch_all(&self.pool)
            .await
            .map_err(storage_error)?;

        rows.iter().map(row_to_item).collect()
    }

    async fn delete(&self, id: TransferId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM transfers WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("transfer {id}")));
        }
        Ok(())
    }
}

fn row_to_item(row: &sqlx::sqlite::SqliteRow) -> Result<TransferItem, RepositoryError> {
    let serialization = |what: &str, e: &dyn std::fmt::Display| {
        RepositoryError::Serialization(format!("{what}: {e}"))
    };

    let id: String = row.try_get("id").map_err(column_error)?;
    let source_id: String = row.try_get("source_id").map_err(column_error)?;
    let source_url: String = row.try_get("source_url").map_err(column_error)?;
    let state: String = row.try_get("state").map_err(column_error)?;
    let progress_fraction: f64 = row.try_get("progress_fraction").map_err(column_error)?;
    let bytes_written: i64 = row.try_get("bytes_written").map_err(column_error)?;
    let total_bytes: Option<i64> = row.try_get("total_bytes").map_err(column_error)?;
    let resume_token: Option<String> = row.try_get("resume_token").map_err(column_error)?;
    let local_path: Option<String> = row.try_get("local_path").map_err(column_error)?;
    let error: Option<String> = row.try_get("error").map_err(column_error)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_error)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_error)?;

    let source_id = TitleId::try_from(source_id).map_err(|e| serialization("source_id", &e))?;
    let mut item = TransferItem::new(source_id, source_url);

    item.id = id.parse().map_err(|e| serialization("id", &e))?;
    item.state = TransferState::parse(&state)
        .ok_or_else(|| RepositoryError::Serialization(format!("unknown state '{state}'")))?;
    item.progress_fraction = progress_fraction;
    item.bytes_written = to_u64(bytes_written);
    item.total_bytes = total_bytes.map(to_u64);
    item.resume_token = resume_token
        .map(|encoded| ResumeToken::from_base64(&encoded))
        .transpose()
        .map_err(|e| serialization("resume_token", &e))?;
    item.local_path = local_path.map(PathBuf::from);
    item.error = error
        .map(|json| serde_json::from_str::<TransferError>(&json))
        .transpose()
        .map_err(|e| serialization("error", &e))?;
    item.created_at = created_at;
    item.updated_at = updated_at;

    Ok(item)
}
