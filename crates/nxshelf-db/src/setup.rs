//! Database setup and initialization.
//!
//! Entry points call [`setup_database`] with the resolved database path.
//! Every statement uses `IF NOT EXISTS`, so setup is safe to repeat.

use anyhow::{Context, Result};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::SqlitePool;
use std::path::Path;

/// Open (creating if missing) the database at `db_path` and ensure the schema.
///
/// ```rust,no_run
/// use nxshelf_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database(Path::new("/path/to/nxshelf.db")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true),
    )
    .await
    .with_context(|| format!("opening database {}", db_path.display()))?;

    create_schema(&pool).await?;
    tracing::debug!(target: "nxshelf.db", path = %db_path.display(), "Database ready");
    Ok(pool)
}

/// Sets up an in-memory `SQLite` database for testing.
///
/// A single connection keeps the in-memory database alive and shared.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    let pool = sqlx::sqlite::SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS titles (
            id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            version TEXT NOT NULL,
            size_bytes INTEGER NOT NULL,
            release_date TEXT,
            base_id TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_titles_base_id ON titles(base_id)")
        .execute(pool)
        .await?;
    sqlx::query("CREATE INDEX IF NOT EXISTS idx_titles_release_date ON titles(release_date)")
        .execute(pool)
        .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS wishlist (
            title_id TEXT PRIMARY KEY NOT NULL,
            name TEXT NOT NULL,
            added_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r"
        CREATE TABLE IF NOT EXISTS transfers (
            id TEXT PRIMARY KEY NOT NULL,
            source_id TEXT NOT NULL,
            source_url TEXT NOT NULL,
            state TEXT NOT NULL,
            progress_fraction REAL NOT NULL DEFAULT 0,
            bytes_written INTEGER NOT NULL DEFAULT 0,
            total_bytes INTEGER,
            resume_token TEXT,
            local_path TEXT,
            error TEXT,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        ",
    )
    .execute(pool)
    .await?;

    Ok(())
}
