//! SQLite-backed chunk collection.
//!
//! A collection is one SQLite database (`collection.db` under the collection
//! directory) holding embedded chunks plus a small metadata table. The first
//! append fixes the embedding dimension for the life of the collection; every
//! later append must match it. Re-ingesting the same document accumulates
//! duplicate rows rather than replacing them.
//!
//! ## Schema
//!
//! ```sql
//! CREATE TABLE chunks (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     source TEXT NOT NULL,            -- originating file path
//!     unit_index INTEGER NOT NULL,     -- page/section within the source
//!     unit_format TEXT NOT NULL,       -- source format label (txt/pdf/docx)
//!     chunk_index INTEGER NOT NULL,    -- chunk position within the unit
//!     content TEXT NOT NULL,
//!     embedding BLOB NOT NULL,         -- little-endian f32 vector
//!     created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
//! );
//!
//! CREATE TABLE collection_meta (
//!     key TEXT PRIMARY KEY,
//!     value TEXT NOT NULL
//! );
//! ```
//!
//! WAL mode plus a busy timeout covers concurrent readers within one process;
//! there is no cross-process locking beyond what SQLite itself provides.

use crate::error::{Result, RetrievalError};
use sqlx::sqlite::SqliteConnectOptions;
use sqlx::{Row, SqlitePool};
use std::path::Path;

const DIMENSION_KEY: &str = "dimension";

/// A chunk ready for insertion: text plus its embedding and provenance.
#[derive(Debug, Clone)]
pub struct NewChunk {
    pub source: String,
    pub unit_index: usize,
    pub unit_format: String,
    pub chunk_index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// A chunk row read back from the collection.
#[derive(Debug, Clone)]
pub struct ChunkRecord {
    pub id: i64,
    pub source: String,
    pub unit_index: usize,
    pub unit_format: String,
    pub chunk_index: usize,
    pub content: String,
    pub embedding: Vec<f32>,
}

/// Summary counters for the `stats` CLI subcommand.
#[derive(Debug, Clone, serde::Serialize)]
pub struct CollectionStats {
    pub total_chunks: usize,
    pub distinct_sources: usize,
    pub dimension: Option<usize>,
}

/// Handle to one chunk collection.
#[derive(Clone, Debug)]
pub struct Collection {
    pool: SqlitePool,
}

impl Collection {
    /// Opens a collection with persistent storage, creating the directory and
    /// database file if missing.
    pub async fn open(base: &Path) -> Result<Self> {
        tokio::fs::create_dir_all(base).await?;
        let db_path = base.join("collection.db");

        let pool = SqlitePool::connect_with(
            SqliteConnectOptions::new()
                .filename(db_path)
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .busy_timeout(std::time::Duration::from_secs(5))
                .create_if_missing(true)
                .auto_vacuum(sqlx::sqlite::SqliteAutoVacuum::Full)
                .page_size(1 << 16)
                .optimize_on_close(true, 1 << 10),
        )
        .await?;
        Self::new_with_pool(pool).await
    }

    /// Opens an in-memory collection for testing.
    pub async fn open_memory() -> Result<Self> {
        let pool = SqlitePool::connect("sqlite::memory:").await?;
        Self::new_with_pool(pool).await
    }

    async fn new_with_pool(pool: SqlitePool) -> Result<Self> {
        Self::create_tables(&pool).await?;
        Ok(Self { pool })
    }

    async fn create_tables(pool: &SqlitePool) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS chunks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                source TEXT NOT NULL,
                unit_index INTEGER NOT NULL,
                unit_format TEXT NOT NULL,
                chunk_index INTEGER NOT NULL,
                content TEXT NOT NULL,
                embedding BLOB NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS collection_meta (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_chunks_source ON chunks(source)")
            .execute(pool)
            .await?;

        Ok(())
    }

    /// The embedding dimension recorded on first append, if any.
    pub async fn dimension(&self) -> Result<Option<usize>> {
        let value: Option<String> =
            sqlx::query_scalar("SELECT value FROM collection_meta WHERE key = ?1")
                .bind(DIMENSION_KEY)
                .fetch_optional(&self.pool)
                .await?;
        Ok(value.and_then(|v| v.parse().ok()))
    }

    /// Inserts all chunks in one transaction.
    ///
    /// The first successful append records the embedding dimension; any chunk
    /// whose vector length differs from it (or from the rest of this batch)
    /// rejects the whole batch and writes nothing.
    pub async fn append(&self, chunks: &[NewChunk]) -> Result<usize> {
        if chunks.is_empty() {
            return Ok(0);
        }

        let batch_dimension = chunks[0].embedding.len();
        for chunk in chunks {
            if chunk.embedding.len() != batch_dimension {
                return Err(RetrievalError::DimensionMismatch {
                    expected: batch_dimension,
                    actual: chunk.embedding.len(),
                });
            }
        }

        let mut tx = self.pool.begin().await?;

        let stored: Option<String> =
            sqlx::query_scalar("SELECT value FROM collection_meta WHERE key = ?1")
                .bind(DIMENSION_KEY)
                .fetch_optional(&mut *tx)
                .await?;
        match stored.and_then(|v| v.parse::<usize>().ok()) {
            Some(expected) if expected != batch_dimension => {
                return Err(RetrievalError::DimensionMismatch {
                    expected,
                    actual: batch_dimension,
                });
            }
            Some(_) => {}
            None => {
                sqlx::query("INSERT INTO collection_meta (key, value) VALUES (?1, ?2)")
                    .bind(DIMENSION_KEY)
                    .bind(batch_dimension.to_string())
                    .execute(&mut *tx)
                    .await?;
            }
        }

        for chunk in chunks {
            let embedding_bytes = bytemuck::cast_slice::<f32, u8>(&chunk.embedding);
            sqlx::query(
                r#"
                INSERT INTO chunks (source, unit_index, unit_format, chunk_index, content, embedding)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                "#,
            )
            .bind(&chunk.source)
            .bind(chunk.unit_index as i64)
            .bind(&chunk.unit_format)
            .bind(chunk.chunk_index as i64)
            .bind(&chunk.content)
            .bind(embedding_bytes)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        tracing::debug!("Appended {} chunks to collection", chunks.len());
        Ok(chunks.len())
    }

    /// All chunks in insertion order.
    pub async fn all_chunks(&self) -> Result<Vec<ChunkRecord>> {
        let rows = sqlx::query(
            r#"
            SELECT id, source, unit_index, unit_format, chunk_index, content, embedding
            FROM chunks ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let id: i64 = row.get("id");
                let blob: Vec<u8> = row.get("embedding");
                let embedding = decode_embedding(id, &blob)?;
                Ok(ChunkRecord {
                    id,
                    source: row.get("source"),
                    unit_index: row.get::<i64, _>("unit_index") as usize,
                    unit_format: row.get("unit_format"),
                    chunk_index: row.get::<i64, _>("chunk_index") as usize,
                    content: row.get("content"),
                    embedding,
                })
            })
            .collect()
    }

    /// Summary counters for the collection.
    pub async fn stats(&self) -> Result<CollectionStats> {
        let total_chunks: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chunks")
            .fetch_one(&self.pool)
            .await?;
        let distinct_sources: i64 =
            sqlx::query_scalar("SELECT COUNT(DISTINCT source) FROM chunks")
                .fetch_one(&self.pool)
                .await?;

        Ok(CollectionStats {
            total_chunks: total_chunks as usize,
            distinct_sources: distinct_sources as usize,
            dimension: self.dimension().await?,
        })
    }
}

fn decode_embedding(id: i64, blob: &[u8]) -> Result<Vec<f32>> {
    if blob.len() % std::mem::size_of::<f32>() != 0 {
        return Err(RetrievalError::CorruptEmbedding {
            id,
            message: format!("blob length {} is not a multiple of 4", blob.len()),
        });
    }
    // pod_collect_to_vec copies, so the byte slice's alignment does not matter.
    Ok(bytemuck::pod_collect_to_vec(blob))
}
