use async_trait::async_trait;
use ephem_types::{BlobReference, Token};
use sqlx::any::{install_default_drivers, AnyPoolOptions};
use sqlx::AnyPool;

use crate::{IndexError, IndexResult, MetadataIndex, MetadataRecord};

/// `sqlx::Any` binds a driver per connection string but never rewrites
/// placeholder syntax, so the two dialects this index supports need
/// their queries built with their own bind-parameter style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Sqlite,
    Postgres,
}

impl Dialect {
    fn from_url(database_url: &str) -> IndexResult<Self> {
        if database_url.starts_with("sqlite:") {
            Ok(Self::Sqlite)
        } else if database_url.starts_with("postgres:") || database_url.starts_with("postgresql:") {
            Ok(Self::Postgres)
        } else {
            Err(IndexError::unavailable(UnsupportedDialect(
                database_url.to_string(),
            )))
        }
    }

    /// `$1, $2, ...` for Postgres, `?, ?, ...` for SQLite.
    fn placeholders(self, count: usize) -> String {
        match self {
            Self::Sqlite => vec!["?"; count].join(", "),
            Self::Postgres => (1..=count).map(|n| format!("${n}")).collect::<Vec<_>>().join(", "),
        }
    }

    fn placeholder(self, n: usize) -> String {
        match self {
            Self::Sqlite => "?".to_string(),
            Self::Postgres => format!("${n}"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unsupported database URL scheme (expected sqlite: or postgres:): {0}")]
struct UnsupportedDialect(String);

/// Durable metadata index backed by SQLite or Postgres via `sqlx::Any`.
/// Schema is bootstrapped idempotently on connect; there is no migration
/// runner here, only a `CREATE TABLE IF NOT EXISTS` matching the fixed
/// shape of [`MetadataRecord`].
pub struct SqlxMetadataIndex {
    pool: AnyPool,
    dialect: Dialect,
}

impl SqlxMetadataIndex {
    pub async fn connect(database_url: &str) -> IndexResult<Self> {
        let dialect = Dialect::from_url(database_url)?;

        install_default_drivers();
        let pool = AnyPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(IndexError::unavailable)?;

        sqlx::query(
            "CREATE TABLE IF NOT EXISTS ephem_metadata (
                token TEXT PRIMARY KEY,
                blob_reference TEXT NOT NULL,
                expires_at_epoch_ms BIGINT NOT NULL,
                content_type TEXT
            )",
        )
        .execute(&pool)
        .await
        .map_err(IndexError::unavailable)?;

        tracing::info!(?dialect, "metadata index schema bootstrapped");
        Ok(Self { pool, dialect })
    }

    pub fn from_env() -> IndexResult<String> {
        std::env::var("EPHEM_DATABASE_URL")
            .map_err(|e| IndexError::unavailable(EnvMissing(e.to_string())))
    }
}

#[derive(Debug, thiserror::Error)]
#[error("EPHEM_DATABASE_URL not set: {0}")]
struct EnvMissing(String);

#[async_trait]
impl MetadataIndex for SqlxMetadataIndex {
    async fn put(&self, record: MetadataRecord) -> IndexResult<()> {
        // Upsert keyed by token: the coordinator never reuses a minted
        // token, so the ON CONFLICT arm only fires during test replay.
        let values = self.dialect.placeholders(4);
        let query = format!(
            "INSERT INTO ephem_metadata (token, blob_reference, expires_at_epoch_ms, content_type)
             VALUES ({values})
             ON CONFLICT(token) DO UPDATE SET
                blob_reference = excluded.blob_reference,
                expires_at_epoch_ms = excluded.expires_at_epoch_ms,
                content_type = excluded.content_type"
        );

        sqlx::query(&query)
            .bind(record.token.as_str().to_string())
            .bind(record.blob_reference.as_str().to_string())
            .bind(record.expires_at_epoch_ms)
            .bind(record.content_type)
            .execute(&self.pool)
            .await
            .map_err(IndexError::unavailable)?;

        Ok(())
    }

    async fn get(&self, token: &Token) -> IndexResult<Option<MetadataRecord>> {
        let query = format!(
            "SELECT token, blob_reference, expires_at_epoch_ms, content_type
             FROM ephem_metadata WHERE token = {}",
            self.dialect.placeholder(1)
        );

        let row = sqlx::query_as::<_, StoredRow>(&query)
            .bind(token.as_str().to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(IndexError::unavailable)?;

        Ok(row.map(|r| {
            MetadataRecord::new(
                Token::from_string(r.token),
                BlobReference::new(r.blob_reference),
                r.expires_at_epoch_ms,
                r.content_type,
            )
        }))
    }

    async fn close(&self) -> IndexResult<()> {
        self.pool.close().await;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct StoredRow {
    token: String,
    blob_reference: String,
    expires_at_epoch_ms: i64,
    content_type: Option<String>,
}
