use std::collections::HashSet;
use std::env;
use std::sync::Arc;

use ephem_blob::{BlobStore, DualBlobStore, LocalFsBlobStore, S3CompatibleBlobStore, S3Config};
use ephem_index::{MemoryMetadataIndex, MetadataIndex};

use crate::accepted_types::expand_shorthand_list;
use crate::error::{ConfigError, ConfigResult};

const DEFAULT_ACCEPTED_FILE_TYPES: &str = "jpeg,jpg,png,webp";
const DEFAULT_MAX_UPLOAD_BYTES: u64 = 5 * 1024 * 1024;
const DEFAULT_URL_TTL_MS: i64 = 60_000;
const DEFAULT_CLOCK_SKEW_TOLERANCE_MS: i64 = 5_000;

/// Startup configuration, read once and treated as read-only for the
/// life of the process — nothing here is mutated after `from_env`.
#[derive(Debug, Clone)]
pub struct EphemConfig {
    pub accepted_file_types: HashSet<String>,
    pub max_upload_bytes: u64,
    pub url_ttl_ms: i64,
    pub clock_skew_tolerance_ms: i64,
    pub blob_store: BlobStoreSelection,
    pub metadata_index: MetadataIndexSelection,
}

#[derive(Debug, Clone)]
pub enum BlobStoreSelection {
    Local { root: String },
    S3(Box<S3Config>),
    Dual { local_root: String, s3: Box<S3Config> },
}

#[derive(Debug, Clone)]
pub enum MetadataIndexSelection {
    Memory,
    Sqlx { database_url: String },
}

impl EphemConfig {
    pub fn from_env() -> ConfigResult<Self> {
        let accepted_file_types = expand_shorthand_list(
            &env::var("ACCEPTED_FILE_TYPES").unwrap_or_else(|_| DEFAULT_ACCEPTED_FILE_TYPES.to_string()),
        )?;

        let max_upload_bytes = parse_env_or("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?;
        let url_ttl_ms = parse_env_or("URL_TTL_MS", DEFAULT_URL_TTL_MS)?;
        let clock_skew_tolerance_ms =
            parse_env_or("CLOCK_SKEW_TOLERANCE_MS", DEFAULT_CLOCK_SKEW_TOLERANCE_MS)?;

        let blob_store = BlobStoreSelection::from_env()?;
        let metadata_index = MetadataIndexSelection::from_env()?;

        tracing::info!(
            max_upload_bytes,
            url_ttl_ms,
            clock_skew_tolerance_ms,
            accepted_types = accepted_file_types.len(),
            "configuration loaded"
        );

        Ok(Self {
            accepted_file_types,
            max_upload_bytes,
            url_ttl_ms,
            clock_skew_tolerance_ms,
            blob_store,
            metadata_index,
        })
    }

    pub async fn build_blob_store(&self) -> ConfigResult<Arc<dyn BlobStore>> {
        Ok(self.blob_store.build().await?)
    }

    pub async fn build_metadata_index(&self) -> ConfigResult<Arc<dyn MetadataIndex>> {
        Ok(self.metadata_index.build().await?)
    }

    /// Wires C1-C3 (minted per-call via [`ephem_types::RandomTokenGenerator`]
    /// and the real wall clock) into the two operations adapters call:
    /// an [`ephem_core::UploadCoordinator`] and an
    /// [`ephem_core::AccessArbiter`] sharing the same blob store and
    /// metadata index.
    pub async fn build_core(
        &self,
    ) -> ConfigResult<(ephem_core::UploadCoordinator, ephem_core::AccessArbiter)> {
        let blob_store = self.build_blob_store().await?;
        let metadata_index = self.build_metadata_index().await?;
        let clock: Arc<dyn ephem_core::Clock> = Arc::new(ephem_core::SystemClock);

        let coordinator = ephem_core::UploadCoordinator::new(
            blob_store.clone(),
            metadata_index.clone(),
            Arc::new(ephem_types::RandomTokenGenerator),
            clock.clone(),
            self.accepted_file_types.clone(),
            self.max_upload_bytes,
            self.url_ttl_ms,
        );

        let arbiter = ephem_core::AccessArbiter::new(
            blob_store,
            metadata_index,
            clock,
            self.clock_skew_tolerance_ms,
        );

        Ok((coordinator, arbiter))
    }
}

impl BlobStoreSelection {
    fn from_env() -> ConfigResult<Self> {
        let selection = env::var("BLOB_STORE").unwrap_or_else(|_| "local".to_string());
        match selection.as_str() {
            "local" => Ok(Self::Local {
                root: env::var("EPHEM_FS_ROOT").unwrap_or_else(|_| "./ephem-data".to_string()),
            }),
            "s3" => Ok(Self::S3(Box::new(S3Config::from_env()?))),
            "local,s3" | "s3,local" => Ok(Self::Dual {
                local_root: env::var("EPHEM_FS_ROOT").unwrap_or_else(|_| "./ephem-data".to_string()),
                s3: Box::new(S3Config::from_env()?),
            }),
            other => Err(ConfigError::UnknownBlobStoreSelection(other.to_string())),
        }
    }

    async fn build(&self) -> ConfigResult<Arc<dyn BlobStore>> {
        match self {
            Self::Local { root } => Ok(Arc::new(LocalFsBlobStore::new(root.clone()).await?)),
            Self::S3(config) => Ok(Arc::new(S3CompatibleBlobStore::new((**config).clone()).await)),
            Self::Dual { local_root, s3 } => {
                let local: Arc<dyn BlobStore> = Arc::new(LocalFsBlobStore::new(local_root.clone()).await?);
                let remote: Arc<dyn BlobStore> =
                    Arc::new(S3CompatibleBlobStore::new((**s3).clone()).await);
                Ok(Arc::new(DualBlobStore::new(local, remote)))
            }
        }
    }
}

impl MetadataIndexSelection {
    fn from_env() -> ConfigResult<Self> {
        let selection = env::var("METADATA_INDEX").unwrap_or_else(|_| "memory".to_string());
        match selection.as_str() {
            "memory" => Ok(Self::Memory),
            "sqlx" => Ok(Self::Sqlx {
                database_url: env::var("EPHEM_DATABASE_URL")
                    .map_err(|_| ConfigError::MissingEnv("EPHEM_DATABASE_URL".to_string()))?,
            }),
            other => Err(ConfigError::UnknownMetadataIndexSelection(other.to_string())),
        }
    }

    async fn build(&self) -> ConfigResult<Arc<dyn MetadataIndex>> {
        match self {
            Self::Memory => Ok(Arc::new(MemoryMetadataIndex::new())),
            Self::Sqlx { database_url } => Ok(Arc::new(
                ephem_index::SqlxMetadataIndex::connect(database_url).await?,
            )),
        }
    }
}

fn parse_env_or<T>(key: &str, default: T) -> ConfigResult<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|e: T::Err| ConfigError::invalid_value(key, raw, e.to_string())),
        Err(_) => Ok(default),
    }
}
