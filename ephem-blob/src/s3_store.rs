use std::env;

use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_credential_types::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;
use ephem_types::BlobReference;
use uuid::Uuid;

use crate::{BlobError, BlobResult, BlobStore, PutMeta, StoredBlob};

/// S3-compatible endpoint configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct S3Config {
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    pub endpoint_url: String,
    pub bucket: String,
}

impl S3Config {
    pub fn from_env() -> BlobResult<Self> {
        fn get_env(key: &str) -> BlobResult<String> {
            env::var(key).map_err(|_| BlobError::backend(MissingEnv(key.to_string())))
        }

        Ok(Self {
            region: get_env("EPHEM_S3_REGION")?,
            access_key_id: get_env("EPHEM_S3_ACCESS_KEY_ID")?,
            secret_access_key: get_env("EPHEM_S3_SECRET_ACCESS_KEY")?,
            endpoint_url: get_env("EPHEM_S3_ENDPOINT_URL")?,
            bucket: get_env("EPHEM_S3_BUCKET")?,
        })
    }
}

#[derive(Debug, thiserror::Error)]
#[error("missing environment variable: {0}")]
struct MissingEnv(String);

/// Blob store backed by any S3-compatible object store (AWS S3, MinIO,
/// RustFS, ...). References are the bucket key, prefixed so a
/// [`DualBlobStore`](crate::DualBlobStore) can tell adapters apart.
#[derive(Clone)]
pub struct S3CompatibleBlobStore {
    client: Client,
    bucket: String,
}

impl S3CompatibleBlobStore {
    pub async fn new(config: S3Config) -> Self {
        let client = Self::build_client(&config).await;
        Self {
            client,
            bucket: config.bucket,
        }
    }

    pub async fn from_env() -> BlobResult<Self> {
        Ok(Self::new(S3Config::from_env()?).await)
    }

    async fn build_client(config: &S3Config) -> Client {
        let credentials = Credentials::new(
            config.access_key_id.clone(),
            config.secret_access_key.clone(),
            None,
            None,
            "ephem-blob",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(config.endpoint_url.clone())
            .load()
            .await;

        Client::from_conf(
            aws_sdk_s3::config::Builder::from(&aws_config)
                .force_path_style(true)
                .build(),
        )
    }

    fn map_aws_error(err: impl std::error::Error + Send + Sync + 'static) -> BlobError {
        tracing::error!(error = %err, "s3 backend fault");
        BlobError::backend(err)
    }
}

#[async_trait]
impl BlobStore for S3CompatibleBlobStore {
    async fn save(&self, bytes: Bytes, meta: PutMeta) -> BlobResult<BlobReference> {
        let key = Uuid::new_v4().to_string();

        let mut request = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(bytes));

        if let Some(content_type) = &meta.content_type {
            request = request.content_type(content_type);
        }

        request.send().await.map_err(Self::map_aws_error)?;
        Ok(BlobReference::new(format!("s3:{key}")))
    }

    async fn get(&self, reference: &BlobReference) -> BlobResult<StoredBlob> {
        let key = strip_prefix(reference)?;

        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_no_such_key()) {
                    BlobError::not_found(reference.as_str())
                } else {
                    Self::map_aws_error(e)
                }
            })?;

        let content_type = output.content_type().map(str::to_owned);
        let data = output.body.collect().await.map_err(Self::map_aws_error)?;

        Ok(StoredBlob {
            bytes: data.into_bytes(),
            content_type,
        })
    }

    async fn content_type_of(&self, reference: &BlobReference) -> BlobResult<Option<String>> {
        let key = strip_prefix(reference)?;

        let output = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                if e.as_service_error().is_some_and(|s| s.is_not_found()) {
                    BlobError::not_found(reference.as_str())
                } else {
                    Self::map_aws_error(e)
                }
            })?;

        Ok(output.content_type().map(str::to_owned))
    }
}

fn strip_prefix(reference: &BlobReference) -> BlobResult<&str> {
    reference
        .as_str()
        .strip_prefix("s3:")
        .ok_or_else(|| BlobError::not_found(reference.as_str()))
}
