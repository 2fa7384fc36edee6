use std::collections::HashSet;
use std::sync::Arc;

use bytes::Bytes;
use ephem_blob::{BlobStore, PutMeta};
use ephem_index::{MetadataIndex, MetadataRecord};
use ephem_types::TokenGenerator;

use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};

/// Input to an upload: raw bytes, the caller's declared content type,
/// and an optional filename passed through to the blob store.
#[derive(Debug, Clone)]
pub struct UploadInput {
    pub bytes: Bytes,
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl UploadInput {
    pub fn new(bytes: Bytes, content_type: impl Into<String>) -> Self {
        Self {
            bytes,
            content_type: Some(content_type.into()),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Successful outcome of an upload: the minted token and its absolute
/// expiry instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadReceipt {
    pub token: ephem_types::Token,
    pub expires_at_epoch_ms: i64,
}

/// C4: validates input, writes the blob, mints a token, records
/// metadata. HTTP-agnostic — the adapter layer is responsible for
/// decoding the request body into `UploadInput` before calling this.
pub struct UploadCoordinator {
    blob_store: Arc<dyn BlobStore>,
    metadata_index: Arc<dyn MetadataIndex>,
    token_generator: Arc<dyn TokenGenerator>,
    clock: Arc<dyn Clock>,
    accepted_types: HashSet<String>,
    max_upload_bytes: u64,
    url_ttl_ms: i64,
}

impl UploadCoordinator {
    pub fn new(
        blob_store: Arc<dyn BlobStore>,
        metadata_index: Arc<dyn MetadataIndex>,
        token_generator: Arc<dyn TokenGenerator>,
        clock: Arc<dyn Clock>,
        accepted_types: HashSet<String>,
        max_upload_bytes: u64,
        url_ttl_ms: i64,
    ) -> Self {
        Self {
            blob_store,
            metadata_index,
            token_generator,
            clock,
            accepted_types,
            max_upload_bytes,
            url_ttl_ms,
        }
    }

    /// Steps, in order: validate, persist blob, mint token, compute
    /// expiry, persist metadata. A failure at any step after the blob
    /// write leaves the blob orphaned rather than compensating — the
    /// core never deletes.
    pub async fn upload(&self, input: UploadInput) -> CoreResult<UploadReceipt> {
        if let Err(err) = self.validate(&input) {
            tracing::warn!(stage = "validate", %err, "upload aborted");
            return Err(err);
        }

        let size = input.bytes.len() as u64;
        let content_type = input.content_type.clone();
        let put_meta = match (&content_type, &input.filename) {
            (Some(ct), Some(name)) => PutMeta::new(ct.clone()).with_filename(name.clone()),
            (Some(ct), None) => PutMeta::new(ct.clone()),
            (None, _) => PutMeta::default(),
        };

        let blob_reference = match self.blob_store.save(input.bytes, put_meta).await {
            Ok(reference) => reference,
            Err(err) => {
                tracing::warn!(stage = "blob_store.save", %err, "upload aborted");
                return Err(err.into());
            }
        };

        let token = match self.token_generator.mint() {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!(stage = "token_generator.mint", %err, "upload aborted");
                return Err(err.into());
            }
        };

        let now_ms = self.clock.now_epoch_ms();
        let expires_at_epoch_ms = now_ms + self.url_ttl_ms;

        let record = MetadataRecord::new(
            token.clone(),
            blob_reference.clone(),
            expires_at_epoch_ms,
            content_type,
        );
        if let Err(err) = self.metadata_index.put(record).await {
            tracing::warn!(stage = "metadata_index.put", %err, "upload aborted");
            return Err(err.into());
        }

        tracing::info!(
            blob_reference = %blob_reference.as_str(),
            size,
            url_ttl_ms = self.url_ttl_ms,
            "upload recorded"
        );

        Ok(UploadReceipt {
            token,
            expires_at_epoch_ms,
        })
    }

    fn validate(&self, input: &UploadInput) -> CoreResult<()> {
        if input.bytes.is_empty() || input.content_type.is_none() {
            return Err(CoreError::InvalidInput);
        }

        let size = input.bytes.len() as u64;
        if size > self.max_upload_bytes {
            return Err(CoreError::TooLarge {
                size,
                max: self.max_upload_bytes,
            });
        }

        let content_type = input.content_type.as_ref().unwrap();
        if !self.accepted_types.contains(content_type) {
            return Err(CoreError::UnsupportedType {
                content_type: Some(content_type.clone()),
            });
        }

        Ok(())
    }
}
