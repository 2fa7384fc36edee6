use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use ephem_types::BlobReference;

use crate::{BlobResult, BlobStore, PutMeta, StoredBlob};

/// Composes two blob stores behind one contract. The primary is written
/// synchronously and determines the reference returned to the caller; the
/// secondary is written best-effort in the background and only consulted
/// on read if the primary's `get` fails.
///
/// A secondary write failure is logged and otherwise swallowed — it never
/// fails the outer `save`. This trades secondary durability for upload
/// latency: callers who need both writes confirmed should not use this
/// adapter.
pub struct DualBlobStore {
    primary: Arc<dyn BlobStore>,
    secondary: Arc<dyn BlobStore>,
}

impl DualBlobStore {
    pub fn new(primary: Arc<dyn BlobStore>, secondary: Arc<dyn BlobStore>) -> Self {
        Self { primary, secondary }
    }
}

#[async_trait]
impl BlobStore for DualBlobStore {
    async fn save(&self, bytes: Bytes, meta: PutMeta) -> BlobResult<BlobReference> {
        let reference = self.primary.save(bytes.clone(), meta.clone()).await?;

        let secondary = self.secondary.clone();
        let secondary_bytes = bytes;
        let secondary_meta = meta;
        tokio::spawn(async move {
            if let Err(err) = secondary.save(secondary_bytes, secondary_meta).await {
                tracing::warn!(error = %err, "secondary blob store write failed");
            }
        });

        Ok(reference)
    }

    async fn get(&self, reference: &BlobReference) -> BlobResult<StoredBlob> {
        match self.primary.get(reference).await {
            Ok(blob) => Ok(blob),
            Err(primary_err) => match self.secondary.get(reference).await {
                Ok(blob) => Ok(blob),
                Err(_) => Err(primary_err),
            },
        }
    }

    async fn content_type_of(&self, reference: &BlobReference) -> BlobResult<Option<String>> {
        match self.primary.content_type_of(reference).await {
            Ok(content_type) => Ok(content_type),
            Err(primary_err) => match self.secondary.content_type_of(reference).await {
                Ok(content_type) => Ok(content_type),
                Err(_) => Err(primary_err),
            },
        }
    }
}
