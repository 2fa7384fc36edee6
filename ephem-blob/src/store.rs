use async_trait::async_trait;
use bytes::Bytes;
use ephem_types::BlobReference;

use crate::BlobResult;

/// Metadata declared by the caller at upload time.
#[derive(Debug, Clone, Default)]
pub struct PutMeta {
    pub content_type: Option<String>,
    pub filename: Option<String>,
}

impl PutMeta {
    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_type: Some(content_type.into()),
            filename: None,
        }
    }

    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }
}

/// Bytes and content type returned by a successful `get`.
#[derive(Debug, Clone)]
pub struct StoredBlob {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// C2: the Blob Store contract. Implementors persist opaque byte content
/// under a storage-chosen reference and retrieve it by that reference.
///
/// `save` need not be idempotent across calls with identical bytes — each
/// call may allocate a new reference. `get` must either return the complete
/// bytes or fail; no partial reads.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn save(&self, bytes: Bytes, meta: PutMeta) -> BlobResult<BlobReference>;

    async fn get(&self, reference: &BlobReference) -> BlobResult<StoredBlob>;

    /// Content type declared at `save` time, if the adapter retained it
    /// separately from the blob bytes. Optional: adapters that fold content
    /// type into `get`'s result may return `Ok(None)` unconditionally.
    async fn content_type_of(&self, reference: &BlobReference) -> BlobResult<Option<String>>;
}
