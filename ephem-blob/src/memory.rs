use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use ephem_types::BlobReference;
use parking_lot::RwLock;
use uuid::Uuid;

use crate::{BlobError, BlobResult, BlobStore, PutMeta, StoredBlob};

struct Entry {
    bytes: Bytes,
    content_type: Option<String>,
}

/// In-process blob store. Not durable, not shared across replicas — the
/// default for unit tests and the demo binary, the same role
/// `MemoryBackend` plays for the queue's durable abstraction.
#[derive(Default)]
pub struct MemoryBlobStore {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn save(&self, bytes: Bytes, meta: PutMeta) -> BlobResult<BlobReference> {
        let key = format!("mem:{}", Uuid::new_v4());
        self.entries.write().insert(
            key.clone(),
            Entry {
                bytes,
                content_type: meta.content_type,
            },
        );
        Ok(BlobReference::new(key))
    }

    async fn get(&self, reference: &BlobReference) -> BlobResult<StoredBlob> {
        let entries = self.entries.read();
        let entry = entries
            .get(reference.as_str())
            .ok_or_else(|| BlobError::not_found(reference.as_str()))?;
        Ok(StoredBlob {
            bytes: entry.bytes.clone(),
            content_type: entry.content_type.clone(),
        })
    }

    async fn content_type_of(&self, reference: &BlobReference) -> BlobResult<Option<String>> {
        let entries = self.entries.read();
        let entry = entries
            .get(reference.as_str())
            .ok_or_else(|| BlobError::not_found(reference.as_str()))?;
        Ok(entry.content_type.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trip() {
        let store = MemoryBlobStore::new();
        let reference = store
            .save(Bytes::from_static(b"hello"), PutMeta::new("text/plain"))
            .await
            .unwrap();

        let got = store.get(&reference).await.unwrap();
        assert_eq!(got.bytes, Bytes::from_static(b"hello"));
        assert_eq!(got.content_type.as_deref(), Some("text/plain"));
    }

    #[tokio::test]
    async fn unknown_reference_is_not_found() {
        let store = MemoryBlobStore::new();
        let err = store.get(&BlobReference::new("mem:missing")).await;
        assert!(matches!(err, Err(BlobError::NotFound { .. })));
    }

    #[tokio::test]
    async fn repeated_saves_allocate_distinct_references() {
        let store = MemoryBlobStore::new();
        let a = store
            .save(Bytes::from_static(b"x"), PutMeta::default())
            .await
            .unwrap();
        let b = store
            .save(Bytes::from_static(b"x"), PutMeta::default())
            .await
            .unwrap();
        assert_ne!(a, b);
    }
}
