use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use ephem_types::BlobReference;
use tokio::fs;
use uuid::Uuid;

use crate::{BlobError, BlobResult, BlobStore, PutMeta, StoredBlob};

/// Durable single-node blob store. Each blob is written as two sibling
/// files under `root`: `<id>.bin` for the bytes, `<id>.meta` for the
/// declared content type. Writes land via a temp file + rename so a
/// reader never observes a partially-written object.
pub struct LocalFsBlobStore {
    root: PathBuf,
}

impl LocalFsBlobStore {
    pub async fn new(root: impl Into<PathBuf>) -> BlobResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    pub fn from_env() -> BlobResult<Self> {
        let root = std::env::var("EPHEM_FS_ROOT").unwrap_or_else(|_| "./ephem-data".to_string());
        Ok(Self {
            root: PathBuf::from(root),
        })
    }

    fn object_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.bin"))
    }

    fn meta_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.meta"))
    }

    async fn write_atomic(&self, path: &Path, contents: &[u8]) -> BlobResult<()> {
        let tmp = path.with_extension(format!(
            "{}.tmp-{}",
            path.extension().and_then(|e| e.to_str()).unwrap_or(""),
            Uuid::new_v4()
        ));
        fs::write(&tmp, contents).await?;
        fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl BlobStore for LocalFsBlobStore {
    async fn save(&self, bytes: Bytes, meta: PutMeta) -> BlobResult<BlobReference> {
        fs::create_dir_all(&self.root).await?;
        let id = Uuid::new_v4().to_string();
        if let Err(e) = self.write_atomic(&self.object_path(&id), &bytes).await {
            tracing::error!(error = %e, "blob write failed");
            return Err(e);
        }
        self.write_atomic(
            &self.meta_path(&id),
            meta.content_type.as_deref().unwrap_or("").as_bytes(),
        )
        .await?;
        Ok(BlobReference::new(format!("fs:{id}")))
    }

    async fn get(&self, reference: &BlobReference) -> BlobResult<StoredBlob> {
        let id = strip_prefix(reference)?;
        let bytes = fs::read(self.object_path(id)).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                BlobError::not_found(reference.as_str())
            } else {
                tracing::error!(error = %e, "blob read failed");
                BlobError::from(e)
            }
        })?;
        let content_type = fs::read_to_string(self.meta_path(id))
            .await
            .ok()
            .filter(|s| !s.is_empty());
        Ok(StoredBlob {
            bytes: Bytes::from(bytes),
            content_type,
        })
    }

    async fn content_type_of(&self, reference: &BlobReference) -> BlobResult<Option<String>> {
        let id = strip_prefix(reference)?;
        match fs::read_to_string(self.meta_path(id)).await {
            Ok(s) if s.is_empty() => Ok(None),
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(BlobError::not_found(reference.as_str()))
            }
            Err(e) => Err(BlobError::from(e)),
        }
    }
}

fn strip_prefix(reference: &BlobReference) -> BlobResult<&str> {
    reference
        .as_str()
        .strip_prefix("fs:")
        .ok_or_else(|| BlobError::not_found(reference.as_str()))
}
