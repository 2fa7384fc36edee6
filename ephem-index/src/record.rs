use ephem_types::{BlobReference, Token};
use serde::{Deserialize, Serialize};

/// The durable tuple binding a token to its blob and expiry. Immutable
/// once inserted — no adapter exposes an update path, only `put` (insert)
/// and `get` (read).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub token: Token,
    pub blob_reference: BlobReference,
    pub expires_at_epoch_ms: i64,
    pub content_type: Option<String>,
}

impl MetadataRecord {
    pub fn new(
        token: Token,
        blob_reference: BlobReference,
        expires_at_epoch_ms: i64,
        content_type: Option<String>,
    ) -> Self {
        Self {
            token,
            blob_reference,
            expires_at_epoch_ms,
            content_type,
        }
    }
}
