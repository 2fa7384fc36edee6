use std::sync::Arc;

use ephem_blob::{BlobError, BlobStore};
use ephem_index::MetadataIndex;
use ephem_types::Token;

use crate::clock::Clock;
use crate::error::{CoreError, CoreResult};
use crate::outcome::{AccessOutcome, DenyReason};

/// C5: resolves a token via the metadata index, applies the
/// deny-by-default expiry policy, and retrieves the blob only when the
/// decision is allowed. Never differentiates denial reasons to the
/// caller — [`AccessOutcome::Denied`] carries the reason for logs and
/// tests, but all three collapse to one opaque outcome at this boundary
/// by construction: the caller only sees the variant, not a message.
pub struct AccessArbiter {
    blob_store: Arc<dyn BlobStore>,
    metadata_index: Arc<dyn MetadataIndex>,
    clock: Arc<dyn Clock>,
    clock_skew_tolerance_ms: i64,
}

/// At most the first 8 characters, never the full token — keeps access
/// logs useful for investigation without turning them into a second
/// oracle for guessing live tokens.
fn token_prefix(token: &str) -> &str {
    let end = token.char_indices().nth(8).map(|(i, _)| i).unwrap_or(token.len());
    &token[..end]
}

impl AccessArbiter {
    pub fn new(
        blob_store: Arc<dyn BlobStore>,
        metadata_index: Arc<dyn MetadataIndex>,
        clock: Arc<dyn Clock>,
        clock_skew_tolerance_ms: i64,
    ) -> Self {
        Self {
            blob_store,
            metadata_index,
            clock,
            clock_skew_tolerance_ms,
        }
    }

    pub async fn access(&self, token: &Token) -> CoreResult<AccessOutcome> {
        if Token::is_blank(token.as_str()) {
            tracing::debug!(token_prefix = %token_prefix(token.as_str()), outcome = "denied", reason = "invalid", "access decision");
            return Ok(AccessOutcome::Denied(DenyReason::Invalid));
        }

        let record = match self.metadata_index.get(token).await? {
            Some(record) => record,
            None => {
                tracing::debug!(token_prefix = %token_prefix(token.as_str()), outcome = "denied", reason = "missing", "access decision");
                return Ok(AccessOutcome::Denied(DenyReason::Missing));
            }
        };

        let now_ms = self.clock.now_epoch_ms();
        if now_ms > record.expires_at_epoch_ms + self.clock_skew_tolerance_ms {
            tracing::debug!(token_prefix = %token_prefix(token.as_str()), outcome = "denied", reason = "expired", "access decision");
            return Ok(AccessOutcome::Denied(DenyReason::Expired));
        }

        let stored = match self.blob_store.get(&record.blob_reference).await {
            Ok(stored) => stored,
            Err(BlobError::NotFound { .. }) => return Err(CoreError::Internal),
            Err(other) => return Err(CoreError::Blob(other)),
        };

        tracing::debug!(token_prefix = %token_prefix(token.as_str()), outcome = "allowed", "access decision");
        Ok(AccessOutcome::Allowed(stored.bytes, record))
    }
}
