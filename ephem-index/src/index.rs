use async_trait::async_trait;
use ephem_types::Token;

use crate::{IndexResult, MetadataRecord};

/// C3: the Metadata Index contract. Binds a [`Token`] to its
/// [`MetadataRecord`] durably. `put` is an upsert keyed by the token; the
/// coordinator never reuses a minted token, so in practice a second
/// `put` for the same key only happens during test replay. `get`
/// returns `Ok(None)` for a token that was never issued or whose record
/// has been reaped; that is not a fault and must never be conflated
/// with an `Err` from a genuinely unavailable backend.
#[async_trait]
pub trait MetadataIndex: Send + Sync {
    async fn put(&self, record: MetadataRecord) -> IndexResult<()>;

    async fn get(&self, token: &Token) -> IndexResult<Option<MetadataRecord>>;

    /// Release any held resources (connection pools, file handles).
    /// Adapters with nothing to release may accept the default no-op.
    async fn close(&self) -> IndexResult<()> {
        Ok(())
    }
}
