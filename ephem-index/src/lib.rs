//! # ephem-index: metadata index adapters
//!
//! `ephem-index` is C3 of the ephemeral image hosting core: the durable
//! binding from a [`Token`](ephem_types::Token) to its
//! [`MetadataRecord`] (blob reference, absolute expiry, content type).
//! `put` is an upsert keyed by the token — a second `put` for the same
//! key overwrites the record, which in practice only happens during test
//! replay, since the coordinator never reuses a minted token. No adapter
//! exposes a separate update or delete path. Reaping expired rows, if an
//! adapter chooses to do it, is a storage detail invisible to
//! [`MetadataIndex::get`]'s contract: a reaped row and a never-issued
//! token both read back as `Ok(None)`.

mod error;
mod index;
mod memory;
mod record;

#[cfg(feature = "sqlx-backend")]
mod sqlx_backend;

pub use error::{IndexError, IndexResult};
pub use index::MetadataIndex;
pub use memory::MemoryMetadataIndex;
pub use record::MetadataRecord;

#[cfg(feature = "sqlx-backend")]
pub use sqlx_backend::SqlxMetadataIndex;

pub mod prelude {
    pub use crate::{IndexError, IndexResult, MetadataIndex, MetadataRecord};
}
