//! # ephem-blob: pluggable blob storage adapters
//!
//! `ephem-blob` is C2 of the ephemeral image hosting core: a
//! content-addressed-by-reference blob store. The trait is deliberately
//! narrow — `save`, `get`, `content_type_of` — because the core never
//! transforms, lists, deletes, or streams a blob in parts. Adapters are
//! free to be as elaborate as they like internally; the contract they must
//! honor is: once `save` returns, `get` on that reference returns the
//! identical bytes until the store is destroyed.
//!
//! Three adapters ship here:
//! - [`MemoryBlobStore`] — in-process, for tests and the demo binary.
//! - [`LocalFsBlobStore`] — durable single-node storage.
//! - [`S3CompatibleBlobStore`] — any S3-compatible object store.
//! - [`DualBlobStore`] — composes two stores: writes go to both (primary
//!   synchronous, secondary best-effort), reads prefer primary.

mod dual;
mod error;
mod fs_store;
mod memory;
mod s3_store;
mod store;

pub use dual::DualBlobStore;
pub use error::{BlobError, BlobResult};
pub use ephem_types::BlobReference;
pub use fs_store::LocalFsBlobStore;
pub use memory::MemoryBlobStore;
pub use s3_store::{S3Config, S3CompatibleBlobStore};
pub use store::{BlobStore, PutMeta, StoredBlob};

/// Convenient re-exports for adapter authors and consumers of the core.
pub mod prelude {
    pub use crate::{BlobError, BlobReference, BlobResult, BlobStore, PutMeta, StoredBlob};
}
