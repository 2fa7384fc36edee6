//! # ephem-config: environment-driven configuration and tracing setup
//!
//! Reads the startup configuration surface — accepted file types, size
//! cap, TTL, clock skew tolerance, and adapter selection — from
//! environment variables, and
//! builds the corresponding [`ephem_blob::BlobStore`] /
//! [`ephem_index::MetadataIndex`] trait objects. Also provides
//! [`init_tracing`], the one piece of ambient observability setup every
//! binary in this workspace calls before doing anything else.

mod accepted_types;
mod config;
mod error;
mod tracing_init;

pub use config::{BlobStoreSelection, EphemConfig, MetadataIndexSelection};
pub use error::{ConfigError, ConfigResult};
pub use tracing_init::init_tracing;
