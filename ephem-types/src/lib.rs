//! `ephem-types`: opaque identifier primitives shared by the ephemeral
//! image hosting core and its storage adapters.
//!
//! Both [`Token`] and [`BlobReference`] are intentionally "dumb" — fixed,
//! URL-safe, structureless strings. Neither type embeds a timestamp,
//! counter, or tenant prefix; all of that lives in the metadata record
//! that binds them together.

mod blob_ref;
mod token;

pub use blob_ref::BlobReference;
pub use token::{EntropyError, RandomTokenGenerator, Token, TokenGenerator};
