use ephem_blob::BlobError;
use ephem_index::IndexError;
use ephem_types::EntropyError;
use thiserror::Error;

/// Result type for the upload and access paths.
pub type CoreResult<T> = Result<T, CoreError>;

/// Closed set of fault kinds, for callers that want to branch on
/// category without matching every [`CoreError`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidInput,
    UnsupportedType,
    TooLarge,
    Entropy,
    BlobFault,
    IndexFault,
    Internal,
}

/// Upload and access faults. Denials are deliberately **not** a variant
/// here — see [`crate::AccessOutcome`]; a denied access is a value, not
/// an error.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("empty payload or missing content type")]
    InvalidInput,

    #[error("content type {content_type:?} is not in the accepted set")]
    UnsupportedType { content_type: Option<String> },

    #[error("payload of {size} bytes exceeds the configured cap of {max} bytes")]
    TooLarge { size: u64, max: u64 },

    #[error("token entropy source unavailable")]
    Entropy(#[from] EntropyError),

    #[error("blob store fault: {0}")]
    Blob(#[from] BlobError),

    #[error("metadata index fault: {0}")]
    Index(#[from] IndexError),

    #[error("internal invariant violation: metadata pointed at a missing blob")]
    Internal,
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::InvalidInput => ErrorKind::InvalidInput,
            CoreError::UnsupportedType { .. } => ErrorKind::UnsupportedType,
            CoreError::TooLarge { .. } => ErrorKind::TooLarge,
            CoreError::Entropy(_) => ErrorKind::Entropy,
            CoreError::Blob(_) => ErrorKind::BlobFault,
            CoreError::Index(_) => ErrorKind::IndexFault,
            CoreError::Internal => ErrorKind::Internal,
        }
    }
}
