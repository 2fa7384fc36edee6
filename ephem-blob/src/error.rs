use thiserror::Error;

/// Result type for blob store operations.
pub type BlobResult<T> = Result<T, BlobError>;

/// C2 failure taxonomy (spec §4.2 / §7).
#[derive(Error, Debug)]
pub enum BlobError {
    #[error("blob not found: {reference}")]
    NotFound { reference: String },

    #[error("blob exceeds size limit: {size} bytes (max {max})")]
    TooLarge { size: u64, max: u64 },

    #[error("blob store I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("blob store backend error: {source}")]
    Backend {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl BlobError {
    pub fn not_found(reference: impl Into<String>) -> Self {
        Self::NotFound {
            reference: reference.into(),
        }
    }

    pub fn too_large(size: u64, max: u64) -> Self {
        Self::TooLarge { size, max }
    }

    pub fn backend<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Backend {
            source: Box::new(source),
        }
    }
}
