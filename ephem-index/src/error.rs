use thiserror::Error;

/// Result type for metadata index operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// C3 failure taxonomy (spec §4.3 / §7). The index never returns "not
/// found" as an error — a missing record is a legitimate `Ok(None)` from
/// `get`, since "never issued" and "expired and reaped" are both
/// ordinary outcomes the arbiter must be able to tell apart from a
/// backend fault.
#[derive(Error, Debug)]
pub enum IndexError {
    #[error("metadata index unavailable: {source}")]
    Unavailable {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("metadata index I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl IndexError {
    pub fn unavailable<E>(source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        tracing::error!(error = %source, "metadata index backend fault");
        Self::Unavailable {
            source: Box::new(source),
        }
    }
}
