use thiserror::Error;

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnv(String),

    #[error("invalid value for {key}: {value:?} ({reason})")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("unknown accepted-file-type shorthand: {0:?} (rejecting rather than guessing a MIME type)")]
    UnknownFileTypeShorthand(String),

    #[error("unknown blob store selection: {0:?} (expected \"local\", \"s3\", or \"local,s3\")")]
    UnknownBlobStoreSelection(String),

    #[error("unknown metadata index selection: {0:?} (expected \"memory\" or \"sqlx\")")]
    UnknownMetadataIndexSelection(String),

    #[error(transparent)]
    Blob(#[from] ephem_blob::BlobError),

    #[error(transparent)]
    Index(#[from] ephem_index::IndexError),
}

impl ConfigError {
    pub fn invalid_value(key: impl Into<String>, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }
}
