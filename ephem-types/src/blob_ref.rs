use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque handle returned by a blob store adapter. Only the adapter that
/// produced it knows how to interpret it (`fs:<uuid>`, `s3:<key>`, ...); the
/// core treats it as a black-box bytestring and never parses it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlobReference(String);

impl BlobReference {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BlobReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for BlobReference {
    fn from(raw: String) -> Self {
        Self(raw)
    }
}
