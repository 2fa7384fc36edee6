use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Number of random bytes drawn per token. 32 bytes = 256 bits of entropy,
/// comfortably above the 128-bit minimum.
const TOKEN_ENTROPY_BYTES: usize = 32;

/// Opaque, URL-safe identifier binding a caller-visible URL to a
/// `MetadataRecord`. Carries no semantics: no timestamp, no counter, no
/// prefix. `Display`/`as_str` never need URL-encoding.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Token(String);

impl Token {
    /// Wrap an already-minted token string (e.g. read back from the index).
    /// Does not validate shape — callers that need syntactic validation of
    /// caller-supplied input should use `is_blank` instead.
    pub fn from_string(raw: String) -> Self {
        Self(raw)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Syntactic check per spec §4.5 step 1: empty or whitespace-only.
    pub fn is_blank(raw: &str) -> bool {
        raw.trim().is_empty()
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Failure mode for token generation: the underlying RNG could not be read.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("entropy source unavailable")]
pub struct EntropyError;

/// C1: the Token Generator contract. `mint` takes no inputs and must not
/// block in steady state; callers (the Upload Coordinator) must propagate
/// and abort on failure rather than fall back to a weaker source.
pub trait TokenGenerator: Send + Sync {
    fn mint(&self) -> Result<Token, EntropyError>;
}

/// Default generator: draws `TOKEN_ENTROPY_BYTES` from the OS CSPRNG and
/// encodes them URL-safe without padding, so the result is usable directly
/// as a path segment with no escaping.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomTokenGenerator;

impl TokenGenerator for RandomTokenGenerator {
    fn mint(&self) -> Result<Token, EntropyError> {
        let mut bytes = [0u8; TOKEN_ENTROPY_BYTES];
        OsRng.try_fill_bytes(&mut bytes).map_err(|_| EntropyError)?;
        Ok(Token(URL_SAFE_NO_PAD.encode(bytes)))
    }
}
