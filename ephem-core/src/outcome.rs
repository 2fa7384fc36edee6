use bytes::Bytes;
use ephem_index::MetadataRecord;

/// Why an access was denied. Preserved internally (logs, tests) but
/// never surfaced distinctly to the caller — the arbiter's contract is
/// that all three collapse to one opaque denial outside this crate, to
/// prevent a caller from fingerprinting which case applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Missing,
    Expired,
    Invalid,
}

/// Result of resolving a token through the access arbiter.
#[derive(Debug, Clone)]
pub enum AccessOutcome {
    Allowed(Bytes, MetadataRecord),
    Denied(DenyReason),
}

impl AccessOutcome {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessOutcome::Allowed(..))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, AccessOutcome::Denied(_))
    }
}
