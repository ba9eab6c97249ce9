//! Observability: metrics and privacy-safe log fields.
//!
//! Account emails never appear in logs in plaintext; failure paths log a
//! truncated SHA-256 correlation hash instead. Passwords and tokens never
//! appear at all (the secret wrappers redact them).

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars).
///
/// One-way and truncated: enough to correlate repeated failures for the
/// same account across log lines without recording the address itself.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest.get(..4).unwrap_or_default())
}
