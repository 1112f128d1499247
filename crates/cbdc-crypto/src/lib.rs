// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// CBDC CRYPTOGRAPHIC PRIMITIVES
//
// Content hashing and keyed transaction signing. No signature scheme: a
// keyed-hash MAC over SHA-256 is sufficient for this deployment, where
// the replica set and counterparties are known in advance.
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use zeroize::Zeroize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    InvalidSecret,
    VerificationFailed,
}

impl std::fmt::Display for CryptoError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            CryptoError::InvalidSecret => write!(f, "secret key material is empty"),
            CryptoError::VerificationFailed => write!(f, "MAC verification failed"),
        }
    }
}

impl std::error::Error for CryptoError {}

/// A caller-held secret used to produce and verify keyed-hash MAC tags.
///
/// Zeroized on drop; this is the only key material the core handles,
/// there being no asymmetric signature scheme in play.
#[derive(Clone, Serialize, Deserialize)]
pub struct Secret(Vec<u8>);

impl Secret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn from_str(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for Secret {
    fn drop(&mut self) {
        self.0.zeroize();
    }
}

impl std::fmt::Debug for Secret {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "Secret(..)")
    }
}

/// A keyed-hash MAC tag, serialised as lowercase hex.
pub type MacTag = String;

/// Compute a keyed MAC over an ordered list of field byte-slices.
///
/// `tag = SHA256(secret || field_0 || field_1 || ... )`. Fields are fed
/// in the order given by the caller, which must match between signing
/// and verification — the canonical `sender||recipient||amount||timestamp`
/// ordering for transactions, or the analogous field order for consensus
/// messages.
pub fn compute_keyed_mac(secret: &Secret, fields: &[&[u8]]) -> MacTag {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    for field in fields {
        hasher.update(field);
    }
    hex::encode(hasher.finalize())
}

/// Verify a MAC tag in constant time against the recomputed value.
pub fn verify_keyed_mac(secret: &Secret, fields: &[&[u8]], tag: &MacTag) -> bool {
    let expected = compute_keyed_mac(secret, fields);
    constant_time_eq(expected.as_bytes(), tag.as_bytes())
}

/// Byte-wise constant-time comparison (no short-circuit on first mismatch).
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

/// SHA-256 content hash over a canonical UTF-8 byte serialisation.
/// Output is lowercase hex, matching the wire format used throughout
/// the ledger and consensus layers.
pub fn content_hash(canonical_bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical_bytes);
    hex::encode(hasher.finalize())
}

/// The all-zero parent hash used by the genesis block: 64 hex characters.
pub fn zero_hash() -> String {
    "0".repeat(64)
}
