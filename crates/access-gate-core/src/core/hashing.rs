// crates/access-gate-core/src/core/hashing.rs
// ============================================================================
// Module: Access Gate Deterministic Hashing
// Description: SHA-256 helpers for user pseudonyms and rollout buckets.
// Purpose: Derive stable bucket numbers that agree across processes.
// Dependencies: sha2
// ============================================================================

//! ## Overview
//! Rollout membership is a pure function of a user key hash and a feature
//! key. Everything here is SHA-256 over UTF-8 text with no salts, clocks, or
//! process-local state, so every replica assigns the same bucket.
//!
//! The 32-bit prefix of a digest is read big-endian.

// ============================================================================
// SECTION: Imports
// ============================================================================

use sha2::Digest;
use sha2::Sha256;

use crate::core::identifiers::FeatureKey;
use crate::core::identifiers::UserId;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Number of percentage buckets.
pub const PERCENT_BUCKETS: u32 = 100;

/// Separator inserted between the user hash and an experiment key.
const EXPERIMENT_SEPARATOR: &str = ":exp:";

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns the default user key hash: lowercase hex SHA-256 of the user id.
#[must_use]
pub fn user_key_hash(user_id: &UserId) -> String {
    hex_encode(&Sha256::digest(user_id.as_str().as_bytes()))
}

/// Returns the percentage bucket in `[0, 100)` for a user and feature.
///
/// The hashed input is `"{user_key_hash}:{feature_key}"`.
#[must_use]
pub fn percent_bucket(user_key_hash: &str, feature_key: &FeatureKey) -> u32 {
    let input = format!("{user_key_hash}:{}", feature_key.as_str());
    digest_prefix(input.as_bytes()) % PERCENT_BUCKETS
}

/// Returns the variant bucket in `[0, total)` for a user and experiment.
///
/// The hashed input is `"{user_key_hash}:exp:{experiment_key}"`. Returns
/// `None` when `total` is zero.
#[must_use]
pub fn variant_bucket(user_key_hash: &str, experiment_key: &FeatureKey, total: u64) -> Option<u64> {
    if total == 0 {
        return None;
    }
    let input = format!("{user_key_hash}{EXPERIMENT_SEPARATOR}{}", experiment_key.as_str());
    Some(u64::from(digest_prefix(input.as_bytes())) % total)
}

/// Reads the first four digest bytes of `SHA-256(bytes)` as a big-endian `u32`.
fn digest_prefix(bytes: &[u8]) -> u32 {
    let digest = Sha256::digest(bytes);
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(HEX[usize::from(byte >> 4)]));
        out.push(char::from(HEX[usize::from(byte & 0x0f)]));
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================
