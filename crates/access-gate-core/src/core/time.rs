// crates/access-gate-core/src/core/time.rs
// ============================================================================
// Module: Access Gate Time Model
// Description: Canonical timestamp representation for overrides and audit.
// Purpose: Keep expiry checks explicit and replayable.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Timestamps are unix epoch milliseconds. Decision logic never reads the
//! wall clock itself; it receives `now` from a [`crate::Clock`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Unix epoch milliseconds.
///
/// # Invariants
/// - No validation is performed; negative values are legal pre-epoch instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from unix epoch milliseconds.
    #[must_use]
    pub const fn from_unix_millis(value: i64) -> Self {
        Self(value)
    }

    /// Returns the timestamp as unix epoch milliseconds.
    #[must_use]
    pub const fn as_unix_millis(self) -> i64 {
        self.0
    }

    /// Returns true when `self` is strictly later than `other`.
    #[must_use]
    pub const fn is_after(self, other: Self) -> bool {
        self.0 > other.0
    }
}
