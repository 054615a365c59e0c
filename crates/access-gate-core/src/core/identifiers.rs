// crates/access-gate-core/src/core/identifiers.rs
// ============================================================================
// Module: Access Gate Identifiers
// Description: Canonical opaque identifiers for tenants, users, and records.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Identifiers are opaque strings. Upstream systems typically hand out UUIDs,
//! but the engines only ever compare the string form, so no parsing happens
//! here. Validation belongs to snapshot loading, not to these wrappers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Identifier Macro
// ============================================================================

/// Declares a transparent string identifier with the standard conversions.
macro_rules! string_identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Returns the identifier as a string slice.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                self.0.fmt(f)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

string_identifier!(
    /// Tenant (customer organization) identifier.
    TenantId
);

string_identifier!(
    /// User identifier issued by the upstream identity service.
    UserId
);

string_identifier!(
    /// Role record identifier.
    RoleId
);

string_identifier!(
    /// Policy override record identifier.
    OverrideId
);

string_identifier!(
    /// Global permission key, e.g. `voting.vote.cast`.
    ///
    /// Permission keys are immutable identities; renaming a permission means
    /// creating a new key.
    PermissionKey
);

string_identifier!(
    /// Feature key shared by flags, experiments, and kill switches.
    FeatureKey
);
