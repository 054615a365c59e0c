// crates/access-gate-core/src/interfaces/mod.rs
// ============================================================================
// Module: Access Gate Interfaces
// Description: Backend-agnostic read-store and clock interfaces.
// Purpose: Define the contract surfaces the decision engines depend on.
// Dependencies: crate::core, thiserror
// ============================================================================

//! ## Overview
//! The engines depend only on these traits, never on a database. A store can
//! be backed by SQL, a cache, or a replicated read model. Implementations
//! must report infrastructure failures as [`StoreError`]; an empty result
//! means "no records", never "lookup failed".

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use thiserror::Error;

use crate::core::BoundRole;
use crate::core::Experiment;
use crate::core::FeatureFlag;
use crate::core::KillSwitch;
use crate::core::Permission;
use crate::core::PermissionKey;
use crate::core::PolicyOverride;
use crate::core::RoleId;
use crate::core::TenantId;
use crate::core::Timestamp;
use crate::core::UserId;

// ============================================================================
// SECTION: Store Errors
// ============================================================================

/// Read store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Store I/O error (backend unreachable, timeout).
    #[error("access store io error: {0}")]
    Io(String),
    /// Store data is corrupted or fails integrity checks.
    #[error("access store corruption: {0}")]
    Corrupt(String),
    /// Store data is invalid.
    #[error("access store invalid data: {0}")]
    Invalid(String),
    /// Store reported an error.
    #[error("access store error: {0}")]
    Store(String),
}

// ============================================================================
// SECTION: Access Store
// ============================================================================

/// Read-only view of the permission catalog, roles, bindings, and overrides.
pub trait AccessStore {
    /// Looks up a permission in the catalog.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn find_permission(&self, key: &PermissionKey) -> Result<Option<Permission>, StoreError>;

    /// Returns every override for the tenant and user, expired ones included.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn find_overrides(
        &self,
        tenant_id: &TenantId,
        user_id: &UserId,
    ) -> Result<Vec<PolicyOverride>, StoreError>;

    /// Returns bindings for the tenant and user whose role belongs to `service`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn find_bindings(
        &self,
        tenant_id: &TenantId,
        user_id: &UserId,
        service: &str,
    ) -> Result<Vec<BoundRole>, StoreError>;

    /// Returns the union of permission keys granted by `role_ids`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn role_permissions(&self, role_ids: &[RoleId]) -> Result<BTreeSet<PermissionKey>, StoreError>;
}

// ============================================================================
// SECTION: Rollout Store
// ============================================================================

/// Read-only view of flags, experiments, and kill switches.
///
/// Every method returns rows owned by `tenant_id` together with global rows.
pub trait RolloutStore {
    /// Returns kill switches for the tenant and global kill switches.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn kill_switches(&self, tenant_id: &TenantId) -> Result<Vec<KillSwitch>, StoreError>;

    /// Returns feature flags for the tenant and global feature flags.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn feature_flags(&self, tenant_id: &TenantId) -> Result<Vec<FeatureFlag>, StoreError>;

    /// Returns experiments for the tenant and global experiments.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the lookup fails.
    fn experiments(&self, tenant_id: &TenantId) -> Result<Vec<Experiment>, StoreError>;
}

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of the current instant for expiry checks and audit timestamps.
pub trait Clock: Send + Sync {
    /// Returns the current instant.
    fn now(&self) -> Timestamp;
}

/// Wall clock backed by [`SystemTime`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        let millis = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis();
        Timestamp::from_unix_millis(i64::try_from(millis).unwrap_or(i64::MAX))
    }
}

/// Clock pinned to a single instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}
