// crates/access-gate-core/src/runtime/store.rs
// ============================================================================
// Module: Access Gate In-Memory Store
// Description: Snapshot-backed implementation of both read-store traits.
// Purpose: Serve decisions from a validated, atomically replaceable snapshot.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryStore`] holds one validated [`Snapshot`]. Readers take a shared
//! lock; [`InMemoryStore::replace`] swaps in a whole new snapshot, so a
//! decision sees either the old records or the new ones, never a mix.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;

use crate::core::BoundRole;
use crate::core::Experiment;
use crate::core::FeatureFlag;
use crate::core::KillSwitch;
use crate::core::Permission;
use crate::core::PermissionKey;
use crate::core::PolicyOverride;
use crate::core::RoleId;
use crate::core::Snapshot;
use crate::core::SnapshotError;
use crate::core::TenantId;
use crate::core::UserId;
use crate::interfaces::AccessStore;
use crate::interfaces::RolloutStore;
use crate::interfaces::StoreError;

// ============================================================================
// SECTION: In-Memory Store
// ============================================================================

/// In-memory read store over a validated snapshot.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    /// Current snapshot.
    snapshot: Arc<RwLock<Snapshot>>,
}

impl InMemoryStore {
    /// Creates a store from a snapshot after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError`] when the snapshot violates record invariants.
    pub fn new(snapshot: Snapshot) -> Result<Self, SnapshotError> {
        snapshot.validate()?;
        Ok(Self {
            snapshot: Arc::new(RwLock::new(snapshot)),
        })
    }

    /// Replaces the snapshot after validating it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] when validation fails and
    /// [`StoreError::Store`] when the lock is poisoned.
    pub fn replace(&self, snapshot: Snapshot) -> Result<(), StoreError> {
        snapshot.validate().map_err(|err| StoreError::Invalid(err.to_string()))?;
        let mut guard = self
            .snapshot
            .write()
            .map_err(|_| StoreError::Store("snapshot lock poisoned".to_string()))?;
        *guard = snapshot;
        drop(guard);
        Ok(())
    }

    /// Acquires a read guard over the current snapshot.
    fn read(&self) -> Result<RwLockReadGuard<'_, Snapshot>, StoreError> {
        self.snapshot.read().map_err(|_| StoreError::Store("snapshot lock poisoned".to_string()))
    }
}

impl AccessStore for InMemoryStore {
    fn find_permission(&self, key: &PermissionKey) -> Result<Option<Permission>, StoreError> {
        let guard = self.read()?;
        Ok(guard.permissions.iter().find(|permission| &permission.key == key).cloned())
    }

    fn find_overrides(
        &self,
        tenant_id: &TenantId,
        user_id: &UserId,
    ) -> Result<Vec<PolicyOverride>, StoreError> {
        let guard = self.read()?;
        Ok(guard
            .overrides
            .iter()
            .filter(|policy| &policy.tenant_id == tenant_id && &policy.user_id == user_id)
            .cloned()
            .collect())
    }

    fn find_bindings(
        &self,
        tenant_id: &TenantId,
        user_id: &UserId,
        service: &str,
    ) -> Result<Vec<BoundRole>, StoreError> {
        let guard = self.read()?;
        let mut bound = Vec::new();
        for binding in &guard.bindings {
            if &binding.tenant_id != tenant_id || &binding.user_id != user_id {
                continue;
            }
            let Some(role) = guard.roles.iter().find(|role| role.id == binding.role_id) else {
                return Err(StoreError::Corrupt(format!(
                    "binding references unknown role {}",
                    binding.role_id
                )));
            };
            if role.service == service {
                bound.push(BoundRole {
                    binding: binding.clone(),
                    role: role.clone(),
                });
            }
        }
        Ok(bound)
    }

    fn role_permissions(&self, role_ids: &[RoleId]) -> Result<BTreeSet<PermissionKey>, StoreError> {
        let guard = self.read()?;
        Ok(guard
            .role_permissions
            .iter()
            .filter(|grant| role_ids.contains(&grant.role_id))
            .map(|grant| grant.permission.clone())
            .collect())
    }
}

impl RolloutStore for InMemoryStore {
    fn kill_switches(&self, tenant_id: &TenantId) -> Result<Vec<KillSwitch>, StoreError> {
        let guard = self.read()?;
        Ok(guard
            .kill_switches
            .iter()
            .filter(|switch| visible_to(switch.tenant_id.as_ref(), tenant_id))
            .cloned()
            .collect())
    }

    fn feature_flags(&self, tenant_id: &TenantId) -> Result<Vec<FeatureFlag>, StoreError> {
        let guard = self.read()?;
        Ok(guard
            .feature_flags
            .iter()
            .filter(|flag| visible_to(flag.tenant_id.as_ref(), tenant_id))
            .cloned()
            .collect())
    }

    fn experiments(&self, tenant_id: &TenantId) -> Result<Vec<Experiment>, StoreError> {
        let guard = self.read()?;
        Ok(guard
            .experiments
            .iter()
            .filter(|experiment| visible_to(experiment.tenant_id.as_ref(), tenant_id))
            .cloned()
            .collect())
    }
}

/// Returns true for global rows and rows owned by `tenant_id`.
fn visible_to(owner: Option<&TenantId>, tenant_id: &TenantId) -> bool {
    owner.is_none_or(|owner| owner == tenant_id)
}
