// crates/access-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Core Test Helpers
// Description: Snapshot fixtures, engines, and failing stores for tests.
// Purpose: Reduce duplication across access-gate-core integration suites.
// ============================================================================

#![allow(dead_code, reason = "Test helpers are selectively used across suites.")]

use std::collections::BTreeSet;
use std::sync::Arc;

use access_gate_core::AccessEngine;
use access_gate_core::AccessRequest;
use access_gate_core::AccessStore;
use access_gate_core::BoundRole;
use access_gate_core::Experiment;
use access_gate_core::FeatureFlag;
use access_gate_core::FeatureKey;
use access_gate_core::FixedClock;
use access_gate_core::InMemoryAuditSink;
use access_gate_core::InMemoryStore;
use access_gate_core::KillSwitch;
use access_gate_core::MasterFlags;
use access_gate_core::OverrideAction;
use access_gate_core::OverrideId;
use access_gate_core::Permission;
use access_gate_core::PermissionKey;
use access_gate_core::PolicyOverride;
use access_gate_core::Role;
use access_gate_core::RoleBinding;
use access_gate_core::RoleId;
use access_gate_core::RolePermission;
use access_gate_core::RolloutEngine;
use access_gate_core::RolloutStore;
use access_gate_core::Scope;
use access_gate_core::ScopeType;
use access_gate_core::Snapshot;
use access_gate_core::StoreError;
use access_gate_core::TargetType;
use access_gate_core::TenantId;
use access_gate_core::Timestamp;
use access_gate_core::UserId;
use serde_json::Value;
use serde_json::json;

/// Tenant used by the fixtures.
pub const TENANT: &str = "7d0c8a52-0f2c-4c0e-9f55-1f9a1c2b3d4e";
/// Second tenant used for isolation checks.
pub const OTHER_TENANT: &str = "0b1e4f1a-9a3c-4bde-8a77-5d2a6b7c8d9e";
/// User used by the fixtures.
pub const USER: &str = "4f6a2b1c-3d5e-4f70-8a9b-0c1d2e3f4a5b";
/// Permission granted by the `voter` role.
pub const VOTE_CAST: &str = "voting.vote.cast";
/// Voting permission not granted by the `voter` role.
pub const POLL_CREATE: &str = "voting.poll.create";
/// Permission owned by a different service.
pub const FEED_POST: &str = "feed.post.create";
/// Fixed evaluation instant.
pub const NOW_MS: i64 = 1_700_000_000_000;

/// Fixed clock pinned to [`NOW_MS`].
pub const fn clock() -> FixedClock {
    FixedClock(Timestamp::from_unix_millis(NOW_MS))
}

/// Permission catalog, `voter` role, and a tenant-level binding for [`USER`].
pub fn access_snapshot() -> Snapshot {
    Snapshot {
        permissions: vec![
            permission(VOTE_CAST, "voting"),
            permission(POLL_CREATE, "voting"),
            permission(FEED_POST, "feed"),
        ],
        roles: vec![role("role-voter", Some(TENANT), "voting", "voter")],
        role_permissions: vec![grant("role-voter", VOTE_CAST)],
        bindings: vec![binding(ScopeType::Tenant, TENANT, "role-voter")],
        ..Snapshot::default()
    }
}

/// Builds a catalog entry.
pub fn permission(key: &str, service: &str) -> Permission {
    Permission {
        key: PermissionKey::new(key),
        service: service.to_string(),
    }
}

/// Builds a role.
pub fn role(id: &str, tenant: Option<&str>, service: &str, name: &str) -> Role {
    Role {
        id: RoleId::new(id),
        tenant_id: tenant.map(TenantId::new),
        service: service.to_string(),
        name: name.to_string(),
        is_system_template: tenant.is_none(),
    }
}

/// Builds a role grant.
pub fn grant(role_id: &str, key: &str) -> RolePermission {
    RolePermission {
        role_id: RoleId::new(role_id),
        permission: PermissionKey::new(key),
    }
}

/// Builds a binding for [`USER`] in [`TENANT`].
pub fn binding(scope_type: ScopeType, scope_id: &str, role_id: &str) -> RoleBinding {
    RoleBinding {
        tenant_id: TenantId::new(TENANT),
        user_id: UserId::new(USER),
        scope_type,
        scope_id: scope_id.to_string(),
        role_id: RoleId::new(role_id),
    }
}

/// Builds an override for [`USER`] in [`TENANT`].
pub fn policy(
    id: &str,
    action: OverrideAction,
    permission: Option<&str>,
    created_at: i64,
    expires_at: Option<i64>,
) -> PolicyOverride {
    PolicyOverride {
        id: OverrideId::new(id),
        tenant_id: TenantId::new(TENANT),
        user_id: UserId::new(USER),
        action,
        permission: permission.map(PermissionKey::new),
        reason: "test".to_string(),
        expires_at: expires_at.map(Timestamp::from_unix_millis),
        created_at: Timestamp::from_unix_millis(created_at),
    }
}

/// Tenant-scoped access request for [`USER`].
pub fn request(action: &str) -> AccessRequest {
    AccessRequest {
        tenant_id: TenantId::new(TENANT),
        user_id: UserId::new(USER),
        action: PermissionKey::new(action),
        scope: Scope::new(ScopeType::Tenant, TENANT),
        master_flags: MasterFlags::default(),
        return_effective_permissions: false,
    }
}

/// Access engine over `snapshot` with a collecting audit sink.
pub fn access_engine(
    snapshot: Snapshot,
) -> Result<(AccessEngine<InMemoryStore, FixedClock>, InMemoryAuditSink), String> {
    let store = InMemoryStore::new(snapshot).map_err(|err| err.to_string())?;
    let audit = InMemoryAuditSink::new();
    let engine = AccessEngine::with_clock(store, clock()).with_audit(Arc::new(audit.clone()));
    Ok((engine, audit))
}

/// Rollout engine over `snapshot` without audit.
pub fn rollout_engine(snapshot: Snapshot) -> Result<RolloutEngine<InMemoryStore, FixedClock>, String> {
    let store = InMemoryStore::new(snapshot).map_err(|err| err.to_string())?;
    Ok(RolloutEngine::with_clock(store, clock()))
}

/// Builds a feature flag row.
pub fn flag(key: &str, tenant: Option<&str>, enabled: bool, target: TargetType, value: Value) -> FeatureFlag {
    FeatureFlag {
        id: format!("flag-{key}-{}", tenant.unwrap_or("global")),
        key: FeatureKey::new(key),
        tenant_id: tenant.map(TenantId::new),
        enabled,
        target_type: target,
        target_value: value,
    }
}

/// Builds an experiment row.
pub fn experiment(
    key: &str,
    tenant: Option<&str>,
    enabled: bool,
    target: TargetType,
    value: Value,
    variants: &[(&str, i64)],
) -> Experiment {
    Experiment {
        id: format!("exp-{key}-{}", tenant.unwrap_or("global")),
        key: FeatureKey::new(key),
        tenant_id: tenant.map(TenantId::new),
        enabled,
        target_type: target,
        target_value: value,
        variants: variants.iter().map(|(name, weight)| json!({"name": name, "weight": weight})).collect(),
    }
}

/// Builds a kill switch row.
pub fn kill_switch(key: &str, tenant: Option<&str>, active: bool) -> KillSwitch {
    KillSwitch {
        feature_key: FeatureKey::new(key),
        tenant_id: tenant.map(TenantId::new),
        active,
    }
}

/// Store whose every lookup fails with an I/O error.
pub struct UnreachableStore;

impl AccessStore for UnreachableStore {
    fn find_permission(&self, _key: &PermissionKey) -> Result<Option<Permission>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }

    fn find_overrides(
        &self,
        _tenant_id: &TenantId,
        _user_id: &UserId,
    ) -> Result<Vec<PolicyOverride>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }

    fn find_bindings(
        &self,
        _tenant_id: &TenantId,
        _user_id: &UserId,
        _service: &str,
    ) -> Result<Vec<BoundRole>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }

    fn role_permissions(&self, _role_ids: &[RoleId]) -> Result<BTreeSet<PermissionKey>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }
}

impl RolloutStore for UnreachableStore {
    fn kill_switches(&self, _tenant_id: &TenantId) -> Result<Vec<KillSwitch>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }

    fn feature_flags(&self, _tenant_id: &TenantId) -> Result<Vec<FeatureFlag>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }

    fn experiments(&self, _tenant_id: &TenantId) -> Result<Vec<Experiment>, StoreError> {
        Err(StoreError::Io("connection refused".to_string()))
    }
}
