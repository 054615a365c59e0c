// crates/access-gate-core/src/core/access.rs
// ============================================================================
// Module: Access Gate RBAC Model
// Description: Permission, role, binding, override, and decision records.
// Purpose: Provide the read-only records consumed by the RBAC engine.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! These records mirror what administrators manage elsewhere. The engine only
//! reads them; nothing in this crate mutates a stored record.
//!
//! Scope matching and override matching live next to the records they
//! describe so the engine reads as a list of precedence rules.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::OverrideId;
use crate::core::identifiers::PermissionKey;
use crate::core::identifiers::RoleId;
use crate::core::identifiers::TenantId;
use crate::core::identifiers::UserId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Catalog Records
// ============================================================================

/// Catalog entry mapping a permission key to its owning service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Global permission key.
    pub key: PermissionKey,
    /// Owning service name.
    pub service: String,
}

/// Role scoped to a tenant and service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier.
    pub id: RoleId,
    /// Owning tenant; `None` marks a global template.
    #[serde(default)]
    pub tenant_id: Option<TenantId>,
    /// Service the role grants permissions for.
    pub service: String,
    /// Display name, unique per (tenant, service).
    pub name: String,
    /// Whether the role is a system-provided template.
    #[serde(default)]
    pub is_system_template: bool,
}

/// Association between a role and a granted permission key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolePermission {
    /// Role identifier.
    pub role_id: RoleId,
    /// Granted permission key.
    pub permission: PermissionKey,
}

// ============================================================================
// SECTION: Scopes and Bindings
// ============================================================================

/// Scope dimension at which a binding applies or a request is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeType {
    /// Applies everywhere.
    Global,
    /// Applies to a whole tenant.
    Tenant,
    /// Applies to one community.
    Community,
    /// Applies to one team.
    Team,
    /// Applies to one service.
    Service,
}

impl ScopeType {
    /// Returns the canonical wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Global => "GLOBAL",
            Self::Tenant => "TENANT",
            Self::Community => "COMMUNITY",
            Self::Team => "TEAM",
            Self::Service => "SERVICE",
        }
    }
}

impl fmt::Display for ScopeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested scope: a scope type and the id of the scoped object.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Scope {
    /// Scope dimension.
    #[serde(rename = "type")]
    pub scope_type: ScopeType,
    /// Scoped object identifier (empty for `GLOBAL`).
    #[serde(default)]
    pub id: String,
}

impl Scope {
    /// Creates a new scope.
    #[must_use]
    pub fn new(scope_type: ScopeType, id: impl Into<String>) -> Self {
        Self {
            scope_type,
            id: id.into(),
        }
    }

    /// Tenant-level scope for the given tenant.
    #[must_use]
    pub fn tenant(tenant_id: &TenantId) -> Self {
        Self::new(ScopeType::Tenant, tenant_id.as_str())
    }
}

/// Binding of a role to a user at a scope within a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RoleBinding {
    /// Tenant the binding belongs to.
    pub tenant_id: TenantId,
    /// Bound user.
    pub user_id: UserId,
    /// Scope dimension of the binding.
    pub scope_type: ScopeType,
    /// Scoped object identifier.
    #[serde(default)]
    pub scope_id: String,
    /// Bound role.
    pub role_id: RoleId,
}

impl RoleBinding {
    /// Returns true when this binding applies to a request at `requested`.
    ///
    /// `GLOBAL` bindings match every request. A `TENANT` binding whose scope
    /// id is the tenant's own id matches every request inside that tenant.
    /// Any other binding matches only the identical scope.
    #[must_use]
    pub fn matches_scope(&self, tenant_id: &TenantId, requested: &Scope) -> bool {
        match self.scope_type {
            ScopeType::Global => true,
            ScopeType::Tenant if self.scope_id == tenant_id.as_str() => true,
            _ => self.scope_type == requested.scope_type && self.scope_id == requested.id,
        }
    }
}

/// Role binding joined with its role record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundRole {
    /// Binding record.
    pub binding: RoleBinding,
    /// Role referenced by the binding.
    pub role: Role,
}

// ============================================================================
// SECTION: Policy Overrides
// ============================================================================

/// Override action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideAction {
    /// Grant access outside RBAC.
    Allow,
    /// Deny access regardless of RBAC.
    Deny,
}

/// Per-tenant, per-user allow/deny override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyOverride {
    /// Override identifier.
    pub id: OverrideId,
    /// Tenant the override applies in.
    pub tenant_id: TenantId,
    /// User the override applies to.
    pub user_id: UserId,
    /// Allow or deny.
    pub action: OverrideAction,
    /// Targeted permission; `None` applies to every permission.
    #[serde(default)]
    pub permission: Option<PermissionKey>,
    /// Operator-supplied reason.
    #[serde(default)]
    pub reason: String,
    /// Expiry instant; `None` never expires.
    #[serde(default)]
    pub expires_at: Option<Timestamp>,
    /// Creation instant, used for newest-first ordering.
    pub created_at: Timestamp,
}

impl PolicyOverride {
    /// Returns true when the override has not expired at `now`.
    #[must_use]
    pub fn is_active(&self, now: Timestamp) -> bool {
        self.expires_at.is_none_or(|expires_at| expires_at.is_after(now))
    }

    /// Returns true when the override targets `permission_key`.
    ///
    /// Only an explicit `None` is a wildcard; a key that no longer exists in
    /// the catalog simply never equals a requested (valid) key.
    #[must_use]
    pub fn matches(&self, permission_key: &PermissionKey) -> bool {
        self.permission.as_ref().is_none_or(|permission| permission == permission_key)
    }
}

// ============================================================================
// SECTION: Master Flags
// ============================================================================

/// Account-wide trust signals resolved upstream by the identity service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterFlags {
    /// Account suspended.
    #[serde(default)]
    pub suspended: bool,
    /// Account banned.
    #[serde(default)]
    pub banned: bool,
    /// Platform-wide administrator.
    #[serde(default)]
    pub system_admin: bool,
    /// Membership status label; informational only.
    #[serde(default)]
    pub membership_status: Option<String>,
}

impl MasterFlags {
    /// Returns true when the account is suspended or banned.
    #[must_use]
    pub const fn is_blocked(&self) -> bool {
        self.suspended || self.banned
    }
}

// ============================================================================
// SECTION: Decisions
// ============================================================================

/// Closed set of decision reason codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReasonCode {
    /// Permission key is not in the catalog.
    UnknownPermission,
    /// Account is suspended or banned.
    MasterSuspended,
    /// Platform administrator bypass.
    MasterSystemAdmin,
    /// A matching deny override applied.
    PolicyDeny,
    /// A matching allow override applied.
    PolicyAllow,
    /// No role for the permission's service matched the scope.
    NoRole,
    /// A matched role grants the permission.
    RbacAllow,
    /// Matched roles do not grant the permission.
    RbacDeny,
}

impl ReasonCode {
    /// Returns the verbatim wire label.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnknownPermission => "UNKNOWN_PERMISSION",
            Self::MasterSuspended => "MASTER_SUSPENDED",
            Self::MasterSystemAdmin => "MASTER_SYSTEM_ADMIN",
            Self::PolicyDeny => "POLICY_DENY",
            Self::PolicyAllow => "POLICY_ALLOW",
            Self::NoRole => "NO_ROLE",
            Self::RbacAllow => "RBAC_ALLOW",
            Self::RbacDeny => "RBAC_DENY",
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role summary returned with effective permissions.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EffectiveRole {
    /// Role identifier.
    pub id: RoleId,
    /// Role name.
    pub name: String,
    /// Role service.
    pub service: String,
}

impl From<&Role> for EffectiveRole {
    fn from(role: &Role) -> Self {
        Self {
            id: role.id.clone(),
            name: role.name.clone(),
            service: role.service.clone(),
        }
    }
}

/// Outcome of an access check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Decision {
    /// Whether access is allowed.
    pub allowed: bool,
    /// Reason code of the rule that decided.
    pub reason_code: ReasonCode,
    /// Matched roles (RBAC branch, when requested).
    pub roles: Vec<EffectiveRole>,
    /// Union of permission keys granted by matched roles (RBAC branch, when
    /// requested).
    pub permissions: Option<Vec<PermissionKey>>,
}

impl Decision {
    /// Decision without effective role or permission detail.
    #[must_use]
    pub const fn bare(allowed: bool, reason_code: ReasonCode) -> Self {
        Self {
            allowed,
            reason_code,
            roles: Vec::new(),
            permissions: None,
        }
    }

    /// Denial decision.
    #[must_use]
    pub const fn deny(reason_code: ReasonCode) -> Self {
        Self::bare(false, reason_code)
    }

    /// Allow decision.
    #[must_use]
    pub const fn allow(reason_code: ReasonCode) -> Self {
        Self::bare(true, reason_code)
    }
}
