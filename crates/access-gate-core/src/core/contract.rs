// crates/access-gate-core/src/core/contract.rs
// ============================================================================
// Module: Access Gate Request Contract
// Description: Logical request/response shapes for access and rollout checks.
// Purpose: Keep the JSON field names in one place for every transport.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Transports (HTTP handlers, RPC adapters, the CLI) deserialize these types
//! and hand them to the engines unchanged. Field names are part of the
//! compatibility surface.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::access::Decision;
use crate::core::access::EffectiveRole;
use crate::core::access::MasterFlags;
use crate::core::access::ReasonCode;
use crate::core::access::Scope;
use crate::core::identifiers::PermissionKey;
use crate::core::identifiers::TenantId;
use crate::core::identifiers::UserId;
use crate::core::rollout::RolloutOutcome;

// ============================================================================
// SECTION: Access Check
// ============================================================================

/// Access check request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRequest {
    /// Tenant the request is made in.
    pub tenant_id: TenantId,
    /// Requesting user.
    pub user_id: UserId,
    /// Permission key being exercised.
    pub action: PermissionKey,
    /// Scope of the request.
    pub scope: Scope,
    /// Upstream account-wide flags.
    #[serde(default)]
    pub master_flags: MasterFlags,
    /// Return matched roles and granted permissions.
    #[serde(default)]
    pub return_effective_permissions: bool,
}

/// Access check response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessResponse {
    /// Whether access is allowed.
    pub allowed: bool,
    /// Reason code label.
    pub reason_code: ReasonCode,
    /// Matched roles.
    pub effective_roles: Vec<EffectiveRole>,
    /// Granted permission keys, or `null` when not computed.
    pub effective_permissions: Option<Vec<PermissionKey>>,
}

impl From<Decision> for AccessResponse {
    fn from(decision: Decision) -> Self {
        Self {
            allowed: decision.allowed,
            reason_code: decision.reason_code,
            effective_roles: decision.roles,
            effective_permissions: decision.permissions,
        }
    }
}

// ============================================================================
// SECTION: Rollout Check
// ============================================================================

/// Rollout evaluation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolloutRequest {
    /// Tenant the user belongs to.
    pub tenant_id: TenantId,
    /// User being evaluated.
    pub user_id: UserId,
    /// Stable pseudonymous key; defaults to SHA-256 of the user id.
    #[serde(default)]
    pub user_key_hash: Option<String>,
}

/// Rollout evaluation response (`feature_flags`, `experiments`).
pub type RolloutResponse = RolloutOutcome;
