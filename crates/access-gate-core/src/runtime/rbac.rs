// crates/access-gate-core/src/runtime/rbac.rs
// ============================================================================
// Module: Access Gate RBAC Engine
// Description: Effective-access computation with override precedence.
// Purpose: Answer "may user U perform P at scope S in tenant T?".
// Dependencies: crate::{core, interfaces}, thiserror
// ============================================================================

//! ## Overview
//! Rules are evaluated in a fixed order and the first rule that decides wins:
//!
//! 1. unknown permission key: deny `UNKNOWN_PERMISSION`
//! 2. suspended or banned: deny `MASTER_SUSPENDED`
//! 3. system administrator: allow `MASTER_SYSTEM_ADMIN`
//! 4. active matching overrides: any deny gives `POLICY_DENY`, else any allow
//!    gives `POLICY_ALLOW`
//! 5. role bindings for the permission's service at a matching scope:
//!    `NO_ROLE`, `RBAC_ALLOW`, or `RBAC_DENY`
//!
//! An unknown permission is an ordinary decision, not an error, so a caller
//! cannot tell a missing key from a denial. Store failures are the only
//! errors and are never folded into a decision.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;

use thiserror::Error;

use crate::core::AccessRequest;
use crate::core::AuditEvent;
use crate::core::AuditKind;
use crate::core::AuditSink;
use crate::core::Decision;
use crate::core::EffectiveRole;
use crate::core::NoopAuditSink;
use crate::core::OverrideAction;
use crate::core::Permission;
use crate::core::PolicyOverride;
use crate::core::ReasonCode;
use crate::core::Role;
use crate::core::RoleId;
use crate::core::Timestamp;
use crate::interfaces::AccessStore;
use crate::interfaces::Clock;
use crate::interfaces::StoreError;
use crate::interfaces::SystemClock;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Access engine errors.
#[derive(Debug, Error)]
pub enum AccessError {
    /// The backing store could not answer.
    #[error("access decision unavailable: {0}")]
    Store(#[from] StoreError),
}

// ============================================================================
// SECTION: Access Engine
// ============================================================================

/// RBAC decision engine over a read store.
pub struct AccessEngine<S, C = SystemClock> {
    /// Read store.
    store: S,
    /// Clock used for override expiry and audit timestamps.
    clock: C,
    /// Audit sink for privileged and denial paths.
    audit: Arc<dyn AuditSink>,
}

impl<S: AccessStore> AccessEngine<S> {
    /// Creates an engine using the system clock and no audit sink.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self::with_clock(store, SystemClock)
    }
}

impl<S: AccessStore, C: Clock> AccessEngine<S, C> {
    /// Creates an engine with an explicit clock and no audit sink.
    #[must_use]
    pub fn with_clock(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            audit: Arc::new(NoopAuditSink),
        }
    }

    /// Routes audit events to `audit`.
    #[must_use]
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    /// Computes the access decision for a request.
    ///
    /// # Errors
    ///
    /// Returns [`AccessError::Store`] when the store cannot be read. The
    /// caller decides whether that fails open or closed.
    pub fn compute_effective_access(&self, request: &AccessRequest) -> Result<Decision, AccessError> {
        let Some(permission) = self.store.find_permission(&request.action)? else {
            return Ok(Decision::deny(ReasonCode::UnknownPermission));
        };

        let now = self.clock.now();
        if request.master_flags.is_blocked() {
            self.record(AuditKind::MasterSuspended, now, request, ReasonCode::MasterSuspended);
            return Ok(Decision::deny(ReasonCode::MasterSuspended));
        }
        if request.master_flags.system_admin {
            self.record(AuditKind::SystemAdminBypass, now, request, ReasonCode::MasterSystemAdmin);
            return Ok(Decision::allow(ReasonCode::MasterSystemAdmin));
        }

        let overrides = self.store.find_overrides(&request.tenant_id, &request.user_id)?;
        if let Some(policy) = deciding_override(overrides, request, now) {
            return Ok(match policy.action {
                OverrideAction::Deny => {
                    self.record(AuditKind::PolicyDeny, now, request, ReasonCode::PolicyDeny);
                    Decision::deny(ReasonCode::PolicyDeny)
                }
                OverrideAction::Allow => Decision::allow(ReasonCode::PolicyAllow),
            });
        }

        self.rbac_decision(request, &permission)
    }

    /// Evaluates role bindings for the permission's service.
    fn rbac_decision(
        &self,
        request: &AccessRequest,
        permission: &Permission,
    ) -> Result<Decision, AccessError> {
        let bound =
            self.store.find_bindings(&request.tenant_id, &request.user_id, &permission.service)?;
        let mut roles: BTreeMap<RoleId, Role> = BTreeMap::new();
        for entry in bound {
            if entry.role.service != permission.service
                || !entry.binding.matches_scope(&request.tenant_id, &request.scope)
            {
                continue;
            }
            roles.entry(entry.role.id.clone()).or_insert(entry.role);
        }

        if roles.is_empty() {
            let mut decision = Decision::deny(ReasonCode::NoRole);
            if request.return_effective_permissions {
                decision.permissions = Some(Vec::new());
            }
            return Ok(decision);
        }

        let role_ids: Vec<RoleId> = roles.keys().cloned().collect();
        let granted = self.store.role_permissions(&role_ids)?;
        let allowed = granted.contains(&request.action);
        let reason = if allowed { ReasonCode::RbacAllow } else { ReasonCode::RbacDeny };
        let mut decision = Decision::bare(allowed, reason);
        if request.return_effective_permissions {
            decision.roles = roles.values().map(EffectiveRole::from).collect();
            decision.permissions = Some(granted.into_iter().collect());
        }
        Ok(decision)
    }

    /// Emits an access audit event.
    fn record(&self, kind: AuditKind, at: Timestamp, request: &AccessRequest, reason: ReasonCode) {
        self.audit.record(&AuditEvent::access(
            kind,
            at,
            &request.tenant_id,
            &request.user_id,
            &request.action,
            &request.scope,
            reason,
        ));
    }
}

// ============================================================================
// SECTION: Override Resolution
// ============================================================================

/// Returns the override that decides the request, if any.
///
/// Overrides are considered newest-first. The newest matching deny wins over
/// every allow regardless of recency; otherwise the newest matching allow.
fn deciding_override(
    overrides: Vec<PolicyOverride>,
    request: &AccessRequest,
    now: Timestamp,
) -> Option<PolicyOverride> {
    let mut applicable: Vec<PolicyOverride> = overrides
        .into_iter()
        .filter(|policy| {
            policy.tenant_id == request.tenant_id
                && policy.user_id == request.user_id
                && policy.is_active(now)
                && policy.matches(&request.action)
        })
        .collect();
    applicable.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

    let deny = applicable.iter().position(|policy| policy.action == OverrideAction::Deny);
    let index = deny.or_else(|| {
        applicable.iter().position(|policy| policy.action == OverrideAction::Allow)
    })?;
    Some(applicable.swap_remove(index))
}
