// crates/access-gate-core/src/core/audit.rs
// ============================================================================
// Module: Access Gate Audit Events
// Description: Structured audit events for privileged and denial paths.
// Purpose: Emit audit records without binding the core to a log pipeline.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! The engines emit an [`AuditEvent`] on master suspension, system-admin
//! bypass, policy deny, and (when wired) kill-switch application. Sinks are
//! infallible from the engine's perspective: a sink that cannot write drops
//! the event and the decision is unchanged.
//!
//! Persistence format is owned by the sink. The core ships a no-op sink and
//! an in-memory collector; file and stderr sinks live in the CLI.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;

use serde::Serialize;

use crate::core::access::ReasonCode;
use crate::core::access::Scope;
use crate::core::identifiers::FeatureKey;
use crate::core::identifiers::PermissionKey;
use crate::core::identifiers::TenantId;
use crate::core::identifiers::UserId;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit event classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditKind {
    /// Request denied because the account is suspended or banned.
    MasterSuspended,
    /// Request allowed through the platform administrator bypass.
    SystemAdminBypass,
    /// Request denied by a policy override.
    PolicyDeny,
    /// Feature forced off by an active kill switch.
    KillSwitchApplied,
}

/// Audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: i64,
    /// Event classification.
    pub kind: AuditKind,
    /// Tenant identifier.
    pub tenant_id: TenantId,
    /// User identifier.
    pub user_id: UserId,
    /// Requested permission (access events).
    pub permission: Option<PermissionKey>,
    /// Requested scope (access events).
    pub scope: Option<Scope>,
    /// Affected feature key (rollout events).
    pub feature_key: Option<FeatureKey>,
    /// Resulting reason code (access events).
    pub reason_code: Option<ReasonCode>,
}

impl AuditEvent {
    /// Creates an access-check audit event.
    #[must_use]
    pub fn access(
        kind: AuditKind,
        at: Timestamp,
        tenant_id: &TenantId,
        user_id: &UserId,
        permission: &PermissionKey,
        scope: &Scope,
        reason_code: ReasonCode,
    ) -> Self {
        Self {
            event: "access_audit",
            timestamp_ms: at.as_unix_millis(),
            kind,
            tenant_id: tenant_id.clone(),
            user_id: user_id.clone(),
            permission: Some(permission.clone()),
            scope: Some(scope.clone()),
            feature_key: None,
            reason_code: Some(reason_code),
        }
    }

    /// Creates a kill-switch audit event.
    #[must_use]
    pub fn kill_switch(
        at: Timestamp,
        tenant_id: &TenantId,
        user_id: &UserId,
        feature_key: &FeatureKey,
    ) -> Self {
        Self {
            event: "rollout_audit",
            timestamp_ms: at.as_unix_millis(),
            kind: AuditKind::KillSwitchApplied,
            tenant_id: tenant_id.clone(),
            user_id: user_id.clone(),
            permission: None,
            scope: None,
            feature_key: Some(feature_key.clone()),
            reason_code: None,
        }
    }
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for decision events.
pub trait AuditSink: Send + Sync {
    /// Record an audit event.
    fn record(&self, event: &AuditEvent);
}

impl<T: AuditSink + ?Sized> AuditSink for Arc<T> {
    fn record(&self, event: &AuditEvent) {
        (**self).record(event);
    }
}

/// No-op audit sink.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, _event: &AuditEvent) {}
}

/// Audit sink that keeps events in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryAuditSink {
    /// Recorded events in arrival order.
    events: Arc<Mutex<Vec<AuditEvent>>>,
}

impl InMemoryAuditSink {
    /// Creates an empty collector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    #[must_use]
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.lock().map(|guard| guard.clone()).unwrap_or_default()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, event: &AuditEvent) {
        if let Ok(mut guard) = self.events.lock() {
            guard.push(event.clone());
        }
    }
}
