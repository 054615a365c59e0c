// crates/access-gate-core/src/core/mod.rs
// ============================================================================
// Module: Access Gate Core Types
// Description: Canonical records, identifiers, and request contracts.
// Purpose: Provide stable, serializable types shared by both engines.
// Dependencies: serde, serde_json, sha2, thiserror
// ============================================================================

//! ## Overview
//! Core types describe the administrator-managed records the engines read,
//! the decisions they produce, and the audit events they emit. These types
//! are the canonical source for any transport built on top of the engines.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod access;
pub mod audit;
pub mod contract;
pub mod hashing;
pub mod identifiers;
pub mod rollout;
pub mod snapshot;
pub mod time;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use access::BoundRole;
pub use access::Decision;
pub use access::EffectiveRole;
pub use access::MasterFlags;
pub use access::OverrideAction;
pub use access::Permission;
pub use access::PolicyOverride;
pub use access::ReasonCode;
pub use access::Role;
pub use access::RoleBinding;
pub use access::RolePermission;
pub use access::Scope;
pub use access::ScopeType;
pub use audit::AuditEvent;
pub use audit::AuditKind;
pub use audit::AuditSink;
pub use audit::InMemoryAuditSink;
pub use audit::NoopAuditSink;
pub use contract::AccessRequest;
pub use contract::AccessResponse;
pub use contract::RolloutRequest;
pub use contract::RolloutResponse;
pub use identifiers::FeatureKey;
pub use identifiers::OverrideId;
pub use identifiers::PermissionKey;
pub use identifiers::RoleId;
pub use identifiers::TenantId;
pub use identifiers::UserId;
pub use rollout::CONTROL_VARIANT;
pub use rollout::Experiment;
pub use rollout::FeatureFlag;
pub use rollout::KillSwitch;
pub use rollout::RolloutOutcome;
pub use rollout::TargetType;
pub use rollout::TenantScopedRow;
pub use rollout::Variant;
pub use snapshot::Snapshot;
pub use snapshot::SnapshotError;
pub use time::Timestamp;
